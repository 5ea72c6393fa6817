//! Next-occurrence search within the cycle.

use crate::schedule::validate_assignment;
use crate::{Schedule, WorkoutRef};

/// Next cycle day after `current_day` on which `workout` is scheduled
///
/// Scans forward one full cycle, wrapping past day N back to day 1. Today is
/// only returned when no other day in the cycle holds the workout.
///
/// # Panics
///
/// Panics if a scanned day holds rest alongside workouts. `Schedule` rejects
/// such days on every write path, so reaching one is a bug.
pub fn next_occurrence(
    workout: &WorkoutRef,
    schedule: &Schedule,
    current_day: u32,
    cycle_length: u32,
) -> Option<u32> {
    if cycle_length == 0 {
        return None;
    }

    let n = i64::from(cycle_length);
    for i in 1..=n {
        let day = ((i64::from(current_day) - 1 + i).rem_euclid(n) + 1) as u32;
        let selections = schedule.selections(day);
        assert!(
            validate_assignment(selections).is_ok(),
            "day {} holds rest alongside other selections",
            day
        );

        if selections.iter().any(|s| s.matches(workout)) {
            tracing::debug!("{} next occurs on day {} ({} days ahead)", workout, day, i);
            return Some(day);
        }
    }

    tracing::debug!("{} is not scheduled in this cycle", workout);
    None
}

/// Days from `current_day` forward to `target_day`, a full cycle when equal
pub fn days_until(current_day: u32, target_day: u32, cycle_length: u32) -> u32 {
    if cycle_length == 0 {
        return 0;
    }
    let n = i64::from(cycle_length);
    let ahead = (i64::from(target_day) - i64::from(current_day)).rem_euclid(n);
    if ahead == 0 {
        cycle_length
    } else {
        ahead as u32
    }
}

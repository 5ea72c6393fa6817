//! Cycle schedule: per-day workout assignments and their invariants.
//!
//! A day holds an ordered list of selections. Rest is exclusive: a day is
//! either exactly `[Rest]` or contains no rest entry. Editing operations keep
//! that true (rest replaces, adding a workout to a rest day replaces the rest),
//! and deserialization re-validates every day so stored data cannot bypass it.

use crate::clock::compute_cycle_day;
use crate::{CycleConfig, Error, PlannedWorkout, Result, WorkoutRef, WorkoutSelection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selection count at which a day is flagged for overtraining risk
pub const OVERTRAINING_THRESHOLD: usize = 3;

/// Assignment for a single cycle day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleDay {
    pub day_number: u32,
    pub selections: Vec<WorkoutSelection>,
}

impl ScheduleDay {
    pub fn is_rest(&self) -> bool {
        self.selections.first().is_some_and(WorkoutSelection::is_rest)
    }

    pub fn contains(&self, workout: &WorkoutRef) -> bool {
        self.selections.iter().any(|s| s.matches(workout))
    }
}

/// Non-blocking advisories for a valid assignment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssignmentCheck {
    /// Day holds `OVERTRAINING_THRESHOLD` or more selections
    pub overtraining_risk: bool,
}

/// Check the rest-exclusivity rule for one day's selections
///
/// The number of workouts is not capped; a busy day only sets the
/// `overtraining_risk` advisory.
pub fn validate_assignment(selections: &[WorkoutSelection]) -> Result<AssignmentCheck> {
    if selections.len() > 1 && selections.iter().any(WorkoutSelection::is_rest) {
        return Err(Error::InvalidAssignment(format!(
            "rest must be the only selection on a day, found {} selections",
            selections.len()
        )));
    }

    Ok(AssignmentCheck {
        overtraining_risk: selections.len() >= OVERTRAINING_THRESHOLD,
    })
}

/// Full mapping from cycle day to assignment
///
/// Days without an entry are unconfigured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleFile", into = "ScheduleFile")]
pub struct Schedule {
    cycle_length: u32,
    days: BTreeMap<u32, ScheduleDay>,
}

/// On-disk shape of a schedule
#[derive(Serialize, Deserialize)]
struct ScheduleFile {
    cycle_length: u32,
    days: Vec<ScheduleDay>,
}

impl TryFrom<ScheduleFile> for Schedule {
    type Error = Error;

    fn try_from(file: ScheduleFile) -> Result<Self> {
        let mut schedule = Schedule::new(file.cycle_length)?;
        for day in file.days {
            if schedule.days.contains_key(&day.day_number) {
                return Err(Error::InvalidAssignment(format!(
                    "day {} listed more than once",
                    day.day_number
                )));
            }
            schedule.set_day(day.day_number, day.selections)?;
        }
        Ok(schedule)
    }
}

impl From<Schedule> for ScheduleFile {
    fn from(schedule: Schedule) -> Self {
        ScheduleFile {
            cycle_length: schedule.cycle_length,
            days: schedule.days.into_values().collect(),
        }
    }
}

impl Schedule {
    /// Empty schedule for an N-day cycle
    pub fn new(cycle_length: u32) -> Result<Self> {
        if cycle_length == 0 {
            return Err(Error::InvalidConfig("cycle length must be at least 1".into()));
        }
        Ok(Self {
            cycle_length,
            days: BTreeMap::new(),
        })
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    pub fn day(&self, day_number: u32) -> Option<&ScheduleDay> {
        self.days.get(&day_number)
    }

    /// Selections for a day, empty when unconfigured
    pub fn selections(&self, day_number: u32) -> &[WorkoutSelection] {
        self.days
            .get(&day_number)
            .map(|d| d.selections.as_slice())
            .unwrap_or(&[])
    }

    /// Configured days in ascending order
    pub fn days(&self) -> impl Iterator<Item = &ScheduleDay> {
        self.days.values()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Cycle day for `now` and what is planned on it
    pub fn for_instant(
        &self,
        config: &CycleConfig,
        now: DateTime<Utc>,
    ) -> Result<(u32, &[WorkoutSelection])> {
        if config.cycle_length != self.cycle_length {
            return Err(Error::InvalidConfig(format!(
                "schedule covers {} days but the cycle is {} days long",
                self.cycle_length, config.cycle_length
            )));
        }
        let day = compute_cycle_day(config, now)?;
        Ok((day, self.selections(day)))
    }

    pub fn rest_days(&self) -> Vec<u32> {
        self.days()
            .filter(|d| d.is_rest())
            .map(|d| d.day_number)
            .collect()
    }

    /// Replace a day's selections; an empty list unconfigures the day
    pub fn set_day(
        &mut self,
        day_number: u32,
        selections: Vec<WorkoutSelection>,
    ) -> Result<AssignmentCheck> {
        self.check_day_number(day_number)?;
        let check = validate_assignment(&selections)?;

        if selections.is_empty() {
            self.days.remove(&day_number);
        } else {
            self.days.insert(
                day_number,
                ScheduleDay {
                    day_number,
                    selections,
                },
            );
        }
        Ok(check)
    }

    /// Make a day rest-only, dropping whatever was planned
    pub fn select_rest(&mut self, day_number: u32) -> Result<()> {
        self.set_day(day_number, vec![WorkoutSelection::Rest])?;
        Ok(())
    }

    /// Add a workout to a day
    ///
    /// A rest day becomes a training day holding only this workout. Adding a
    /// workout the day already holds is a no-op.
    pub fn add_workout(
        &mut self,
        day_number: u32,
        workout: PlannedWorkout,
    ) -> Result<AssignmentCheck> {
        self.check_day_number(day_number)?;

        let entry = self.days.entry(day_number).or_insert_with(|| ScheduleDay {
            day_number,
            selections: Vec::new(),
        });

        if entry.is_rest() {
            entry.selections.clear();
        }
        if !entry.contains(&workout.workout) {
            entry.selections.push(WorkoutSelection::Workout(workout));
        }

        let check = validate_assignment(&entry.selections)?;
        if check.overtraining_risk {
            tracing::warn!(
                "Day {} now has {} workouts",
                day_number,
                entry.selections.len()
            );
        }
        Ok(check)
    }

    /// Remove a workout from a day, returning whether anything was removed
    pub fn remove_workout(&mut self, day_number: u32, workout: &WorkoutRef) -> Result<bool> {
        self.check_day_number(day_number)?;

        let Some(entry) = self.days.get_mut(&day_number) else {
            return Ok(false);
        };
        let before = entry.selections.len();
        entry.selections.retain(|s| !s.matches(workout));
        let removed = entry.selections.len() != before;

        if entry.selections.is_empty() {
            self.days.remove(&day_number);
        }
        Ok(removed)
    }

    /// Unconfigure every day
    pub fn clear(&mut self) {
        self.days.clear();
    }

    fn check_day_number(&self, day_number: u32) -> Result<()> {
        if day_number == 0 || day_number > self.cycle_length {
            return Err(Error::InvalidAssignment(format!(
                "day {} is outside the {}-day cycle",
                day_number, self.cycle_length
            )));
        }
        Ok(())
    }
}

//! Activity analytics over completed session history.
//!
//! All day and week boundaries are calendar dates in the user's zone. The
//! settings that shape them travel in an explicit `ActivityAnalytics` value
//! rather than any shared state.

use crate::clock::local_date;
use crate::occurrence::next_occurrence;
use crate::{Schedule, SessionRecord, WorkoutRef};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use std::collections::BTreeSet;

/// Days scanned backwards when counting a streak
pub const DEFAULT_STREAK_LOOKBACK_DAYS: u32 = 30;

/// Analytics settings for one user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityAnalytics {
    pub timezone: Tz,
    pub week_start: Weekday,
    pub streak_lookback_days: u32,
}

/// Summary of one workout's history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateStats {
    pub last_session: Option<SessionRecord>,
    pub completed_count: usize,
    pub summary: String,
    pub weekly_count: u32,
    pub next_scheduled_day: Option<u32>,
}

impl ActivityAnalytics {
    /// Sunday-start weeks and a 30-day streak window
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            week_start: Weekday::Sun,
            streak_lookback_days: DEFAULT_STREAK_LOOKBACK_DAYS,
        }
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_streak_lookback(mut self, days: u32) -> Self {
        self.streak_lookback_days = days;
        self
    }

    /// Today's calendar date in the user's zone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        local_date(now, self.timezone)
    }

    /// Consecutive active days ending at `reference_date`
    ///
    /// Walks backwards one day at a time. A day without a completed session
    /// ends the walk, except for the first two days scanned (the reference
    /// date and the day before), which may be missing without breaking it.
    pub fn calculate_streak(&self, sessions: &[SessionRecord], reference_date: NaiveDate) -> u32 {
        let active = self.completion_dates(sessions.iter());
        let mut streak = 0;

        for i in 0..self.streak_lookback_days {
            let day = reference_date - Duration::days(i64::from(i));
            if active.contains(&day) {
                streak += 1;
            } else if i > 1 {
                break;
            }
        }

        tracing::debug!("Streak ending {}: {} days", reference_date, streak);
        streak
    }

    /// First date of the calendar week containing `reference_date`
    pub fn week_start_date(&self, reference_date: NaiveDate) -> NaiveDate {
        let into_week = (7 + reference_date.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;
        reference_date - Duration::days(i64::from(into_week))
    }

    /// Distinct active days in the week containing `reference_date`
    pub fn weekly_count(&self, sessions: &[SessionRecord], reference_date: NaiveDate) -> u32 {
        self.weekly_count_of(sessions.iter(), reference_date)
    }

    /// History summary and next scheduled day for one workout
    pub fn template_stats(
        &self,
        workout: &WorkoutRef,
        sessions: &[SessionRecord],
        schedule: &Schedule,
        current_day: u32,
        reference_date: NaiveDate,
    ) -> TemplateStats {
        let mut completed: Vec<&SessionRecord> = sessions
            .iter()
            .filter(|s| &s.workout == workout && s.completed_at.is_some())
            .collect();
        completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        let summary = match completed.len() {
            0 => "No sessions yet".to_string(),
            1 => "1 session completed".to_string(),
            n => format!("{} sessions completed", n),
        };

        TemplateStats {
            last_session: completed.first().map(|s| (*s).clone()),
            completed_count: completed.len(),
            summary,
            weekly_count: self.weekly_count_of(completed.iter().copied(), reference_date),
            next_scheduled_day: next_occurrence(
                workout,
                schedule,
                current_day,
                schedule.cycle_length(),
            ),
        }
    }

    fn weekly_count_of<'a>(
        &self,
        sessions: impl Iterator<Item = &'a SessionRecord>,
        reference_date: NaiveDate,
    ) -> u32 {
        let start = self.week_start_date(reference_date);
        let end = start + Duration::days(7);
        self.completion_dates(sessions).range(start..end).count() as u32
    }

    fn completion_dates<'a>(
        &self,
        sessions: impl Iterator<Item = &'a SessionRecord>,
    ) -> BTreeSet<NaiveDate> {
        sessions
            .filter_map(|s| s.completed_at)
            .map(|at| local_date(at, self.timezone))
            .collect()
    }
}

//! Cycle clock: maps calendar dates onto the repeating training cycle.
//!
//! Dates are resolved in the user's configured IANA zone, never UTC, so an
//! evening workout does not roll over into the next cycle day.

use crate::{CycleConfig, Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar date of an instant as seen in `tz`
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Cycle day (1-based) that an instant falls on
pub fn compute_cycle_day(config: &CycleConfig, at: DateTime<Utc>) -> Result<u32> {
    cycle_day_for_date(config, local_date(at, config.timezone))
}

/// Cycle day (1-based) for a calendar date already in the user's zone
///
/// Dates before `start_date` wrap backwards, so the day before the anchor is
/// the last day of the cycle.
pub fn cycle_day_for_date(config: &CycleConfig, date: NaiveDate) -> Result<u32> {
    if config.cycle_length == 0 {
        return Err(Error::InvalidConfig("cycle length must be at least 1".into()));
    }

    let n = i64::from(config.cycle_length);
    let offset = date.signed_duration_since(config.start_date).num_days();
    let day = ((offset % n) + n) % n + 1;

    tracing::debug!("{} is {} days from cycle start, cycle day {}", date, offset, day);
    Ok(day as u32)
}

#![forbid(unsafe_code)]

//! Core domain model and scheduling engine for Rota.
//!
//! This crate provides:
//! - Domain types (cycle config, workout selections, catalog, sessions)
//! - Cycle clock and schedule contract
//! - Auto-schedule generator and next-occurrence search
//! - Activity analytics (streaks, weekly counts, template stats)
//! - File-backed collaborators (schedule store, session log, CSV history)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod clock;
pub mod schedule;
pub mod generator;
pub mod occurrence;
pub mod analytics;
pub mod store;
pub mod session_log;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use clock::{compute_cycle_day, cycle_day_for_date, local_date};
pub use schedule::{validate_assignment, AssignmentCheck, Schedule, ScheduleDay};
pub use generator::{generate_schedule, rest_positions};
pub use occurrence::{days_until, next_occurrence};
pub use analytics::{ActivityAnalytics, TemplateStats, DEFAULT_STREAK_LOOKBACK_DAYS};
pub use store::{JsonScheduleStore, ScheduleStore};
pub use session_log::{SessionLog, SessionSink};
pub use history::{import_csv, import_csv_into_log, load_history};

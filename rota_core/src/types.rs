//! Core domain types for the Rota training cycle.
//!
//! This module defines the fundamental types used throughout the system:
//! - Cycle configuration (length, anchor date, time zone)
//! - Workout references and day selections
//! - Catalog entries and the workout catalog
//! - Generator preferences
//! - Completed session records

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Cycle Configuration
// ============================================================================

/// A repeating N-day training cycle anchored at a calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleConfig {
    pub cycle_length: u32,
    pub start_date: NaiveDate,
    pub timezone: Tz,
}

impl CycleConfig {
    /// Build a config from an IANA zone name, rejecting an empty cycle
    pub fn new(cycle_length: u32, start_date: NaiveDate, timezone: &str) -> Result<Self> {
        if cycle_length == 0 {
            return Err(Error::InvalidConfig("cycle length must be at least 1".into()));
        }
        let timezone = timezone.parse::<Tz>().map_err(|e| {
            Error::InvalidConfig(format!("unknown time zone '{}': {}", timezone, e))
        })?;

        Ok(Self {
            cycle_length,
            start_date,
            timezone,
        })
    }
}

// ============================================================================
// Workout References and Selections
// ============================================================================

/// Type of workout a selection or session refers to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Weights,
    Cardio,
    Mobility,
}

impl WorkoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Weights => "weights",
            WorkoutKind::Cardio => "cardio",
            WorkoutKind::Mobility => "mobility",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "weights" => Ok(WorkoutKind::Weights),
            "cardio" => Ok(WorkoutKind::Cardio),
            "mobility" => Ok(WorkoutKind::Mobility),
            other => Err(Error::Other(format!("unknown workout kind: {}", other))),
        }
    }
}

/// Stable reference to a weights day or template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WorkoutRef {
    pub kind: WorkoutKind,
    pub id: String,
}

impl WorkoutRef {
    pub fn new(kind: WorkoutKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for WorkoutRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A workout placed on a cycle day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedWorkout {
    #[serde(rename = "ref")]
    pub workout: WorkoutRef,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One entry in a day's ordered selection list
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "selection", rename_all = "snake_case")]
pub enum WorkoutSelection {
    Rest,
    Workout(PlannedWorkout),
}

impl WorkoutSelection {
    pub fn is_rest(&self) -> bool {
        matches!(self, WorkoutSelection::Rest)
    }

    /// The planned workout, or None for rest
    pub fn workout(&self) -> Option<&PlannedWorkout> {
        match self {
            WorkoutSelection::Rest => None,
            WorkoutSelection::Workout(planned) => Some(planned),
        }
    }

    /// Whether this selection schedules the given workout
    pub fn matches(&self, workout: &WorkoutRef) -> bool {
        self.workout().is_some_and(|p| &p.workout == workout)
    }

    pub fn label(&self) -> &str {
        match self {
            WorkoutSelection::Rest => "Rest",
            WorkoutSelection::Workout(planned) => &planned.label,
        }
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// A weights-day definition or a cardio/mobility template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.map(str::to_string),
        }
    }

    /// Plan this entry as a workout of the given kind
    pub fn to_planned(&self, kind: WorkoutKind) -> PlannedWorkout {
        PlannedWorkout {
            workout: WorkoutRef::new(kind, self.id.clone()),
            label: self.name.clone(),
            category: self.category.clone(),
        }
    }
}

/// Ordered workout catalog the generator draws from
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default)]
    pub weights: Vec<CatalogEntry>,
    #[serde(default)]
    pub cardio: Vec<CatalogEntry>,
    #[serde(default)]
    pub mobility: Vec<CatalogEntry>,
}

impl Catalog {
    /// Entries of one kind, in catalog order
    pub fn entries(&self, kind: WorkoutKind) -> &[CatalogEntry] {
        match kind {
            WorkoutKind::Weights => &self.weights,
            WorkoutKind::Cardio => &self.cardio,
            WorkoutKind::Mobility => &self.mobility,
        }
    }

    /// Look up an entry by reference
    pub fn find(&self, workout: &WorkoutRef) -> Option<&CatalogEntry> {
        self.entries(workout.kind).iter().find(|e| e.id == workout.id)
    }
}

// ============================================================================
// Generator Preferences
// ============================================================================

/// Training emphasis for the auto-generated cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Focus {
    AllWeights,
    AllCardio,
    Mix,
}

impl FromStr for Focus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all-weights" | "weights" => Ok(Focus::AllWeights),
            "all-cardio" | "cardio" => Ok(Focus::AllCardio),
            "mix" => Ok(Focus::Mix),
            other => Err(Error::Other(format!("unknown focus: {}", other))),
        }
    }
}

/// Preferences for a single generator run (not persisted by the engine)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPreferences {
    pub focus: Focus,
    pub rest_days: u32,
    pub include_mobility: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            focus: Focus::Mix,
            rest_days: 2,
            include_mobility: true,
        }
    }
}

// ============================================================================
// Session Records
// ============================================================================

/// A workout session as recorded by the session log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    #[serde(rename = "ref")]
    pub workout: WorkoutRef,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// A session started and completed at the same instant
    pub fn completed(workout: WorkoutRef, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout,
            started_at: at,
            completed_at: Some(at),
        }
    }
}

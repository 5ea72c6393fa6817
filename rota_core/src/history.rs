//! Session history loading and CSV import.
//!
//! History is read from the JSONL session log plus an optional CSV archive
//! (for example an export from another tracker). Rows with unparsable
//! timestamps are skipped, never fatal.

use crate::session_log::{SessionLog, SessionSink};
use crate::{Error, Result, SessionRecord, WorkoutKind, WorkoutRef};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for archived sessions
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    ref_kind: String,
    ref_id: String,
    started_at: String,
    completed_at: Option<String>,
}

impl TryFrom<CsvRow> for SessionRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::MalformedSession(format!("Invalid UUID '{}': {}", row.id, e)))?;

        let kind: WorkoutKind = row
            .ref_kind
            .parse()
            .map_err(|e| Error::MalformedSession(format!("session {}: {}", id, e)))?;

        let started_at = parse_timestamp(&row.started_at)?;

        let completed_at = match row.completed_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_timestamp(raw)?),
        };

        Ok(SessionRecord {
            id,
            workout: WorkoutRef::new(kind, row.ref_id),
            started_at,
            completed_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::MalformedSession(format!("Invalid timestamp '{}': {}", raw, e)))
}

/// Read every well-formed session from a CSV archive
pub fn import_csv(path: &Path) -> Result<Vec<SessionRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut sessions = Vec::new();
    let mut skipped = 0;
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match SessionRecord::try_from(row) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!("Skipping CSV row: {}", e);
                    skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
                skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Read {} sessions from {:?} ({} skipped)",
        sessions.len(),
        path,
        skipped
    );
    Ok(sessions)
}

/// Append CSV sessions not already in the log, returning how many were added
pub fn import_csv_into_log(csv_path: &Path, log_path: &Path) -> Result<usize> {
    let mut log = SessionLog::new(log_path);
    let mut known: HashSet<Uuid> = log.read()?.into_iter().map(|s| s.id).collect();

    let fresh: Vec<SessionRecord> = import_csv(csv_path)?
        .into_iter()
        .filter(|s| known.insert(s.id))
        .collect();
    log.append_all(&fresh)?;

    tracing::info!("Imported {} sessions from {:?}", fresh.len(), csv_path);
    Ok(fresh.len())
}

/// Full history from the log and an optional CSV archive
///
/// Returns sessions sorted by start time (newest first), each id once.
pub fn load_history(log_path: &Path, archive_path: Option<&Path>) -> Result<Vec<SessionRecord>> {
    let mut sessions = SessionLog::new(log_path).read()?;
    let mut seen_ids: HashSet<Uuid> = sessions.iter().map(|s| s.id).collect();

    if let Some(archive) = archive_path.filter(|p| p.exists()) {
        for session in import_csv(archive)? {
            if seen_ids.insert(session.id) {
                sessions.push(session);
            }
        }
    }

    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    tracing::debug!("Loaded {} sessions of history", sessions.len());
    Ok(sessions)
}

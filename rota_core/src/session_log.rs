//! Session log: one JSON `SessionRecord` per line.
//!
//! `rota log` and `rota import` append here; history and analytics read it
//! back. A line that cannot be decoded (bad bytes, bad JSON, a record cut
//! short by a crash) is a `MalformedSession`. It is logged and skipped so one
//! bad line never hides the rest of the history.

use crate::{Error, Result, SessionRecord};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Destination for completed or imported sessions
pub trait SessionSink {
    fn append(&mut self, session: &SessionRecord) -> Result<()>;

    /// Append several records; the default appends them one at a time
    fn append_all(&mut self, sessions: &[SessionRecord]) -> Result<()> {
        sessions.iter().try_for_each(|s| self.append(s))
    }
}

/// Append-only session log file
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every decodable record, in append order
    ///
    /// A missing log is an empty history.
    pub fn read(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let result = read_lines(BufReader::new(&file));
        file.unlock()?;

        let (sessions, skipped) = result?;
        if skipped > 0 {
            tracing::warn!(
                "Skipped {} malformed session(s) in {:?}",
                skipped,
                self.path
            );
        }
        tracing::debug!("Read {} sessions from {:?}", sessions.len(), self.path);
        Ok(sessions)
    }

    /// Write encoded lines in one locked append
    fn write_lines(&self, lines: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let written = file.write_all(lines).and_then(|_| file.sync_data());
        file.unlock()?;
        written?;
        Ok(())
    }
}

impl SessionSink for SessionLog {
    fn append(&mut self, session: &SessionRecord) -> Result<()> {
        self.write_lines(&encode_line(session)?)?;
        tracing::debug!("Logged session {} ({})", session.id, session.workout);
        Ok(())
    }

    fn append_all(&mut self, sessions: &[SessionRecord]) -> Result<()> {
        if sessions.is_empty() {
            return Ok(());
        }
        let mut lines = Vec::new();
        for session in sessions {
            lines.extend(encode_line(session)?);
        }
        self.write_lines(&lines)?;
        tracing::debug!("Logged {} sessions to {:?}", sessions.len(), self.path);
        Ok(())
    }
}

fn encode_line(session: &SessionRecord) -> Result<Vec<u8>> {
    let mut line = serde_json::to_vec(session)?;
    line.push(b'\n');
    Ok(line)
}

/// Decode one raw line; blank lines are `None`
fn decode_line(line_number: usize, raw: &[u8]) -> Result<Option<SessionRecord>> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        Error::MalformedSession(format!("line {} is not valid UTF-8: {}", line_number, e))
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| Error::MalformedSession(format!("line {}: {}", line_number, e)))
}

/// Decoded records plus the number of lines skipped
fn read_lines(reader: impl BufRead) -> Result<(Vec<SessionRecord>, usize)> {
    let mut sessions = Vec::new();
    let mut skipped = 0;

    for (index, raw) in reader.split(b'\n').enumerate() {
        match decode_line(index + 1, &raw?) {
            Ok(Some(session)) => sessions.push(session),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Skipping session record: {}", e);
                skipped += 1;
            }
        }
    }
    Ok((sessions, skipped))
}

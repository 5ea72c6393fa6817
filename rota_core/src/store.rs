//! Schedule persistence with file locking.
//!
//! The engine never persists anything itself. This is the file-backed
//! collaborator the CLI uses: one JSON document per schedule, replaced
//! wholesale by a single rename on every save, so entries from an earlier
//! plan never linger and readers never see a half-written or empty plan.

use crate::{Error, Result, Schedule};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read and replace the stored cycle assignment
pub trait ScheduleStore {
    /// Current schedule, or None if nothing has been saved
    fn load(&self) -> Result<Option<Schedule>>;

    /// Remove every stored day
    fn clear_all(&mut self) -> Result<()>;

    /// Write `schedule` as the full replacement of whatever was stored
    fn replace(&mut self, schedule: &Schedule) -> Result<()>;
}

/// JSON file store with shared/exclusive locking and atomic writes
pub struct JsonScheduleStore {
    path: PathBuf,
}

impl JsonScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, contents: &[u8]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Store(format!("{:?} has no parent directory", self.path)))?;
        std::fs::create_dir_all(parent)?;

        // Temp file in the same directory so the rename stays on one filesystem
        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl ScheduleStore for JsonScheduleStore {
    fn load(&self) -> Result<Option<Schedule>> {
        if !self.path.exists() {
            tracing::debug!("No schedule file at {:?}", self.path);
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        // Invalid plans are reported, never reset to empty
        let schedule: Schedule = serde_json::from_str(&contents)
            .map_err(|e| Error::Store(format!("Invalid schedule in {:?}: {}", self.path, e)))?;

        tracing::debug!(
            "Loaded {}-day schedule from {:?}",
            schedule.cycle_length(),
            self.path
        );
        Ok(Some(schedule))
    }

    fn clear_all(&mut self) -> Result<()> {
        if self.path.exists() {
            self.write_atomic(b"")?;
            tracing::info!("Cleared schedule at {:?}", self.path);
        }
        Ok(())
    }

    fn replace(&mut self, schedule: &Schedule) -> Result<()> {
        let contents = serde_json::to_string_pretty(schedule)?;
        self.write_atomic(contents.as_bytes())?;
        tracing::info!(
            "Saved {}-day schedule ({} days configured) to {:?}",
            schedule.cycle_length(),
            schedule.days().count(),
            self.path
        );
        Ok(())
    }
}

//! Durable best-record storage backed by a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// The historical bests across all completed games. Either field is
/// `None` until the first completion is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BestRecord {
    /// Fewest attempts a game was ever won in.
    pub best_attempts: Option<u32>,
    /// Fastest completion ever reported, in seconds.
    pub best_time: Option<f64>,
}

/// File-backed store for the best results ever reported.
///
/// The file is the single source of truth; it is re-read on every query
/// and rewritten from scratch when it turns out missing or corrupt.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    /// Serializes the read-compare-write update sequence so two
    /// concurrent completions cannot both compare against a stale
    /// snapshot and lose one of the writes.
    lock: Mutex<()>,
}

impl RecordStore {
    /// Opens the store at `path`, creating the containing directory and
    /// seeding an empty record file if none exists.
    #[instrument]
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create record directory {}", dir.display()))?;
            }
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };

        if !store.path.exists() {
            info!(path = %store.path.display(), "Seeding empty record file");
            store.write(&BestRecord::default())?;
        }

        Ok(store)
    }

    /// Reads the current bests. Never fails: a missing or corrupt file
    /// is rewritten as empty and empty bests are returned.
    #[instrument(skip(self))]
    pub fn get(&self) -> BestRecord {
        let _guard = self.lock.lock().unwrap();
        self.read_or_heal()
    }

    /// Reports a completed game and updates whichever bests it improves.
    /// Returns whether anything changed.
    ///
    /// The two fields move independently: a submission can improve the
    /// attempt count, the time, both, or neither.
    #[instrument(skip(self))]
    pub fn update(&self, attempts: u32, time_seconds: f64) -> Result<bool> {
        let _guard = self.lock.lock().unwrap();
        let mut record = self.read_or_heal();
        let mut updated = false;

        if record.best_attempts.is_none_or(|best| attempts < best) {
            record.best_attempts = Some(attempts);
            updated = true;
        }
        if record.best_time.is_none_or(|best| time_seconds < best) {
            record.best_time = Some(time_seconds);
            updated = true;
        }

        if updated {
            self.write(&record)?;
            info!(
                attempts,
                time_seconds,
                best_attempts = ?record.best_attempts,
                best_time = ?record.best_time,
                "New best record"
            );
        } else {
            debug!(attempts, time_seconds, "Result did not improve any best");
        }

        Ok(updated)
    }

    /// Unconditionally clears both bests.
    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        info!(path = %self.path.display(), "Resetting best records");
        self.write(&BestRecord::default())
    }

    /// Reads the record file, replacing it with an empty record if it
    /// is missing or does not decode. Caller must hold the lock.
    fn read_or_heal(&self) -> BestRecord {
        let parsed = fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from));

        match parsed {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Record file missing or corrupt, reinitializing"
                );
                let empty = BestRecord::default();
                if let Err(e) = self.write(&empty) {
                    warn!(error = %e, "Failed to rewrite record file");
                }
                empty
            }
        }
    }

    /// Persists the record through a sibling temp file and a rename, so
    /// a crash mid-write cannot leave a half-written file behind.
    fn write(&self, record: &BestRecord) -> Result<()> {
        let text = serde_json::to_string_pretty(record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

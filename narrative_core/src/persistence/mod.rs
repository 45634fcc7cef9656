//! Named save slots in a directory, one pretty-printed JSON file each.
//!
//! Writes go to a hidden temporary sibling that is synced and then renamed
//! over the slot, so an interrupted save leaves the previous contents alone.
//! Temporaries left behind by another process are swept when slots are listed.

mod record;

pub use record::*;

use chrono::{DateTime, Utc};
use game_rules::PlayerState;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::session::StoryPosition;

const SLOT_EXTENSION: &str = "json";
const TEMP_MARKER: &str = ".tmp-";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One line of [`SaveStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSummary {
    pub slot: String,
    pub player_name: String,
    pub level: u32,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slot names are non-empty ASCII letters, digits, `-` and `_`.
    pub fn validate_slot(slot: &str) -> PersistenceResult<()> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(PersistenceError::InvalidSlotName(slot.to_string()))
        }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slot, SLOT_EXTENSION))
    }

    pub fn save(
        &self,
        slot: &str,
        state: &PlayerState,
        position: StoryPosition,
    ) -> PersistenceResult<SlotSummary> {
        Self::validate_slot(slot)?;
        fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::io(&self.dir, e))?;

        let record = SaveRecord::capture(state, position, Utc::now());
        let content = serde_json::to_string_pretty(&record).map_err(|e| {
            PersistenceError::CorruptSaveRecord {
                slot: slot.to_string(),
                reason: e.to_string(),
            }
        })?;

        let path = self.slot_path(slot);
        self.write_atomic(slot, &path, content.as_bytes())?;
        tracing::info!(slot, player = %state.name, "game saved");

        Ok(SlotSummary {
            slot: slot.to_string(),
            player_name: record.player_name,
            level: record.level,
            saved_at: record.saved_at,
        })
    }

    fn write_atomic(&self, slot: &str, path: &Path, content: &[u8]) -> PersistenceResult<()> {
        let mut counter = 0u32;
        let tmp_path = loop {
            let candidate = self
                .dir
                .join(format!(".{}{}{}-{}", slot, TEMP_MARKER, std::process::id(), counter));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut tmp) => {
                    let written = tmp.write_all(content).and_then(|_| tmp.sync_all());
                    if let Err(e) = written {
                        let _ = fs::remove_file(&candidate);
                        return Err(PersistenceError::io(&candidate, e));
                    }
                    break candidate;
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    counter = counter.saturating_add(1);
                }
                Err(e) => return Err(PersistenceError::io(&candidate, e)),
            }
        };

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistenceError::io(path, e));
        }
        if let Ok(dir) = File::open(&self.dir) {
            let _ = dir.sync_all();
        }
        Ok(())
    }

    fn read_record(&self, slot: &str) -> PersistenceResult<SaveRecord> {
        let path = self.slot_path(slot);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PersistenceError::SaveSlotNotFound(slot.to_string()))
            }
            Err(e) => return Err(PersistenceError::io(&path, e)),
        };
        serde_json::from_str(&content).map_err(|e| PersistenceError::CorruptSaveRecord {
            slot: slot.to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a slot. Nothing outside the store is touched on failure.
    pub fn load(&self, slot: &str) -> PersistenceResult<(PlayerState, StoryPosition)> {
        Self::validate_slot(slot)?;
        let record = self.read_record(slot)?;
        if record.version > FORMAT_VERSION {
            tracing::warn!(slot, version = record.version, "save is from a newer version");
        }
        let restored = record.restore();
        tracing::info!(slot, player = %restored.0.name, "game loaded");
        Ok(restored)
    }

    /// Every readable slot, sorted by name. Unreadable slots are skipped.
    pub fn list(&self) -> PersistenceResult<Vec<SlotSummary>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::io(&self.dir, e)),
        };

        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if is_stale_temp(&entry.file_name().to_string_lossy()) {
                match fs::remove_file(&path) {
                    Ok(()) => tracing::debug!(path = %path.display(), "removed stale temporary save"),
                    Err(err) => tracing::warn!(path = %path.display(), %err, "cannot remove temporary save"),
                }
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            let Some(slot) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if Self::validate_slot(slot).is_err() {
                continue;
            }

            match self.read_record(slot) {
                Ok(record) => summaries.push(SlotSummary {
                    slot: slot.to_string(),
                    player_name: record.player_name,
                    level: record.level,
                    saved_at: record.saved_at,
                }),
                Err(err) => tracing::warn!(slot, %err, "skipping unreadable save"),
            }
        }
        summaries.sort_by(|a, b| a.slot.cmp(&b.slot));
        Ok(summaries)
    }

    pub fn delete(&self, slot: &str) -> PersistenceResult<()> {
        Self::validate_slot(slot)?;
        let path = self.slot_path(slot);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(slot, "save deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(PersistenceError::SaveSlotNotFound(slot.to_string()))
            }
            Err(e) => Err(PersistenceError::io(&path, e)),
        }
    }
}

/// A `.{slot}.tmp-{pid}-{n}` file written by a process other than this one.
/// This process removes its own temporaries on every failure path.
fn is_stale_temp(name: &str) -> bool {
    let Some(rest) = name.strip_prefix('.') else {
        return false;
    };
    let Some((_, suffix)) = rest.rsplit_once(TEMP_MARKER) else {
        return false;
    };
    match suffix.split_once('-') {
        Some((pid, _)) => pid.parse::<u32>().is_ok_and(|pid| pid != std::process::id()),
        None => false,
    }
}

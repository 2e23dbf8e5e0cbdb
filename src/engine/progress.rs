//! Durable record of translations received during a run.
//!
//! The record lives next to the catalog as
//! `<catalog>.translation_progress_<language>.json` and is rewritten atomically
//! after every batch, so a crash never loses a completed batch and never
//! leaves a half-written file behind.

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs::atomic_write;
use crate::ui::Style;

/// Entry key → translated text.
pub type TranslatedStrings = BTreeMap<String, String>;

/// On-disk progress snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub translated_strings: TranslatedStrings,
    #[serde(default)]
    pub last_updated: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub total_translated: usize,
}

/// What a previous run left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub count: usize,
    pub last_updated: Option<DateTime<FixedOffset>>,
}

/// Progress record of one (catalog, target language) pair.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// The store for translating `catalog_path` into `target_language`.
    pub fn for_catalog(catalog_path: &Path, target_language: &str) -> Self {
        let mut path = catalog_path.as_os_str().to_owned();
        path.push(format!(".translation_progress_{target_language}.json"));
        Self {
            path: PathBuf::from(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing, unreadable, or corrupt file reads as empty.
    pub fn load(&self) -> ProgressSnapshot {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return ProgressSnapshot::default(),
            Err(e) => {
                crate::warn!(
                    "{} Could not read progress file {}, starting fresh: {e}",
                    Style::warning("Warning:"),
                    self.path.display()
                );
                return ProgressSnapshot::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            crate::warn!(
                "{} Corrupted progress file {}, starting fresh: {e}",
                Style::warning("Warning:"),
                self.path.display()
            );
            ProgressSnapshot::default()
        })
    }

    /// Merges `entries` into the record and writes it before returning.
    pub fn save(&self, entries: &TranslatedStrings) -> io::Result<()> {
        let mut snapshot = self.load();
        snapshot
            .translated_strings
            .extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        snapshot.last_updated = Some(Local::now().fixed_offset());
        snapshot.total_translated = snapshot.translated_strings.len();

        let contents = serde_json::to_string_pretty(&snapshot).map_err(io::Error::other)?;
        atomic_write(&self.path, &contents)?;

        crate::debug!(
            "Saved progress: {} new translations ({} total)",
            entries.len(),
            snapshot.total_translated
        );
        Ok(())
    }

    pub fn has_progress(&self) -> bool {
        self.path.exists() && !self.load().translated_strings.is_empty()
    }

    pub fn summary(&self) -> ProgressSummary {
        let snapshot = self.load();
        ProgressSummary {
            count: snapshot.translated_strings.len(),
            last_updated: snapshot.last_updated,
        }
    }

    pub fn get_all(&self) -> TranslatedStrings {
        self.load().translated_strings
    }

    /// Deletes the record. Deleting a missing record is not an error.
    pub fn cleanup(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                crate::debug!("Removed progress file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

use std::path::{Path, PathBuf};

use super::EngineError;
use super::extract::{TranslationUnit, extract_untranslated};
use super::progress::ProgressStore;
use super::recovery::{RecoveryPrompt, RetryPolicy};
use super::scheduler::{BatchObserver, BatchReport, ScheduleOutcome, Scheduler, SchedulerConfig};
use super::writer::{merge, write_catalog};
use crate::catalog::Catalog;
use crate::translation::{CapabilityLookup, Formality, TranslationProvider, display_language};
use crate::ui::Style;

/// One catalog translated into one language.
#[derive(Debug, Clone)]
pub struct TranslationJob<'a> {
    pub catalog_path: &'a Path,
    pub catalog: &'a Catalog,
    pub target_language: &'a str,
    pub batch_size: usize,
    pub formality: Option<Formality>,
    pub retry: RetryPolicy,
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSummary {
    pub target_language: String,
    /// Strings translated by this run.
    pub translated: usize,
    pub skipped_empty: usize,
    pub skipped_batches: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed(TranslationSummary),
    /// The user quit. The catalog is unchanged and the progress file is kept.
    Cancelled {
        report: BatchReport,
        saved: usize,
        progress_path: PathBuf,
    },
}

impl TranslationJob<'_> {
    pub fn progress_store(&self) -> ProgressStore {
        ProgressStore::for_catalog(self.catalog_path, self.target_language)
    }

    /// Units that still need translation, given what the progress store already holds.
    pub fn outstanding(&self, store: &ProgressStore) -> Vec<TranslationUnit> {
        extract_untranslated(
            self.catalog,
            self.catalog.source_language(),
            self.target_language,
            &store.get_all(),
        )
    }

    /// Extracts, translates, merges, writes, and cleans up.
    ///
    /// The catalog file is only rewritten once every batch has been attempted.
    /// Aborts and cancellations leave the progress file for the next run.
    pub async fn run<P, C, R, O>(
        &self,
        scheduler: &mut Scheduler<'_, P, C, R, O>,
    ) -> Result<JobOutcome, EngineError>
    where
        P: TranslationProvider,
        C: CapabilityLookup,
        R: RecoveryPrompt + ?Sized,
        O: BatchObserver + ?Sized,
    {
        let store = self.progress_store();
        let units = self.outstanding(&store);
        let language = display_language(self.target_language);

        let report = if units.is_empty() {
            crate::status!(
                "{} All strings already translated for {language}",
                Style::success("✓")
            );
            BatchReport::default()
        } else {
            crate::status!(
                "Found {} untranslated strings for {language}",
                Style::value(units.len())
            );
            let config = SchedulerConfig {
                source_language: self.catalog.source_language().to_string(),
                target_language: self.target_language.to_string(),
                batch_size: self.batch_size,
                formality: self.formality,
                retry: self.retry,
            };
            match scheduler.run(&config, &units, &store).await? {
                ScheduleOutcome::Completed(report) => report,
                ScheduleOutcome::Cancelled(report) => {
                    return Ok(JobOutcome::Cancelled {
                        report,
                        saved: store.summary().count,
                        progress_path: store.path().to_path_buf(),
                    });
                }
            }
        };

        let translations = store.get_all();
        if !translations.is_empty() {
            let merged = merge(self.catalog, self.target_language, &translations)?;
            write_catalog(self.catalog_path, &merged)?;
        }
        store.cleanup().map_err(|source| EngineError::Progress {
            path: store.path().to_path_buf(),
            source,
        })?;

        Ok(JobOutcome::Completed(TranslationSummary {
            target_language: self.target_language.to_string(),
            translated: report.translated,
            skipped_empty: report.skipped_empty,
            skipped_batches: report.skipped_batches,
        }))
    }
}

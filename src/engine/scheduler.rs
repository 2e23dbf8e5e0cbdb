//! Sequential batch translation with durable progress.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::EngineError;
use super::extract::TranslationUnit;
use super::progress::{ProgressStore, TranslatedStrings};
use super::recovery::{
    AbortReason, BatchPosition, RecoveryMachine, RecoveryPrompt, RetryPolicy, Transition,
};
use crate::translation::{
    CapabilityLookup, Formality, ProviderFailure, ProviderOptions, TranslationProvider,
};
use crate::ui::Style;

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 50;

/// Cooperative cancellation shared between the scheduler and a signal handler.
///
/// The scheduler only observes it at batch boundaries and while waiting to
/// retry, so a cancelled run never leaves a batch half saved.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            sender: Arc::new(watch::Sender::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

/// Receives batch lifecycle events, e.g. to drive a progress bar.
pub trait BatchObserver {
    fn batch_started(&self, _batch: BatchPosition, _size: usize) {}
    fn batch_finished(&self, _batch: BatchPosition, _report: &BatchReport) {}
    fn waiting(&self, _delay: Duration) {}
}

impl BatchObserver for () {}

/// Run parameters.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Catalog code of the source language.
    pub source_language: String,
    /// Catalog code of the target language.
    pub target_language: String,
    pub batch_size: usize,
    pub formality: Option<Formality>,
    pub retry: RetryPolicy,
}

/// Cumulative counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Units with a non-empty translation.
    pub translated: usize,
    /// Units the provider returned an empty translation for.
    pub skipped_empty: usize,
    /// One-based numbers of batches abandoned after a failure.
    pub skipped_batches: Vec<usize>,
    /// Batches saved to the progress store.
    pub completed_batches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Completed(BatchReport),
    /// The user quit. Every batch saved so far stays in the progress store.
    Cancelled(BatchReport),
}

/// Checks a batch size against the provider's per-call limit.
pub fn validate_batch_size(batch_size: usize) -> Result<usize, EngineError> {
    if batch_size >= MIN_BATCH_SIZE && batch_size <= MAX_BATCH_SIZE {
        Ok(batch_size)
    } else {
        Err(EngineError::InvalidBatchSize(batch_size))
    }
}

/// Drives outstanding units through the provider one batch at a time.
pub struct Scheduler<'a, P, C, R, O>
where
    P: TranslationProvider,
    C: CapabilityLookup,
    R: RecoveryPrompt + ?Sized,
    O: BatchObserver + ?Sized,
{
    pub provider: &'a P,
    pub capabilities: &'a C,
    pub prompt: &'a mut R,
    pub observer: &'a O,
    pub cancel: CancelToken,
}

impl<P, C, R, O> Scheduler<'_, P, C, R, O>
where
    P: TranslationProvider,
    C: CapabilityLookup,
    R: RecoveryPrompt + ?Sized,
    O: BatchObserver + ?Sized,
{
    /// Translates `units` in order, saving each successful batch to `store`
    /// before the next one starts.
    ///
    /// Configuration problems are reported before the first provider call.
    pub async fn run(
        &mut self,
        config: &SchedulerConfig,
        units: &[TranslationUnit],
        store: &ProgressStore,
    ) -> Result<ScheduleOutcome, EngineError> {
        let batch_size = validate_batch_size(config.batch_size)?;
        let source = self
            .capabilities
            .lookup(&config.source_language)
            .ok_or_else(|| EngineError::UnsupportedLanguage(config.source_language.clone()))?;
        let target = self
            .capabilities
            .lookup(&config.target_language)
            .ok_or_else(|| EngineError::UnsupportedLanguage(config.target_language.clone()))?;
        let formality = config.formality.filter(|_| target.supports_formality);

        crate::info!(
            "Translating from {} to {}",
            Style::code(&source.source_code),
            Style::code(&target.target_code)
        );

        let batches: Vec<&[TranslationUnit]> = units.chunks(batch_size).collect();
        let total = batches.len();
        let mut machine = RecoveryMachine::new(config.retry);
        let mut report = BatchReport::default();

        for (index, batch) in batches.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Ok(ScheduleOutcome::Cancelled(report));
            }

            let position = BatchPosition { index, total };
            let texts: Vec<String> = batch.iter().map(|u| u.source_text.clone()).collect();
            let options = ProviderOptions {
                formality,
                context: batch.iter().find_map(|u| u.context.clone()),
            };

            machine.start_batch();
            self.observer.batch_started(position, batch.len());
            crate::debug!("Batch {position}: sending {} texts", texts.len());

            loop {
                let result = self
                    .provider
                    .translate(&texts, &source.source_code, &target.target_code, &options)
                    .await
                    .and_then(|translations| check_length(translations, texts.len()));

                let failure = match result {
                    Ok(translations) => {
                        save_batch(batch, translations, store, &mut report)?;
                        report.completed_batches += 1;
                        self.observer.batch_finished(position, &report);
                        break;
                    }
                    Err(failure) => failure,
                };

                crate::warn!(
                    "{} Batch {position} failed: {failure}",
                    Style::warning("Warning:")
                );

                match machine.on_failure(&failure, position, &mut *self.prompt) {
                    Transition::Retry { delay } => {
                        if !delay.is_zero() {
                            crate::status!("Waiting {}s before retrying...", delay.as_secs());
                            self.observer.waiting(delay);
                            tokio::select! {
                                () = tokio::time::sleep(delay) => {}
                                () = self.cancel.cancelled() => {
                                    return Ok(ScheduleOutcome::Cancelled(report));
                                }
                            }
                        }
                        crate::status!("Retrying batch {}", position.number());
                        machine.resume();
                    }
                    Transition::Skip { coerced } => {
                        if coerced {
                            crate::warn!(
                                "{} Max retries ({}) exceeded, skipping batch {}",
                                Style::error("Error:"),
                                config.retry.max_retries,
                                position.number()
                            );
                        } else {
                            crate::status!("Skipping batch {}", position.number());
                        }
                        report.skipped_batches.push(position.number());
                        machine.resume();
                        break;
                    }
                    Transition::Abort(reason) => {
                        return Err(match reason {
                            AbortReason::Unauthorized => EngineError::Unauthorized,
                            AbortReason::QuotaExceeded => EngineError::QuotaExceeded,
                            AbortReason::UserRequested => EngineError::Aborted {
                                batch: position.number(),
                            },
                        });
                    }
                    Transition::Cancel => return Ok(ScheduleOutcome::Cancelled(report)),
                }
            }
        }

        Ok(ScheduleOutcome::Completed(report))
    }
}

fn check_length(
    translations: Vec<String>,
    expected: usize,
) -> Result<Vec<String>, ProviderFailure> {
    if translations.len() == expected {
        Ok(translations)
    } else {
        Err(ProviderFailure::Other(format!(
            "expected {expected} translations, received {}",
            translations.len()
        )))
    }
}

/// Pairs results with keys by position and persists all of them, empty ones included.
fn save_batch(
    batch: &[TranslationUnit],
    translations: Vec<String>,
    store: &ProgressStore,
    report: &mut BatchReport,
) -> Result<(), EngineError> {
    let mut entries = TranslatedStrings::new();
    for (unit, text) in batch.iter().zip(translations) {
        if text.trim().is_empty() {
            report.skipped_empty += 1;
            crate::warn!(
                "{} Empty translation returned for \"{}\"",
                Style::warning("Warning:"),
                unit.key
            );
        } else {
            report.translated += 1;
        }
        entries.insert(unit.key.clone(), text);
    }

    store.save(&entries).map_err(|source| EngineError::Progress {
        path: store.path().to_path_buf(),
        source,
    })
}

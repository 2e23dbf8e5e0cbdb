//! The resumable translation pipeline.
//!
//! A run reads the catalog, extracts the entries that still need the target
//! language, sends them to the provider in batches, records every answered
//! batch in a progress file, and finally merges the progress into the catalog
//! in a single atomic write.
//!
//! ```text
//! Catalog ──extract──▶ units ──Scheduler──▶ ProgressStore ──merge──▶ Catalog
//!                                  │
//!                           RecoveryMachine
//! ```

mod extract;
mod job;
mod progress;
mod recovery;
mod scheduler;
mod writer;

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

pub use extract::{MAX_CONTEXT_KEY_CHARS, TranslationUnit, extract_untranslated};
pub use job::{JobOutcome, TranslationJob, TranslationSummary};
pub use progress::{ProgressSnapshot, ProgressStore, ProgressSummary, TranslatedStrings};
pub use recovery::{
    AbortReason, BatchPosition, FailureClass, FixedPolicy, MAX_RETRIES, RATE_LIMIT_DELAY,
    RecoveryAction, RecoveryMachine, RecoveryPrompt, RetryPolicy, RunState, Transition,
    UserDecision,
};
pub use scheduler::{
    BatchObserver, BatchReport, CancelToken, MAX_BATCH_SIZE, MIN_BATCH_SIZE, ScheduleOutcome,
    Scheduler, SchedulerConfig, validate_batch_size,
};
pub use writer::{merge, write_catalog};

/// Errors that end a run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("authorization failed: the API key was rejected")]
    Unauthorized,

    #[error("translation quota exceeded")]
    QuotaExceeded,

    #[error("translation aborted at batch {batch}")]
    Aborted { batch: usize },

    #[error("language '{0}' is not supported by the translation provider")]
    UnsupportedLanguage(String),

    #[error("batch size must be between {MIN_BATCH_SIZE} and {MAX_BATCH_SIZE}, got {0}")]
    InvalidBatchSize(usize),

    #[error("failed to update progress file {}: {source}", path.display())]
    Progress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

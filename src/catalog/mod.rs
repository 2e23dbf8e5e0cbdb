//! Xcode string catalog (`.xcstrings`) model, I/O, and statistics.

mod format;
mod model;
mod stats;

use std::path::PathBuf;
use thiserror::Error;

pub use model::{Catalog, Entry, Localization, LocalizationState, StringUnit};
pub use stats::{LanguageStats, language_stats};

/// Errors raised while reading, writing, or validating a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),

    #[error("failed to write catalog {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("written catalog {} does not parse back: {message}", path.display())]
    Validation { path: PathBuf, message: String },
}

//! # xctr - Resumable DeepL Translation for Xcode String Catalogs
//!
//! `xctr` fills in missing translations of a `Localizable.xcstrings` catalog
//! using the DeepL API. Work is sent in batches and every finished batch is
//! saved to a progress file next to the catalog, so an interrupted run picks
//! up where it stopped.
//!
//! ## Features
//!
//! - **Resumable runs**: Progress survives Ctrl+C, quota errors, and crashes
//! - **Failure recovery**: Rate limits wait and retry, other failures ask what to do
//! - **Format preserving**: The catalog is rewritten in Xcode's own layout
//! - **Formality**: Pick a tone for languages DeepL supports it for
//!
//! ## Quick Start
//!
//! ```bash
//! # Pick a catalog and language interactively
//! xctr
//!
//! # Translate a specific catalog into German
//! xctr --to de App/Localizable.xcstrings
//!
//! # Show completion per language
//! xctr status
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/xctr/config.toml`:
//!
//! ```toml
//! [xctr]
//! api_key_env = "DEEPL_AUTH_KEY"
//! batch_size = 20
//! formality = "prefer_less"
//! ```

/// String catalog model, statistics, and Xcode-style serialization.
pub mod catalog;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and setting resolution.
pub mod config;

/// Batch scheduling, failure recovery, progress persistence, and merging.
pub mod engine;

/// File system utilities.
pub mod fs;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// DeepL client and language capabilities.
pub mod translation;

/// Terminal UI components (spinner, progress bar, prompts, colors).
pub mod ui;

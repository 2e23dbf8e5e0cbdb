//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

/// Locating catalogs on disk.
pub mod discovery;

pub use args::{Args, Command, OnError};

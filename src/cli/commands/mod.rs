//! Subcommand implementations.

/// Configure command handler.
pub mod configure;

/// Supported language listing.
pub mod languages;

/// Catalog completion statistics.
pub mod status;

/// Translation command handler.
pub mod translate;

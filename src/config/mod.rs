//! Configuration file management and CLI/file/default resolution.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_BATCH_SIZE, ResolveOptions,
    ResolvedConfig, XctrConfig, resolve_config,
};

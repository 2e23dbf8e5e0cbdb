use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::engine::validate_batch_size;
use crate::paths;
use crate::translation::{FREE_ENDPOINT, Formality, PRO_ENDPOINT};

/// Strings per provider call when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Environment variable read for the API key when `api_key_env` is not set.
pub const DEFAULT_API_KEY_ENV: &str = "DEEPL_AUTH_KEY";

/// Suffix DeepL gives to Free API keys.
const FREE_KEY_SUFFIX: &str = ":fx";

/// Default settings in the `[xctr]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XctrConfig {
    /// API key stored directly in config (not recommended).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Use the Free API host regardless of the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_api: Option<bool>,
    /// Custom API host, e.g. a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Strings per provider call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    /// Default formality for targets that support it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<String>,
}

impl XctrConfig {
    /// Name of the environment variable holding the API key.
    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var(self.api_key_env())
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone().filter(|key| !key.is_empty())
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/xctr/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub xctr: XctrConfig,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_key: String,
    /// API host the client talks to.
    pub endpoint: String,
    pub batch_size: usize,
    /// `None` means ask for formality-capable targets.
    pub formality: Option<Formality>,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub api_key: Option<String>,
    /// `--free-api` was passed.
    pub free_api: bool,
    pub batch_size: Option<usize>,
    pub formality: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take
/// precedence over built-in defaults.
///
/// # Errors
///
/// Returns an error if the API key is missing, or if the batch size or
/// formality is invalid.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let config = &config_file.xctr;

    let api_key = options
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .or_else(|| config.get_api_key())
        .ok_or_else(|| {
            let env_var = config.api_key_env();
            anyhow::anyhow!(
                "Missing DeepL API key\n\n\
                 Set the {env_var} environment variable:\n  \
                 export {env_var}=\"your-api-key\"\n\n\
                 Or provide it via:\n  \
                 - CLI option: xctr --api-key <key>\n  \
                 - Config file: api_key in ~/.config/xctr/config.toml"
            )
        })?;

    let batch_size = options
        .batch_size
        .or(config.batch_size)
        .unwrap_or(DEFAULT_BATCH_SIZE);
    let batch_size = validate_batch_size(batch_size).context("Invalid batch size")?;

    let formality = options
        .formality
        .as_deref()
        .or(config.formality.as_deref())
        .map(str::parse::<Formality>)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let endpoint = if let Some(endpoint) = &config.endpoint {
        endpoint.clone()
    } else {
        let free = options.free_api
            || config
                .free_api
                .unwrap_or_else(|| api_key.ends_with(FREE_KEY_SUFFIX));
        let host = if free { FREE_ENDPOINT } else { PRO_ENDPOINT };
        host.to_string()
    };

    Ok(ResolvedConfig {
        api_key,
        endpoint,
        batch_size,
        formality,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/xctr/config.toml`
    /// or `~/.config/xctr/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        crate::fs::atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

//! Process-wide validation settings.
//!
//! Loaded once at startup and installed before any validation call; read-only
//! afterwards. Callers that never install a config get the defaults.
use std::path::Path;

use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;

use crate::args::WhitelistPolicy;
use crate::error::ConfigError;

/// What a failed check turns into at the caller boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    /// Surface the first failure as an error.
    #[default]
    Raise,
    /// Log every failure and carry on.
    Log,
    /// Do not validate at all.
    Off,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    pub enforcement: Enforcement,
    /// Skip the unexpected-argument check for owners that declare nothing.
    pub ignore_components_without_validations: bool,
    pub argument_whitelist: WhitelistPolicy,
}

impl Config {
    pub fn from_json_str(src: &str, origin: &str) -> Result<Self, ConfigError> {
        crate::path_de::from_str_with_path(src).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.to_string_lossy().to_string();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: origin.clone(),
            source,
        })?;
        let config = Self::from_json_str(&src, &origin)?;
        tracing::debug!(path = %origin, enforcement = ?config.enforcement, "loaded validation config");
        Ok(config)
    }
}

static GLOBAL: OnceCell<Config> = OnceCell::new();
static DEFAULT: Lazy<Config> = Lazy::new(Config::default);

/// Install the process-wide config. Only the first install succeeds.
pub fn install(config: Config) -> Result<(), ConfigError> {
    GLOBAL.set(config).map_err(|_| ConfigError::AlreadyInstalled)
}

/// The installed config, or the defaults if none was installed yet.
/// Reading never fills the cell, so `install` still works afterwards.
pub fn global() -> &'static Config {
    GLOBAL.get().unwrap_or(&DEFAULT)
}

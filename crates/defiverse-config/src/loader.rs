//! Loading `Settings` from TOML text or files.
//!
//! Both entry points parse, then validate the chain options, so a returned
//! `Settings` can always build a log.

use std::path::Path;

use tracing::debug;

use defiverse_contracts::error::{DefiverseError, DefiverseResult};

use crate::settings::Settings;

impl Settings {
    /// Parse `s` as TOML settings.
    ///
    /// Returns `DefiverseError::ConfigError` if the TOML is malformed, does
    /// not match the `Settings` schema, or carries invalid chain options.
    pub fn from_toml_str(s: &str) -> DefiverseResult<Self> {
        let settings: Settings = toml::from_str(s).map_err(|e| DefiverseError::ConfigError {
            reason: format!("failed to parse settings TOML: {}", e),
        })?;
        settings.chain.validate()?;

        debug!(
            retention_cap = settings.chain.retention_cap,
            seed_records = settings.simulation.seed_records,
            interval_ms = settings.simulation.interval_ms,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Read the file at `path` and parse it as TOML settings.
    pub fn from_file(path: &Path) -> DefiverseResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| DefiverseError::ConfigError {
            reason: format!("failed to read settings file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> DefiverseResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

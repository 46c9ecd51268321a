//! Construction options for a chain log.
//!
//! These are plain data; the config crate fills them from TOML and the chain
//! crate validates them when a log is built.

use serde::{Deserialize, Serialize};

use crate::error::{DefiverseError, DefiverseResult};

/// Inclusive range the synthetic `resource_cost` is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRange {
    pub min: u64,
    pub max: u64,
}

impl Default for CostRange {
    /// 21 000 ..= 120 999, the dashboard's simulated gas range.
    fn default() -> Self {
        Self {
            min: 21_000,
            max: 120_999,
        }
    }
}

impl CostRange {
    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Options for a single `HashChainLog` instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainOptions {
    /// Maximum number of records retained; the oldest is evicted past this.
    pub retention_cap: usize,

    pub resource_cost: CostRange,

    /// File name prefix used for export downloads.
    pub export_prefix: String,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            retention_cap: 100,
            resource_cost: CostRange::default(),
            export_prefix: "defiverse-logs".to_string(),
        }
    }
}

impl ChainOptions {
    /// Reject option sets a log cannot operate with.
    pub fn validate(&self) -> DefiverseResult<()> {
        if self.retention_cap == 0 {
            return Err(DefiverseError::ConfigError {
                reason: "retention_cap must be at least 1".to_string(),
            });
        }
        if self.resource_cost.min > self.resource_cost.max {
            return Err(DefiverseError::ConfigError {
                reason: format!(
                    "resource_cost.min ({}) exceeds resource_cost.max ({})",
                    self.resource_cost.min, self.resource_cost.max
                ),
            });
        }
        if self.export_prefix.trim().is_empty() {
            return Err(DefiverseError::ConfigError {
                reason: "export_prefix must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

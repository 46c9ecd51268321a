//! Settings schema.
//!
//! `Settings` is deserialized from TOML. Every section and field has a
//! default, so an empty document is a valid configuration.
//!
//! Example:
//! ```toml
//! [chain]
//! retention_cap = 100
//! export_prefix = "defiverse-logs"
//!
//! [chain.resource_cost]
//! min = 21000
//! max = 120999
//!
//! [simulation]
//! seed_records = 20
//! interval_ms = 10000
//!
//! [logging]
//! filter = "info"
//! ```

use serde::{Deserialize, Serialize};

use defiverse_contracts::options::ChainOptions;

/// The simulated producer's cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Records appended before live production starts.
    pub seed_records: usize,

    /// Pause between producer ticks, in milliseconds.
    pub interval_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed_records: 20,
            interval_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// The top-level structure deserialized from a TOML settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chain: ChainOptions,
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
}

//! # defiverse-config
//!
//! TOML settings for the DeFiVerse chain log and its simulator.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use defiverse_config::Settings;
//!
//! let settings = Settings::from_file(Path::new("defiverse.toml"))?;
//! let log = HashChainLog::with_options(settings.chain.clone(), Arc::new(SystemClock))?;
//! ```
//!
//! Sections: `[chain]` (retention, synthetic cost range, export prefix),
//! `[simulation]` (seed size, producer interval) and `[logging]` (default
//! tracing filter).

pub mod loader;
pub mod settings;

pub use settings::{LoggingSettings, Settings, SimulationSettings};

// ── Tests ─────────────────────────────────────────────────────────────────────

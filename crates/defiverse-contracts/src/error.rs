//! Error types for the DeFiVerse chain log.
//!
//! Every fallible operation returns `DefiverseResult<T>`. Integrity faults are
//! not errors: they come back from the audit functions as `ChainAudit` values.

use thiserror::Error;

/// The unified error type for the chain log crates.
#[derive(Debug, Error)]
pub enum DefiverseError {
    /// `append` was called with an action type outside the enumerated set.
    ///
    /// Raised before the log is touched, so the log length is unchanged.
    #[error("invalid action type '{value}'")]
    InvalidActionType { value: String },

    /// `append` was called with an empty actor identifier.
    #[error("actor must not be empty")]
    EmptyActor,

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// An export document could not be produced or parsed.
    #[error("export failed: {reason}")]
    ExportFailed { reason: String },

    /// The log's internal mutex was poisoned by a panicking writer.
    #[error("chain log lock poisoned: {reason}")]
    LockPoisoned { reason: String },
}

/// Convenience alias used throughout the DeFiVerse crates.
pub type DefiverseResult<T> = Result<T, DefiverseError>;

//! Core trait definitions for the chain log pipeline.
//!
//! These three traits are the seams between the log and everything around it:
//!
//! - `LogProducer`: untrusted source of `(action_type, actor, payload)` events
//! - `ChainWriter`: the append-only sink that assigns order and fingerprints
//! - `Clock`: where record timestamps come from
//!
//! The `ProducerDriver` wires a producer to a writer. Nothing reaches the chain
//! except through `ChainWriter::append`, which validates every event.

use chrono::{DateTime, Utc};

use defiverse_contracts::{
    action::ProducedEvent, error::DefiverseResult, record::LogRecord,
};

/// A source of events to be recorded.
///
/// Implementations are treated as **untrusted**: they may emit unknown action
/// types or empty actors, and the writer rejects those.
pub trait LogProducer: Send {
    /// Produce the next event, or `None` once the producer is exhausted.
    fn next_event(&mut self) -> Option<ProducedEvent>;
}

/// The append-only sink for log records.
///
/// Implementations must serialize appends so each record links to the tail
/// that existed when it was created. Records are never modified once written.
pub trait ChainWriter: Send + Sync {
    /// Validate and append one event, returning the stored record.
    ///
    /// Fails with `InvalidActionType` or `EmptyActor` before touching state.
    fn append(
        &self,
        action_type: &str,
        actor: &str,
        payload: serde_json::Value,
    ) -> DefiverseResult<LogRecord>;
}

/// Source of the current time for record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

//! Log records and chain audit results.
//!
//! `LogRecord` is one immutable entry in the chain. `ChainAudit` is what an
//! integrity audit reports for a single record: audits never fail, they
//! describe what they found.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::{ActionType, Disposition};

/// The `previous_fingerprint` of the first record in a fresh chain.
///
/// 64 hex zeros, the same width as a real SHA-256 fingerprint.
pub const GENESIS_FINGERPRINT: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// A single entry in the hash chain.
///
/// `fingerprint` commits to `sequence_number`, `action_type`, `actor`,
/// `payload`, `created_at` and `previous_fingerprint`. The remaining fields
/// (`id`, `auxiliary_digest`, `disposition`, `resource_cost`, `nonce`) are
/// display metadata and are not covered by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Stable identifier, independent of the record's position.
    pub id: Uuid,

    /// Position in the chain. The first record ever appended is 1.
    pub sequence_number: u64,

    /// SHA-256 (hex) over the covered fields.
    pub fingerprint: String,

    /// Fingerprint of the preceding record, or `GENESIS_FINGERPRINT`.
    pub previous_fingerprint: String,

    /// Creation time (UTC). Never earlier than the preceding record's.
    pub created_at: DateTime<Utc>,

    pub action_type: ActionType,

    /// Opaque actor identifier, usually an account address.
    pub actor: String,

    /// Action-specific body.
    pub payload: serde_json::Value,

    /// Aggregate digest over `[payload]`, independent of the chain.
    pub auxiliary_digest: String,

    pub disposition: Disposition,

    /// Synthetic cost figure for display ("gas used").
    pub resource_cost: u64,

    /// Synthetic display value.
    pub nonce: u32,
}

/// The link the oldest retained record must point at.
///
/// Starts as the genesis sentinel at sequence 0. When the log evicts a record
/// the anchor moves to that record's sequence number and fingerprint, so the
/// retained window stays auditable without keeping evicted payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAnchor {
    pub sequence_number: u64,
    pub fingerprint: String,
}

impl ChainAnchor {
    pub fn genesis() -> Self {
        Self {
            sequence_number: 0,
            fingerprint: GENESIS_FINGERPRINT.to_string(),
        }
    }
}

impl Default for ChainAnchor {
    fn default() -> Self {
        Self::genesis()
    }
}

/// Why an audit flagged a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainFault {
    /// The stored fingerprint does not match the one recomputed from the
    /// record's own fields.
    FingerprintMismatch { stored: String, recomputed: String },

    /// `previous_fingerprint` does not match the predecessor's fingerprint
    /// (or the retained anchor, for the oldest record).
    BrokenLink { expected: String, found: String },

    /// The stored auxiliary digest does not match the one recomputed from
    /// the record's payload.
    AuxiliaryDigestMismatch { stored: String, recomputed: String },

    /// The predecessor (or the anchor) does not carry the sequence number
    /// immediately before this record's. Both fields are predecessor
    /// sequence numbers: the one this record needs and the one present.
    SequenceGap {
        expected_predecessor: u64,
        found_predecessor: u64,
    },
}

/// The audit verdict for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAudit {
    pub sequence_number: u64,
    /// True when `faults` is empty.
    pub valid: bool,
    pub faults: Vec<ChainFault>,
}

impl ChainAudit {
    /// Build an audit entry; `valid` is derived from `faults`.
    pub fn new(sequence_number: u64, faults: Vec<ChainFault>) -> Self {
        Self {
            sequence_number,
            valid: faults.is_empty(),
            faults,
        }
    }
}

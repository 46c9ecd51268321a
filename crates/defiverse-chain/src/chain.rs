//! Record verification and chain audits.
//!
//! Three checks apply to every record during an audit:
//!
//! 1. **Fingerprint correctness**: the stored `fingerprint` equals the value
//!    recomputed from the record's own fields.
//! 2. **Auxiliary digest**: the stored `auxiliary_digest` equals the aggregate
//!    digest recomputed over `[payload]`.
//! 3. **Linkage**: `previous_fingerprint` equals the predecessor's stored
//!    `fingerprint` (or the anchor's, for the oldest record), and the
//!    predecessor's sequence number is exactly one less.
//!
//! Linkage is checked against the predecessor's *stored* fingerprint, so a
//! tampered record is flagged on its own and does not cascade to its
//! successors. Audits cover every record and never stop at the first fault.

use defiverse_contracts::record::{ChainAnchor, ChainAudit, ChainFault, LogRecord};

use crate::digest::{aggregate_digest, fingerprint};

/// Recompute a record's fingerprint from its covered fields.
pub fn recompute_fingerprint(record: &LogRecord) -> String {
    fingerprint(
        record.sequence_number,
        record.action_type,
        &record.actor,
        &record.payload,
        &record.created_at,
        &record.previous_fingerprint,
    )
}

/// True when the stored fingerprint matches the recomputed one.
///
/// Does not look at neighbors; see `audit_ordered` for linkage.
pub fn verify_record(record: &LogRecord) -> bool {
    recompute_fingerprint(record) == record.fingerprint
}

/// Audit records that are already in ascending sequence order.
///
/// `anchor` is what the first record is expected to link to. Returns one
/// `ChainAudit` per record, in the same order. An empty input yields an empty
/// audit.
pub fn audit_ordered<'a, I>(records: I, anchor: &ChainAnchor) -> Vec<ChainAudit>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut audits = Vec::new();
    let mut expected_prev_seq = anchor.sequence_number;
    let mut expected_prev_fingerprint = anchor.fingerprint.as_str();

    for record in records {
        let mut faults = Vec::new();

        let recomputed = recompute_fingerprint(record);
        if recomputed != record.fingerprint {
            faults.push(ChainFault::FingerprintMismatch {
                stored: record.fingerprint.clone(),
                recomputed,
            });
        }

        let auxiliary = aggregate_digest(std::slice::from_ref(&record.payload));
        if auxiliary != record.auxiliary_digest {
            faults.push(ChainFault::AuxiliaryDigestMismatch {
                stored: record.auxiliary_digest.clone(),
                recomputed: auxiliary,
            });
        }

        // A gap makes the link uncheckable, so only one of the two is reported.
        // Loaded documents may carry any u64 here.
        if expected_prev_seq.checked_add(1) != Some(record.sequence_number) {
            faults.push(ChainFault::SequenceGap {
                expected_predecessor: record.sequence_number.saturating_sub(1),
                found_predecessor: expected_prev_seq,
            });
        } else if record.previous_fingerprint != expected_prev_fingerprint {
            faults.push(ChainFault::BrokenLink {
                expected: expected_prev_fingerprint.to_string(),
                found: record.previous_fingerprint.clone(),
            });
        }

        audits.push(ChainAudit::new(record.sequence_number, faults));

        expected_prev_seq = record.sequence_number;
        expected_prev_fingerprint = record.fingerprint.as_str();
    }

    audits
}

/// Audit records in any order, e.g. the newest-first list of an export.
///
/// Records are sorted by sequence number before auditing; results come back
/// oldest first. Records missing from the slice show up as `SequenceGap`
/// faults on their successors.
pub fn verify_records(records: &[LogRecord], anchor: &ChainAnchor) -> Vec<ChainAudit> {
    let mut ordered: Vec<&LogRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.sequence_number);
    audit_ordered(ordered, anchor)
}

/// True when none of the audits found a fault.
pub fn all_valid(audits: &[ChainAudit]) -> bool {
    audits.iter().all(|a| a.valid)
}

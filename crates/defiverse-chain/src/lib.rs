//! # defiverse-chain
//!
//! Append-only, SHA-256 hash-chained activity log for the DeFiVerse
//! dashboard.
//!
//! ## Overview
//!
//! Every appended record carries the fingerprint of its predecessor. Changing
//! any covered field of a stored record makes its fingerprint stop matching,
//! which `verify` and `verify_chain` detect. Faults are reported per record;
//! the log keeps operating.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use defiverse_chain::HashChainLog;
//! use defiverse_contracts::filter::LogFilter;
//!
//! let log = HashChainLog::new();
//! let record = log.append("TRANSFER", "0x742d35Cc", json!({ "amount": 100 }))?;
//! assert!(log.verify(&record));
//!
//! let recent_transfers = log.query(LogFilter::all().with_text("transfer"));
//! let document = log.export(None)?;
//! ```

pub mod chain;
pub mod digest;
pub mod log;

pub use chain::{all_valid, audit_ordered, recompute_fingerprint, verify_record, verify_records};
pub use digest::{aggregate_digest, canonical_json, fingerprint, sha256_hex};
pub use log::{HashChainLog, LogSnapshot, QueryIter, QueryView};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use serde_json::json;

    use defiverse_contracts::{
        action::{ActionType, Disposition},
        error::DefiverseError,
        export::ChainExport,
        filter::LogFilter,
        options::ChainOptions,
        record::{ChainAnchor, ChainAudit, ChainFault, GENESIS_FINGERPRINT},
    };
    use defiverse_core::ManualClock;

    use super::{verify_records, HashChainLog};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn transfer_payload(amount: u64) -> serde_json::Value {
        json!({
            "from": "0x742d35Cc6634C0532925a3b8D4",
            "to": "0x123456789abcdef123456789a",
            "amount": amount,
            "token": "BANK"
        })
    }

    /// A log on a manual clock starting at a fixed instant.
    fn manual_log(retention_cap: usize) -> (HashChainLog, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let options = ChainOptions {
            retention_cap,
            ..ChainOptions::default()
        };
        let log = HashChainLog::with_options(options, clock.clone()).unwrap();
        (log, clock)
    }

    fn valid(audits: &[ChainAudit]) -> Vec<(u64, bool)> {
        audits.iter().map(|a| (a.sequence_number, a.valid)).collect()
    }

    // ── Append ────────────────────────────────────────────────────────────────

    /// Sequence numbers are 1..=N with no gaps.
    #[test]
    fn test_sequence_numbers_start_at_one() {
        let log = HashChainLog::new();
        for i in 0..5 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        let sequences: Vec<u64> = log.snapshot().iter().map(|r| r.sequence_number).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
    }

    /// The first record links to the genesis sentinel; later ones to their
    /// predecessor's fingerprint.
    #[test]
    fn test_linkage_and_genesis() {
        let log = HashChainLog::new();
        let first = log.append("STAKE", "0xbbb", json!({ "pool": "ETH_POOL" })).unwrap();
        let second = log.append("UNSTAKE", "0xbbb", json!({ "pool": "ETH_POOL" })).unwrap();
        let third = log.append("DAO_VOTE", "0xccc", json!({ "vote": "yes" })).unwrap();

        assert_eq!(first.previous_fingerprint, GENESIS_FINGERPRINT);
        assert_eq!(second.previous_fingerprint, first.fingerprint);
        assert_eq!(third.previous_fingerprint, second.fingerprint);
        assert_eq!(third.action_type, ActionType::GovernanceVote);
    }

    /// Every appended record verifies immediately and is confirmed.
    #[test]
    fn test_appended_record_verifies() {
        let log = HashChainLog::new();
        for action in ActionType::ALL {
            let record = log.append_action(action, "0xaaa", json!({ "k": action.as_str() })).unwrap();
            assert!(log.verify(&record));
            assert_eq!(record.disposition, Disposition::Confirmed);
            assert_eq!(record.fingerprint.len(), 64);
            assert!(log.options().resource_cost.contains(record.resource_cost));
            assert!(record.nonce < 1_000_000);
        }
    }

    #[test]
    fn test_auxiliary_digest_covers_payload_only() {
        let log = HashChainLog::new();
        let a = log.append("TRANSFER", "0xaaa", transfer_payload(100)).unwrap();
        let b = log.append("TRANSFER", "0xbbb", transfer_payload(100)).unwrap();
        let c = log.append("TRANSFER", "0xaaa", transfer_payload(200)).unwrap();

        assert_eq!(a.auxiliary_digest, b.auxiliary_digest);
        assert_ne!(a.auxiliary_digest, c.auxiliary_digest);
        assert_ne!(a.fingerprint, b.fingerprint);
    }

    /// An unknown action type is rejected and the log is unchanged.
    #[test]
    fn test_invalid_action_type_rejected() {
        let log = HashChainLog::new();
        log.append("TRANSFER", "0xaaa", transfer_payload(1)).unwrap();

        match log.append("UNKNOWN", "0xaaa", json!({})) {
            Err(DefiverseError::InvalidActionType { value }) => assert_eq!(value, "UNKNOWN"),
            other => panic!("expected InvalidActionType, got {:?}", other),
        }
        assert_eq!(log.len(), 1);

        // The next accepted record continues the sequence without a gap.
        let next = log.append("TRANSFER", "0xaaa", transfer_payload(2)).unwrap();
        assert_eq!(next.sequence_number, 2);
    }

    #[test]
    fn test_empty_actor_rejected() {
        let log = HashChainLog::new();
        assert!(matches!(
            log.append("STAKE", "  ", json!({})),
            Err(DefiverseError::EmptyActor)
        ));
        assert!(log.is_empty());
    }

    /// A clock that steps backwards never produces a decreasing timestamp.
    #[test]
    fn test_created_at_never_decreases() {
        let (log, clock) = manual_log(100);
        let first = log.append("STAKE", "0xaaa", json!({})).unwrap();

        clock.advance(Duration::seconds(-30));
        let second = log.append("STAKE", "0xaaa", json!({})).unwrap();
        assert_eq!(second.created_at, first.created_at);

        clock.advance(Duration::seconds(60));
        let third = log.append("STAKE", "0xaaa", json!({})).unwrap();
        assert!(third.created_at > second.created_at);
        assert!(log.verify_integrity());
    }

    // ── Retention ─────────────────────────────────────────────────────────────

    /// The 101st append under a cap of 100 evicts sequence 1.
    #[test]
    fn test_retention_cap_evicts_oldest() {
        let log = HashChainLog::new();
        let mut first_fingerprint = String::new();
        for i in 0..101 {
            let record = log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
            if i == 0 {
                first_fingerprint = record.fingerprint.clone();
            }
        }

        assert_eq!(log.len(), 100);
        let returned: Vec<u64> = log
            .query(LogFilter::all())
            .iter()
            .map(|r| r.sequence_number)
            .collect();
        assert!(!returned.contains(&1));
        assert_eq!(returned.first(), Some(&101));
        assert_eq!(returned.last(), Some(&2));

        // The anchor now points at the evicted record and the window audits clean.
        let anchor = log.anchor();
        assert_eq!(anchor.sequence_number, 1);
        assert_eq!(anchor.fingerprint, first_fingerprint);
        assert!(log.verify_integrity());
    }

    #[test]
    fn test_small_cap_keeps_auditing_after_many_evictions() {
        let (log, _clock) = manual_log(3);
        for i in 0..10 {
            log.append("NFT_MINT", "0xaaa", json!({ "tokenId": i })).unwrap();
        }

        assert_eq!(log.len(), 3);
        assert_eq!(
            valid(&log.verify_chain()),
            vec![(8, true), (9, true), (10, true)]
        );
    }

    // ── Audit ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_verify_chain_on_untampered_log() {
        let log = HashChainLog::new();
        for i in 0..3 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        assert_eq!(
            valid(&log.verify_chain()),
            vec![(1, true), (2, true), (3, true)]
        );
    }

    /// Corrupting record 2's actor flags record 2 only: record 3 links to
    /// record 2's stored fingerprint, which is unchanged.
    #[test]
    fn test_tamper_detection_does_not_cascade() {
        let log = HashChainLog::new();
        for i in 0..3 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        {
            let mut state = log.state.lock().unwrap();
            let records = Arc::make_mut(&mut state.records);
            records[1].actor = "0xmallory".to_string();
        }

        let audits = log.verify_chain();
        assert_eq!(valid(&audits), vec![(1, true), (2, false), (3, true)]);
        assert!(matches!(
            audits[1].faults.as_slice(),
            [ChainFault::FingerprintMismatch { .. }]
        ));
        assert!(!log.verify_integrity());
    }

    /// Rewriting a record's digests to match its tampered content moves the
    /// fault to the successor's link.
    #[test]
    fn test_recomputed_fingerprint_breaks_successor_link() {
        let log = HashChainLog::new();
        for i in 0..3 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        {
            let mut state = log.state.lock().unwrap();
            let records = Arc::make_mut(&mut state.records);
            records[1].payload = transfer_payload(1_000_000);
            let digest = super::aggregate_digest(std::slice::from_ref(&records[1].payload));
            records[1].auxiliary_digest = digest;
            let forged = super::recompute_fingerprint(&records[1]);
            records[1].fingerprint = forged;
        }

        let audits = log.verify_chain();
        assert_eq!(valid(&audits), vec![(1, true), (2, true), (3, false)]);
        assert!(matches!(
            audits[2].faults.as_slice(),
            [ChainFault::BrokenLink { .. }]
        ));
    }

    /// The auxiliary digest is not part of the fingerprint, but the audit
    /// still recomputes it.
    #[test]
    fn test_auxiliary_digest_tamper_flags_record() {
        let log = HashChainLog::new();
        for i in 0..3 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        let mut document = log.export_document(None);
        let target = document
            .records
            .iter_mut()
            .find(|r| r.sequence_number == 2)
            .unwrap();
        target.auxiliary_digest = "deadbeef".to_string();
        assert!(log.verify(target), "verify covers the fingerprint only");

        let audits = verify_records(&document.records, &document.anchor);
        assert_eq!(valid(&audits), vec![(1, true), (2, false), (3, true)]);
        match audits[1].faults.as_slice() {
            [ChainFault::AuxiliaryDigestMismatch { stored, recomputed }] => {
                assert_eq!(stored, "deadbeef");
                assert_eq!(recomputed.len(), 64);
            }
            other => panic!("expected AuxiliaryDigestMismatch, got {:?}", other),
        }
    }

    /// A writer that panics while holding the lock poisons it: appends fail
    /// with `LockPoisoned`, reads keep working on the last consistent state.
    #[test]
    fn test_poisoned_lock_fails_appends_but_not_reads() {
        let log = Arc::new(HashChainLog::new());
        for i in 0..2 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        let poisoner = Arc::clone(&log);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("writer panicked while holding the chain lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(log.state.is_poisoned());

        assert!(matches!(
            log.append("TRANSFER", "0xaaa", transfer_payload(3)),
            Err(DefiverseError::LockPoisoned { .. })
        ));

        assert_eq!(log.len(), 2);
        assert_eq!(valid(&log.verify_chain()), vec![(1, true), (2, true)]);
        assert!(log.verify_integrity());
        assert_eq!(log.query(LogFilter::all()).iter().count(), 2);
    }

    /// A snapshot taken before tampering keeps its own copy of the records.
    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let log = HashChainLog::new();
        log.append("STAKE", "0xaaa", json!({})).unwrap();
        let snapshot = log.snapshot();

        log.append("STAKE", "0xaaa", json!({})).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_verify_empty() {
        let log = HashChainLog::new();
        assert!(log.verify_chain().is_empty());
        assert!(log.verify_integrity());
        assert!(log.head().is_none());
    }

    // ── Query ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_query_is_newest_first_and_filters() {
        let log = HashChainLog::new();
        log.append("TRANSFER", "0x742d35Cc", transfer_payload(1)).unwrap();
        log.append("STAKE", "0x9876543", json!({ "pool": "ETH_POOL" })).unwrap();
        log.append("TRANSFER", "0x123456", transfer_payload(2)).unwrap();

        let transfers: Vec<u64> = log
            .query(LogFilter::all().with_action(ActionType::Transfer))
            .iter()
            .map(|r| r.sequence_number)
            .collect();
        assert_eq!(transfers, vec![3, 1]);

        let by_actor = log.query(LogFilter::all().with_actor("9876")).to_vec();
        assert_eq!(by_actor.len(), 1);
        assert_eq!(by_actor[0].action_type, ActionType::Stake);

        let searched = log.query(LogFilter::all().with_text("742D35cc")).to_vec();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].sequence_number, 1);
    }

    #[test]
    fn test_query_by_fingerprint_prefix() {
        let log = HashChainLog::new();
        let target = log.append("NFT_MINT", "0xaaa", json!({ "tokenId": 1001 })).unwrap();
        log.append("NFT_MINT", "0xaaa", json!({ "tokenId": 1002 })).unwrap();

        let prefix = target.fingerprint[..16].to_uppercase();
        let hits = log.query(LogFilter::all().with_text(prefix)).to_vec();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, target.id);
    }

    #[test]
    fn test_query_time_window() {
        let (log, clock) = manual_log(100);
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        for _ in 0..5 {
            log.append("STAKE", "0xaaa", json!({})).unwrap();
            clock.advance(Duration::minutes(1));
        }

        let window = LogFilter::all()
            .created_after(start + Duration::minutes(1))
            .created_before(start + Duration::minutes(3));
        let sequences: Vec<u64> = log.query(window).iter().map(|r| r.sequence_number).collect();
        assert_eq!(sequences, vec![4, 3, 2]);
    }

    /// Querying twice yields the same records; the view is restartable.
    #[test]
    fn test_query_is_idempotent_and_restartable() {
        let log = HashChainLog::new();
        for i in 0..4 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        let filter = LogFilter::all().with_text("transfer");
        let first = log.query(filter.clone()).to_vec();
        let second = log.query(filter).to_vec();
        assert_eq!(first, second);

        let view = log.query(LogFilter::all());
        let once: Vec<u64> = view.iter().map(|r| r.sequence_number).collect();
        let again: Vec<u64> = (&view).into_iter().map(|r| r.sequence_number).collect();
        assert_eq!(once, again);

        log.append("TRANSFER", "0xaaa", transfer_payload(9)).unwrap();
        assert_eq!(view.iter().count(), 4, "a view never sees later appends");
    }

    // ── Export ────────────────────────────────────────────────────────────────

    #[test]
    fn test_export_round_trips_and_audits() {
        let log = HashChainLog::new();
        for i in 0..3 {
            log.append("TRANSFER", "0xaaa", transfer_payload(i)).unwrap();
        }

        let json = log.export(None).unwrap();
        let document = ChainExport::from_json(&json).unwrap();

        assert_eq!(document.record_count, 3);
        assert!(document.filter.is_none());
        assert_eq!(document.records[0].sequence_number, 3);
        assert_eq!(document.head_fingerprint, document.records[0].fingerprint);
        assert_eq!(document.records, log.query(LogFilter::all()).to_vec());

        let audits = verify_records(&document.records, &document.anchor);
        assert_eq!(valid(&audits), vec![(1, true), (2, true), (3, true)]);
    }

    #[test]
    fn test_filtered_export_reports_gaps() {
        let log = HashChainLog::new();
        log.append("TRANSFER", "0xaaa", transfer_payload(1)).unwrap();
        log.append("STAKE", "0xaaa", json!({})).unwrap();
        log.append("TRANSFER", "0xaaa", transfer_payload(2)).unwrap();

        let filter = LogFilter::all().with_action(ActionType::Transfer);
        let document = log.export_document(Some(&filter));
        assert_eq!(document.record_count, 2);
        assert_eq!(document.filter, Some(filter));

        let written = ChainExport::from_json(&document.to_json_pretty().unwrap()).unwrap();
        assert_eq!(written.record_count, document.record_count);
        assert_eq!(written.records.len(), 2);

        let audits = verify_records(&document.records, &document.anchor);
        assert_eq!(valid(&audits), vec![(1, true), (3, false)]);
        assert_eq!(
            audits[1].faults,
            vec![ChainFault::SequenceGap {
                expected_predecessor: 2,
                found_predecessor: 1,
            }]
        );
    }

    /// A crafted anchor at the top of the sequence range is reported as a
    /// gap instead of overflowing.
    #[test]
    fn test_anchor_at_sequence_limit_reports_gap() {
        let log = HashChainLog::new();
        log.append("TRANSFER", "0xaaa", transfer_payload(1)).unwrap();
        let document = log.export_document(None);

        let anchor = ChainAnchor {
            sequence_number: u64::MAX,
            fingerprint: GENESIS_FINGERPRINT.to_string(),
        };
        let audits = verify_records(&document.records, &anchor);

        assert_eq!(valid(&audits), vec![(1, false)]);
        assert_eq!(
            audits[0].faults,
            vec![ChainFault::SequenceGap {
                expected_predecessor: 0,
                found_predecessor: u64::MAX,
            }]
        );
    }

    #[test]
    fn test_record_at_sequence_limit_is_audited() {
        let log = HashChainLog::new();
        log.append("TRANSFER", "0xaaa", transfer_payload(1)).unwrap();
        let mut records = log.export_document(None).records;
        records[0].sequence_number = u64::MAX;

        let audits = verify_records(&records, &ChainAnchor::genesis());

        assert_eq!(audits.len(), 1);
        assert!(!audits[0].valid);
        assert!(audits[0].faults.contains(&ChainFault::SequenceGap {
            expected_predecessor: u64::MAX - 1,
            found_predecessor: 0,
        }));
    }

    #[test]
    fn test_export_file_name() {
        let log = HashChainLog::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(log.export_file_name(date), "defiverse-logs-2026-03-01.json");
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ChainOptions {
            retention_cap: 0,
            ..ChainOptions::default()
        };
        let result = HashChainLog::with_options(options, Arc::new(defiverse_core::SystemClock));
        assert!(matches!(result, Err(DefiverseError::ConfigError { .. })));
    }
}

//! The `HashChainLog`: an in-memory, append-only, hash-chained record log.
//!
//! Records live in an `Arc<VecDeque<_>>` behind a `Mutex`. Appends hold the
//! lock for the whole read-tail / fingerprint / push / evict sequence and
//! write copy-on-write through `Arc::make_mut`. Readers only hold the lock long
//! enough to clone the `Arc`, then scan their snapshot lock-free; a snapshot
//! never contains a half-appended record.

use std::collections::{vec_deque, VecDeque};
use std::iter::Rev;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use defiverse_contracts::{
    action::{ActionType, Disposition},
    error::{DefiverseError, DefiverseResult},
    export::ChainExport,
    filter::LogFilter,
    options::ChainOptions,
    record::{ChainAnchor, ChainAudit, LogRecord},
};
use defiverse_core::{
    traits::{ChainWriter, Clock},
    SystemClock,
};

use crate::{
    chain::{all_valid, audit_ordered, verify_record},
    digest::{aggregate_digest, fingerprint},
};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of a `HashChainLog`.
pub(crate) struct ChainState {
    /// Retained records, oldest first.
    pub(crate) records: Arc<VecDeque<LogRecord>>,

    /// What the oldest retained record links to.
    pub(crate) anchor: ChainAnchor,
}

// ── Snapshots and query views ─────────────────────────────────────────────────

/// A consistent, immutable view of the log at one point in time.
#[derive(Debug, Clone)]
pub struct LogSnapshot {
    records: Arc<VecDeque<LogRecord>>,
    anchor: ChainAnchor,
}

impl LogSnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn anchor(&self) -> &ChainAnchor {
        &self.anchor
    }

    /// The newest record, if any.
    pub fn head(&self) -> Option<&LogRecord> {
        self.records.back()
    }

    /// Records oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, LogRecord> {
        self.records.iter()
    }

    /// Look up a retained record by sequence number.
    pub fn get(&self, sequence_number: u64) -> Option<&LogRecord> {
        let first = self.records.front()?.sequence_number;
        let index = sequence_number.checked_sub(first)?;
        self.records.get(usize::try_from(index).ok()?)
    }

    /// Audit every record in this snapshot, oldest first.
    pub fn verify_chain(&self) -> Vec<ChainAudit> {
        audit_ordered(self.records.iter(), &self.anchor)
    }

    /// Filtered, most-recent-first view over this snapshot.
    pub fn query(&self, filter: LogFilter) -> QueryView {
        QueryView {
            records: Arc::clone(&self.records),
            filter,
        }
    }
}

/// A lazy, restartable, most-recent-first filtered view.
///
/// Holds its own snapshot, so later appends never change what it yields.
/// Call `iter()` as many times as needed; each call starts from the newest
/// matching record.
#[derive(Debug, Clone)]
pub struct QueryView {
    records: Arc<VecDeque<LogRecord>>,
    filter: LogFilter,
}

impl QueryView {
    pub fn iter(&self) -> QueryIter<'_> {
        QueryIter {
            inner: self.records.iter().rev(),
            filter: &self.filter,
        }
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    /// Collect the matching records, newest first.
    pub fn to_vec(&self) -> Vec<LogRecord> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a QueryView {
    type Item = &'a LogRecord;
    type IntoIter = QueryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by `QueryView::iter`.
pub struct QueryIter<'a> {
    inner: Rev<vec_deque::Iter<'a, LogRecord>>,
    filter: &'a LogFilter,
}

impl<'a> Iterator for QueryIter<'a> {
    type Item = &'a LogRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.by_ref().find(|record| filter.matches(record))
    }
}

// ── Public log ────────────────────────────────────────────────────────────────

/// An append-only, SHA-256 hash-chained log of dashboard activity.
///
/// Share it with `Arc<HashChainLog>`; every method takes `&self`.
///
/// # Thread safety
///
/// Appends are serialized by an internal `Mutex`, so each record links to the
/// tail that existed when it was created. Readers work on snapshots and never
/// block appends for longer than an `Arc` clone.
pub struct HashChainLog {
    options: ChainOptions,
    clock: Arc<dyn Clock>,
    pub(crate) state: Mutex<ChainState>,
}

impl HashChainLog {
    /// A log with default options and the system clock.
    pub fn new() -> Self {
        Self::build(ChainOptions::default(), Arc::new(SystemClock))
    }

    /// A log with explicit options and clock.
    ///
    /// Returns `ConfigError` if `options` fail validation.
    pub fn with_options(options: ChainOptions, clock: Arc<dyn Clock>) -> DefiverseResult<Self> {
        options.validate()?;
        Ok(Self::build(options, clock))
    }

    fn build(options: ChainOptions, clock: Arc<dyn Clock>) -> Self {
        let state = ChainState {
            records: Arc::new(VecDeque::with_capacity(options.retention_cap)),
            anchor: ChainAnchor::genesis(),
        };
        Self {
            options,
            clock,
            state: Mutex::new(state),
        }
    }

    pub fn options(&self) -> &ChainOptions {
        &self.options
    }

    /// Validate the action type name, then append.
    ///
    /// Accepts canonical names and the dashboard's legacy labels; anything
    /// else fails with `InvalidActionType` and leaves the log untouched.
    pub fn append(&self, action_type: &str, actor: &str, payload: Value) -> DefiverseResult<LogRecord> {
        let action_type: ActionType = action_type.parse()?;
        self.append_action(action_type, actor, payload)
    }

    /// Append one record and return a copy of it.
    ///
    /// Assigns the next sequence number, a timestamp no earlier than the
    /// tail's, both digests, `Confirmed` disposition, and synthetic cost and
    /// nonce. Evicts the oldest record when the retention cap is exceeded,
    /// moving the anchor to it.
    ///
    /// Fails with `EmptyActor` before touching state, or `LockPoisoned`.
    pub fn append_action(
        &self,
        action_type: ActionType,
        actor: &str,
        payload: Value,
    ) -> DefiverseResult<LogRecord> {
        if actor.trim().is_empty() {
            return Err(DefiverseError::EmptyActor);
        }

        let mut guard = self.lock_state()?;
        let ChainState { records, anchor } = &mut *guard;

        let (sequence_number, previous_fingerprint, floor) = match records.back() {
            Some(tail) => (
                tail.sequence_number + 1,
                tail.fingerprint.clone(),
                Some(tail.created_at),
            ),
            None => (anchor.sequence_number + 1, anchor.fingerprint.clone(), None),
        };

        let now = self.clock.now();
        let created_at = floor.map_or(now, |floor| now.max(floor));

        let fingerprint = fingerprint(
            sequence_number,
            action_type,
            actor,
            &payload,
            &created_at,
            &previous_fingerprint,
        );
        let auxiliary_digest = aggregate_digest(std::slice::from_ref(&payload));

        let mut rng = rand::thread_rng();
        let cost = self.options.resource_cost;
        let record = LogRecord {
            id: Uuid::new_v4(),
            sequence_number,
            fingerprint,
            previous_fingerprint,
            created_at,
            action_type,
            actor: actor.to_string(),
            payload,
            auxiliary_digest,
            disposition: Disposition::Confirmed,
            resource_cost: rng.gen_range(cost.min..=cost.max),
            nonce: rng.gen_range(0..1_000_000),
        };

        let retained = Arc::make_mut(records);
        retained.push_back(record.clone());

        while retained.len() > self.options.retention_cap {
            let Some(evicted) = retained.pop_front() else {
                break;
            };
            debug!(
                sequence = evicted.sequence_number,
                fingerprint = %evicted.fingerprint,
                "evicted oldest record; anchor advanced"
            );
            *anchor = ChainAnchor {
                sequence_number: evicted.sequence_number,
                fingerprint: evicted.fingerprint,
            };
        }

        debug!(
            sequence = record.sequence_number,
            action_type = %record.action_type,
            actor = %record.actor,
            fingerprint = %record.fingerprint,
            "record appended"
        );

        Ok(record)
    }

    /// Recompute `record`'s fingerprint and compare it with the stored one.
    ///
    /// Linkage to neighbors is not checked here; see `verify_chain`.
    pub fn verify(&self, record: &LogRecord) -> bool {
        verify_record(record)
    }

    /// Audit every retained record, oldest first.
    pub fn verify_chain(&self) -> Vec<ChainAudit> {
        self.snapshot().verify_chain()
    }

    /// True when `verify_chain` finds no faults. An empty log is valid.
    pub fn verify_integrity(&self) -> bool {
        all_valid(&self.verify_chain())
    }

    /// Filtered, most-recent-first view over the current contents.
    pub fn query(&self, filter: LogFilter) -> QueryView {
        self.snapshot().query(filter)
    }

    /// Take a consistent snapshot of the retained records and anchor.
    pub fn snapshot(&self) -> LogSnapshot {
        let state = self.read_state();
        LogSnapshot {
            records: Arc::clone(&state.records),
            anchor: state.anchor.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.read_state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().records.is_empty()
    }

    /// The newest record, if any.
    pub fn head(&self) -> Option<LogRecord> {
        self.read_state().records.back().cloned()
    }

    pub fn anchor(&self) -> ChainAnchor {
        self.read_state().anchor.clone()
    }

    /// Build the export document for the current contents.
    ///
    /// With `None` every retained record is included.
    pub fn export_document(&self, filter: Option<&LogFilter>) -> ChainExport {
        let snapshot = self.snapshot();
        let records = snapshot
            .query(filter.cloned().unwrap_or_default())
            .to_vec();
        let head_fingerprint = snapshot
            .head()
            .map(|r| r.fingerprint.clone())
            .unwrap_or_default();

        ChainExport {
            exported_at: self.clock.now(),
            filter: filter.cloned(),
            anchor: snapshot.anchor().clone(),
            head_fingerprint,
            record_count: records.len(),
            records,
        }
    }

    /// Render the export document as indented JSON.
    ///
    /// Writing it anywhere is the caller's business.
    pub fn export(&self, filter: Option<&LogFilter>) -> DefiverseResult<String> {
        let document = self.export_document(filter);
        let json = document.to_json_pretty()?;
        info!(
            record_count = document.record_count,
            head_fingerprint = %document.head_fingerprint,
            "chain log exported"
        );
        Ok(json)
    }

    /// Download file name for an export taken on `date`,
    /// e.g. `defiverse-logs-2026-03-01.json`.
    pub fn export_file_name(&self, date: NaiveDate) -> String {
        format!("{}-{}.json", self.options.export_prefix, date.format("%Y-%m-%d"))
    }

    fn lock_state(&self) -> DefiverseResult<MutexGuard<'_, ChainState>> {
        self.state.lock().map_err(|e| DefiverseError::LockPoisoned {
            reason: e.to_string(),
        })
    }

    /// Appends never leave the state half-written (the push and the anchor
    /// move happen after every fallible step), so reads recover a poisoned lock.
    fn read_state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for HashChainLog {
    fn default() -> Self {
        Self::new()
    }
}

// ── ChainWriter impl ──────────────────────────────────────────────────────────

impl ChainWriter for HashChainLog {
    fn append(&self, action_type: &str, actor: &str, payload: Value) -> DefiverseResult<LogRecord> {
        HashChainLog::append(self, action_type, actor, payload)
    }
}

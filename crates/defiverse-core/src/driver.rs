//! The producer driver: the periodic loop that feeds the chain.
//!
//! Each tick runs:
//!
//!   Producer::next_event → ChainWriter::append → report
//!
//! A rejected event (unknown action type, empty actor) is logged and counted;
//! the driver keeps going. Any other writer error ends the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use defiverse_contracts::{
    error::{DefiverseError, DefiverseResult},
    record::LogRecord,
};

use crate::traits::{ChainWriter, LogProducer};

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// The event was accepted and is now the chain's head.
    Appended(LogRecord),

    /// The writer refused the event. The chain is unchanged.
    Rejected {
        /// The writer's explanation.
        reason: String,
    },

    /// The producer has nothing more to emit.
    Exhausted,
}

/// Totals for a run of ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub appended: usize,
    pub rejected: usize,
    /// True if the run ended because the producer ran dry.
    pub exhausted: bool,
}

/// Drives one producer into one writer.
///
/// The writer is shared (`Arc`) so readers can query the same log while the
/// driver runs.
pub struct ProducerDriver {
    producer: Box<dyn LogProducer>,
    writer: Arc<dyn ChainWriter>,
}

impl ProducerDriver {
    pub fn new(producer: Box<dyn LogProducer>, writer: Arc<dyn ChainWriter>) -> Self {
        Self { producer, writer }
    }

    /// Pull one event from the producer and append it.
    ///
    /// # Errors
    ///
    /// Input errors from the writer become `TickOutcome::Rejected`. Any
    /// other error (a poisoned lock, for instance) is returned as-is.
    pub fn tick(&mut self) -> DefiverseResult<TickOutcome> {
        let Some(event) = self.producer.next_event() else {
            debug!("producer exhausted");
            return Ok(TickOutcome::Exhausted);
        };

        match self
            .writer
            .append(&event.action_type, &event.actor, event.payload)
        {
            Ok(record) => {
                debug!(
                    sequence = record.sequence_number,
                    action_type = %record.action_type,
                    fingerprint = %record.fingerprint,
                    "event appended"
                );
                Ok(TickOutcome::Appended(record))
            }
            Err(e @ (DefiverseError::InvalidActionType { .. } | DefiverseError::EmptyActor)) => {
                warn!(
                    action_type = %event.action_type,
                    actor = %event.actor,
                    error = %e,
                    "producer event rejected"
                );
                Ok(TickOutcome::Rejected {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Run up to `ticks` ticks, sleeping `interval` between them.
    ///
    /// Stops early if the producer is exhausted.
    pub fn run_ticks(&mut self, ticks: usize, interval: Duration) -> DefiverseResult<DriverReport> {
        let mut report = DriverReport::default();

        for i in 0..ticks {
            if i > 0 && !interval.is_zero() {
                std::thread::sleep(interval);
            }
            if !self.record(&mut report)? {
                break;
            }
        }

        info!(
            appended = report.appended,
            rejected = report.rejected,
            exhausted = report.exhausted,
            "producer run finished"
        );
        Ok(report)
    }

    /// Tick every `interval` until `stop` is set or the producer is exhausted.
    pub fn run_until(
        &mut self,
        stop: &AtomicBool,
        interval: Duration,
    ) -> DefiverseResult<DriverReport> {
        let mut report = DriverReport::default();

        while !stop.load(Ordering::Acquire) {
            if !self.record(&mut report)? {
                break;
            }
            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }

        info!(
            appended = report.appended,
            rejected = report.rejected,
            exhausted = report.exhausted,
            "producer run stopped"
        );
        Ok(report)
    }

    /// Tick once and fold the outcome into `report`. Returns false once the
    /// producer is exhausted.
    fn record(&mut self, report: &mut DriverReport) -> DefiverseResult<bool> {
        match self.tick()? {
            TickOutcome::Appended(_) => report.appended += 1,
            TickOutcome::Rejected { .. } => report.rejected += 1,
            TickOutcome::Exhausted => {
                report.exhausted = true;
                return Ok(false);
            }
        }
        Ok(true)
    }
}

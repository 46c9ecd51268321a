//! # defiverse-core
//!
//! The seams of the DeFiVerse chain log and the driver that feeds it.
//!
//! This crate provides:
//! - The three core traits (`LogProducer`, `ChainWriter`, `Clock`)
//! - `SystemClock` and `ManualClock`
//! - The `ProducerDriver` that pulls producer events into a writer on a cadence
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::{sync::Arc, time::Duration};
//! use defiverse_core::ProducerDriver;
//!
//! let mut driver = ProducerDriver::new(Box::new(producer), log.clone());
//! let report = driver.run_ticks(5, Duration::from_secs(10))?;
//! ```

pub mod clock;
pub mod driver;
pub mod traits;

pub use clock::{ManualClock, SystemClock};
pub use driver::{DriverReport, ProducerDriver, TickOutcome};

// ── Tests ─────────────────────────────────────────────────────────────────────

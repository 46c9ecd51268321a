//! # defiverse-sim
//!
//! Simulated inputs for the DeFiVerse chain log and dashboard.
//!
//! 1. **Activity**: `RandomProducer` cycles through the seven sample
//!    dashboard actions; `seed_log` pre-populates a log before live
//!    production starts.
//! 2. **Market**: `MockMarketFeed` produces random token quotes and a small
//!    treasury mint/burn model for display.
//!
//! All data is hardcoded or random and fictional. No external calls are made.

pub mod activity;
pub mod market;

pub use activity::{sample_events, seed_log, RandomProducer};
pub use market::{MarketFeed, MockMarketFeed, TokenQuote, TreasuryImpact, TreasuryOp, TreasurySupply};

// ── Tests ─────────────────────────────────────────────────────────────────────

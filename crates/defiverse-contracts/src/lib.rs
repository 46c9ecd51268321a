//! # defiverse-contracts
//!
//! Shared types for the DeFiVerse chain log.
//!
//! Every crate in the workspace imports from here. No chain logic lives in
//! this crate, only data definitions, filter matching, and error types.

pub mod action;
pub mod error;
pub mod export;
pub mod filter;
pub mod options;
pub mod record;

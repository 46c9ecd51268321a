//! Action and disposition vocabularies, plus the event shape producers emit.
//!
//! `ActionType` is the closed set of actions the log accepts. Producers hand
//! the log plain strings, so parsing is where unknown actions get rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DefiverseError;

/// The kind of dashboard action a log record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Transfer,
    Stake,
    Unstake,
    LoanCreate,
    NftMint,
    GovernanceVote,
    TreasuryMint,
}

impl ActionType {
    /// Every accepted action type, in display order.
    pub const ALL: [ActionType; 7] = [
        ActionType::Transfer,
        ActionType::Stake,
        ActionType::Unstake,
        ActionType::LoanCreate,
        ActionType::NftMint,
        ActionType::GovernanceVote,
        ActionType::TreasuryMint,
    ];

    /// The canonical upper-case name, as serialized and fingerprinted.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Transfer => "TRANSFER",
            ActionType::Stake => "STAKE",
            ActionType::Unstake => "UNSTAKE",
            ActionType::LoanCreate => "LOAN_CREATE",
            ActionType::NftMint => "NFT_MINT",
            ActionType::GovernanceVote => "GOVERNANCE_VOTE",
            ActionType::TreasuryMint => "TREASURY_MINT",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = DefiverseError;

    /// Parse a canonical name or one of the dashboard's legacy labels
    /// (`TOKEN_TRANSFER`, `STAKE_TOKENS`, `DAO_VOTE`, ...). Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim().to_ascii_uppercase().as_str() {
            "TRANSFER" | "TOKEN_TRANSFER" => ActionType::Transfer,
            "STAKE" | "STAKE_TOKENS" => ActionType::Stake,
            "UNSTAKE" | "UNSTAKE_TOKENS" => ActionType::Unstake,
            "LOAN_CREATE" | "CREATE_LOAN" => ActionType::LoanCreate,
            "NFT_MINT" | "MINT_NFT" => ActionType::NftMint,
            "GOVERNANCE_VOTE" | "DAO_VOTE" => ActionType::GovernanceVote,
            "TREASURY_MINT" => ActionType::TreasuryMint,
            _ => {
                return Err(DefiverseError::InvalidActionType {
                    value: s.to_string(),
                })
            }
        };
        Ok(action)
    }
}

/// Settlement state of a record.
///
/// Records are created `Confirmed`; the other variants exist so filters and
/// exported documents can express them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    Pending,
    Confirmed,
    Failed,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Pending => "PENDING",
            Disposition::Confirmed => "CONFIRMED",
            Disposition::Failed => "FAILED",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Disposition {
    type Err = DefiverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Disposition::Pending),
            "CONFIRMED" => Ok(Disposition::Confirmed),
            "FAILED" => Ok(Disposition::Failed),
            _ => Err(DefiverseError::ConfigError {
                reason: format!("unknown disposition '{}'", s),
            }),
        }
    }
}

/// One `(action_type, actor, payload)` triple handed over by a producer.
///
/// `action_type` stays a plain string here: producers are untrusted, and the
/// log validates it on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducedEvent {
    /// Action name, e.g. "TRANSFER" or the legacy "TOKEN_TRANSFER".
    pub action_type: String,
    /// Account address or other opaque actor identifier.
    pub actor: String,
    /// Action-specific body. The log never inspects it.
    pub payload: serde_json::Value,
}

impl ProducedEvent {
    pub fn new(
        action_type: impl Into<String>,
        actor: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            action_type: action_type.into(),
            actor: actor.into(),
            payload,
        }
    }
}

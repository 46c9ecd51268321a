//! Simulated dashboard activity.
//!
//! All events in this module are hardcoded and fictional. They stand in for
//! the wallet, staking, lending, NFT, governance and treasury screens that
//! would emit real events in a live deployment.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{debug, warn};

use defiverse_contracts::{
    action::ProducedEvent,
    error::{DefiverseError, DefiverseResult},
};
use defiverse_core::traits::{ChainWriter, LogProducer};

/// The seven sample actions the dashboard cycles through.
///
/// Action names use the dashboard's own labels (`TOKEN_TRANSFER`,
/// `DAO_VOTE`, ...); the log accepts them as aliases of the canonical names.
pub fn sample_events() -> Vec<ProducedEvent> {
    vec![
        ProducedEvent::new(
            "TOKEN_TRANSFER",
            "0x742d35Cc6634C0532925a3b8D4",
            json!({
                "from": "0x742d35Cc6634C0532925a3b8D4",
                "to": "0x123456789abcdef123456789a",
                "amount": 100,
                "token": "BANK"
            }),
        ),
        ProducedEvent::new(
            "STAKE_TOKENS",
            "0x987654321fedcba987654321f",
            json!({ "pool": "ETH_POOL", "amount": 5.2, "apy": 12.5 }),
        ),
        ProducedEvent::new(
            "CREATE_LOAN",
            "0x456789abcdef456789abcdef4",
            json!({
                "collateral": "ETH",
                "amount": 10,
                "borrowed": "USDT",
                "borrowAmount": 20000
            }),
        ),
        ProducedEvent::new(
            "MINT_NFT",
            "0x789abcdef123789abcdef1237",
            json!({ "tokenId": 1001, "name": "DeFi Genesis", "metadata": "ipfs://QmHash123" }),
        ),
        ProducedEvent::new(
            "DAO_VOTE",
            "0xabcdef456789abcdef456789a",
            json!({ "proposalId": 1, "vote": "yes", "weight": 5000 }),
        ),
        ProducedEvent::new(
            "TREASURY_MINT",
            "0x000000000000000000000000",
            json!({ "token": "BANK", "amount": 1000000, "reason": "Liquidity provision" }),
        ),
        ProducedEvent::new(
            "UNSTAKE_TOKENS",
            "0x321fedcba987654321fedcba9",
            json!({ "pool": "BANK_POOL", "amount": 500, "rewards": 12.9 }),
        ),
    ]
}

/// An endless producer that picks a sample action uniformly at random.
pub struct RandomProducer {
    catalog: Vec<ProducedEvent>,
    rng: StdRng,
}

impl RandomProducer {
    /// A producer over `sample_events()` seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(sample_events(), StdRng::from_entropy())
    }

    /// A reproducible producer; the same seed yields the same sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(sample_events(), StdRng::seed_from_u64(seed))
    }

    /// A producer over a custom catalog. An empty catalog is exhausted from
    /// the start.
    pub fn with_catalog(catalog: Vec<ProducedEvent>, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Vec<ProducedEvent>, rng: StdRng) -> Self {
        Self { catalog, rng }
    }
}

impl Default for RandomProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogProducer for RandomProducer {
    fn next_event(&mut self) -> Option<ProducedEvent> {
        if self.catalog.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.catalog.len());
        Some(self.catalog[index].clone())
    }
}

/// Pre-populate `writer` with up to `count` events from `producer`.
///
/// Rejected events are skipped (and not retried); seeding stops early if the
/// producer runs dry. Returns how many records were appended.
pub fn seed_log(
    writer: &dyn ChainWriter,
    producer: &mut dyn LogProducer,
    count: usize,
) -> DefiverseResult<usize> {
    let mut appended = 0;

    for _ in 0..count {
        let Some(event) = producer.next_event() else {
            break;
        };
        match writer.append(&event.action_type, &event.actor, event.payload) {
            Ok(_) => appended += 1,
            Err(e @ (DefiverseError::InvalidActionType { .. } | DefiverseError::EmptyActor)) => {
                warn!(action_type = %event.action_type, error = %e, "seed event rejected");
            }
            Err(e) => return Err(e),
        }
    }

    debug!(requested = count, appended, "log seeded");
    Ok(appended)
}

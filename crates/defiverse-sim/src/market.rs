//! Mock market data for dashboard display.
//!
//! Prices, 24 h changes and treasury figures are random or hardcoded; nothing
//! here is connected to the chain log and none of it carries invariants beyond
//! staying inside its ranges.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A display-data source the dashboard polls.
pub trait MarketFeed {
    /// Fresh quotes for every tracked token.
    fn quotes(&mut self) -> Vec<TokenQuote>;

    /// Current treasury supply figures.
    fn treasury(&self) -> Vec<TreasurySupply>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change_24h_pct: f64,
    pub market_cap: u64,
    pub volume_24h: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasurySupply {
    pub symbol: String,
    pub name: String,
    pub total_supply: f64,
    pub circulating_supply: f64,
    pub max_supply: f64,
    pub inflation_rate: f64,
    pub burn_rate: f64,
    pub minting_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreasuryOp {
    Mint,
    Burn,
}

/// Projected effect of a treasury operation, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreasuryImpact {
    pub supply_change_pct: f64,
    pub inflation_change_pct: f64,
    pub price_impact_pct: f64,
}

/// Quote template: base price, half-width of the price band, and the
/// half-width of the 24 h change band (percent).
struct QuoteTemplate {
    symbol: &'static str,
    name: &'static str,
    base: f64,
    spread: f64,
    change: f64,
    market_cap: u64,
    volume_24h: u64,
}

const QUOTES: [QuoteTemplate; 5] = [
    QuoteTemplate {
        symbol: "BTC",
        name: "Bitcoin",
        base: 45_000.0,
        spread: 1_000.0,
        change: 5.0,
        market_cap: 850_000_000_000,
        volume_24h: 25_000_000_000,
    },
    QuoteTemplate {
        symbol: "ETH",
        name: "Ethereum",
        base: 3_200.0,
        spread: 200.0,
        change: 4.0,
        market_cap: 380_000_000_000,
        volume_24h: 15_000_000_000,
    },
    QuoteTemplate {
        symbol: "USDT",
        name: "Tether",
        base: 1.0,
        spread: 0.005,
        change: 0.25,
        market_cap: 85_000_000_000,
        volume_24h: 45_000_000_000,
    },
    QuoteTemplate {
        symbol: "BANK",
        name: "DeFiVerse Bank Token",
        base: 25.0,
        spread: 2.5,
        change: 7.5,
        market_cap: 2_500_000_000,
        volume_24h: 125_000_000,
    },
    QuoteTemplate {
        symbol: "GOV",
        name: "DeFiVerse Governance",
        base: 15.0,
        spread: 1.5,
        change: 6.0,
        market_cap: 750_000_000,
        volume_24h: 50_000_000,
    },
];

fn initial_treasury() -> Vec<TreasurySupply> {
    let token = |symbol: &str, name: &str, supply: [f64; 3], rates: [f64; 3]| TreasurySupply {
        symbol: symbol.to_string(),
        name: name.to_string(),
        total_supply: supply[0],
        circulating_supply: supply[1],
        max_supply: supply[2],
        inflation_rate: rates[0],
        burn_rate: rates[1],
        minting_rate: rates[2],
    };

    vec![
        token(
            "BANK",
            "DeFiVerse Bank Token",
            [100_000_000.0, 75_000_000.0, 1_000_000_000.0],
            [5.2, 1.8, 3.4],
        ),
        token(
            "GOV",
            "Governance Token",
            [50_000_000.0, 35_000_000.0, 100_000_000.0],
            [3.1, 0.5, 2.6],
        ),
        token(
            "YIELD",
            "Yield Token",
            [25_000_000.0, 20_000_000.0, 50_000_000.0],
            [8.7, 2.3, 6.4],
        ),
    ]
}

/// Random quotes around fixed base prices plus a small treasury model.
pub struct MockMarketFeed {
    rng: StdRng,
    treasury: Vec<TreasurySupply>,
}

impl MockMarketFeed {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            treasury: initial_treasury(),
        }
    }

    /// Apply a mint or burn of `amount` tokens and return its projected impact.
    ///
    /// Returns `None` for an unknown symbol. Supplies and the inflation rate
    /// are clamped at zero.
    pub fn apply_treasury_op(
        &mut self,
        symbol: &str,
        op: TreasuryOp,
        amount: f64,
    ) -> Option<TreasuryImpact> {
        let token = self.treasury.iter_mut().find(|t| t.symbol == symbol)?;

        let supply_change = match op {
            TreasuryOp::Mint => amount,
            TreasuryOp::Burn => -amount,
        };
        let supply_change_pct = if token.total_supply > 0.0 {
            supply_change / token.total_supply * 100.0
        } else {
            0.0
        };
        // Burns move the price harder than mints of the same size.
        let price_impact_pct = match op {
            TreasuryOp::Mint => -supply_change_pct * 0.8,
            TreasuryOp::Burn => -supply_change_pct * 1.2,
        };
        let inflation_change_pct = supply_change_pct * 0.1;

        token.total_supply = (token.total_supply + supply_change).max(0.0);
        token.circulating_supply = (token.circulating_supply + supply_change).max(0.0);
        token.inflation_rate = (token.inflation_rate + inflation_change_pct).max(0.0);

        Some(TreasuryImpact {
            supply_change_pct,
            inflation_change_pct,
            price_impact_pct,
        })
    }
}

impl Default for MockMarketFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketFeed for MockMarketFeed {
    fn quotes(&mut self) -> Vec<TokenQuote> {
        let now = Utc::now();
        QUOTES
            .iter()
            .map(|quote| TokenQuote {
                symbol: quote.symbol.to_string(),
                name: quote.name.to_string(),
                price: quote.base + self.rng.gen_range(-quote.spread..=quote.spread),
                change_24h_pct: self.rng.gen_range(-quote.change..=quote.change),
                market_cap: quote.market_cap,
                volume_24h: quote.volume_24h,
                updated_at: now,
            })
            .collect()
    }

    fn treasury(&self) -> Vec<TreasurySupply> {
        self.treasury.clone()
    }
}

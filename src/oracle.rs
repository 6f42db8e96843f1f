//! Price feeds and the staleness gate.
//!
//! The oracle keeps the latest operator-attested price per asset symbol,
//! latest-value-only: an update overwrites, no history. Every read goes
//! through `fresh_price`, which refuses anything older than `MAX_PRICE_AGE`
//! ticks. A feed that was never written reads the same as one that aged out.

use crate::types::Tick;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A feed this many ticks old (or older) can no longer be read.
pub const MAX_PRICE_AGE: u64 = 3_600;

/// Confidence is an operator attestation on a 1..=100 scale.
pub const MIN_CONFIDENCE: u8 = 1;
pub const MAX_CONFIDENCE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeed {
    pub price: u128,
    pub updated_at: Tick,
    pub confidence: u8,
}

impl PriceFeed {
    pub fn is_stale(&self, now: Tick) -> bool {
        now.elapsed_since(self.updated_at) >= MAX_PRICE_AGE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceOracle {
    feeds: HashMap<String, PriceFeed>,
}

impl PriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any prior feed for the symbol, unconditionally.
    pub fn record(&mut self, symbol: &str, price: u128, confidence: u8, now: Tick) {
        self.feeds.insert(
            symbol.to_string(),
            PriceFeed {
                price,
                updated_at: now,
                confidence,
            },
        );
    }

    /// The raw feed, ignoring staleness. For inspection, not valuation.
    pub fn feed(&self, symbol: &str) -> Option<&PriceFeed> {
        self.feeds.get(symbol)
    }

    /// `None` when the feed is missing or aged out; callers cannot tell which.
    pub fn fresh_price(&self, symbol: &str, now: Tick) -> Option<u128> {
        self.feeds
            .get(symbol)
            .filter(|feed| !feed.is_stale(now))
            .map(|feed| feed.price)
    }
}

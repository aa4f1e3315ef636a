//! Spot price sources for the refresh loop.

use crate::types::MarketSnapshot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Supplies the next spot price on every refresh tick.
///
/// Returning `None` keeps the current spot.
pub trait SpotFeed: Send + Sync {
    fn next_spot(&mut self, snapshot: &MarketSnapshot) -> Option<f64>;

    /// Volume traded since the previous tick, added to the snapshot.
    fn traded_volume(&mut self, _snapshot: &MarketSnapshot) -> u64 {
        0
    }
}

/// Uniform random walk: each tick moves spot by at most ±`jitter_fraction`.
pub struct RandomJitterFeed {
    jitter_fraction: f64,
    rng: StdRng,
}

impl RandomJitterFeed {
    /// `jitter_pct` is in percent (0.1 = ±0.1%).
    pub fn new(jitter_pct: f64) -> Self {
        Self::with_rng(jitter_pct, StdRng::from_entropy())
    }

    pub fn seeded(jitter_pct: f64, seed: u64) -> Self {
        Self::with_rng(jitter_pct, StdRng::seed_from_u64(seed))
    }

    fn with_rng(jitter_pct: f64, rng: StdRng) -> Self {
        let fraction = (jitter_pct / 100.0).abs();
        Self {
            jitter_fraction: if fraction.is_finite() { fraction } else { 0.0 },
            rng,
        }
    }
}

impl SpotFeed for RandomJitterFeed {
    fn next_spot(&mut self, snapshot: &MarketSnapshot) -> Option<f64> {
        let jitter = self
            .rng
            .gen_range(-self.jitter_fraction..=self.jitter_fraction);
        Some(snapshot.spot_price * (1.0 + jitter))
    }

    fn traded_volume(&mut self, snapshot: &MarketSnapshot) -> u64 {
        let lots: u64 = self.rng.gen_range(50..=500);
        lots * snapshot.lot_size as u64
    }
}

/// Fixed prices per symbol, for deterministic runs.
pub struct StaticSpotFeed {
    prices: HashMap<String, f64>,
}

impl StaticSpotFeed {
    pub fn new(prices: HashMap<String, f64>) -> Self {
        Self { prices }
    }
}

impl SpotFeed for StaticSpotFeed {
    fn next_spot(&mut self, snapshot: &MarketSnapshot) -> Option<f64> {
        self.prices.get(&snapshot.symbol).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InstrumentType, SymbolMetadata};

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot::from_metadata(&SymbolMetadata {
            symbol: "NIFTY".to_string(),
            display_name: "NIFTY 50".to_string(),
            instrument_type: InstrumentType::Index,
            sector: None,
            strike_interval: 50.0,
            lot_size: 75,
            reference_price: 25709.85,
            base_volatility: None,
            expiries: vec![],
        })
    }

    #[test]
    fn test_jitter_stays_within_band() {
        let mut feed = RandomJitterFeed::seeded(0.1, 7);
        let snap = snapshot();

        for _ in 0..1000 {
            let next = feed.next_spot(&snap).unwrap();
            let moved = (next - snap.spot_price).abs() / snap.spot_price;
            assert!(moved <= 0.001 + 1e-12, "moved {moved}");
        }
    }

    #[test]
    fn test_seeded_feed_is_deterministic() {
        let snap = snapshot();
        let mut a = RandomJitterFeed::seeded(0.1, 42);
        let mut b = RandomJitterFeed::seeded(0.1, 42);
        for _ in 0..10 {
            assert_eq!(a.next_spot(&snap), b.next_spot(&snap));
        }
    }

    #[test]
    fn test_traded_volume_in_lots() {
        let mut feed = RandomJitterFeed::seeded(0.1, 1);
        let snap = snapshot();
        let volume = feed.traded_volume(&snap);
        assert_eq!(volume % 75, 0);
        assert!(volume >= 50 * 75);
    }

    #[test]
    fn test_non_finite_jitter_keeps_spot() {
        let snap = snapshot();
        for pct in [f64::NAN, f64::INFINITY] {
            let mut feed = RandomJitterFeed::seeded(pct, 1);
            assert_eq!(feed.next_spot(&snap), Some(snap.spot_price));
        }
    }

    #[test]
    fn test_static_feed() {
        let mut prices = HashMap::new();
        prices.insert("NIFTY".to_string(), 25800.0);
        let mut feed = StaticSpotFeed::new(prices);

        assert_eq!(feed.next_spot(&snapshot()), Some(25800.0));
        assert_eq!(feed.traded_volume(&snapshot()), 0);

        let mut other = snapshot();
        other.symbol = "BANKNIFTY".to_string();
        assert_eq!(feed.next_spot(&other), None);
    }
}

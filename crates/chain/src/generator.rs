//! Option grid generation.
//!
//! Every strike in the grid is priced with Black-Scholes against a sampled
//! volatility. Open interest, volume, spreads and the change column are
//! decorative and fall off with distance from the ATM strike.

use crate::grid::{floor_to_tick, round_to_tick, GridStrikeGenerator};
use crate::types::{InstrumentType, OptionLeg, StrikeRow, SymbolMetadata};
use config::{ChainSimConfig, GridVariant};
use pricing::{black_scholes, time_to_expiry_years, Greeks, PRICE_FLOOR};
use rand::Rng;
use tracing::debug;

/// Volatility samples never go below this.
pub const MIN_SAMPLED_VOL: f64 = 0.01;

const INDEX_BASE_OI: f64 = 2_000_000.0;
const STOCK_BASE_OI: f64 = 400_000.0;
const MAX_CHANGE_FRACTION: f64 = 0.15;
const MAX_EXTRA_SPREAD_TICKS: f64 = 4.0;

/// Tunables for grid generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub risk_free_rate: f64,
    pub tick_size: f64,
    pub strikes_each_side: usize,
    pub variant: GridVariant,
    pub smile_coefficient: f64,
    pub volatility_noise: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: config::default_risk_free_rate(),
            tick_size: config::default_tick_size(),
            strikes_each_side: config::default_strikes_each_side(),
            variant: GridVariant::default(),
            smile_coefficient: config::default_smile_coefficient(),
            volatility_noise: config::default_volatility_noise(),
        }
    }
}

impl From<&ChainSimConfig> for GeneratorSettings {
    fn from(config: &ChainSimConfig) -> Self {
        Self {
            risk_free_rate: config.pricing.risk_free_rate,
            tick_size: config.pricing.tick_size,
            strikes_each_side: config.grid.strikes_each_side,
            variant: config.grid.variant,
            smile_coefficient: config.grid.smile_coefficient,
            volatility_noise: config.grid.volatility_noise,
        }
    }
}

/// Output of one generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGrid {
    pub atm_strike: f64,
    /// Ascending by strike
    pub rows: Vec<StrikeRow>,
    /// Volatility sampled at the ATM strike (annualised, not percent)
    pub atm_volatility: f64,
}

impl GeneratedGrid {
    /// IV index to publish on the snapshot, if the variant carries one.
    pub fn iv_index(&self, variant: GridVariant) -> Option<f64> {
        match variant {
            GridVariant::Comprehensive => Some(round2(self.atm_volatility * 100.0)),
            GridVariant::Standard => None,
        }
    }
}

/// Builds strike rows for a symbol at a given spot.
#[derive(Debug, Clone, Default)]
pub struct OptionChainGenerator {
    settings: GeneratorSettings,
}

impl OptionChainGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Base volatility plus a smile term in |ln(K/S)| plus uniform noise.
    pub fn sample_volatility<R: Rng + ?Sized>(
        &self,
        base: f64,
        spot: f64,
        strike: f64,
        rng: &mut R,
    ) -> f64 {
        let moneyness = if spot > 0.0 && strike > 0.0 {
            (strike / spot).ln().abs()
        } else {
            0.0
        };

        let noise_width = self.settings.volatility_noise.abs();
        let noise = if noise_width.is_finite() && noise_width > 0.0 {
            rng.gen_range(-noise_width..=noise_width)
        } else {
            0.0
        };

        (base + self.settings.smile_coefficient * moneyness + noise).max(MIN_SAMPLED_VOL)
    }

    /// Generate the full grid for `metadata` at `spot`.
    ///
    /// `days_to_expiry` is clamped to one day before pricing.
    pub fn generate_rows<R: Rng + ?Sized>(
        &self,
        metadata: &SymbolMetadata,
        spot: f64,
        days_to_expiry: i64,
        rng: &mut R,
    ) -> GeneratedGrid {
        let interval = metadata.strike_interval;
        let atm_strike = GridStrikeGenerator::snap_to_grid(spot, interval);
        let strikes =
            GridStrikeGenerator::strikes_around(spot, interval, self.settings.strikes_each_side);

        let time = time_to_expiry_years(days_to_expiry);
        let base_vol = metadata.base_volatility();
        let base_oi = match metadata.instrument_type {
            InstrumentType::Index => INDEX_BASE_OI,
            InstrumentType::Stock => STOCK_BASE_OI,
        };
        let lot = metadata.lot_size.max(1) as f64;

        let mut atm_volatility = base_vol;
        let mut rows = Vec::with_capacity(strikes.len());

        for strike in strikes {
            let vol = self.sample_volatility(base_vol, spot, strike, rng);
            if (strike - atm_strike).abs() < 1e-9 {
                atm_volatility = vol;
            }

            let priced = black_scholes(spot, strike, time, vol, self.settings.risk_free_rate);
            let weight = GridStrikeGenerator::atm_weight(strike, atm_strike, interval);

            // OTM calls sit above ATM, OTM puts below; OTM carries more OI
            let (call_skew, put_skew) = if strike >= atm_strike {
                (1.2, 0.8)
            } else {
                (0.8, 1.2)
            };

            let call = LegInputs {
                price: priced.call,
                greeks: &priced.call_greeks,
                vol,
                weight,
                open_interest: base_oi * call_skew,
                lot,
            };
            let put = LegInputs {
                price: priced.put,
                greeks: &priced.put_greeks,
                vol,
                weight,
                open_interest: base_oi * put_skew,
                lot,
            };

            rows.push(StrikeRow {
                strike,
                call: self.build_leg(call, rng),
                put: self.build_leg(put, rng),
            });
        }

        debug!(
            symbol = %metadata.symbol,
            spot,
            atm_strike,
            rows = rows.len(),
            "Generated option grid"
        );

        GeneratedGrid {
            atm_strike,
            rows,
            atm_volatility,
        }
    }

    fn build_leg<R: Rng + ?Sized>(&self, input: LegInputs<'_>, rng: &mut R) -> OptionLeg {
        let tick = self.settings.tick_size;
        let last_price = round_to_tick(input.price, tick).max(PRICE_FLOOR);

        let ticks = spread_ticks(input.weight);
        let bid = floor_to_tick(last_price - (ticks / 2.0).floor() * tick, tick).max(0.0);
        let ask = round_to_tick(bid + ticks * tick, tick);

        let raw_oi = input.open_interest * input.weight * rng.gen_range(0.6..1.4);
        let lots = ((raw_oi / input.lot).round() as u64).max(1);
        let open_interest = lots * input.lot as u64;
        let volume = (open_interest as f64 * rng.gen_range(0.05..0.35)).round() as u64;

        let change_fraction = rng.gen_range(-MAX_CHANGE_FRACTION..=MAX_CHANGE_FRACTION);
        let change_from_previous = round_to_tick(last_price * change_fraction, tick);

        let vega = match self.settings.variant {
            GridVariant::Comprehensive => Some(input.greeks.vega),
            GridVariant::Standard => None,
        };

        OptionLeg {
            last_price,
            bid,
            ask,
            change_from_previous,
            implied_volatility: round2(input.vol * 100.0),
            open_interest,
            volume,
            delta: input.greeks.delta,
            gamma: input.greeks.gamma,
            theta: input.greeks.theta,
            vega,
        }
    }
}

/// Quoted spread in ticks: one at the money, widening to five in the wings.
fn spread_ticks(weight: f64) -> f64 {
    1.0 + ((1.0 - weight) * MAX_EXTRA_SPREAD_TICKS).round()
}

struct LegInputs<'a> {
    price: f64,
    greeks: &'a Greeks,
    vol: f64,
    weight: f64,
    open_interest: f64,
    lot: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn nifty() -> SymbolMetadata {
        SymbolMetadata {
            symbol: "NIFTY".to_string(),
            display_name: "NIFTY 50".to_string(),
            instrument_type: InstrumentType::Index,
            sector: None,
            strike_interval: 50.0,
            lot_size: 75,
            reference_price: 25709.85,
            base_volatility: None,
            expiries: vec!["2030-01-31".to_string()],
        }
    }

    #[test]
    fn test_nifty_grid_shape() {
        let generator = OptionChainGenerator::default();
        let mut rng = StdRng::seed_from_u64(42);

        let grid = generator.generate_rows(&nifty(), 25709.85, 7, &mut rng);

        assert_eq!(grid.atm_strike, 25700.0);
        assert_eq!(grid.rows.len(), 21);
        assert_eq!(grid.rows.first().unwrap().strike, 25200.0);
        assert_eq!(grid.rows.last().unwrap().strike, 26200.0);
        for pair in grid.rows.windows(2) {
            assert_eq!(pair[1].strike - pair[0].strike, 50.0);
        }
    }

    #[test]
    fn test_legs_are_well_formed() {
        let generator = OptionChainGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);

        let grid = generator.generate_rows(&nifty(), 25709.85, 7, &mut rng);

        for row in &grid.rows {
            for leg in [&row.call, &row.put] {
                assert!(leg.last_price >= PRICE_FLOOR);
                assert!(leg.bid <= leg.last_price);
                assert!(leg.ask >= leg.last_price);
                assert!(leg.bid >= 0.0);
                assert_eq!(leg.open_interest % 75, 0);
                assert!(leg.open_interest > 0);
                assert!(leg.volume <= leg.open_interest);
                assert!(leg.implied_volatility >= MIN_SAMPLED_VOL * 100.0);
                assert!(leg.vega.is_some());
            }
            assert!((row.call.delta - row.put.delta - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spread_width_in_ticks() {
        let generator = OptionChainGenerator::default();
        let tick = generator.settings().tick_size;
        let mut rng = StdRng::seed_from_u64(42);

        let grid = generator.generate_rows(&nifty(), 25709.85, 7, &mut rng);
        let atm = grid.rows.iter().find(|r| r.strike == 25700.0).unwrap();
        let wing = grid.rows.first().unwrap();

        for leg in [&atm.call, &atm.put] {
            assert!((leg.ask - leg.bid - tick).abs() < 1e-9, "{} / {}", leg.bid, leg.ask);
        }
        for leg in [&wing.call, &wing.put] {
            assert!((leg.ask - leg.bid - 5.0 * tick).abs() < 1e-9, "{} / {}", leg.bid, leg.ask);
            assert!(leg.bid <= leg.last_price && leg.last_price <= leg.ask);
        }

        assert_eq!(spread_ticks(1.0), 1.0);
        assert_eq!(spread_ticks(0.0), 5.0);
    }

    #[test]
    fn test_oi_peaks_near_atm() {
        let generator = OptionChainGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);

        let grid = generator.generate_rows(&nifty(), 25709.85, 7, &mut rng);
        let atm = grid.rows.iter().find(|r| r.strike == 25700.0).unwrap();
        let wing = grid.rows.first().unwrap();

        // Weight at 10 intervals out is exp(-(10/3)^2), far below the noise band
        assert!(atm.call.open_interest > wing.call.open_interest);
        assert!(atm.put.open_interest > wing.put.open_interest);
    }

    #[test]
    fn test_standard_variant_drops_vega_and_iv_index() {
        let settings = GeneratorSettings {
            variant: GridVariant::Standard,
            ..GeneratorSettings::default()
        };
        let generator = OptionChainGenerator::new(settings);
        let mut rng = StdRng::seed_from_u64(11);

        let grid = generator.generate_rows(&nifty(), 25709.85, 7, &mut rng);

        assert!(grid.rows.iter().all(|r| r.call.vega.is_none() && r.put.vega.is_none()));
        assert_eq!(grid.iv_index(GridVariant::Standard), None);
        assert!(grid.iv_index(GridVariant::Comprehensive).is_some());
    }

    #[test]
    fn test_volatility_sample_is_positive() {
        let settings = GeneratorSettings {
            volatility_noise: 1.0,
            smile_coefficient: 0.0,
            ..GeneratorSettings::default()
        };
        let generator = OptionChainGenerator::new(settings);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..500 {
            let vol = generator.sample_volatility(0.05, 100.0, 100.0, &mut rng);
            assert!(vol >= MIN_SAMPLED_VOL);
        }
    }

    #[test]
    fn test_non_finite_noise_is_ignored() {
        let settings = GeneratorSettings {
            volatility_noise: f64::INFINITY,
            smile_coefficient: 0.0,
            ..GeneratorSettings::default()
        };
        let generator = OptionChainGenerator::new(settings);
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(generator.sample_volatility(0.2, 100.0, 100.0, &mut rng), 0.2);
    }

    #[test]
    fn test_volatility_smile_without_noise() {
        let settings = GeneratorSettings {
            volatility_noise: 0.0,
            smile_coefficient: 2.0,
            ..GeneratorSettings::default()
        };
        let generator = OptionChainGenerator::new(settings);
        let mut rng = StdRng::seed_from_u64(5);

        let atm = generator.sample_volatility(0.2, 100.0, 100.0, &mut rng);
        let wing = generator.sample_volatility(0.2, 100.0, 110.0, &mut rng);

        assert!((atm - 0.2).abs() < 1e-12);
        assert!((wing - (0.2 + 2.0 * (1.1f64).ln())).abs() < 1e-12);
    }

    #[test]
    fn test_expired_chain_still_prices() {
        let generator = OptionChainGenerator::default();
        let mut rng = StdRng::seed_from_u64(9);

        let grid = generator.generate_rows(&nifty(), 25709.85, -3, &mut rng);

        assert_eq!(grid.rows.len(), 21);
        assert!(grid.rows.iter().all(|r| r.call.last_price.is_finite()));
    }

    #[test]
    fn test_low_spot_drops_non_positive_strikes() {
        let mut meta = nifty();
        meta.reference_price = 120.0;
        let generator = OptionChainGenerator::default();
        let mut rng = StdRng::seed_from_u64(1);

        let grid = generator.generate_rows(&meta, 120.0, 30, &mut rng);

        // ATM 100, strikes -400..=600 step 50, only 50..=600 survive
        assert_eq!(grid.atm_strike, 100.0);
        assert_eq!(grid.rows.len(), 12);
        assert!(grid.rows.iter().all(|r| r.strike > 0.0));
    }
}

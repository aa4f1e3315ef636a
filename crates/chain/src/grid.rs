//! Strike grid around spot.
//!
//! Strikes sit on a fixed interval (e.g. every 50 points for NIFTY) with a
//! fixed count on each side of the at-the-money strike.

use tracing::debug;

/// Fixed-interval strike generator.
///
/// # Example
///
/// ```ignore
/// // NIFTY at 25,709.85 with a 50-point interval, 10 strikes per side
/// let strikes = GridStrikeGenerator::strikes_around(25709.85, 50.0, 10);
/// // Produces: 25,200, 25,250, ..., 25,700 (ATM), ..., 26,200 (21 strikes)
/// ```
pub struct GridStrikeGenerator;

impl GridStrikeGenerator {
    /// Generate `2 * each_side + 1` strikes centred on the ATM strike.
    ///
    /// Strikes that would be zero or negative are dropped, so very low
    /// spots yield fewer rows. The result is ascending.
    pub fn strikes_around(spot: f64, interval: f64, each_side: usize) -> Vec<f64> {
        if !(interval > 0.0 && spot.is_finite()) {
            return Vec::new();
        }

        let atm_steps = (spot / interval).round() as i64;
        let each_side = each_side as i64;

        // Multiply from integer step counts so strikes land exactly on grid
        let strikes: Vec<f64> = (atm_steps - each_side..=atm_steps + each_side)
            .map(|step| step as f64 * interval)
            .filter(|strike| *strike > 0.0)
            .collect();

        debug!(
            "Generated {} grid strikes around {} (interval={})",
            strikes.len(),
            spot,
            interval
        );

        strikes
    }

    /// Snap a price to the nearest grid point (rounds to nearest).
    pub fn snap_to_grid(price: f64, grid_size: f64) -> f64 {
        if grid_size <= 0.0 {
            return price;
        }
        (price / grid_size).round() * grid_size
    }

    /// Gaussian weight that peaks at 1.0 on the ATM strike.
    ///
    /// `exp(-(distance / (interval * 3))^2)`; used to scale decorative
    /// figures such as open interest.
    pub fn atm_weight(strike: f64, atm: f64, interval: f64) -> f64 {
        if interval <= 0.0 {
            return 0.0;
        }
        let scaled = (strike - atm).abs() / (interval * 3.0);
        (-(scaled * scaled)).exp()
    }
}

/// Round to the nearest multiple of `tick`.
pub fn round_to_tick(value: f64, tick: f64) -> f64 {
    if tick <= 0.0 {
        return value;
    }
    round_cents((value / tick).round() * tick)
}

/// Round down to a multiple of `tick`.
pub fn floor_to_tick(value: f64, tick: f64) -> f64 {
    if tick <= 0.0 {
        return value;
    }
    round_cents((value / tick + 1e-9).floor() * tick)
}

/// Round up to a multiple of `tick`.
pub fn ceil_to_tick(value: f64, tick: f64) -> f64 {
    if tick <= 0.0 {
        return value;
    }
    round_cents((value / tick - 1e-9).ceil() * tick)
}

// Strips the 0.05 * n representation noise (e.g. 0.15000000000000002)
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nifty_grid() {
        let strikes = GridStrikeGenerator::strikes_around(25709.85, 50.0, 10);

        assert_eq!(strikes.len(), 21);
        assert_eq!(strikes[10], 25700.0);
        assert_eq!(strikes[0], 25200.0);
        assert_eq!(strikes[20], 26200.0);

        for pair in strikes.windows(2) {
            assert_eq!(pair[1] - pair[0], 50.0);
        }
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(GridStrikeGenerator::snap_to_grid(25709.85, 50.0), 25700.0);
        assert_eq!(GridStrikeGenerator::snap_to_grid(25725.0, 50.0), 25750.0);
        assert_eq!(GridStrikeGenerator::snap_to_grid(56890.25, 100.0), 56900.0);
        assert_eq!(GridStrikeGenerator::snap_to_grid(123.0, 0.0), 123.0);
    }

    #[test]
    fn test_low_spot_drops_non_positive_strikes() {
        let strikes = GridStrikeGenerator::strikes_around(30.0, 10.0, 5);

        // ATM 30: 0 and below are dropped, leaving 10, 20 below
        assert_eq!(strikes, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
    }

    #[test]
    fn test_invalid_interval_yields_nothing() {
        assert!(GridStrikeGenerator::strikes_around(25709.85, 0.0, 10).is_empty());
        assert!(GridStrikeGenerator::strikes_around(25709.85, -50.0, 10).is_empty());
    }

    #[test]
    fn test_atm_weight() {
        assert_eq!(GridStrikeGenerator::atm_weight(25700.0, 25700.0, 50.0), 1.0);

        let three_away = GridStrikeGenerator::atm_weight(25850.0, 25700.0, 50.0);
        assert!((three_away - (-1.0f64).exp()).abs() < 1e-12);

        let below = GridStrikeGenerator::atm_weight(25550.0, 25700.0, 50.0);
        assert_eq!(three_away, below);
    }

    #[test]
    fn test_tick_rounding() {
        assert_eq!(round_to_tick(12.37, 0.05), 12.35);
        assert_eq!(round_to_tick(12.38, 0.05), 12.4);
        assert_eq!(floor_to_tick(12.39, 0.05), 12.35);
        assert_eq!(ceil_to_tick(12.36, 0.05), 12.4);
        assert_eq!(floor_to_tick(0.15, 0.05), 0.15);
        assert_eq!(ceil_to_tick(0.15, 0.05), 0.15);
    }
}

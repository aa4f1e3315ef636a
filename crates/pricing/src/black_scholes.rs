use crate::normal::{norm_cdf, norm_pdf};
use crate::types::{BSInputs, BsResult, Greeks, OptionType};

/// Risk-free rate applied to every synthetic quote.
pub const RISK_FREE_RATE: f64 = 0.07;
/// Displayed option prices never go below one tick.
pub const PRICE_FLOOR: f64 = 0.05;
pub const DAYS_PER_YEAR: f64 = 365.0;

pub const MIN_TIME: f64 = 1.0 / DAYS_PER_YEAR;
pub const MIN_VOL: f64 = 0.01;
pub const MAX_VOL: f64 = 5.0;

/// Year fraction for a day count, never less than one day.
pub fn time_to_expiry_years(days_to_expiry: i64) -> f64 {
    days_to_expiry.max(1) as f64 / DAYS_PER_YEAR
}

pub fn d1_d2(input: &BSInputs) -> (f64, f64) {
    let s = input.spot;
    let k = input.strike;
    let t = input.time;
    let v = input.vol;
    let r = input.rate;

    let vol_sqrt_t = v * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * v * v) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    (d1, d2)
}

/// Unfloored Black-Scholes value of a single option.
pub fn theoretical_price(mut input: BSInputs) -> f64 {
    input.validate();

    let (d1, d2) = d1_d2(&input);
    let s = input.spot;
    let discounted_k = input.strike * (-input.rate * input.time).exp();

    match input.option_type {
        OptionType::Call => s * norm_cdf(d1) - discounted_k * norm_cdf(d2),
        OptionType::Put => discounted_k * norm_cdf(-d2) - s * norm_cdf(-d1),
    }
}

/// Price a call and a put on the same strike and return both with Greeks.
///
/// Callers pass a positive time (see [`time_to_expiry_years`]) and a
/// positive volatility; inputs are still clamped so the function stays
/// total. Prices are floored at [`PRICE_FLOOR`], theta is per day, vega
/// and rho are per 1% move.
pub fn black_scholes(
    spot: f64,
    strike: f64,
    time_to_expiry_years: f64,
    volatility: f64,
    risk_free_rate: f64,
) -> BsResult {
    let mut input = BSInputs {
        spot,
        strike,
        time: time_to_expiry_years,
        vol: volatility,
        rate: risk_free_rate,
        option_type: OptionType::Call,
    };
    input.validate();

    let (d1, d2) = d1_d2(&input);
    let s = input.spot;
    let k = input.strike;
    let t = input.time;
    let v = input.vol;
    let r = input.rate;

    let sqrt_t = t.sqrt();
    let pdf = norm_pdf(d1);
    let discount = (-r * t).exp();
    let nd1 = norm_cdf(d1);
    let nd2 = norm_cdf(d2);
    let n_minus_d1 = norm_cdf(-d1);
    let n_minus_d2 = norm_cdf(-d2);

    let call = (s * nd1 - k * discount * nd2).max(PRICE_FLOOR);
    let put = (k * discount * n_minus_d2 - s * n_minus_d1).max(PRICE_FLOOR);

    let gamma = pdf / (s * v * sqrt_t);
    let vega = s * pdf * sqrt_t / 100.0;
    let decay = -(s * pdf * v) / (2.0 * sqrt_t);

    let call_greeks = Greeks {
        delta: nd1,
        gamma,
        theta: (decay - r * k * discount * nd2) / DAYS_PER_YEAR,
        vega,
        rho: k * t * discount * nd2 / 100.0,
    };

    let put_greeks = Greeks {
        delta: nd1 - 1.0,
        gamma,
        theta: (decay + r * k * discount * n_minus_d2) / DAYS_PER_YEAR,
        vega,
        rho: -k * t * discount * n_minus_d2 / 100.0,
    };

    BsResult {
        call,
        put,
        call_greeks,
        put_greeks,
    }
}

pub fn intrinsic_value(spot: f64, strike: f64, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Newton-Raphson implied volatility against the unfloored price.
pub fn implied_volatility(market_price: f64, mut input: BSInputs) -> Option<f64> {
    let mut vol = 0.3;

    for _ in 0..100 {
        input.vol = vol;

        let price = theoretical_price(input);
        let result = black_scholes(input.spot, input.strike, input.time, vol, input.rate);
        // Back to raw units for the Newton step
        let vega = result.greeks(input.option_type).vega * 100.0;

        if (price - market_price).abs() < 1e-6 {
            return Some(vol);
        }

        if vega.abs() < 1e-8 {
            break;
        }

        vol -= (price - market_price) / vega;
        vol = vol.clamp(MIN_VOL, MAX_VOL);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIFTY_SPOT: f64 = 25709.85;

    fn weekly() -> f64 {
        time_to_expiry_years(7)
    }

    #[test]
    fn test_prices_never_below_floor() {
        for strike in [100.0, 10000.0, 25000.0, 25700.0, 26500.0, 60000.0] {
            for days in [0, 1, 7, 30, 365] {
                for vol in [0.01, 0.12, 0.5, 2.0] {
                    let t = time_to_expiry_years(days);
                    let r = black_scholes(NIFTY_SPOT, strike, t, vol, RISK_FREE_RATE);
                    assert!(r.call >= PRICE_FLOOR, "call {} at K={strike}", r.call);
                    assert!(r.put >= PRICE_FLOOR, "put {} at K={strike}", r.put);
                }
            }
        }
    }

    #[test]
    fn test_deep_otm_floored() {
        let r = black_scholes(NIFTY_SPOT, 40000.0, weekly(), 0.12, RISK_FREE_RATE);
        assert_eq!(r.call, PRICE_FLOOR);

        let r = black_scholes(NIFTY_SPOT, 10000.0, weekly(), 0.12, RISK_FREE_RATE);
        assert_eq!(r.put, PRICE_FLOOR);
    }

    #[test]
    fn test_put_call_parity() {
        let t = time_to_expiry_years(30);
        for strike in [25000.0, 25500.0, 25700.0, 26000.0] {
            let r = black_scholes(NIFTY_SPOT, strike, t, 0.15, RISK_FREE_RATE);
            assert!(r.call > PRICE_FLOOR && r.put > PRICE_FLOOR);

            let lhs = r.call - r.put;
            let rhs = NIFTY_SPOT - strike * (-RISK_FREE_RATE * t).exp();
            assert!((lhs - rhs).abs() < 0.05, "parity off by {}", lhs - rhs);
        }
    }

    #[test]
    fn test_delta_identity() {
        for strike in [20000.0, 25700.0, 30000.0] {
            for vol in [0.05, 0.2, 0.9] {
                let r = black_scholes(NIFTY_SPOT, strike, weekly(), vol, RISK_FREE_RATE);
                let diff = r.call_greeks.delta - r.put_greeks.delta;
                assert!((diff - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_gamma_and_vega_shared() {
        let r = black_scholes(NIFTY_SPOT, 25700.0, weekly(), 0.13, RISK_FREE_RATE);
        assert_eq!(r.call_greeks.gamma, r.put_greeks.gamma);
        assert_eq!(r.call_greeks.vega, r.put_greeks.vega);
        assert!(r.call_greeks.gamma > 0.0);
        assert!(r.call_greeks.vega > 0.0);
    }

    #[test]
    fn test_atm_delta_near_half() {
        let r = black_scholes(NIFTY_SPOT, 25700.0, weekly(), 0.13, RISK_FREE_RATE);
        assert!(r.call_greeks.delta > 0.45 && r.call_greeks.delta < 0.65);
        assert!(r.put_greeks.delta < 0.0);
    }

    #[test]
    fn test_theta_is_daily_decay() {
        let t = time_to_expiry_years(30);
        let r = black_scholes(NIFTY_SPOT, 25700.0, t, 0.15, RISK_FREE_RATE);
        assert!(r.call_greeks.theta < 0.0);

        // One day of decay should roughly match the price drop over a day
        let tomorrow = black_scholes(
            NIFTY_SPOT,
            25700.0,
            time_to_expiry_years(29),
            0.15,
            RISK_FREE_RATE,
        );
        let drop = tomorrow.call - r.call;
        let theta = r.call_greeks.theta;
        assert!((drop - theta).abs() < 0.5, "drop {drop}, theta {theta}");
    }

    #[test]
    fn test_vega_per_vol_point() {
        let t = time_to_expiry_years(30);
        let base = black_scholes(NIFTY_SPOT, 25700.0, t, 0.15, RISK_FREE_RATE);
        let bumped = black_scholes(NIFTY_SPOT, 25700.0, t, 0.16, RISK_FREE_RATE);
        let move_per_point = bumped.call - base.call;
        assert!((move_per_point - base.call_greeks.vega).abs() < 0.2);
    }

    #[test]
    fn test_zero_days_clamped_to_one() {
        assert_eq!(time_to_expiry_years(0), time_to_expiry_years(1));
        assert_eq!(time_to_expiry_years(-4), 1.0 / 365.0);
        assert_eq!(time_to_expiry_years(73), 0.2);

        let r = black_scholes(NIFTY_SPOT, 25700.0, time_to_expiry_years(0), 0.15, RISK_FREE_RATE);
        assert!(r.call.is_finite() && r.put.is_finite());
        assert!(r.call_greeks.gamma.is_finite());
    }

    #[test]
    fn test_theoretical_matches_unfloored_result() {
        let input = BSInputs {
            spot: NIFTY_SPOT,
            strike: 25500.0,
            time: weekly(),
            vol: 0.14,
            rate: RISK_FREE_RATE,
            option_type: OptionType::Call,
        };
        let r = black_scholes(input.spot, input.strike, input.time, input.vol, input.rate);
        assert!((theoretical_price(input) - r.call).abs() < 1e-9);
    }

    #[test]
    fn test_implied_vol_roundtrip() {
        let input = BSInputs {
            spot: NIFTY_SPOT,
            strike: 25800.0,
            time: time_to_expiry_years(21),
            vol: 0.18,
            rate: RISK_FREE_RATE,
            option_type: OptionType::Put,
        };

        let price = theoretical_price(input);
        let recovered = implied_volatility(price, input).unwrap();
        assert!((recovered - 0.18).abs() < 1e-3);
    }

    #[test]
    fn test_intrinsic_value() {
        assert!((intrinsic_value(26000.0, 25700.0, OptionType::Call) - 300.0).abs() < 1e-9);
        assert_eq!(intrinsic_value(25000.0, 25700.0, OptionType::Call), 0.0);
        assert!((intrinsic_value(25000.0, 25700.0, OptionType::Put) - 700.0).abs() < 1e-9);
        assert_eq!(intrinsic_value(26000.0, 25700.0, OptionType::Put), 0.0);
    }

    #[test]
    fn test_deep_itm_call_above_intrinsic() {
        let r = black_scholes(NIFTY_SPOT, 20000.0, weekly(), 0.15, RISK_FREE_RATE);
        let intrinsic = intrinsic_value(NIFTY_SPOT, 20000.0, OptionType::Call);
        assert!(r.call >= intrinsic);
    }
}

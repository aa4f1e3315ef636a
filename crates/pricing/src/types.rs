//! Shared types for option pricing

use crate::error::PricingError;
use serde::{Deserialize, Serialize};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Exchange-style suffix ("CE" / "PE")
    pub fn suffix(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

/// Inputs for Black-Scholes pricing of a single option
#[derive(Debug, Clone, Copy)]
pub struct BSInputs {
    /// Spot price of the underlying
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Time to expiry (in years)
    pub time: f64,
    /// Volatility (as decimal, e.g., 0.15 = 15%)
    pub vol: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Option type
    pub option_type: OptionType,
}

impl BSInputs {
    /// Build inputs, rejecting values the closed form cannot handle.
    pub fn new(
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        rate: f64,
        option_type: OptionType,
    ) -> crate::Result<Self> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(PricingError::InvalidSpot(spot));
        }
        if !(strike.is_finite() && strike > 0.0) {
            return Err(PricingError::InvalidStrike(strike));
        }
        if !(time.is_finite() && time > 0.0) {
            return Err(PricingError::InvalidTime(time));
        }
        if !(vol.is_finite() && vol > 0.0) {
            return Err(PricingError::InvalidVolatility(vol));
        }

        Ok(Self {
            spot,
            strike,
            time,
            vol,
            rate,
            option_type,
        })
    }

    /// Clamp inputs to safe ranges
    pub fn validate(&mut self) {
        self.time = self.time.max(crate::black_scholes::MIN_TIME);
        self.vol = self
            .vol
            .clamp(crate::black_scholes::MIN_VOL, crate::black_scholes::MAX_VOL);
        self.spot = self.spot.max(1e-6);
        self.strike = self.strike.max(1e-6);
    }
}

/// Option Greeks in display units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: ∂V/∂S
    pub delta: f64,
    /// Gamma: ∂²V/∂S² (same for call and put)
    pub gamma: f64,
    /// Theta: ∂V/∂t, per calendar day
    pub theta: f64,
    /// Vega: ∂V/∂σ, per 1% volatility move
    pub vega: f64,
    /// Rho: ∂V/∂r, per 1% rate move
    pub rho: f64,
}

/// Call and put prices plus Greeks for one strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BsResult {
    /// Call price, floored at the display minimum
    pub call: f64,
    /// Put price, floored at the display minimum
    pub put: f64,
    pub call_greeks: Greeks,
    pub put_greeks: Greeks,
}

impl BsResult {
    pub fn price(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }

    pub fn greeks(&self, option_type: OptionType) -> &Greeks {
        match option_type {
            OptionType::Call => &self.call_greeks,
            OptionType::Put => &self.put_greeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_constructor() {
        assert!(BSInputs::new(100.0, 100.0, 0.1, 0.2, 0.07, OptionType::Call).is_ok());
        assert_eq!(
            BSInputs::new(0.0, 100.0, 0.1, 0.2, 0.07, OptionType::Call).unwrap_err(),
            PricingError::InvalidSpot(0.0)
        );
        assert_eq!(
            BSInputs::new(100.0, -5.0, 0.1, 0.2, 0.07, OptionType::Put).unwrap_err(),
            PricingError::InvalidStrike(-5.0)
        );
        assert!(matches!(
            BSInputs::new(100.0, 100.0, 0.1, f64::NAN, 0.07, OptionType::Put),
            Err(PricingError::InvalidVolatility(_))
        ));
        assert_eq!(
            BSInputs::new(100.0, 100.0, 0.0, 0.2, 0.07, OptionType::Put).unwrap_err(),
            PricingError::InvalidTime(0.0)
        );
    }

    #[test]
    fn test_validate_clamps() {
        let mut input = BSInputs {
            spot: 100.0,
            strike: 100.0,
            time: 0.0,
            vol: 50.0,
            rate: 0.07,
            option_type: OptionType::Call,
        };
        input.validate();

        assert!(input.time > 0.0);
        assert_eq!(input.vol, crate::black_scholes::MAX_VOL);
    }

    #[test]
    fn test_suffix() {
        assert_eq!(OptionType::Call.suffix(), "CE");
        assert_eq!(OptionType::Put.suffix(), "PE");
    }
}

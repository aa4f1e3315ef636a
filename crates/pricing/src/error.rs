//! Pricing error types

use thiserror::Error;

/// Errors raised when pricing inputs are rejected up front.
///
/// The pricer itself never fails; these come from the checked
/// constructors used by callers that take inputs from outside.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Spot must be strictly positive
    #[error("Invalid spot price: {0}")]
    InvalidSpot(f64),

    /// Strike must be strictly positive
    #[error("Invalid strike price: {0}")]
    InvalidStrike(f64),

    /// Volatility must be strictly positive and finite
    #[error("Invalid volatility: {0}")]
    InvalidVolatility(f64),

    /// Time to expiry must be strictly positive
    #[error("Invalid time to expiry: {0}")]
    InvalidTime(f64),
}

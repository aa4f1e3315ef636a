//! Option Pricing for ChainSim
//!
//! This crate provides the closed-form pricing used to fill a synthetic
//! option chain.
//!
//! # Core Components
//!
//! - [`normal`] - Error function and standard normal CDF/PDF approximations
//! - [`black_scholes`] - Black-Scholes-Merton call/put pricing with Greeks
//! - [`types`] - Shared pricing inputs and outputs
//!
//! # Key Invariants
//!
//! - Pricing is pure: no clocks, no randomness, no I/O
//! - Displayed call and put prices never fall below [`PRICE_FLOOR`]
//! - Put delta is always call delta minus one
//! - Time to expiry is clamped to at least one day before pricing

pub mod black_scholes;
pub mod error;
pub mod normal;
pub mod types;

pub use black_scholes::{
    black_scholes, implied_volatility, intrinsic_value, theoretical_price,
    time_to_expiry_years, DAYS_PER_YEAR, PRICE_FLOOR, RISK_FREE_RATE,
};
pub use error::PricingError;
pub use normal::{erf, norm_cdf, norm_pdf};
pub use types::{BSInputs, BsResult, Greeks, OptionType};

pub type Result<T> = std::result::Result<T, PricingError>;

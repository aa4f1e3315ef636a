//! Error types for the chain crate.

use thiserror::Error;

/// Result type alias for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors that can occur while building or refreshing a chain.
///
/// Selecting an unknown symbol is not an error; see
/// [`SelectOutcome`](crate::service::SelectOutcome).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// Symbol is not in the lookup table.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Expiry string could not be parsed.
    #[error("Invalid expiry date '{expiry}' for {symbol}. Expected format: YYYY-MM-DD")]
    InvalidExpiry { symbol: String, expiry: String },

    /// Symbol has no expiries to price against.
    #[error("No expiries available for {0}")]
    NoExpiries(String),

    /// Configuration failed validation.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Refresh task ended abnormally.
    #[error("Refresh worker failed: {0}")]
    WorkerFailed(String),
}

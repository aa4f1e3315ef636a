//! # Chain Crate
//!
//! Synthetic option chains for ChainSim: a static symbol table, a strike
//! grid around spot priced with Black-Scholes, and a refresh loop that
//! jitters spot on a timer and regenerates the grid.
//!
//! ## Key Components
//!
//! - **Domain Types**: `SymbolMetadata`, `MarketSnapshot`, `StrikeRow`, `OptionChain`
//! - **Generation**: `GridStrikeGenerator` for strikes, `OptionChainGenerator` for rows
//! - **Calendar**: `ExpiryGenerator` for weekly and monthly expiries
//! - **State**: `ChainService` holds the selection, snapshot and current chain
//! - **Timer**: `ChainWorker` ticks the service and publishes on a `watch` channel
//!
//! ```text
//! ┌──────────────┐   tick()    ┌──────────────┐  generate_rows  ┌──────────────────────┐
//! │ ChainWorker  │ ──────────► │ ChainService │ ──────────────► │ OptionChainGenerator │
//! │ (interval)   │ ◄────────── │  SpotFeed    │ ◄────────────── │  pricing::black_...  │
//! └──────────────┘ OptionChain └──────────────┘   StrikeRows    └──────────────────────┘
//!        │
//!        ▼ watch::Receiver<Option<Arc<OptionChain>>>
//! ```

pub mod analytics;
pub mod error;
pub mod expiry;
pub mod feed;
pub mod generator;
pub mod grid;
pub mod service;
pub mod symbols;
pub mod types;
pub mod worker;

pub use analytics::{max_pain, put_call_ratio, summarize};
pub use error::{ChainError, ChainResult};
pub use expiry::{days_to_expiry, ExpiryGenerator, EXPIRY_FORMAT};
pub use feed::{RandomJitterFeed, SpotFeed, StaticSpotFeed};
pub use generator::{GeneratedGrid, GeneratorSettings, OptionChainGenerator};
pub use grid::GridStrikeGenerator;
pub use service::{ChainService, SelectOutcome};
pub use symbols::SymbolTable;
pub use types::{
    ChainSummary, InstrumentType, MarketSnapshot, OptionChain, OptionLeg, StrikeRow,
    SymbolMetadata,
};
pub use worker::{ChainUpdate, ChainWorker, WorkerHandle};

// Variant lives in config so the YAML layer can name it
pub use config::GridVariant;

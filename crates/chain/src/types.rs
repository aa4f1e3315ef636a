//! Domain types for the synthetic option chain.

use chrono::{DateTime, Utc};
use config::{GridVariant, InstrumentKind, SymbolConfig};
use serde::{Deserialize, Serialize};

/// Kind of underlying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentType {
    Index,
    Stock,
}

impl From<InstrumentKind> for InstrumentType {
    fn from(kind: InstrumentKind) -> Self {
        match kind {
            InstrumentKind::Index => InstrumentType::Index,
            InstrumentKind::Stock => InstrumentType::Stock,
        }
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentType::Index => write!(f, "index"),
            InstrumentType::Stock => write!(f, "stock"),
        }
    }
}

/// Static reference data for one underlying. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMetadata {
    pub symbol: String,
    pub display_name: String,
    pub instrument_type: InstrumentType,
    pub sector: Option<String>,
    pub strike_interval: f64,
    pub lot_size: u32,
    /// Spot used to seed a fresh snapshot
    pub reference_price: f64,
    /// Explicit volatility, bypassing the sector heuristic
    pub base_volatility: Option<f64>,
    /// Expiry dates, YYYY-MM-DD, nearest first
    pub expiries: Vec<String>,
}

impl SymbolMetadata {
    /// Build from config, keeping the configured expiry list as-is.
    pub fn from_config(config: &SymbolConfig) -> Self {
        Self {
            symbol: config.symbol.clone(),
            display_name: config.display_name.clone(),
            instrument_type: config.instrument_type.into(),
            sector: config.sector.clone(),
            strike_interval: config.strike_interval,
            lot_size: config.lot_size,
            reference_price: config.reference_price,
            base_volatility: config.base_volatility,
            expiries: config.expiries.clone(),
        }
    }

    /// Annualised volatility the chain is centred on.
    ///
    /// Indices are calmer than single stocks; bank indices sit between
    /// the two. Stocks are keyed by sector.
    pub fn base_volatility(&self) -> f64 {
        if let Some(vol) = self.base_volatility {
            return vol;
        }

        match self.instrument_type {
            InstrumentType::Index if self.symbol.contains("BANK") => 0.16,
            InstrumentType::Index => 0.13,
            InstrumentType::Stock => {
                let sector = self.sector.as_deref().map(str::to_lowercase);
                match sector.as_deref() {
                    Some("it") => 0.24,
                    Some("fmcg") => 0.20,
                    Some("banking") | Some("financial services") => 0.26,
                    Some("energy") => 0.28,
                    Some("pharma") | Some("auto") | Some("metals") => 0.31,
                    _ => 0.30,
                }
            }
        }
    }
}

/// Live view of the underlying. Mutated on every refresh tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub spot_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub implied_volatility_index: Option<f64>,
    pub lot_size: u32,
    pub strike_interval: f64,
    pub updated_at: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Fresh snapshot at the symbol's reference price.
    pub fn from_metadata(metadata: &SymbolMetadata) -> Self {
        let spot = metadata.reference_price;
        Self {
            symbol: metadata.symbol.clone(),
            spot_price: spot,
            previous_close: spot,
            change: 0.0,
            change_percent: 0.0,
            high: spot,
            low: spot,
            volume: 0,
            implied_volatility_index: None,
            lot_size: metadata.lot_size,
            strike_interval: metadata.strike_interval,
            updated_at: Utc::now(),
        }
    }

    /// Move spot and recompute the derived fields.
    pub fn apply_spot(&mut self, spot: f64, traded_volume: u64) {
        self.spot_price = round2(spot);
        self.change = round2(self.spot_price - self.previous_close);
        self.change_percent = if self.previous_close > 0.0 {
            round2(self.change / self.previous_close * 100.0)
        } else {
            0.0
        };
        self.high = self.high.max(self.spot_price);
        self.low = self.low.min(self.spot_price);
        self.volume = self.volume.saturating_add(traded_volume);
        self.updated_at = Utc::now();
    }
}

/// One side (call or put) of a strike row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    pub last_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub change_from_previous: f64,
    /// Percent, e.g. 13.25
    pub implied_volatility: f64,
    pub open_interest: u64,
    pub volume: u64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vega: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeRow {
    pub strike: f64,
    pub call: OptionLeg,
    pub put: OptionLeg,
}

/// A fully generated chain for one symbol and expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub symbol: String,
    pub expiry: String,
    pub days_to_expiry: i64,
    pub variant: GridVariant,
    pub snapshot: MarketSnapshot,
    /// Ascending by strike
    pub rows: Vec<StrikeRow>,
    pub atm_strike: f64,
    pub generated_at: DateTime<Utc>,
    pub sequence: u64,
}

impl OptionChain {
    pub fn row(&self, strike: f64) -> Option<&StrikeRow> {
        self.rows.iter().find(|r| (r.strike - strike).abs() < 1e-9)
    }

    pub fn summary(&self) -> ChainSummary {
        crate::analytics::summarize(&self.rows)
    }
}

/// Aggregate figures across a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub total_call_oi: u64,
    pub total_put_oi: u64,
    pub total_call_volume: u64,
    pub total_put_volume: u64,
    pub pcr: Option<f64>,
    pub max_pain: Option<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Root configuration for ChainSim.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainSimConfig {
    /// Symbol selected when the chain starts
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Static symbol table. Falls back to the built-in table when omitted.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<SymbolConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Premium tick used to round displayed prices
    #[serde(default = "default_tick_size")]
    pub tick_size: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            tick_size: default_tick_size(),
        }
    }
}

/// Which set of columns a generated chain carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridVariant {
    /// Vega on every leg and an IV index on the snapshot
    #[default]
    Comprehensive,
    /// Price, OI, volume, delta/gamma/theta only
    Standard,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GridConfig {
    /// Strikes generated on each side of ATM (total = 2n + 1)
    #[serde(default = "default_strikes_each_side")]
    pub strikes_each_side: usize,
    #[serde(default)]
    pub variant: GridVariant,
    /// Volatility added per unit of |ln(K/S)|
    #[serde(default = "default_smile_coefficient")]
    pub smile_coefficient: f64,
    /// Half-width of the uniform noise added to each volatility sample
    #[serde(default = "default_volatility_noise")]
    pub volatility_noise: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            strikes_each_side: default_strikes_each_side(),
            variant: GridVariant::default(),
            smile_coefficient: default_smile_coefficient(),
            volatility_noise: default_volatility_noise(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshConfig {
    /// Interval between refresh ticks in milliseconds
    #[serde(default = "default_refresh_interval_ms")]
    pub interval_ms: u64,
    /// Maximum spot move per tick, in percent (0.1 = ±0.1%)
    #[serde(default = "default_jitter_pct")]
    pub jitter_pct: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_refresh_interval_ms(),
            jitter_pct: default_jitter_pct(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Index,
    Stock,
}

/// One row of the static symbol lookup table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SymbolConfig {
    pub symbol: String,
    pub display_name: String,
    pub instrument_type: InstrumentKind,
    #[serde(default)]
    pub sector: Option<String>,
    pub strike_interval: f64,
    pub lot_size: u32,
    /// Spot a freshly selected symbol is seeded with
    pub reference_price: f64,
    /// Overrides the sector heuristic when set
    #[serde(default)]
    pub base_volatility: Option<f64>,
    /// Expiry dates (YYYY-MM-DD). Generated from the calendar when empty.
    #[serde(default)]
    pub expiries: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl ChainSimConfig {
    /// Look up a symbol in the table (exact match).
    pub fn symbol(&self, symbol: &str) -> Option<&SymbolConfig> {
        self.symbols.iter().find(|s| s.symbol == symbol)
    }
}

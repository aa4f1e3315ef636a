use super::{InstrumentKind, SymbolConfig};

pub fn default_symbol() -> String {
    "NIFTY".to_string()
}

pub fn default_risk_free_rate() -> f64 {
    0.07
}

pub fn default_tick_size() -> f64 {
    0.05
}

pub fn default_strikes_each_side() -> usize {
    10
}

pub fn default_smile_coefficient() -> f64 {
    2.0
}

pub fn default_volatility_noise() -> f64 {
    0.01
}

pub fn default_refresh_interval_ms() -> u64 {
    3000
}

pub fn default_jitter_pct() -> f64 {
    0.1
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}

fn index(
    symbol: &str,
    display_name: &str,
    strike_interval: f64,
    lot_size: u32,
    reference_price: f64,
) -> SymbolConfig {
    SymbolConfig {
        symbol: symbol.to_string(),
        display_name: display_name.to_string(),
        instrument_type: InstrumentKind::Index,
        sector: None,
        strike_interval,
        lot_size,
        reference_price,
        base_volatility: None,
        expiries: Vec::new(),
    }
}

fn stock(
    symbol: &str,
    display_name: &str,
    sector: &str,
    strike_interval: f64,
    lot_size: u32,
    reference_price: f64,
) -> SymbolConfig {
    SymbolConfig {
        symbol: symbol.to_string(),
        display_name: display_name.to_string(),
        instrument_type: InstrumentKind::Stock,
        sector: Some(sector.to_string()),
        strike_interval,
        lot_size,
        reference_price,
        base_volatility: None,
        expiries: Vec::new(),
    }
}

/// Built-in symbol table used when the config omits `symbols`.
pub fn default_symbols() -> Vec<SymbolConfig> {
    vec![
        index("NIFTY", "NIFTY 50", 50.0, 75, 25709.85),
        index("BANKNIFTY", "NIFTY BANK", 100.0, 35, 56890.25),
        index("FINNIFTY", "NIFTY FIN SERVICE", 50.0, 65, 26985.60),
        stock("RELIANCE", "Reliance Industries", "Energy", 10.0, 500, 1418.70),
        stock("TCS", "Tata Consultancy Services", "IT", 20.0, 175, 3052.40),
        stock("HDFCBANK", "HDFC Bank", "Banking", 10.0, 550, 1998.30),
        stock("INFY", "Infosys", "IT", 20.0, 400, 1521.75),
    ]
}

use crate::*;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("No symbols defined")]
    NoSymbols,

    #[error("Symbol {symbol}: {message}")]
    InvalidSymbol { symbol: String, message: String },

    #[error("Duplicate symbol '{0}' in symbol table")]
    DuplicateSymbol(String),

    #[error("Symbol {symbol}: invalid expiry '{expiry}'. Must be in format YYYY-MM-DD")]
    InvalidExpiry { symbol: String, expiry: String },

    #[error("Default symbol '{0}' is not in the symbol table")]
    UnknownDefaultSymbol(String),

    #[error("refresh.interval_ms must be a positive integer")]
    InvalidRefreshInterval,

    #[error("refresh.jitter_pct must be between 0 and 100, got: {0}")]
    InvalidJitter(f64),

    #[error("grid.strikes_each_side must be a positive integer")]
    InvalidStrikesEachSide,

    #[error("{field} must be a non-negative float, got: {value}")]
    InvalidNonNegative { field: String, value: f64 },

    #[error("pricing.tick_size must be positive, got: {0}")]
    InvalidTickSize(f64),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("metrics.port must be non-zero when metrics are enabled")]
    InvalidMetricsPort,

    #[error("{field} contains an unset environment variable placeholder")]
    UnresolvedEnvVar { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

pub fn validate_config(config: &ChainSimConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_pricing(&config.pricing, &mut report);
    validate_grid(&config.grid, &mut report);
    validate_refresh(&config.refresh, &mut report);
    validate_symbols(config, &mut report);
    validate_ambient(config, &mut report);

    report
}

fn validate_pricing(pricing: &PricingConfig, report: &mut ValidationReport) {
    if !(pricing.risk_free_rate.is_finite() && pricing.risk_free_rate >= 0.0) {
        report.add_error(ValidationError::InvalidNonNegative {
            field: "pricing.risk_free_rate".to_string(),
            value: pricing.risk_free_rate,
        });
    }

    if !(pricing.tick_size.is_finite() && pricing.tick_size > 0.0) {
        report.add_error(ValidationError::InvalidTickSize(pricing.tick_size));
    }
}

fn validate_grid(grid: &GridConfig, report: &mut ValidationReport) {
    if grid.strikes_each_side == 0 {
        report.add_error(ValidationError::InvalidStrikesEachSide);
    } else if grid.strikes_each_side > 100 {
        report.add_warning(
            "grid.strikes_each_side",
            "More than 100 strikes per side makes the chain hard to read",
        );
    }

    for (field, value) in [
        ("grid.smile_coefficient", grid.smile_coefficient),
        ("grid.volatility_noise", grid.volatility_noise),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            report.add_error(ValidationError::InvalidNonNegative {
                field: field.to_string(),
                value,
            });
        }
    }
}

fn validate_refresh(refresh: &RefreshConfig, report: &mut ValidationReport) {
    if refresh.interval_ms == 0 {
        report.add_error(ValidationError::InvalidRefreshInterval);
    } else if refresh.interval_ms < 250 {
        report.add_warning(
            "refresh.interval_ms",
            "Refreshing faster than every 250ms regenerates the whole grid very often",
        );
    }

    if !(refresh.jitter_pct.is_finite() && (0.0..100.0).contains(&refresh.jitter_pct)) {
        report.add_error(ValidationError::InvalidJitter(refresh.jitter_pct));
    } else if refresh.jitter_pct > 5.0 {
        report.add_warning("refresh.jitter_pct", "Spot jitter above 5% per tick is unrealistic");
    }
}

fn validate_symbols(config: &ChainSimConfig, report: &mut ValidationReport) {
    if config.symbols.is_empty() {
        report.add_error(ValidationError::NoSymbols);
        return;
    }

    let today = Utc::now().date_naive();
    let mut seen = HashSet::new();

    for symbol in &config.symbols {
        if !seen.insert(symbol.symbol.as_str()) {
            report.add_error(ValidationError::DuplicateSymbol(symbol.symbol.clone()));
        }
        validate_symbol(symbol, today, report);
    }

    check_resolved("default_symbol", &config.default_symbol, report);
    if config.symbol(&config.default_symbol).is_none() {
        report.add_error(ValidationError::UnknownDefaultSymbol(
            config.default_symbol.clone(),
        ));
    }
}

fn validate_symbol(symbol: &SymbolConfig, today: NaiveDate, report: &mut ValidationReport) {
    let invalid = |message: String| ValidationError::InvalidSymbol {
        symbol: if symbol.symbol.is_empty() {
            "unknown".to_string()
        } else {
            symbol.symbol.clone()
        },
        message,
    };

    if symbol.symbol.is_empty() {
        report.add_error(invalid("Symbol is required".to_string()));
    }

    let prefix = format!("symbols.{}", symbol.symbol);
    check_resolved(&format!("{}.symbol", prefix), &symbol.symbol, report);
    check_resolved(&format!("{}.display_name", prefix), &symbol.display_name, report);
    if let Some(sector) = &symbol.sector {
        check_resolved(&format!("{}.sector", prefix), sector, report);
    }

    if symbol.display_name.is_empty() {
        report.add_error(invalid("display_name is required".to_string()));
    }

    if !(symbol.strike_interval.is_finite() && symbol.strike_interval > 0.0) {
        report.add_error(invalid(format!(
            "strike_interval must be positive, got: {}",
            symbol.strike_interval
        )));
    }

    if symbol.lot_size == 0 {
        report.add_error(invalid("lot_size must be a positive integer".to_string()));
    }

    if !(symbol.reference_price.is_finite() && symbol.reference_price > 0.0) {
        report.add_error(invalid(format!(
            "reference_price must be positive, got: {}",
            symbol.reference_price
        )));
    }

    if let Some(vol) = symbol.base_volatility {
        if !(vol.is_finite() && vol > 0.0) {
            report.add_error(invalid(format!("base_volatility must be positive, got: {}", vol)));
        }
    }

    if symbol.instrument_type == InstrumentKind::Stock && symbol.sector.is_none() {
        report.add_default(
            &format!("symbols.{}.sector", symbol.symbol),
            "generic stock volatility",
        );
    }

    if symbol.expiries.is_empty() {
        report.add_default(
            &format!("symbols.{}.expiries", symbol.symbol),
            "generated from the expiry calendar",
        );
    }

    for expiry in &symbol.expiries {
        match NaiveDate::parse_from_str(expiry, EXPIRY_FORMAT) {
            Ok(date) if date < today => report.add_warning(
                &format!("symbols.{}.expiries", symbol.symbol),
                &format!("Expiry {} is in the past; it will be priced with one day left", expiry),
            ),
            Ok(_) => {}
            Err(_) => report.add_error(ValidationError::InvalidExpiry {
                symbol: symbol.symbol.clone(),
                expiry: expiry.clone(),
            }),
        }
    }
}

fn validate_ambient(config: &ChainSimConfig, report: &mut ValidationReport) {
    check_resolved("logging.format", &config.logging.format, report);
    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(config.logging.format.clone()));
    }

    if config.metrics.enabled && config.metrics.port == 0 {
        report.add_error(ValidationError::InvalidMetricsPort);
    }
}

/// Substitution leaves unset `${VAR}` placeholders in place; report them here.
fn check_resolved(field: &str, value: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(value).unwrap_or(false) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: field.to_string(),
        });
    }
}

use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ChainSimConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Parse YAML text after environment variable substitution.
pub fn parse_config(content: &str) -> Result<ChainSimConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    let config: ChainSimConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!(
        symbols = config.symbols.len(),
        default_symbol = %config.default_symbol,
        "Configuration loaded successfully"
    );
    Ok(config)
}

/// Load from a path when given, otherwise use the built-in defaults.
pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<ChainSimConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            debug!("No config path given, using defaults");
            Ok(generate_default_config())
        }
    }
}

#[instrument]
pub fn generate_default_config() -> ChainSimConfig {
    use defaults::*;

    ChainSimConfig {
        default_symbol: default_symbol(),
        pricing: PricingConfig::default(),
        grid: GridConfig::default(),
        refresh: RefreshConfig::default(),
        symbols: default_symbols(),
        logging: LoggingConfig::default(),
        metrics: MetricsConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(
    config: &ChainSimConfig,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

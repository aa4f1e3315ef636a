//! ChainSim CLI Binary
//!
//! Entry point for generating synthetic option chains: a one-off
//! snapshot, a live refresh loop, and config management commands.

mod render;

use anyhow::{Context, Result};
use chain::{ChainService, ChainWorker, OptionChain, SelectOutcome, SymbolTable};
use chrono::Utc;
use cli::{ChainArgs, Cli, Commands, OutputFormat};
use config::{
    default_log_format, generate_default_config, load_config, load_or_default, save_config,
    validate_config, ChainSimConfig, ValidationReport,
};
use observability::{init_logging, init_metrics, ChainMetrics, LogFormat};
use render::{render_chain, render_symbols};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Validate and init load their own files; everything else reads config up front
    let config = match &cli.command {
        Commands::Validate { .. } | Commands::Init { .. } => None,
        command => Some(load_or_default(command.config_path())?),
    };

    let format_name = cli
        .log_format
        .clone()
        .or_else(|| config.as_ref().map(|c| c.logging.format.clone()))
        .unwrap_or_else(default_log_format);
    let log_format = LogFormat::parse(&format_name)
        .with_context(|| format!("Unknown log format: {}", format_name))?;
    init_logging("chainsim", log_format)?;

    debug!(?cli, "CLI arguments parsed");

    match (cli.command, config) {
        (Commands::Run { chain, ticks, interval_ms }, Some(config)) => {
            info!("Executing 'run' command");
            run_command(config, chain, ticks, interval_ms).await
        }
        (Commands::Snapshot { chain, seed }, Some(config)) => {
            info!("Executing 'snapshot' command");
            snapshot_command(config, chain, seed)
        }
        (Commands::Symbols { format, .. }, Some(config)) => {
            info!("Executing 'symbols' command");
            symbols_command(&config, format)
        }
        (Commands::Validate { config }, _) => {
            info!("Executing 'validate' command");
            validate_command(config)
        }
        (Commands::Init { output }, _) => {
            info!("Executing 'init' command");
            init_command(output)
        }
        (command, None) => anyhow::bail!("No configuration loaded for {:?}", command),
    }
}

/// Log warnings and refuse to continue on validation errors.
fn ensure_valid(report: &ValidationReport) -> Result<()> {
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message);
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot generate chains due to configuration errors");
    }
    Ok(())
}

/// Apply `--symbol`, `--expiry` and `--greeks`. Unknown names keep the
/// current selection.
fn apply_selection(service: &mut ChainService, args: &ChainArgs) -> Result<()> {
    if let Some(symbol) = &args.symbol {
        if service.select_symbol(symbol)? == SelectOutcome::UnknownSymbol {
            warn!(%symbol, "Unknown symbol, keeping {:?}", service.selected_symbol());
        }
    }

    if let Some(expiry) = &args.expiry {
        if service.select_expiry(expiry)? != SelectOutcome::Selected {
            warn!(%expiry, "Expiry not listed, keeping {:?}", service.selected_expiry());
        }
    }

    service.set_show_greeks(args.greeks);
    Ok(())
}

fn print_chain(chain: &OptionChain, show_greeks: bool, format: OutputFormat) -> Result<()> {
    println!("{}", render_chain(chain, show_greeks, format)?);
    Ok(())
}

async fn run_command(
    config: ChainSimConfig,
    args: ChainArgs,
    ticks: Option<u64>,
    interval_override: Option<u64>,
) -> Result<()> {
    ensure_valid(&validate_config(&config))?;

    let mut service = ChainService::from_config(&config, None)?;
    if config.metrics.enabled {
        init_metrics(config.metrics.port)?;
        service = service.with_metrics(ChainMetrics::new("worker"));
    }
    apply_selection(&mut service, &args)?;

    let interval = Duration::from_millis(interval_override.unwrap_or(config.refresh.interval_ms));
    let worker = ChainWorker::new(service, interval);
    let mut updates = worker.subscribe();

    let initial = updates.borrow_and_update().clone();
    if let Some(chain) = initial {
        print_chain(&chain, args.greeks, args.format)?;
    }
    if ticks == Some(0) {
        return Ok(());
    }

    let handle = worker.start();
    let shutdown = handle.token();

    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, stopping refresh loop...");
                ctrl_c_token.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    info!(
        interval_ms = interval.as_millis() as u64,
        ticks = ?ticks,
        "Refresh loop running"
    );

    let mut printed = 0u64;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = updates.borrow_and_update().clone();
                if let Some(chain) = latest {
                    print_chain(&chain, worker.show_greeks().await, args.format)?;
                    printed += 1;
                }
                if ticks.is_some_and(|limit| printed >= limit) {
                    break;
                }
            }
        }
    }

    handle.stop().await?;
    info!(printed, "Refresh loop finished");
    Ok(())
}

fn snapshot_command(config: ChainSimConfig, args: ChainArgs, seed: Option<u64>) -> Result<()> {
    ensure_valid(&validate_config(&config))?;

    let mut service = ChainService::from_config(&config, seed)?;
    apply_selection(&mut service, &args)?;

    let chain = service
        .current()
        .context("No chain generated for the selected symbol")?;
    print_chain(chain, service.show_greeks(), args.format)
}

fn symbols_command(config: &ChainSimConfig, format: OutputFormat) -> Result<()> {
    let table = SymbolTable::from_config(&config.symbols, Utc::now().date_naive());
    println!("{}", render_symbols(&table, format)?.trim_end());
    Ok(())
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Default symbol: {}", config.default_symbol);
    println!("Symbols: {}", config.symbols.len());
    println!(
        "Grid: {:?}, {} strikes each side",
        config.grid.variant, config.grid.strikes_each_side
    );
    println!("Refresh interval: {} ms", config.refresh.interval_ms);

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - {} symbols (indices and stocks)", config.symbols.len());
    println!("  - Black-Scholes pricing at r = {}", config.pricing.risk_free_rate);
    println!("  - {} ms refresh interval", config.refresh.interval_ms);
    println!();
    println!("Next steps:");
    println!(
        "  1. Run 'chainsim validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  2. Run 'chainsim run --config {:?}' to start the refresh loop",
        output_path
    );

    Ok(())
}

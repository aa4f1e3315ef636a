use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "chainsim")]
#[command(about = "ChainSim - Synthetic option chain generator")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Log format (pretty, json, compact). Overrides logging.format from config
    #[arg(long, global = true, env = "CHAINSIM_LOG_FORMAT")]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the refresh loop and print every regenerated chain
    Run {
        #[command(flatten)]
        chain: ChainArgs,

        /// Stop after this many refreshes (runs until Ctrl+C when omitted)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Override refresh.interval_ms
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },

    /// Generate a single chain and exit
    Snapshot {
        #[command(flatten)]
        chain: ChainArgs,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the symbol table
    Symbols {
        /// Path to the configuration file (built-in table when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate configuration without generating anything
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "chainsim.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "chainsim.yaml")]
        output: PathBuf,
    },
}

/// Selection and display options shared by `run` and `snapshot`.
#[derive(Args, Debug, Clone)]
pub struct ChainArgs {
    /// Path to the configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Symbol to select (defaults to default_symbol from config)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Expiry to select, YYYY-MM-DD (defaults to the nearest)
    #[arg(short, long)]
    pub expiry: Option<String>,

    /// Show delta, gamma, theta and vega columns
    #[arg(short, long)]
    pub greeks: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    Table,

    /// One JSON document per chain
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl Commands {
    /// Config file the command reads, if any.
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Run { chain, .. } | Commands::Snapshot { chain, .. } => {
                chain.config.as_deref()
            }
            Commands::Symbols { config, .. } => config.as_deref(),
            Commands::Validate { config } => Some(config.as_path()),
            Commands::Init { .. } => None,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

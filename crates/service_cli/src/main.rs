//! Heston CLI - Command Line Operations for Heston Pricing and Calibration
//!
//! # Commands
//!
//! - `heston price` - Price one European option by Monte Carlo
//! - `heston calibrate --quotes <file>` - Bayesian calibration to a quote file
//! - `heston demo` - Synthetic end-to-end calibration scenario
//!
//! # Logging
//!
//! `RUST_LOG` wins when set; otherwise the level comes from `--log-level`,
//! `PRICER_LOG_LEVEL` or the config file, in that order.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

use config::{build_config, CliOverrides};
pub use error::{CliError, Result};

/// Heston pricing and Bayesian calibration CLI
#[derive(Parser)]
#[command(name = "heston")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price one European option under Heston by Monte Carlo
    Price(commands::price::PriceArgs),

    /// Calibrate Heston parameters to a CSV quote file
    Calibrate(commands::calibrate::CalibrateArgs),

    /// Run the synthetic calibration demonstration
    Demo(commands::demo::DemoArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
    }

    let mut overrides = match &cli.command {
        Commands::Calibrate(args) => args.overrides(),
        _ => CliOverrides::default(),
    };
    overrides.log_level = match (cli.verbose, &cli.log_level) {
        (_, Some(level)) => Some(level.clone()),
        (true, None) => Some("debug".to_string()),
        (false, None) => None,
    };
    let config = build_config(cli.config.as_deref(), &overrides)?;

    // Initialise tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    if let Some(path) = &cli.config {
        info!("Loaded configuration from {}", path.display());
    }
    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Price(args) => commands::price::run(&args),
        Commands::Calibrate(args) => commands::calibrate::run(&args, &config),
        Commands::Demo(args) => commands::demo::run(&args),
    }
}

//! Calibrate command implementation
//!
//! Calibrates Heston parameters to a CSV quote file using the Metropolis-Hastings
//! sampler in pricer_optimiser.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Args;
use pricer_models::calibration::{MarketQuote, QuoteRecord};
use pricer_models::models::HestonParams;
use pricer_optimiser::bayesian::{quotes_from_records, Chain, MetropolisHastings, PosteriorSummary};
use serde::Serialize;
use tracing::info;

use super::print_summary;
use crate::config::{CalibrationFileConfig, CliOverrides};
use crate::{CliError, Result};

/// Arguments of `heston calibrate`
#[derive(Debug, Clone, Args)]
pub struct CalibrateArgs {
    /// CSV quote file with columns strike,maturity,price,kind[,weight]
    #[arg(short, long)]
    pub quotes: PathBuf,

    /// Output file for draws and acceptance rate (JSON)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of independent chains (seeds seed, seed + 1, ...)
    #[arg(long, default_value_t = 1)]
    pub chains: usize,

    /// Sampler seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of MH iterations
    #[arg(long)]
    pub n_iter: Option<usize>,

    /// Burn-in iterations
    #[arg(long)]
    pub burn_in: Option<usize>,

    /// Thinning interval
    #[arg(long)]
    pub thin: Option<usize>,

    /// Paths per pricing call
    #[arg(long)]
    pub paths: Option<usize>,

    /// Steps per path
    #[arg(long)]
    pub steps: Option<usize>,
}

impl CalibrateArgs {
    /// Sampler overrides carried by the flags.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log_level: None,
            seed: self.seed,
            n_iter: self.n_iter,
            burn_in: self.burn_in,
            thin: self.thin,
            n_paths: self.paths,
            n_steps: self.steps,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChainReport<'a> {
    seed: u64,
    acceptance_rate: f64,
    accepted: usize,
    iterations: usize,
    draws: &'a [HestonParams],
}

#[derive(Debug, Serialize)]
struct CalibrationReport<'a> {
    config: &'a CalibrationFileConfig,
    summary: Option<PosteriorSummary>,
    chains: Vec<ChainReport<'a>>,
}

/// Loads and validates a CSV quote file.
pub fn load_quotes(path: &Path) -> Result<Vec<MarketQuote>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let records = reader
        .deserialize::<QuoteRecord>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
    Ok(quotes_from_records(records)?)
}

/// Run the calibrate command
pub fn run(args: &CalibrateArgs, config: &CalibrationFileConfig) -> Result<()> {
    if args.chains == 0 {
        return Err(CliError::InvalidArgument(
            "--chains must be at least 1".to_string(),
        ));
    }
    config.validate()?;

    info!("Starting calibration...");
    info!("  Quotes: {}", args.quotes.display());
    let quotes = load_quotes(&args.quotes)?;
    info!("  Loaded {} quotes", quotes.len());

    let initial = config.initial_params()?;
    let steps = config.step_sizes()?;
    let sampler = MetropolisHastings::with_mc_pricer(config.market.into(), quotes, config.sampler)?;

    let seeds: Vec<u64> = (0..args.chains as u64)
        .map(|i| config.sampler.seed.wrapping_add(i))
        .collect();
    let chains = sampler.run_chains(&initial, &steps, &seeds)?;

    for chain in &chains {
        info!(
            "Chain seed {}: {} draws, acceptance rate {:.3}",
            chain.seed(),
            chain.len(),
            chain.acceptance_rate()
        );
    }

    let pooled: Vec<HestonParams> = chains.iter().flat_map(|c| c.draws().iter().copied()).collect();
    let summary = PosteriorSummary::from_draws(&pooled);
    match &summary {
        Some(s) => print_summary(s, None),
        None => println!("No draws retained (burn_in >= n_iter)"),
    }

    if let Some(output) = &args.output {
        info!("Writing chain to: {}", output.display());
        write_report(output, config, summary, &chains)?;
    }

    info!("Calibration complete");
    Ok(())
}

fn write_report(
    path: &Path,
    config: &CalibrationFileConfig,
    summary: Option<PosteriorSummary>,
    chains: &[Chain],
) -> Result<()> {
    let report = CalibrationReport {
        config,
        summary,
        chains: chains
            .iter()
            .map(|c| ChainReport {
                seed: c.seed(),
                acceptance_rate: c.acceptance_rate(),
                accepted: c.accepted(),
                iterations: c.iterations(),
                draws: c.draws(),
            })
            .collect(),
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

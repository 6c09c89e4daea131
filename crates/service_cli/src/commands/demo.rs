//! Demo command implementation
//!
//! Synthetic end-to-end calibration: quotes are generated by the Monte Carlo
//! pricer under known parameters, then recovered with the Metropolis-Hastings
//! sampler.

use clap::Args;
use pricer_core::types::OptionKind;
use pricer_models::calibration::MarketQuote;
use pricer_models::models::{HestonParams, HestonStepSizes};
use pricer_optimiser::bayesian::{MarketInputs, MetropolisHastings, PosteriorSummary, SamplerConfig};
use pricer_pricing::engine::PricingRequest;
use pricer_pricing::mc::{HestonMcPricer, SimulationConfig};
use tracing::{info, warn};

use super::print_summary;
use crate::{CliError, Result};

const SPOT: f64 = 100.0;
const RATE: f64 = 0.01;
const CARRY: f64 = 0.0;
const MATURITY: f64 = 0.5;
const STRIKES: [f64; 5] = [80.0, 90.0, 100.0, 110.0, 120.0];

/// Arguments of `heston demo`
#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    /// Run with a reduced path and iteration budget
    #[arg(long)]
    pub quick: bool,
}

/// Scenario budget.
#[derive(Debug, Clone, Copy)]
pub struct DemoBudget {
    pub market: SimulationConfig,
    pub sampler: SamplerConfig,
}

impl DemoBudget {
    /// Full demonstration budget.
    pub fn full() -> Self {
        Self {
            market: SimulationConfig::quoting(123),
            sampler: SamplerConfig {
                n_iter: 400,
                burn_in: 100,
                thin: 2,
                n_paths: 5000,
                n_steps: 40,
                ..SamplerConfig::default()
            },
        }
    }

    /// Reduced budget for smoke runs.
    pub fn quick() -> Self {
        Self {
            market: SimulationConfig::calibration(123),
            sampler: SamplerConfig {
                n_iter: 60,
                burn_in: 20,
                thin: 2,
                n_paths: 500,
                n_steps: 20,
                ..SamplerConfig::default()
            },
        }
    }
}

/// Generating parameters of the synthetic market.
pub fn true_params() -> Result<HestonParams> {
    HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).map_err(|e| CliError::InvalidArgument(e.to_string()))
}

/// Call quotes priced under `params`.
pub fn synthetic_quotes(params: HestonParams, config: SimulationConfig) -> Result<Vec<MarketQuote>> {
    STRIKES
        .iter()
        .map(|&strike| {
            let request = PricingRequest {
                spot: SPOT,
                strike,
                maturity: MATURITY,
                rate: RATE,
                carry: CARRY,
                params,
                config,
                kind: OptionKind::Call,
            };
            let estimate = HestonMcPricer.price(&request)?;
            info!(
                "  K = {:>6.1}: market price {:.4} (+/- {:.4})",
                strike,
                estimate.price,
                estimate.std_error
            );
            MarketQuote::new(strike, MATURITY, estimate.price, OptionKind::Call)
                .map_err(|e| CliError::InvalidArgument(e.to_string()))
        })
        .collect()
}

/// Result of one demo run.
#[derive(Debug, Clone)]
pub struct DemoOutcome {
    pub summary: PosteriorSummary,
    pub acceptance_rate: f64,
    /// Parameters whose generating value lies inside the 5-95% band.
    pub covered: Vec<&'static str>,
}

/// Names of the parameters whose value in `truth` lies inside the posterior
/// 5-95% band.
pub fn band_coverage(summary: &PosteriorSummary, truth: &HestonParams) -> Vec<&'static str> {
    summary
        .iter()
        .zip(truth.to_array())
        .filter(|((_, s), t)| s.p05 <= *t && *t <= s.p95)
        .map(|((name, _), _)| name)
        .collect()
}

/// Runs the scenario from `initial`; `None` when the chain retains no draws.
pub fn run_scenario(budget: DemoBudget, initial: &HestonParams) -> Result<Option<DemoOutcome>> {
    let truth = true_params()?;
    info!("Generating synthetic market under {}", truth);
    let quotes = synthetic_quotes(truth, budget.market)?;

    let steps = HestonStepSizes::new(0.3, 0.02, 0.2, 0.1, 0.02)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let sampler = MetropolisHastings::with_mc_pricer(
        MarketInputs::new(SPOT, RATE, CARRY),
        quotes,
        budget.sampler,
    )?;
    let chain = sampler.run(initial, &steps)?;
    Ok(chain.summary().map(|summary| DemoOutcome {
        covered: band_coverage(&summary, &truth),
        acceptance_rate: chain.acceptance_rate(),
        summary,
    }))
}

/// Starting point of the demo chain.
pub fn demo_initial() -> Result<HestonParams> {
    HestonParams::new(1.0, 0.03, 0.4, -0.3, 0.03).map_err(|e| CliError::InvalidArgument(e.to_string()))
}

/// Run the demo command
pub fn run(args: &DemoArgs) -> Result<()> {
    info!("=== Heston Bayesian calibration demo ===");
    let budget = if args.quick {
        DemoBudget::quick()
    } else {
        DemoBudget::full()
    };

    let Some(outcome) = run_scenario(budget, &demo_initial()?)? else {
        warn!("Chain retained no draws");
        return Ok(());
    };
    let truth = true_params()?;

    println!("\nAcceptance rate: {:.3}", outcome.acceptance_rate);
    print_summary(&outcome.summary, Some(&truth));
    println!(
        "Parameters inside their 5-95% band ({}/5): {:?}",
        outcome.covered.len(),
        outcome.covered
    );
    if outcome.covered.len() < 3 {
        warn!("Fewer than 3 generating values inside their 5-95% band; consider a larger budget");
    }

    info!("Demo complete");
    Ok(())
}

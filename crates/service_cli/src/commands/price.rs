//! Price command implementation
//!
//! Prices one European option with the Heston Monte Carlo engine.

use clap::Args;
use pricer_core::types::{OptionKind, PricingError};
use pricer_models::models::{HestonParams, VarianceScheme};
use pricer_pricing::engine::{BlackScholesPricer, OptionPricer, PriceEstimate, PricingRequest};
use pricer_pricing::mc::{HestonMcPricer, SimulationConfig};
use serde::Serialize;
use tracing::info;

use crate::{CliError, Result};

/// Arguments of `heston price`
#[derive(Debug, Clone, Args)]
pub struct PriceArgs {
    /// Spot price
    #[arg(long, default_value_t = 100.0)]
    pub spot: f64,

    /// Strike
    #[arg(long, default_value_t = 100.0)]
    pub strike: f64,

    /// Maturity in years
    #[arg(long, default_value_t = 0.5)]
    pub maturity: f64,

    /// Risk-free rate
    #[arg(long, default_value_t = 0.01)]
    pub rate: f64,

    /// Carry / dividend yield
    #[arg(long, default_value_t = 0.0)]
    pub carry: f64,

    /// Option kind (call, put)
    #[arg(long, default_value = "call")]
    pub kind: OptionKind,

    /// Mean-reversion speed
    #[arg(long, default_value_t = 2.0)]
    pub kappa: f64,

    /// Long-run variance
    #[arg(long, default_value_t = 0.04)]
    pub theta: f64,

    /// Volatility of variance
    #[arg(long, default_value_t = 0.6)]
    pub sigma_v: f64,

    /// Spot/variance correlation
    #[arg(long, default_value_t = -0.6, allow_hyphen_values = true)]
    pub rho: f64,

    /// Initial variance
    #[arg(long, default_value_t = 0.04)]
    pub v0: f64,

    /// Number of Monte Carlo paths
    #[arg(short = 'n', long, default_value_t = 20_000)]
    pub num_paths: usize,

    /// Number of time steps
    #[arg(long, default_value_t = 100)]
    pub steps: usize,

    /// Simulation seed
    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    /// Variance scheme (full_truncation, euler)
    #[arg(long, default_value = "full_truncation")]
    pub scheme: VarianceScheme,

    /// Disable antithetic variates
    #[arg(long)]
    pub no_antithetic: bool,

    /// Split the simulation into this many parallel partitions
    #[arg(long)]
    pub partitions: Option<usize>,

    /// Also print the Black-Scholes price at sqrt(v0)
    #[arg(long)]
    pub compare_bs: bool,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct PriceReport {
    request: PricingRequest,
    estimate: PriceEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    black_scholes: Option<f64>,
}

impl PriceArgs {
    /// Builds the pricing request from the flags.
    pub fn request(&self) -> Result<PricingRequest> {
        let params = HestonParams::new(self.kappa, self.theta, self.sigma_v, self.rho, self.v0)
            .map_err(PricingError::from)?;
        let config = SimulationConfig::builder()
            .n_paths(self.num_paths)
            .n_steps(self.steps)
            .antithetic(!self.no_antithetic)
            .scheme(self.scheme)
            .seed(self.seed)
            .build()
            .map_err(PricingError::from)?;
        Ok(PricingRequest {
            spot: self.spot,
            strike: self.strike,
            maturity: self.maturity,
            rate: self.rate,
            carry: self.carry,
            params,
            config,
            kind: self.kind,
        })
    }
}

/// Run the price command
pub fn run(args: &PriceArgs) -> Result<()> {
    if !matches!(args.format.as_str(), "table" | "json") {
        return Err(CliError::InvalidArgument(format!(
            "Unknown format: {}. Supported: json, table",
            args.format
        )));
    }

    let request = args.request()?;
    info!("Starting pricing...");
    info!("  {} K = {} T = {}", request.kind, request.strike, request.maturity);
    info!("  {}", request.params);
    info!(
        "  Monte Carlo paths: {} x {} steps ({})",
        request.config.n_paths(),
        request.config.n_steps(),
        request.config.scheme()
    );

    let estimate = match args.partitions {
        Some(n) => HestonMcPricer.price_partitioned(&request, n)?,
        None => HestonMcPricer.price(&request)?,
    };
    let black_scholes = if args.compare_bs {
        Some(BlackScholesPricer.price(&request)?.price)
    } else {
        None
    };

    let report = PriceReport {
        request,
        estimate,
        black_scholes,
    };
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_table(&report),
    }

    info!("Pricing complete");
    Ok(())
}

fn print_table(report: &PriceReport) {
    let e = &report.estimate;
    println!("\n┌──────────────────┬──────────────┐");
    println!("│ Heston MC price  │ {:>12.6} │", e.price);
    println!("│ Std error        │ {:>12.6} │", e.std_error);
    println!("│ 95% half-width   │ {:>12.6} │", e.confidence_95());
    if let Some(bs) = report.black_scholes {
        println!("│ Black-Scholes    │ {:>12.6} │", bs);
    }
    println!("└──────────────────┴──────────────┘");
}

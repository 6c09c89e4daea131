//! End-to-end calibration tests.
//!
//! Synthetic quotes are generated under known parameters, then recovered with
//! the Metropolis-Hastings sampler.

use std::cell::Cell;

use pricer_core::types::{OptionKind, PricingError};
use pricer_models::calibration::MarketQuote;
use pricer_models::models::{HestonParams, HestonStepSizes};
use pricer_optimiser::bayesian::{
    HalfNormalPrior, MarketInputs, MetropolisHastings, PosteriorSummary, RandomWalkProposal, SamplerConfig, RHO_BOUND,
};
use pricer_optimiser::OptimiserError;
use pricer_pricing::engine::{BlackScholesPricer, OptionPricer, PriceEstimate, PricingRequest};
use pricer_pricing::mc::{HestonMcPricer, SimulationConfig};
use pricer_pricing::rng::{PricerRng, SAMPLER_STREAM};

const SPOT: f64 = 100.0;
const RATE: f64 = 0.01;
const MATURITY: f64 = 0.5;
const STRIKES: [f64; 5] = [80.0, 90.0, 100.0, 110.0, 120.0];

fn true_params() -> HestonParams {
    HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap()
}

fn market() -> MarketInputs {
    MarketInputs::new(SPOT, RATE, 0.0)
}

/// Call quotes priced by `pricer` under `params`.
fn synthetic_quotes<P: OptionPricer>(pricer: &P, params: HestonParams, config: SimulationConfig) -> Vec<MarketQuote> {
    STRIKES
        .iter()
        .map(|&strike| {
            let request = PricingRequest {
                spot: SPOT,
                strike,
                maturity: MATURITY,
                rate: RATE,
                carry: 0.0,
                params,
                config,
                kind: OptionKind::Call,
            };
            let price = pricer.price(&request).unwrap().price;
            MarketQuote::new(strike, MATURITY, price, OptionKind::Call).unwrap()
        })
        .collect()
}

fn demo_initial() -> HestonParams {
    HestonParams::new(1.0, 0.03, 0.4, -0.3, 0.03).unwrap()
}

fn demo_steps() -> HestonStepSizes {
    HestonStepSizes::new(0.3, 0.02, 0.2, 0.1, 0.02).unwrap()
}

/// Parameters whose generating value lies inside the 5-95% band.
fn band_coverage(summary: &PosteriorSummary, truth: &HestonParams) -> usize {
    summary
        .iter()
        .zip(truth.to_array())
        .filter(|((_, s), t)| s.p05 <= *t && *t <= s.p95)
        .count()
}

// ============================================================================
// Monte Carlo pipeline
// ============================================================================

#[test]
fn test_reduced_demo_pipeline() {
    let quotes = synthetic_quotes(
        &HestonMcPricer,
        true_params(),
        SimulationConfig::builder().n_paths(4000).n_steps(20).seed(123).build().unwrap(),
    );
    assert!(quotes.windows(2).all(|w| w[0].price() > w[1].price()));

    let config = SamplerConfig {
        n_iter: 40,
        burn_in: 10,
        thin: 2,
        n_paths: 400,
        n_steps: 10,
        ..Default::default()
    };
    let sampler = MetropolisHastings::with_mc_pricer(market(), quotes, config).unwrap();
    let chain = sampler.run(&demo_initial(), &demo_steps()).unwrap();

    assert_eq!(chain.len(), 15);
    assert!((0.0..=1.0).contains(&chain.acceptance_rate()));
    let prior = HalfNormalPrior::default();
    assert!(chain.draws().iter().all(|d| prior.is_feasible(d)));
    assert!(chain.draws().iter().all(|d| d.rho.abs() < RHO_BOUND));

    let summary = chain.summary().unwrap();
    for (_, s) in summary.iter() {
        assert!(s.p05 <= s.median && s.median <= s.p95);
    }

    // Same seeds, same chain.
    assert_eq!(chain, sampler.run(&demo_initial(), &demo_steps()).unwrap());
}

#[test]
#[ignore = "full demo budget, run with --ignored"]
fn test_full_demo() {
    let quotes = synthetic_quotes(&HestonMcPricer, true_params(), SimulationConfig::quoting(123));
    let config = SamplerConfig {
        n_iter: 400,
        burn_in: 100,
        thin: 2,
        n_paths: 5000,
        n_steps: 40,
        ..Default::default()
    };
    let sampler = MetropolisHastings::with_mc_pricer(market(), quotes, config).unwrap();
    let chain = sampler.run(&demo_initial(), &demo_steps()).unwrap();

    assert_eq!(chain.len(), 150);
    let summary = chain.summary().unwrap();
    println!("acceptance rate: {:.3}\n{}", chain.acceptance_rate(), summary);
    assert!(summary.v0.mean > 0.0 && summary.theta.mean > 0.0);
    let covered = band_coverage(&summary, &true_params());
    assert!(covered >= 3, "only {} of 5 parameters inside their 5-95% band", covered);
}

#[test]
fn test_chain_started_at_truth_stays_near_truth() {
    // Quotes share the likelihood's paths, so the generating parameters
    // reproduce them exactly and the chain has nowhere better to go.
    let config = SamplerConfig {
        n_iter: 60,
        burn_in: 10,
        n_paths: 500,
        n_steps: 10,
        ..Default::default()
    };
    let quotes = synthetic_quotes(&HestonMcPricer, true_params(), config.simulation().unwrap());
    let sampler = MetropolisHastings::with_mc_pricer(market(), quotes, config).unwrap();
    let steps = HestonStepSizes::new(0.05, 0.002, 0.02, 0.02, 0.002).unwrap();
    let chain = sampler.run(&true_params(), &steps).unwrap();

    assert_eq!(chain.len(), 50);
    let summary = chain.summary().unwrap();
    assert!((summary.v0.mean - 0.04).abs() < 0.01, "v0 mean = {}", summary.v0.mean);
    assert!(
        (summary.theta.mean - 0.04).abs() < 0.02,
        "theta mean = {}",
        summary.theta.mean
    );
    assert!(summary.v0.p05 <= 0.04 + 0.01 && summary.v0.p95 >= 0.04 - 0.01);
}

// ============================================================================
// Parameter recovery with a closed-form likelihood
// ============================================================================

#[test]
fn test_black_scholes_likelihood_recovers_v0() {
    // Under the closed-form pricer only v0 moves the price, so its posterior
    // concentrates at the generating value.
    let quotes = synthetic_quotes(&BlackScholesPricer, true_params(), SimulationConfig::default());
    let config = SamplerConfig {
        n_iter: 3000,
        burn_in: 1500,
        seed: 7,
        ..Default::default()
    };
    let sampler = MetropolisHastings::new(market(), quotes, config, BlackScholesPricer).unwrap();
    let steps = HestonStepSizes::new(0.1, 0.01, 0.1, 0.05, 0.001).unwrap();
    let chain = sampler.run(&demo_initial(), &steps).unwrap();

    let v0 = chain.summary().unwrap().v0;
    assert!((v0.mean - 0.04).abs() < 0.005, "posterior v0 mean = {}", v0.mean);
    assert!(v0.p05 < 0.045 && v0.p95 > 0.035);
}

#[test]
fn test_independent_chains() {
    let quotes = synthetic_quotes(&BlackScholesPricer, true_params(), SimulationConfig::default());
    let config = SamplerConfig {
        n_iter: 200,
        burn_in: 50,
        ..Default::default()
    };
    let sampler = MetropolisHastings::new(market(), quotes, config, BlackScholesPricer).unwrap();
    let chains = sampler.run_chains(&demo_initial(), &demo_steps(), &[1, 2, 3, 4]).unwrap();

    assert_eq!(chains.len(), 4);
    assert!(chains.iter().all(|c| c.len() == 150));
    assert_ne!(chains[0].draws(), chains[1].draws());
}

// ============================================================================
// Pricer substitution
// ============================================================================

#[test]
fn test_closure_pricer_substitution() {
    let calls = Cell::new(0usize);
    let counting = |request: &PricingRequest| -> Result<PriceEstimate, PricingError> {
        calls.set(calls.get() + 1);
        BlackScholesPricer.price(request)
    };

    let quotes = synthetic_quotes(&BlackScholesPricer, true_params(), SimulationConfig::default());
    let n_quotes = quotes.len();
    let config = SamplerConfig {
        n_iter: 50,
        burn_in: 0,
        ..Default::default()
    };
    let sampler = MetropolisHastings::new(market(), quotes, config, counting).unwrap();
    let chain = sampler.run(&demo_initial(), &demo_steps()).unwrap();

    assert_eq!(chain.len(), 50);
    let n = calls.get();
    assert_eq!(n % n_quotes, 0);
    assert!(n >= n_quotes && n <= n_quotes * 51);
}

#[test]
fn test_prior_rejected_candidates_are_never_priced() {
    let calls = Cell::new(0usize);
    let counting = |request: &PricingRequest| -> Result<PriceEstimate, PricingError> {
        calls.set(calls.get() + 1);
        BlackScholesPricer.price(request)
    };

    let quotes = synthetic_quotes(&BlackScholesPricer, true_params(), SimulationConfig::default());
    let n_quotes = quotes.len();
    let config = SamplerConfig {
        n_iter: 200,
        burn_in: 0,
        thin: 1,
        seed: 11,
        ..Default::default()
    };
    let sampler = MetropolisHastings::new(market(), quotes, config, counting).unwrap();
    // A wide rho step clamps most candidates onto the +/-0.999 bound, outside
    // the prior's open support.
    let initial = HestonParams::new(2.0, 0.04, 0.6, 0.9, 0.04).unwrap();
    let steps = HestonStepSizes::new(0.05, 0.005, 0.05, 5.0, 0.005).unwrap();
    let chain = sampler.run(&initial, &steps).unwrap();
    assert_eq!(chain.len(), 200);

    // Replay the sampler stream: one proposal then one uniform per iteration,
    // starting each proposal from the previous recorded state.
    let prior = HalfNormalPrior::default();
    let proposal = RandomWalkProposal::new(steps);
    let mut rng = PricerRng::for_stream(config.seed, SAMPLER_STREAM);
    let mut current = initial;
    let mut feasible = 0;
    for draw in chain.draws() {
        let candidate = proposal.propose(&current, &mut rng);
        let _ = rng.gen_uniform();
        if prior.is_feasible(&candidate) {
            feasible += 1;
        }
        current = *draw;
    }

    assert!(feasible > 0 && feasible < chain.len());
    assert_eq!(calls.get(), n_quotes * (1 + feasible));
}

#[test]
fn test_failing_pricer_aborts_run() {
    let failing = |_: &PricingRequest| -> Result<PriceEstimate, PricingError> {
        Err(PricingError::ModelFailure("engine unavailable".into()))
    };
    let quotes = synthetic_quotes(&BlackScholesPricer, true_params(), SimulationConfig::default());
    let sampler = MetropolisHastings::new(market(), quotes, SamplerConfig::default(), failing).unwrap();
    assert!(matches!(
        sampler.run(&demo_initial(), &demo_steps()),
        Err(OptimiserError::Pricing(_))
    ));
}

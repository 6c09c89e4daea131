//! Random-walk Metropolis-Hastings over Heston parameters.
//!
//! Each iteration:
//!
//! 1. propose a candidate around the current state;
//! 2. score it with the prior, and with the likelihood only when the prior is
//!    finite;
//! 3. accept iff `ln u < score(candidate) - score(current)`;
//! 4. record the current state when `it >= burn_in` and
//!    `(it - burn_in) % thin == 0`.
//!
//! Proposal normals and the acceptance uniform come from the sampler's own
//! substream of `seed`; path simulation uses the likelihood's fixed
//! simulation seed.

use pricer_models::calibration::MarketQuote;
use pricer_models::models::{HestonParams, HestonStepSizes};
use pricer_pricing::engine::OptionPricer;
use pricer_pricing::mc::{HestonMcPricer, SimulationConfig};
use pricer_pricing::rng::{PricerRng, SAMPLER_STREAM};
use tracing::{debug, info};

use super::likelihood::{GaussianLikelihood, MarketInputs};
use super::prior::HalfNormalPrior;
use super::proposal::RandomWalkProposal;
use super::summary::PosteriorSummary;
use crate::OptimiserError;

/// Sampler budget and noise settings.
///
/// Defaults: 1000 iterations, 200 burn-in, thin 1, seed 123, noise floor
/// 0.05, and 3000 antithetic paths × 40 steps per quote on path seed 123.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::bayesian::SamplerConfig;
///
/// let config = SamplerConfig { n_iter: 400, burn_in: 100, thin: 2, ..Default::default() };
/// assert_eq!(config.expected_draws(), 150);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplerConfig {
    /// Total number of MH iterations.
    pub n_iter: usize,
    /// Iterations discarded before recording.
    pub burn_in: usize,
    /// Record every `thin`-th iteration after burn-in.
    pub thin: usize,
    /// Seed of the proposal / acceptance stream.
    pub seed: u64,
    /// Lower bound of the observation standard deviation, in price units.
    pub noise_floor: f64,
    /// Paths per pricing call.
    pub n_paths: usize,
    /// Time steps per path.
    pub n_steps: usize,
    /// Seed of the simulation used by every pricing call.
    pub path_seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_iter: 1000,
            burn_in: 200,
            thin: 1,
            seed: 123,
            noise_floor: 0.05,
            n_paths: 3000,
            n_steps: 40,
            path_seed: 123,
        }
    }
}

impl SamplerConfig {
    /// Number of draws a run with this config retains:
    /// `floor((n_iter - burn_in - 1) / thin) + 1` when `burn_in < n_iter`,
    /// otherwise 0.
    pub fn expected_draws(&self) -> usize {
        if self.burn_in >= self.n_iter || self.thin == 0 {
            return 0;
        }
        (self.n_iter - self.burn_in - 1) / self.thin + 1
    }

    /// Simulation config used for every likelihood pricing call.
    ///
    /// # Errors
    ///
    /// [`OptimiserError::InvalidConfig`] if the path or step count is out of
    /// range.
    pub fn simulation(&self) -> Result<SimulationConfig, OptimiserError> {
        SimulationConfig::builder()
            .n_paths(self.n_paths)
            .n_steps(self.n_steps)
            .antithetic(true)
            .seed(self.path_seed)
            .build()
            .map_err(|e| OptimiserError::InvalidConfig(e.to_string()))
    }

    /// Checks the iteration budget.
    pub fn validate(&self) -> Result<(), OptimiserError> {
        if self.n_iter == 0 {
            return Err(OptimiserError::InvalidConfig(
                "n_iter must be at least 1".to_string(),
            ));
        }
        if self.thin == 0 {
            return Err(OptimiserError::InvalidConfig(
                "thin must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output of one sampler run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    draws: Vec<HestonParams>,
    accepted: usize,
    iterations: usize,
    final_state: HestonParams,
    seed: u64,
}

impl Chain {
    /// Retained draws in iteration order.
    pub fn draws(&self) -> &[HestonParams] {
        &self.draws
    }

    /// Number of retained draws.
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Whether no draw was retained.
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Accepted proposals.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Iterations run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `accepted / iterations`; infeasible proposals count as rejections.
    pub fn acceptance_rate(&self) -> f64 {
        self.accepted as f64 / self.iterations.max(1) as f64
    }

    /// State after the last iteration.
    pub fn final_state(&self) -> &HestonParams {
        &self.final_state
    }

    /// Sampler seed the chain was run with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Posterior summary of the draws, `None` for an empty chain.
    pub fn summary(&self) -> Option<PosteriorSummary> {
        PosteriorSummary::from_draws(&self.draws)
    }
}

/// Metropolis-Hastings sampler bound to a market, a quote set and a pricer.
///
/// # Examples
///
/// ```
/// use pricer_core::types::OptionKind;
/// use pricer_models::calibration::MarketQuote;
/// use pricer_models::models::{HestonParams, HestonStepSizes};
/// use pricer_optimiser::bayesian::{MarketInputs, MetropolisHastings, SamplerConfig};
///
/// let quotes = vec![MarketQuote::new(100.0, 0.5, 6.0, OptionKind::Call).unwrap()];
/// let config = SamplerConfig {
///     n_iter: 5,
///     burn_in: 0,
///     n_paths: 200,
///     n_steps: 10,
///     ..Default::default()
/// };
/// let sampler = MetropolisHastings::with_mc_pricer(
///     MarketInputs::new(100.0, 0.01, 0.0),
///     quotes,
///     config,
/// )
/// .unwrap();
/// let chain = sampler.run(&HestonParams::default(), &HestonStepSizes::default()).unwrap();
/// assert_eq!(chain.len(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct MetropolisHastings<P = HestonMcPricer> {
    likelihood: GaussianLikelihood<P>,
    prior: HalfNormalPrior,
    config: SamplerConfig,
}

impl MetropolisHastings<HestonMcPricer> {
    /// Sampler scoring quotes with the Heston Monte Carlo pricer.
    pub fn with_mc_pricer(
        market: MarketInputs,
        quotes: Vec<MarketQuote>,
        config: SamplerConfig,
    ) -> Result<Self, OptimiserError> {
        Self::new(market, quotes, config, HestonMcPricer)
    }
}

impl<P: OptionPricer> MetropolisHastings<P> {
    /// Creates a sampler.
    ///
    /// # Errors
    ///
    /// [`OptimiserError::EmptyQuotes`] or [`OptimiserError::InvalidConfig`]
    /// for an empty quote set, a bad market, a zero iteration count or
    /// thinning, an out-of-range path/step budget, or a bad noise floor.
    pub fn new(
        market: MarketInputs,
        quotes: Vec<MarketQuote>,
        config: SamplerConfig,
        pricer: P,
    ) -> Result<Self, OptimiserError> {
        config.validate()?;
        let likelihood = GaussianLikelihood::new(
            market,
            quotes,
            config.simulation()?,
            config.noise_floor,
            pricer,
        )?;
        Ok(Self {
            likelihood,
            prior: HalfNormalPrior::default(),
            config,
        })
    }

    /// Replaces the default half-normal prior.
    pub fn with_prior(mut self, prior: HalfNormalPrior) -> Self {
        self.prior = prior;
        self
    }

    /// Sampler configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Likelihood model.
    pub fn likelihood(&self) -> &GaussianLikelihood<P> {
        &self.likelihood
    }

    /// Prior model.
    pub fn prior(&self) -> &HalfNormalPrior {
        &self.prior
    }

    /// Log posterior up to a constant; the likelihood is skipped when the
    /// prior is `-inf`.
    pub fn log_posterior(&self, params: &HestonParams) -> Result<f64, OptimiserError> {
        let log_prior = self.prior.log_density(params);
        if log_prior == f64::NEG_INFINITY {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(log_prior + self.likelihood.log_likelihood(params)?)
    }

    /// Runs one chain on the configured seed.
    pub fn run(
        &self,
        initial: &HestonParams,
        steps: &HestonStepSizes,
    ) -> Result<Chain, OptimiserError> {
        self.run_chain(initial, steps, self.config.seed)
    }

    /// Runs one chain on sampler seed `seed`.
    ///
    /// # Errors
    ///
    /// - [`OptimiserError::InvalidConfig`] for invalid step sizes
    /// - [`OptimiserError::InfeasibleInitialState`] if the prior rejects
    ///   `initial`
    /// - [`OptimiserError::NonFiniteScore`] if the initial likelihood is NaN
    /// - [`OptimiserError::Pricing`] if the pricer fails
    pub fn run_chain(
        &self,
        initial: &HestonParams,
        steps: &HestonStepSizes,
        seed: u64,
    ) -> Result<Chain, OptimiserError> {
        steps
            .validate()
            .map_err(|e| OptimiserError::InvalidConfig(e.to_string()))?;

        let SamplerConfig {
            n_iter,
            burn_in,
            thin,
            ..
        } = self.config;

        let initial_prior = self.prior.log_density(initial);
        if initial_prior == f64::NEG_INFINITY {
            return Err(OptimiserError::InfeasibleInitialState(initial.to_string()));
        }
        let initial_likelihood = self.likelihood.log_likelihood(initial)?;
        if initial_likelihood.is_nan() {
            return Err(OptimiserError::NonFiniteScore(format!(
                "initial log-likelihood is NaN at {}",
                initial
            )));
        }

        info!(
            seed,
            n_iter,
            burn_in,
            thin,
            quotes = self.likelihood.quotes().len(),
            n_paths = self.config.n_paths,
            n_steps = self.config.n_steps,
            "starting Metropolis-Hastings chain"
        );

        let proposal = RandomWalkProposal::new(*steps);
        let mut rng = PricerRng::for_stream(seed, SAMPLER_STREAM);
        let mut current = *initial;
        let mut current_score = initial_prior + initial_likelihood;
        let mut accepted = 0;
        let mut draws = Vec::with_capacity(self.config.expected_draws());

        for it in 0..n_iter {
            let candidate = proposal.propose(&current, &mut rng);
            let candidate_score = self.log_posterior(&candidate)?;

            let u = rng.gen_uniform();
            if u.ln() < candidate_score - current_score {
                current = candidate;
                current_score = candidate_score;
                accepted += 1;
            }

            if it >= burn_in && (it - burn_in) % thin == 0 {
                debug!(iteration = it, score = current_score, params = %current, "draw");
                draws.push(current);
            }
        }

        let chain = Chain {
            draws,
            accepted,
            iterations: n_iter,
            final_state: current,
            seed,
        };
        info!(
            seed,
            draws = chain.len(),
            acceptance_rate = chain.acceptance_rate(),
            final_state = %chain.final_state,
            "Metropolis-Hastings chain finished"
        );
        Ok(chain)
    }
}

#[cfg(feature = "parallel")]
impl<P: OptionPricer + Sync> MetropolisHastings<P> {
    /// Runs one independent chain per seed on the rayon pool.
    ///
    /// Chains share the likelihood (and therefore its simulation seed) and
    /// differ only in their sampler streams. Results come back in seed order.
    pub fn run_chains(
        &self,
        initial: &HestonParams,
        steps: &HestonStepSizes,
        seeds: &[u64],
    ) -> Result<Vec<Chain>, OptimiserError> {
        use rayon::prelude::*;

        seeds
            .par_iter()
            .map(|&seed| self.run_chain(initial, steps, seed))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
impl<P: OptionPricer> MetropolisHastings<P> {
    /// Runs one independent chain per seed, sequentially.
    pub fn run_chains(
        &self,
        initial: &HestonParams,
        steps: &HestonStepSizes,
        seeds: &[u64],
    ) -> Result<Vec<Chain>, OptimiserError> {
        seeds
            .iter()
            .map(|&seed| self.run_chain(initial, steps, seed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::types::{OptionKind, PricingError};
    use pricer_pricing::engine::{BlackScholesPricer, PriceEstimate, PricingRequest};

    fn quotes() -> Vec<MarketQuote> {
        [(90.0, 12.0), (100.0, 6.0), (110.0, 2.5)]
            .into_iter()
            .map(|(k, p)| MarketQuote::new(k, 0.5, p, OptionKind::Call).unwrap())
            .collect()
    }

    fn market() -> MarketInputs {
        MarketInputs::new(100.0, 0.01, 0.0)
    }

    fn bs_sampler(config: SamplerConfig) -> MetropolisHastings<BlackScholesPricer> {
        MetropolisHastings::new(market(), quotes(), config, BlackScholesPricer).unwrap()
    }

    // ==========================================================
    // Configuration
    // ==========================================================

    #[test]
    fn test_expected_draws_formula() {
        let cfg = |n_iter, burn_in, thin| SamplerConfig {
            n_iter,
            burn_in,
            thin,
            ..Default::default()
        };
        assert_eq!(cfg(400, 100, 2).expected_draws(), 150);
        assert_eq!(cfg(1000, 200, 1).expected_draws(), 800);
        assert_eq!(cfg(10, 10, 1).expected_draws(), 0);
        assert_eq!(cfg(10, 3, 4).expected_draws(), 2);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let thin0 = SamplerConfig {
            thin: 0,
            ..Default::default()
        };
        assert!(matches!(
            MetropolisHastings::new(market(), quotes(), thin0, BlackScholesPricer),
            Err(OptimiserError::InvalidConfig(_))
        ));

        let no_iter = SamplerConfig {
            n_iter: 0,
            ..Default::default()
        };
        assert!(MetropolisHastings::new(market(), quotes(), no_iter, BlackScholesPricer).is_err());

        let no_paths = SamplerConfig {
            n_paths: 0,
            ..Default::default()
        };
        assert!(MetropolisHastings::new(market(), quotes(), no_paths, BlackScholesPricer).is_err());

        let floor = SamplerConfig {
            noise_floor: -1.0,
            ..Default::default()
        };
        assert!(MetropolisHastings::new(market(), quotes(), floor, BlackScholesPricer).is_err());

        assert_eq!(
            MetropolisHastings::new(market(), vec![], SamplerConfig::default(), BlackScholesPricer)
                .err()
                .map(|e| e.to_string()),
            Some(OptimiserError::EmptyQuotes.to_string())
        );
    }

    // ==========================================================
    // Chain behaviour
    // ==========================================================

    #[test]
    fn test_chain_length_and_acceptance() {
        let sampler = bs_sampler(SamplerConfig {
            n_iter: 400,
            burn_in: 100,
            thin: 2,
            ..Default::default()
        });
        let chain = sampler
            .run(&HestonParams::default(), &HestonStepSizes::default())
            .unwrap();
        assert_eq!(chain.len(), 150);
        assert_eq!(chain.iterations(), 400);
        let rate = chain.acceptance_rate();
        assert!((0.0..=1.0).contains(&rate));
        assert_eq!(rate, chain.accepted() as f64 / 400.0);
    }

    #[test]
    fn test_burn_in_at_least_n_iter_gives_empty_chain() {
        let sampler = bs_sampler(SamplerConfig {
            n_iter: 20,
            burn_in: 20,
            ..Default::default()
        });
        let chain = sampler
            .run(&HestonParams::default(), &HestonStepSizes::default())
            .unwrap();
        assert!(chain.is_empty());
        assert!(chain.summary().is_none());
    }

    #[test]
    fn test_same_seed_same_chain() {
        let sampler = bs_sampler(SamplerConfig {
            n_iter: 100,
            burn_in: 10,
            ..Default::default()
        });
        let init = HestonParams::default();
        let steps = HestonStepSizes::default();
        assert_eq!(sampler.run(&init, &steps).unwrap(), sampler.run(&init, &steps).unwrap());
        assert_ne!(
            sampler.run_chain(&init, &steps, 1).unwrap().draws(),
            sampler.run_chain(&init, &steps, 2).unwrap().draws()
        );
    }

    #[test]
    fn test_zero_steps_reject_nothing_and_never_move() {
        let sampler = bs_sampler(SamplerConfig {
            n_iter: 30,
            burn_in: 0,
            ..Default::default()
        });
        let init = HestonParams::default();
        let steps = HestonStepSizes::new(0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let chain = sampler.run(&init, &steps).unwrap();
        // Δ = 0 so ln u < 0 accepts almost surely, and the state never changes.
        assert!(chain.draws().iter().all(|d| *d == init));
    }

    #[test]
    fn test_infeasible_rho_never_accepted() {
        let sampler = bs_sampler(SamplerConfig {
            n_iter: 200,
            burn_in: 0,
            ..Default::default()
        });
        let mut init = HestonParams::default();
        init.rho = 0.95;
        // Huge rho steps push most candidates onto the clamped bound.
        let steps = HestonStepSizes::new(0.0, 0.0, 0.0, 5.0, 0.0).unwrap();
        let chain = sampler.run(&init, &steps).unwrap();
        assert!(chain.draws().iter().all(|d| d.rho.abs() < 0.999));
        assert!(chain.final_state().rho.abs() < 0.999);
    }

    #[test]
    fn test_infeasible_initial_state() {
        let sampler = bs_sampler(SamplerConfig::default());
        let mut init = HestonParams::default();
        init.rho = 0.9995;
        assert!(matches!(
            sampler.run(&init, &HestonStepSizes::default()),
            Err(OptimiserError::InfeasibleInitialState(_))
        ));
    }

    #[test]
    fn test_invalid_steps_rejected() {
        let sampler = bs_sampler(SamplerConfig::default());
        let mut steps = HestonStepSizes::default();
        steps.theta = f64::NAN;
        assert!(matches!(
            sampler.run(&HestonParams::default(), &steps),
            Err(OptimiserError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_nan_initial_likelihood_is_fatal() {
        let nan_pricer = |_: &PricingRequest| -> Result<PriceEstimate, PricingError> {
            Ok(PriceEstimate::exact(f64::NAN))
        };
        let sampler = MetropolisHastings::new(
            market(),
            quotes(),
            SamplerConfig::default(),
            nan_pricer,
        )
        .unwrap();
        assert!(matches!(
            sampler.run(&HestonParams::default(), &HestonStepSizes::default()),
            Err(OptimiserError::NonFiniteScore(_))
        ));
    }

    #[test]
    fn test_run_chains_in_seed_order() {
        let sampler = bs_sampler(SamplerConfig {
            n_iter: 60,
            burn_in: 10,
            ..Default::default()
        });
        let init = HestonParams::default();
        let steps = HestonStepSizes::default();
        let chains = sampler.run_chains(&init, &steps, &[5, 6, 7]).unwrap();
        assert_eq!(chains.len(), 3);
        for (chain, seed) in chains.iter().zip([5, 6, 7]) {
            assert_eq!(chain.seed(), seed);
            assert_eq!(chain, &sampler.run_chain(&init, &steps, seed).unwrap());
        }
    }
}

//! Monte Carlo pricing engine.
//!
//! [`HestonMcPricer`] validates the request, simulates terminal prices with
//! [`HestonPathSimulator`](super::paths::HestonPathSimulator), discounts the
//! payoffs and aggregates them into a [`PriceEstimate`].
//!
//! The standard error is the *population* standard deviation of the
//! discounted payoffs divided by `sqrt(n)`.

use pricer_core::types::PricingError;
use pricer_models::models::HestonModel;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::paths::HestonPathSimulator;
use crate::engine::{OptionPricer, PriceEstimate, PricingRequest};
use crate::rng::PricerRng;

/// Running mean and sum of squared deviations of discounted payoffs.
///
/// Welford updates; partial results from independent partitions are combined
/// with [`merge`](Self::merge).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayoffStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl PayoffStats {
    /// Adds one sample.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Folds `other` into `self` (Chan et al. pairwise update).
    pub fn merge(&mut self, other: &PayoffStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;
        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
    }

    /// Number of samples.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sample mean (0 when empty).
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (0 with fewer than two samples).
    #[inline]
    pub fn population_variance(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / self.count as f64).max(0.0)
        } else {
            0.0
        }
    }

    /// Converts to an estimate; no samples gives `{0, 0}`.
    pub fn estimate(&self) -> PriceEstimate {
        if self.count == 0 {
            return PriceEstimate::default();
        }
        PriceEstimate {
            price: self.mean,
            std_error: self.population_variance().sqrt() / (self.count as f64).sqrt(),
        }
    }
}

/// Heston Monte Carlo pricer.
///
/// Stateless: every call builds its generator from the request's seed, so
/// identical requests give bit-identical estimates.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionKind;
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::engine::{OptionPricer, PricingRequest};
/// use pricer_pricing::mc::{HestonMcPricer, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .n_paths(2_000)
///     .n_steps(20)
///     .seed(7)
///     .build()
///     .unwrap();
/// let request = PricingRequest {
///     spot: 100.0,
///     strike: 100.0,
///     maturity: 0.5,
///     rate: 0.01,
///     carry: 0.0,
///     params: HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap(),
///     config,
///     kind: OptionKind::Call,
/// };
///
/// let a = HestonMcPricer.price(&request).unwrap();
/// let b = HestonMcPricer.price(&request).unwrap();
/// assert_eq!(a, b);
/// assert!(a.price > 0.0 && a.std_error > 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HestonMcPricer;

impl HestonMcPricer {
    /// Sequential reference pricing on the root stream of the request seed.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidInput`] for invalid market inputs, Heston
    /// parameters or simulation config.
    pub fn price(&self, request: &PricingRequest) -> Result<PriceEstimate, PricingError> {
        let Some(simulator) = Self::prepare(request)? else {
            return Ok(PriceEstimate::exact(request.discounted_intrinsic()));
        };

        let mut rng = PricerRng::from_seed(request.config.seed());
        let stats = Self::run(
            &simulator,
            request,
            &mut rng,
            request.config.outer_iterations(),
        );
        let estimate = stats.estimate();

        trace!(
            strike = request.strike,
            maturity = request.maturity,
            kind = %request.kind,
            samples = stats.count(),
            price = estimate.price,
            std_error = estimate.std_error,
            "heston mc price"
        );
        Ok(estimate)
    }

    /// Parallel pricing over `n_partitions` contiguous blocks of outer
    /// iterations.
    ///
    /// Partition `i` runs on substream `i` of the request seed and the
    /// partial statistics are merged in partition order, so the result is
    /// reproducible for a fixed `(seed, n_partitions)`. It is a different
    /// sample from [`price`](Self::price).
    ///
    /// # Errors
    ///
    /// As [`price`](Self::price), plus `n_partitions == 0`.
    pub fn price_partitioned(
        &self,
        request: &PricingRequest,
        n_partitions: usize,
    ) -> Result<PriceEstimate, PricingError> {
        if n_partitions == 0 {
            return Err(PricingError::InvalidInput(
                "n_partitions must be at least 1".to_string(),
            ));
        }
        let Some(simulator) = Self::prepare(request)? else {
            return Ok(PriceEstimate::exact(request.discounted_intrinsic()));
        };

        let outer = request.config.outer_iterations();
        let base = outer / n_partitions;
        let remainder = outer % n_partitions;
        let seed = request.config.seed();

        let partials: Vec<PayoffStats> = (0..n_partitions)
            .into_par_iter()
            .map(|partition| {
                let iterations = base + usize::from(partition < remainder);
                let mut rng = PricerRng::for_stream(seed, partition as u64);
                Self::run(&simulator, request, &mut rng, iterations)
            })
            .collect();

        let stats = partials.iter().fold(PayoffStats::default(), |mut acc, p| {
            acc.merge(p);
            acc
        });
        let estimate = stats.estimate();

        debug!(
            n_partitions,
            samples = stats.count(),
            price = estimate.price,
            std_error = estimate.std_error,
            "partitioned heston mc price"
        );
        Ok(estimate)
    }

    /// Validates the request; `None` means the option has expired.
    fn prepare(request: &PricingRequest) -> Result<Option<HestonPathSimulator>, PricingError> {
        request.validate()?;
        request.config.validate()?;

        if request.maturity <= 0.0 {
            return Ok(None);
        }

        if !request.params.satisfies_feller() {
            debug!(
                feller_ratio = request.params.feller_ratio(),
                "Feller condition violated; variance floor will bind"
            );
        }

        let model = HestonModel::new(request.params, request.config.scheme())?;
        Ok(Some(HestonPathSimulator::new(
            model,
            request.spot,
            request.rate,
            request.carry,
            request.maturity,
            request.config.n_steps(),
        )))
    }

    fn run(
        simulator: &HestonPathSimulator,
        request: &PricingRequest,
        rng: &mut PricerRng,
        outer_iterations: usize,
    ) -> PayoffStats {
        let discount = request.discount_factor();
        let mut stats = PayoffStats::default();
        simulator.simulate(rng, outer_iterations, request.config.antithetic(), |state| {
            stats.push(discount * request.kind.payoff(state.spot(), request.strike));
        });
        stats
    }
}

impl OptionPricer for HestonMcPricer {
    fn price(&self, request: &PricingRequest) -> Result<PriceEstimate, PricingError> {
        HestonMcPricer::price(self, request)
    }
}

//! Prior over Heston parameters.
//!
//! kappa, theta, sigma_v and v0 get independent half-normal priors; rho is
//! uniform on (-0.999, 0.999). Anything outside that support scores
//! negative infinity instead of erroring.

use pricer_models::analytical::half_normal_log_pdf;
use pricer_models::models::HestonParams;

/// Open bound on |rho| accepted by the prior and enforced by proposals.
pub const RHO_BOUND: f64 = 0.999;

/// Default half-normal scale.
pub const DEFAULT_PRIOR_SD: f64 = 2.0;

/// Weakly informative half-normal / uniform prior.
///
/// # Examples
///
/// ```
/// use pricer_models::models::HestonParams;
/// use pricer_optimiser::bayesian::HalfNormalPrior;
///
/// let prior = HalfNormalPrior::default();
/// let params = HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap();
/// assert!(prior.log_density(&params).is_finite());
///
/// let mut edge = params;
/// edge.rho = 0.9995;
/// assert_eq!(prior.log_density(&edge), f64::NEG_INFINITY);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfNormalPrior {
    sd: f64,
}

impl HalfNormalPrior {
    /// Prior with half-normal scale `sd`.
    ///
    /// Returns `None` unless `sd` is positive and finite.
    pub fn new(sd: f64) -> Option<Self> {
        (sd.is_finite() && sd > 0.0).then_some(Self { sd })
    }

    /// Half-normal scale.
    #[inline]
    pub fn sd(&self) -> f64 {
        self.sd
    }

    /// Log prior density, `-inf` outside the support.
    pub fn log_density(&self, params: &HestonParams) -> f64 {
        if !(params.rho > -RHO_BOUND && params.rho < RHO_BOUND) {
            return f64::NEG_INFINITY;
        }
        let positives = [params.kappa, params.theta, params.sigma_v, params.v0];
        if positives.iter().any(|x| !(x.is_finite() && *x > 0.0)) {
            return f64::NEG_INFINITY;
        }
        let log_positives: f64 = positives
            .iter()
            .map(|x| half_normal_log_pdf(*x, self.sd))
            .sum();
        log_positives - (2.0 * RHO_BOUND).ln()
    }

    /// Whether `params` lies inside the support.
    #[inline]
    pub fn is_feasible(&self, params: &HestonParams) -> bool {
        self.log_density(params) > f64::NEG_INFINITY
    }
}

impl Default for HalfNormalPrior {
    fn default() -> Self {
        Self {
            sd: DEFAULT_PRIOR_SD,
        }
    }
}

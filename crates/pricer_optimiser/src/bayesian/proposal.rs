//! Random-walk proposal with reflection at zero and clamping of rho.

use pricer_models::models::{HestonParams, HestonStepSizes};
use pricer_pricing::rng::PricerRng;

use super::prior::RHO_BOUND;

/// Smallest value a positive parameter can be proposed at.
pub const MIN_POSITIVE: f64 = 1e-6;

/// Gaussian random walk on the five Heston parameters.
///
/// Positive parameters are reflected at zero and floored at
/// [`MIN_POSITIVE`]; rho is clamped to `[-0.999, 0.999]`. Normals are drawn
/// in the order kappa, theta, sigma_v, v0, rho.
///
/// The reflection and clamping make the kernel asymmetric near the
/// boundaries, while the sampler's acceptance rule treats it as symmetric.
/// The prior puts vanishing mass there, so the bias is negligible in
/// practice; a clamped rho at the bound is rejected by the prior.
///
/// # Examples
///
/// ```
/// use pricer_models::models::{HestonParams, HestonStepSizes};
/// use pricer_optimiser::bayesian::RandomWalkProposal;
/// use pricer_pricing::rng::PricerRng;
///
/// let proposal = RandomWalkProposal::new(HestonStepSizes::default());
/// let mut rng = PricerRng::from_seed(1);
/// let next = proposal.propose(&HestonParams::default(), &mut rng);
/// assert!(next.kappa >= 1e-6 && next.rho.abs() <= 0.999);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomWalkProposal {
    steps: HestonStepSizes,
}

impl RandomWalkProposal {
    /// Proposal with per-parameter standard deviations `steps`.
    pub fn new(steps: HestonStepSizes) -> Self {
        Self { steps }
    }

    /// Step sizes.
    #[inline]
    pub fn steps(&self) -> &HestonStepSizes {
        &self.steps
    }

    /// Draws a candidate around `current`.
    pub fn propose(&self, current: &HestonParams, rng: &mut PricerRng) -> HestonParams {
        let mut reflect = |x: f64, step: f64| (x + step * rng.gen_normal()).abs().max(MIN_POSITIVE);

        let kappa = reflect(current.kappa, self.steps.kappa);
        let theta = reflect(current.theta, self.steps.theta);
        let sigma_v = reflect(current.sigma_v, self.steps.sigma_v);
        let v0 = reflect(current.v0, self.steps.v0);
        let rho = (current.rho + self.steps.rho * rng.gen_normal()).clamp(-RHO_BOUND, RHO_BOUND);

        HestonParams {
            kappa,
            theta,
            sigma_v,
            rho,
            v0,
        }
    }
}

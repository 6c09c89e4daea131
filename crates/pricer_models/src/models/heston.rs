//! Heston stochastic volatility model.
//!
//! The Heston model is described by the SDE system:
//! ```text
//! dS = (r - q) * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + sigma_v * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//! where:
//! - S = asset price, V = instantaneous variance
//! - r = risk-free rate, q = dividend yield / carry
//! - kappa = mean-reversion speed
//! - theta = long-run variance
//! - sigma_v = volatility of variance (vol-of-vol)
//! - rho = spot/variance correlation
//!
//! ## Feller condition
//!
//! Sufficient condition for the continuous variance process to stay positive:
//! ```text
//! 2 * kappa * theta > sigma_v^2
//! ```
//! The discretised process can still reach zero, so every step floors the
//! variance at zero (see [`VarianceScheme`]).
//!
//! ## Discretisation
//!
//! [`HestonModel::step`] advances the pair (log S, V) by one Euler step:
//! ```text
//! v_pos  = max(V, 0)
//! V'     = max(V + kappa (theta - v_pos) dt + sigma_v sqrt(v_pos) w2 sqrt(dt), 0)
//! ln S'  = ln S + (r - q - v_pos / 2) dt + sqrt(v_pos) w1 sqrt(dt)
//! ```
//! with correlated shocks `w1 = z1`, `w2 = rho z1 + sqrt(1 - rho^2) z2`.
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::heston::{HestonModel, HestonParams, HestonState, VarianceScheme};
//!
//! let params = HestonParams::new(1.5, 0.04, 0.3, -0.7, 0.04).unwrap();
//! assert!(params.satisfies_feller());
//!
//! let model = HestonModel::new(params, VarianceScheme::FullTruncation).unwrap();
//! let state = HestonState::new(100.0, params.v0);
//! let dt = 1.0 / 252.0;
//! let next = model.step(state, 0.05, dt, dt.sqrt(), 0.5, -1.2);
//! assert!(next.variance >= 0.0);
//! assert!(next.spot() > 0.0);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Parameter names in canonical order, matching [`HestonParams::to_array`].
pub const PARAM_NAMES: [&str; 5] = ["kappa", "theta", "sigma_v", "rho", "v0"];

/// Floor applied to the initial variance of a simulated path.
pub const INITIAL_VARIANCE_FLOOR: f64 = 1e-12;

/// Heston model error type.
///
/// Represents parameter validation failures. Uses `thiserror` for
/// structured error information.
///
/// # Example
///
/// ```
/// use pricer_models::models::heston::HestonError;
///
/// let err = HestonError::InvalidKappa(-1.0);
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// Mean-reversion speed must be positive and finite
    #[error("Invalid mean-reversion speed: kappa = {0} (must be positive and finite)")]
    InvalidKappa(f64),

    /// Long-run variance must be positive and finite
    #[error("Invalid long-run variance: theta = {0} (must be positive and finite)")]
    InvalidTheta(f64),

    /// Vol-of-vol must be positive and finite
    #[error("Invalid vol-of-vol: sigma_v = {0} (must be positive and finite)")]
    InvalidSigmaV(f64),

    /// Correlation must lie strictly inside (-1, 1)
    #[error("Invalid correlation: rho = {0} (must lie strictly inside (-1, 1))")]
    InvalidRho(f64),

    /// Initial variance must be positive and finite
    #[error("Invalid initial variance: v0 = {0} (must be positive and finite)")]
    InvalidV0(f64),

    /// Proposal step size must be non-negative and finite
    #[error("Invalid step size for {name}: {value} (must be non-negative and finite)")]
    InvalidStepSize {
        /// Parameter the step size belongs to
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Unknown variance discretisation scheme identifier
    #[error("Unknown variance scheme: {0} (expected full_truncation or euler)")]
    UnknownScheme(String),
}

impl From<HestonError> for pricer_core::types::PricingError {
    fn from(err: HestonError) -> Self {
        pricer_core::types::PricingError::InvalidInput(err.to_string())
    }
}

/// Heston model parameters.
///
/// A plain `Copy` value: samplers never mutate a parameter set in place,
/// they build a new one.
///
/// # Fields
///
/// * `kappa` - Mean-reversion speed (kappa > 0)
/// * `theta` - Long-run variance (theta > 0)
/// * `sigma_v` - Volatility of variance (sigma_v > 0)
/// * `rho` - Spot/variance correlation (-1 < rho < 1)
/// * `v0` - Initial variance (v0 > 0)
///
/// # Example
///
/// ```
/// use pricer_models::models::heston::HestonParams;
///
/// assert!(HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).is_ok());
/// assert!(HestonParams::new(2.0, 0.04, 0.6, 1.0, 0.04).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Mean-reversion speed
    pub kappa: f64,
    /// Long-run variance
    pub theta: f64,
    /// Volatility of variance
    pub sigma_v: f64,
    /// Spot/variance correlation
    pub rho: f64,
    /// Initial variance
    pub v0: f64,
}

impl HestonParams {
    /// Creates a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns the first [`HestonError`] found by [`HestonParams::validate`].
    pub fn new(kappa: f64, theta: f64, sigma_v: f64, rho: f64, v0: f64) -> Result<Self, HestonError> {
        let params = Self {
            kappa,
            theta,
            sigma_v,
            rho,
            v0,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validates the parameter domain.
    pub fn validate(&self) -> Result<(), HestonError> {
        if !is_positive_finite(self.kappa) {
            return Err(HestonError::InvalidKappa(self.kappa));
        }
        if !is_positive_finite(self.theta) {
            return Err(HestonError::InvalidTheta(self.theta));
        }
        if !is_positive_finite(self.sigma_v) {
            return Err(HestonError::InvalidSigmaV(self.sigma_v));
        }
        // NaN fails both comparisons
        if !(self.rho > -1.0 && self.rho < 1.0) {
            return Err(HestonError::InvalidRho(self.rho));
        }
        if !is_positive_finite(self.v0) {
            return Err(HestonError::InvalidV0(self.v0));
        }
        Ok(())
    }

    /// Returns `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|x| x.is_finite())
    }

    /// Checks the Feller condition (2 * kappa * theta > sigma_v^2).
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// // 2 * 1.5 * 0.04 = 0.12 > 0.3^2 = 0.09
    /// let params = HestonParams::new(1.5, 0.04, 0.3, -0.7, 0.04).unwrap();
    /// assert!(params.satisfies_feller());
    ///
    /// // 2 * 0.5 * 0.04 = 0.04 < 0.5^2 = 0.25
    /// let params = HestonParams::new(0.5, 0.04, 0.5, -0.7, 0.04).unwrap();
    /// assert!(!params.satisfies_feller());
    /// ```
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta > self.sigma_v * self.sigma_v
    }

    /// Feller ratio 2 * kappa * theta / sigma_v^2 (>= 1 when the condition holds).
    pub fn feller_ratio(&self) -> f64 {
        let denominator = self.sigma_v * self.sigma_v;
        if denominator > 0.0 {
            2.0 * self.kappa * self.theta / denominator
        } else {
            f64::INFINITY
        }
    }

    /// Components in the order of [`PARAM_NAMES`].
    pub fn to_array(&self) -> [f64; 5] {
        [self.kappa, self.theta, self.sigma_v, self.rho, self.v0]
    }

    /// Builds a parameter set from components in the order of [`PARAM_NAMES`]
    /// without validation.
    pub fn from_array(values: [f64; 5]) -> Self {
        Self {
            kappa: values[0],
            theta: values[1],
            sigma_v: values[2],
            rho: values[3],
            v0: values[4],
        }
    }
}

impl Default for HestonParams {
    /// Standard equity parameter set:
    /// kappa = 1.5, theta = 0.04, sigma_v = 0.3, rho = -0.7, v0 = 0.04
    fn default() -> Self {
        Self {
            kappa: 1.5,
            theta: 0.04,
            sigma_v: 0.3,
            rho: -0.7,
            v0: 0.04,
        }
    }
}

impl fmt::Display for HestonParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kappa={:.4}, theta={:.4}, sigma_v={:.4}, rho={:.4}, v0={:.4}",
            self.kappa, self.theta, self.sigma_v, self.rho, self.v0
        )
    }
}

/// Per-parameter standard deviations of the random-walk proposal.
///
/// # Example
///
/// ```
/// use pricer_models::models::heston::HestonStepSizes;
///
/// let steps = HestonStepSizes::new(0.3, 0.02, 0.2, 0.1, 0.02).unwrap();
/// assert_eq!(steps.rho, 0.1);
/// assert!(HestonStepSizes::new(-0.3, 0.02, 0.2, 0.1, 0.02).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonStepSizes {
    /// Step size for kappa
    pub kappa: f64,
    /// Step size for theta
    pub theta: f64,
    /// Step size for sigma_v
    pub sigma_v: f64,
    /// Step size for rho
    pub rho: f64,
    /// Step size for v0
    pub v0: f64,
}

impl HestonStepSizes {
    /// Creates validated step sizes.
    pub fn new(kappa: f64, theta: f64, sigma_v: f64, rho: f64, v0: f64) -> Result<Self, HestonError> {
        let steps = Self {
            kappa,
            theta,
            sigma_v,
            rho,
            v0,
        };
        steps.validate()?;
        Ok(steps)
    }

    /// Every step size must be finite and non-negative.
    pub fn validate(&self) -> Result<(), HestonError> {
        for (name, value) in PARAM_NAMES.into_iter().zip(self.to_array()) {
            if !(value.is_finite() && value >= 0.0) {
                return Err(HestonError::InvalidStepSize { name, value });
            }
        }
        Ok(())
    }

    /// Components in the order of [`PARAM_NAMES`].
    pub fn to_array(&self) -> [f64; 5] {
        [self.kappa, self.theta, self.sigma_v, self.rho, self.v0]
    }
}

impl Default for HestonStepSizes {
    fn default() -> Self {
        Self {
            kappa: 0.3,
            theta: 0.02,
            sigma_v: 0.2,
            rho: 0.1,
            v0: 0.02,
        }
    }
}

/// Variance discretisation scheme.
///
/// Both schemes evaluate the diffusion coefficient on the truncated variance
/// `max(V, 0)` and floor the updated variance at zero, so simulated paths stay
/// well-defined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VarianceScheme {
    /// Full truncation (Andersen 2008): the drift also uses `max(V, 0)`.
    #[default]
    FullTruncation,
    /// Plain Euler: the drift uses the raw variance.
    Euler,
}

impl VarianceScheme {
    /// Scheme identifier, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            VarianceScheme::FullTruncation => "full_truncation",
            VarianceScheme::Euler => "euler",
        }
    }
}

impl fmt::Display for VarianceScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VarianceScheme {
    type Err = HestonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "full_truncation" | "ft" => Ok(VarianceScheme::FullTruncation),
            "euler" => Ok(VarianceScheme::Euler),
            _ => Err(HestonError::UnknownScheme(s.to_string())),
        }
    }
}

/// Simulation state of one Heston path: log asset price and variance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HestonState {
    /// Natural log of the asset price
    pub log_spot: f64,
    /// Instantaneous variance (never negative after a step)
    pub variance: f64,
}

impl HestonState {
    /// Initial state for a path starting at `spot` with variance `v0`.
    ///
    /// The variance is floored at [`INITIAL_VARIANCE_FLOOR`].
    #[inline]
    pub fn new(spot: f64, v0: f64) -> Self {
        Self {
            log_spot: spot.ln(),
            variance: v0.max(INITIAL_VARIANCE_FLOOR),
        }
    }

    /// Asset price `exp(log_spot)`.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.log_spot.exp()
    }
}

/// Heston model with a fixed discretisation scheme.
///
/// Caches `sqrt(1 - rho^2)` so the per-step correlation costs one
/// multiply-add.
#[derive(Clone, Debug)]
pub struct HestonModel {
    params: HestonParams,
    scheme: VarianceScheme,
    rho_complement: f64,
}

impl HestonModel {
    /// Creates a model after validating the parameters.
    pub fn new(params: HestonParams, scheme: VarianceScheme) -> Result<Self, HestonError> {
        params.validate()?;
        let rho_complement = (1.0 - params.rho * params.rho).max(0.0).sqrt();
        Ok(Self {
            params,
            scheme,
            rho_complement,
        })
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// Variance discretisation scheme.
    #[inline]
    pub fn scheme(&self) -> VarianceScheme {
        self.scheme
    }

    /// Correlates two independent standard normals by Cholesky decomposition.
    ///
    /// ```text
    /// w1 = z1
    /// w2 = rho * z1 + sqrt(1 - rho^2) * z2
    /// ```
    #[inline]
    pub fn correlated_shocks(&self, z1: f64, z2: f64) -> (f64, f64) {
        (z1, self.params.rho * z1 + self.rho_complement * z2)
    }

    /// Advances one time step.
    ///
    /// # Arguments
    /// * `state` - Current (log price, variance)
    /// * `carry_drift` - r - q
    /// * `dt` - Time step
    /// * `sqrt_dt` - Square root of `dt` (hoisted by the caller)
    /// * `z1`, `z2` - Independent standard normals
    #[inline]
    pub fn step(
        &self,
        state: HestonState,
        carry_drift: f64,
        dt: f64,
        sqrt_dt: f64,
        z1: f64,
        z2: f64,
    ) -> HestonState {
        let HestonParams {
            kappa,
            theta,
            sigma_v,
            ..
        } = self.params;
        let (w1, w2) = self.correlated_shocks(z1, z2);

        let v = state.variance;
        let v_pos = v.max(0.0);
        let sqrt_v = v_pos.sqrt();

        let mean_reversion = match self.scheme {
            VarianceScheme::FullTruncation => kappa * (theta - v_pos),
            VarianceScheme::Euler => kappa * (theta - v),
        };
        let variance = (v + mean_reversion * dt + sigma_v * sqrt_v * w2 * sqrt_dt).max(0.0);

        // price uses the pre-update truncated variance
        let log_spot = state.log_spot + (carry_drift - 0.5 * v_pos) * dt + sqrt_v * w1 * sqrt_dt;

        HestonState { log_spot, variance }
    }
}

#[inline]
fn is_positive_finite(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::PricingError;

    fn standard() -> HestonParams {
        HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap()
    }

    // ================================================================
    // HestonError
    // ================================================================

    #[test]
    fn test_heston_error_display() {
        assert!(HestonError::InvalidKappa(-1.0).to_string().contains("kappa = -1"));
        assert!(HestonError::InvalidRho(1.5).to_string().contains("rho = 1.5"));
        assert!(HestonError::UnknownScheme("qe".into())
            .to_string()
            .contains("qe"));
        let err = HestonError::InvalidStepSize {
            name: "theta",
            value: -0.1,
        };
        assert!(err.to_string().contains("theta"));
    }

    #[test]
    fn test_heston_error_to_pricing_error() {
        let err: PricingError = HestonError::InvalidV0(0.0).into();
        assert!(matches!(err, PricingError::InvalidInput(msg) if msg.contains("v0")));
    }

    // ================================================================
    // HestonParams
    // ================================================================

    #[test]
    fn test_heston_params_new_valid() {
        let p = standard();
        assert_eq!(p.kappa, 2.0);
        assert_eq!(p.theta, 0.04);
        assert_eq!(p.sigma_v, 0.6);
        assert_eq!(p.rho, -0.6);
        assert_eq!(p.v0, 0.04);
    }

    #[test]
    fn test_heston_params_rejects_non_positive() {
        assert_eq!(
            HestonParams::new(0.0, 0.04, 0.6, -0.6, 0.04),
            Err(HestonError::InvalidKappa(0.0))
        );
        assert_eq!(
            HestonParams::new(2.0, -0.04, 0.6, -0.6, 0.04),
            Err(HestonError::InvalidTheta(-0.04))
        );
        assert_eq!(
            HestonParams::new(2.0, 0.04, 0.0, -0.6, 0.04),
            Err(HestonError::InvalidSigmaV(0.0))
        );
        assert_eq!(
            HestonParams::new(2.0, 0.04, 0.6, -0.6, -1.0),
            Err(HestonError::InvalidV0(-1.0))
        );
    }

    #[test]
    fn test_heston_params_rejects_non_finite() {
        assert!(HestonParams::new(f64::INFINITY, 0.04, 0.6, -0.6, 0.04).is_err());
        assert!(HestonParams::new(2.0, f64::NAN, 0.6, -0.6, 0.04).is_err());
        assert!(HestonParams::new(2.0, 0.04, 0.6, f64::NAN, 0.04).is_err());
    }

    #[test]
    fn test_heston_params_rho_is_strict() {
        assert!(HestonParams::new(2.0, 0.04, 0.6, 1.0, 0.04).is_err());
        assert!(HestonParams::new(2.0, 0.04, 0.6, -1.0, 0.04).is_err());
        assert!(HestonParams::new(2.0, 0.04, 0.6, 0.999, 0.04).is_ok());
        assert!(HestonParams::new(2.0, 0.04, 0.6, -0.999, 0.04).is_ok());
    }

    #[test]
    fn test_heston_params_feller() {
        assert!(HestonParams::default().satisfies_feller());
        assert!(!standard().satisfies_feller());
        assert_relative_eq!(standard().feller_ratio(), 0.16 / 0.36, epsilon = 1e-12);
    }

    #[test]
    fn test_heston_params_array_roundtrip_order() {
        let p = standard();
        let arr = p.to_array();
        assert_eq!(arr, [2.0, 0.04, 0.6, -0.6, 0.04]);
        assert_eq!(HestonParams::from_array(arr), p);
        assert_eq!(PARAM_NAMES[3], "rho");
    }

    #[test]
    fn test_heston_params_display() {
        let text = standard().to_string();
        assert!(text.contains("kappa=2.0000"));
        assert!(text.contains("rho=-0.6000"));
    }

    // ================================================================
    // HestonStepSizes / VarianceScheme
    // ================================================================

    #[test]
    fn test_step_sizes_validation() {
        assert!(HestonStepSizes::default().validate().is_ok());
        assert!(HestonStepSizes::new(0.0, 0.0, 0.0, 0.0, 0.0).is_ok());
        let err = HestonStepSizes::new(0.3, 0.02, f64::NAN, 0.1, 0.02).unwrap_err();
        assert!(matches!(
            err,
            HestonError::InvalidStepSize {
                name: "sigma_v",
                ..
            }
        ));
    }

    #[test]
    fn test_variance_scheme_parse() {
        assert_eq!(
            "full_truncation".parse::<VarianceScheme>().unwrap(),
            VarianceScheme::FullTruncation
        );
        assert_eq!(
            "Full-Truncation".parse::<VarianceScheme>().unwrap(),
            VarianceScheme::FullTruncation
        );
        assert_eq!("euler".parse::<VarianceScheme>().unwrap(), VarianceScheme::Euler);
        assert!("qe".parse::<VarianceScheme>().is_err());
        assert_eq!(VarianceScheme::default(), VarianceScheme::FullTruncation);
        assert_eq!(VarianceScheme::Euler.to_string(), "euler");
    }

    // ================================================================
    // HestonModel
    // ================================================================

    #[test]
    fn test_model_rejects_invalid_params() {
        let bad = HestonParams {
            rho: 1.2,
            ..HestonParams::default()
        };
        assert!(HestonModel::new(bad, VarianceScheme::FullTruncation).is_err());
    }

    #[test]
    fn test_correlated_shocks_cholesky() {
        let params = HestonParams {
            rho: 0.6,
            ..HestonParams::default()
        };
        let model = HestonModel::new(params, VarianceScheme::FullTruncation).unwrap();
        let (w1, w2) = model.correlated_shocks(1.0, 2.0);
        assert_eq!(w1, 1.0);
        assert_relative_eq!(w2, 0.6 + 0.8 * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_step_floors_variance() {
        let model = HestonModel::new(standard(), VarianceScheme::FullTruncation).unwrap();
        let state = HestonState::new(100.0, 0.0001);
        // a large negative variance shock would push the raw update below zero
        let next = model.step(state, 0.01, 0.1, 0.1_f64.sqrt(), 0.0, -10.0);
        assert_eq!(next.variance, 0.0);
        assert!(next.spot() > 0.0);
    }

    #[test]
    fn test_step_zero_variance_is_deterministic_drift() {
        let model = HestonModel::new(standard(), VarianceScheme::Euler).unwrap();
        let state = HestonState {
            log_spot: 100.0_f64.ln(),
            variance: 0.0,
        };
        let dt = 0.01;
        let next = model.step(state, 0.03, dt, dt.sqrt(), 3.0, 3.0);
        assert_relative_eq!(next.log_spot, 100.0_f64.ln() + 0.03 * dt, epsilon = 1e-14);
        // only mean reversion remains: kappa * theta * dt
        assert_relative_eq!(next.variance, 2.0 * 0.04 * dt, epsilon = 1e-14);
    }

    #[test]
    fn test_step_uses_pre_update_variance_for_price() {
        let model = HestonModel::new(standard(), VarianceScheme::FullTruncation).unwrap();
        let state = HestonState::new(100.0, 0.09);
        let dt = 0.25;
        let next = model.step(state, 0.0, dt, dt.sqrt(), 1.0, 0.0);
        let expected = 100.0_f64.ln() - 0.5 * 0.09 * dt + 0.3 * 1.0 * dt.sqrt();
        assert_relative_eq!(next.log_spot, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_initial_state_floor() {
        let state = HestonState::new(50.0, 0.0);
        assert_eq!(state.variance, INITIAL_VARIANCE_FLOOR);
        assert_relative_eq!(state.spot(), 50.0, epsilon = 1e-12);
    }
}

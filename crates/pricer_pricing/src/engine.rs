//! Pluggable pricing capability.
//!
//! The calibration layer only ever sees [`OptionPricer`]: a function from a
//! [`PricingRequest`] to a [`PriceEstimate`]. Three implementations ship:
//!
//! - [`HestonMcPricer`](crate::mc::HestonMcPricer): the Monte Carlo engine
//! - [`BlackScholesPricer`]: closed form at volatility `sqrt(v0)`
//! - any `Fn(&PricingRequest) -> Result<PriceEstimate, PricingError>`
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::types::{OptionKind, PricingError};
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::engine::{OptionPricer, PriceEstimate, PricingRequest};
//! use pricer_pricing::mc::SimulationConfig;
//!
//! let intrinsic = |req: &PricingRequest| -> Result<PriceEstimate, PricingError> {
//!     Ok(PriceEstimate::exact(req.kind.payoff(req.spot, req.strike)))
//! };
//!
//! let request = PricingRequest {
//!     spot: 110.0,
//!     strike: 100.0,
//!     maturity: 0.5,
//!     rate: 0.01,
//!     carry: 0.0,
//!     params: HestonParams::default(),
//!     config: SimulationConfig::calibration(123),
//!     kind: OptionKind::Call,
//! };
//! assert_eq!(intrinsic.price(&request).unwrap().price, 10.0);
//! ```

use pricer_core::types::{OptionKind, PricingError};
use pricer_models::analytical::BlackScholes;
use pricer_models::models::HestonParams;

use crate::mc::SimulationConfig;

/// Inputs of a single European option valuation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingRequest {
    /// Spot price S.
    pub spot: f64,
    /// Strike K.
    pub strike: f64,
    /// Maturity T in years.
    pub maturity: f64,
    /// Continuously compounded risk-free rate r.
    pub rate: f64,
    /// Continuous carry / dividend yield q.
    pub carry: f64,
    /// Heston parameters.
    pub params: HestonParams,
    /// Simulation budget, scheme and seed.
    pub config: SimulationConfig,
    /// Call or put.
    pub kind: OptionKind,
}

impl PricingRequest {
    /// Checks the market inputs and Heston parameters.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidInput`] when spot or strike is not positive and
    /// finite, rate, carry or maturity is non-finite, or the Heston parameters
    /// are out of domain.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(PricingError::invalid_field("spot", self.spot, "must be positive and finite"));
        }
        if !(self.strike.is_finite() && self.strike > 0.0) {
            return Err(PricingError::invalid_field(
                "strike",
                self.strike,
                "must be positive and finite",
            ));
        }
        if !self.maturity.is_finite() {
            return Err(PricingError::invalid_field("maturity", self.maturity, "must be finite"));
        }
        if !self.rate.is_finite() {
            return Err(PricingError::invalid_field("rate", self.rate, "must be finite"));
        }
        if !self.carry.is_finite() {
            return Err(PricingError::invalid_field("carry", self.carry, "must be finite"));
        }
        self.params.validate()?;
        Ok(())
    }

    /// Discount factor `exp(-r T)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Discounted immediate payoff, the value of an expired option.
    #[inline]
    pub fn discounted_intrinsic(&self) -> f64 {
        self.discount_factor() * self.kind.payoff(self.spot, self.strike)
    }
}

/// Price estimate with its Monte Carlo standard error.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceEstimate {
    /// Present value.
    pub price: f64,
    /// Standard error of the estimate (0 for closed forms).
    pub std_error: f64,
}

impl PriceEstimate {
    /// Estimate without sampling error.
    #[inline]
    pub fn exact(price: f64) -> Self {
        Self {
            price,
            std_error: 0.0,
        }
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }

    /// Returns the 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> f64 {
        2.576 * self.std_error
    }
}

/// Something that can value a [`PricingRequest`].
pub trait OptionPricer {
    /// Prices one European option.
    fn price(&self, request: &PricingRequest) -> Result<PriceEstimate, PricingError>;
}

impl<F> OptionPricer for F
where
    F: Fn(&PricingRequest) -> Result<PriceEstimate, PricingError>,
{
    fn price(&self, request: &PricingRequest) -> Result<PriceEstimate, PricingError> {
        self(request)
    }
}

/// Closed-form Black-Scholes pricer at volatility `sqrt(v0)`.
///
/// Ignores the mean reversion, vol-of-vol and correlation as well as the
/// simulation config. Useful as a fast stand-in for the Monte Carlo engine.
///
/// ```rust
/// use pricer_core::types::OptionKind;
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::engine::{BlackScholesPricer, OptionPricer, PricingRequest};
/// use pricer_pricing::mc::SimulationConfig;
///
/// let request = PricingRequest {
///     spot: 100.0,
///     strike: 100.0,
///     maturity: 1.0,
///     rate: 0.05,
///     carry: 0.0,
///     params: HestonParams::new(1.0, 0.04, 0.3, -0.5, 0.04).unwrap(),
///     config: SimulationConfig::default(),
///     kind: OptionKind::Call,
/// };
/// let estimate = BlackScholesPricer.price(&request).unwrap();
/// assert!((estimate.price - 10.4506).abs() < 1e-3);
/// assert_eq!(estimate.std_error, 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlackScholesPricer;

impl OptionPricer for BlackScholesPricer {
    fn price(&self, request: &PricingRequest) -> Result<PriceEstimate, PricingError> {
        request.validate()?;
        if request.maturity <= 0.0 {
            return Ok(PriceEstimate::exact(request.discounted_intrinsic()));
        }
        let model = BlackScholes::new(
            request.spot,
            request.rate,
            request.carry,
            request.params.v0.sqrt(),
        )?;
        Ok(PriceEstimate::exact(model.price(
            request.strike,
            request.maturity,
            request.kind,
        )))
    }
}

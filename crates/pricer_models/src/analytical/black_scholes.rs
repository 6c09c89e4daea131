//! Black-Scholes closed-form price for European options with continuous carry.
//!
//! Serves as the convergence reference for the Heston Monte Carlo pricer
//! (sigma_v -> 0, v0 = theta collapses Heston onto Black-Scholes at
//! volatility sqrt(theta)) and as a drop-in pricer for calibration.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use pricer_core::types::OptionKind;

use super::distributions::norm_cdf;
use super::error::AnalyticalError;

/// Black-Scholes model for European option pricing.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
/// use pricer_core::types::OptionKind;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
/// let call = bs.price(100.0, 1.0, OptionKind::Call);
/// let put = bs.price(100.0, 1.0, OptionKind::Put);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    carry: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised, continuous)
    /// * `carry` - Continuous dividend / carry yield q
    /// * `volatility` - Volatility (must be non-negative; zero gives the
    ///   deterministic forward payoff)
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0 or non-finite
    /// - `AnalyticalError::InvalidVolatility` if volatility < 0 or non-finite
    /// - `AnalyticalError::NumericalInstability` if rate or carry is non-finite
    pub fn new(spot: f64, rate: f64, carry: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(AnalyticalError::InvalidSpot { spot });
        }
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }
        if !(rate.is_finite() && carry.is_finite()) {
            return Err(AnalyticalError::NumericalInstability {
                message: format!("non-finite rate ({}) or carry ({})", rate, carry),
            });
        }
        Ok(Self {
            spot,
            rate,
            carry,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the carry yield.
    #[inline]
    pub fn carry(&self) -> f64 {
        self.carry
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
    ///
    /// Only meaningful for positive volatility and maturity.
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        ((self.spot / strike).ln()
            + (self.rate - self.carry + 0.5 * self.volatility * self.volatility) * expiry)
            / vol_sqrt_t
    }

    /// d₂ = d₁ - σ√T
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Price of a European option.
    ///
    /// - `expiry <= 0`: immediate payoff `max(±(S - K), 0)`, undiscounted.
    /// - zero volatility: discounted payoff on the deterministic forward.
    pub fn price(&self, strike: f64, expiry: f64, kind: OptionKind) -> f64 {
        if expiry <= 0.0 {
            return kind.payoff(self.spot, strike);
        }

        let df = (-self.rate * expiry).exp();
        let carry_df = (-self.carry * expiry).exp();

        if self.volatility <= 0.0 {
            let forward = self.spot * carry_df / df;
            return df * kind.payoff(forward, strike);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();

        match kind {
            OptionKind::Call => {
                self.spot * carry_df * norm_cdf(d1) - strike * df * norm_cdf(d2)
            }
            OptionKind::Put => {
                strike * df * norm_cdf(-d2) - self.spot * carry_df * norm_cdf(-d1)
            }
        }
    }

    /// Call price shorthand.
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        self.price(strike, expiry, OptionKind::Call)
    }

    /// Put price shorthand.
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        self.price(strike, expiry, OptionKind::Put)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atm_model() -> BlackScholes {
        BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap()
    }

    // ==========================================================
    // Construction
    // ==========================================================

    #[test]
    fn test_new_rejects_bad_inputs() {
        assert!(matches!(
            BlackScholes::new(0.0, 0.05, 0.0, 0.2),
            Err(AnalyticalError::InvalidSpot { .. })
        ));
        assert!(matches!(
            BlackScholes::new(100.0, 0.05, 0.0, -0.1),
            Err(AnalyticalError::InvalidVolatility { .. })
        ));
        assert!(matches!(
            BlackScholes::new(100.0, f64::NAN, 0.0, 0.2),
            Err(AnalyticalError::NumericalInstability { .. })
        ));
        assert!(BlackScholes::new(100.0, 0.05, 0.0, 0.0).is_ok());
    }

    // ==========================================================
    // Prices
    // ==========================================================

    #[test]
    fn test_atm_call_reference_value() {
        // Hull reference: S=K=100, r=5%, σ=20%, T=1 -> 10.4506
        let call = atm_model().price_call(100.0, 1.0);
        assert_relative_eq!(call, 10.450583572185565, epsilon = 1e-4);
    }

    #[test]
    fn test_put_call_parity_with_carry() {
        let bs = BlackScholes::new(100.0, 0.03, 0.01, 0.2).unwrap();
        for strike in [80.0, 100.0, 120.0] {
            for expiry in [0.25, 1.0, 2.0] {
                let call = bs.price_call(strike, expiry);
                let put = bs.price_put(strike, expiry);
                let forward_pv = 100.0 * (-0.01 * expiry).exp() - strike * (-0.03 * expiry).exp();
                assert_relative_eq!(call - put, forward_pv, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_expired_returns_intrinsic() {
        let bs = atm_model();
        assert_eq!(bs.price(90.0, 0.0, OptionKind::Call), 10.0);
        assert_eq!(bs.price(110.0, -1.0, OptionKind::Put), 10.0);
        assert_eq!(bs.price(110.0, 0.0, OptionKind::Call), 0.0);
    }

    #[test]
    fn test_zero_volatility_is_discounted_forward_payoff() {
        let bs = BlackScholes::new(100.0, 0.05, 0.0, 0.0).unwrap();
        let expected = (100.0 - 90.0 * (-0.05_f64).exp()).max(0.0);
        assert_relative_eq!(bs.price_call(90.0, 1.0), expected, epsilon = 1e-12);
        assert_eq!(bs.price_put(90.0, 1.0), 0.0);
    }

    #[test]
    fn test_call_monotone_in_volatility() {
        let low = BlackScholes::new(100.0, 0.0, 0.0, 0.1).unwrap();
        let high = BlackScholes::new(100.0, 0.0, 0.0, 0.3).unwrap();
        assert!(high.price_call(100.0, 1.0) > low.price_call(100.0, 1.0));
    }

    #[test]
    fn test_d2_is_d1_shifted() {
        let bs = atm_model();
        assert_relative_eq!(bs.d1(100.0, 1.0) - bs.d2(100.0, 1.0), 0.2, epsilon = 1e-12);
    }
}

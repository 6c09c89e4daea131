//! Normal distribution functions and log-densities.
//!
//! This module provides:
//! - `norm_cdf`: Standard normal cumulative distribution function (CDF)
//! - `norm_pdf`: Standard normal probability density function (PDF)
//! - `normal_log_pdf`: Log-density of N(mean, sd^2)
//! - `half_normal_log_pdf`: Log-density of a half-normal on (0, inf)
//!
//! The CDF/PDF are generic over `T: Float`; the log-densities work on `f64`
//! because they only feed the Bayesian calibration scores.

use num_traits::Float;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// ln(sqrt(2 * pi))
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// Complementary error function approximation using Horner's method.
///
/// Uses the Abramowitz and Stegun approximation (formula 7.1.26) which provides
/// maximum error of 1.5e-7 for all x.
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let one = T::one();
    let zero = T::zero();

    // For negative x, use erfc(-x) = 2 - erfc(x)
    let abs_x = x.abs();

    // Abramowitz and Stegun constants (7.1.26)
    let a1 = T::from(0.254829592).unwrap_or(zero);
    let a2 = T::from(-0.284496736).unwrap_or(zero);
    let a3 = T::from(1.421413741).unwrap_or(zero);
    let a4 = T::from(-1.453152027).unwrap_or(zero);
    let a5 = T::from(1.061405429).unwrap_or(zero);
    let p = T::from(0.3275911).unwrap_or(zero);

    let t = one / (one + p * abs_x);
    let poly = a1 + t * (a2 + t * (a3 + t * (a4 + t * a5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    if x < zero {
        (one + one) - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// Φ(x) = (1/2) * erfc(-x / sqrt(2)), accurate to about 1e-7.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// assert!(norm_cdf(3.0_f64) > 0.99);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let sqrt_2 = T::from(SQRT_2).unwrap_or(T::one());
    let half = T::from(0.5).unwrap_or(T::one());
    half * erfc_approx(-x / sqrt_2)
}

/// Standard normal probability density function.
///
/// φ(x) = (1 / sqrt(2π)) * exp(-x² / 2)
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0_f64) - 0.3989422804).abs() < 1e-7);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let frac_1_sqrt_2pi = T::from(FRAC_1_SQRT_2PI).unwrap_or(T::one());
    let half = T::from(0.5).unwrap_or(T::one());
    frac_1_sqrt_2pi * (-half * x * x).exp()
}

/// Log-density of a Gaussian N(mean, sd^2) evaluated at `x`.
///
/// ```text
/// ln p(x) = -0.5 * ((x - mean) / sd)^2 - ln(sd * sqrt(2π))
/// ```
///
/// `sd` must be positive; a non-positive `sd` yields negative infinity.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::normal_log_pdf;
///
/// let lp = normal_log_pdf(0.0, 0.0, 1.0);
/// assert!((lp + 0.9189385332).abs() < 1e-9);
/// ```
#[inline]
pub fn normal_log_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    if !(sd > 0.0) {
        return f64::NEG_INFINITY;
    }
    let z = (x - mean) / sd;
    -0.5 * z * z - sd.ln() - LN_SQRT_2PI
}

/// Log-density of a half-normal distribution with scale `sd` on (0, inf).
///
/// ```text
/// ln p(x) = -ln(sd * sqrt(2π)) - 0.5 * (x / sd)^2 + ln 2,   x > 0
/// ```
///
/// Returns negative infinity for `x <= 0` or non-finite `x`.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::half_normal_log_pdf;
///
/// assert!(half_normal_log_pdf(-1.0, 2.0).is_infinite());
/// assert!(half_normal_log_pdf(0.5, 2.0) > half_normal_log_pdf(5.0, 2.0));
/// ```
#[inline]
pub fn half_normal_log_pdf(x: f64, sd: f64) -> f64 {
    if !(x.is_finite() && x > 0.0) {
        return f64::NEG_INFINITY;
    }
    normal_log_pdf(x, 0.0, sd) + std::f64::consts::LN_2
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // norm_cdf / norm_pdf
    // ==========================================================

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(1.0_f64), 0.8413447460685429, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(-1.0_f64), 0.15865525393145707, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(2.0_f64), 0.9772498680518208, epsilon = 1e-7);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [-3.0, -1.0, -0.5, 0.0, 0.5, 1.0, 3.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_norm_cdf_bounds() {
        for i in -100..=100 {
            let x = i as f64 * 0.1;
            let result = norm_cdf(x);
            assert!((0.0..=1.0).contains(&result), "CDF out of [0, 1] at x = {}", x);
        }
    }

    #[test]
    fn test_norm_pdf_reference_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-10);
        assert_relative_eq!(norm_pdf(1.0_f64), 0.24197072451914337, epsilon = 1e-7);
        assert_relative_eq!(norm_pdf(-2.0_f64), 0.05399096651318806, epsilon = 1e-7);
    }

    #[test]
    fn test_cdf_pdf_relationship() {
        let h = 1e-4;
        for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
            let numerical_derivative = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(numerical_derivative, norm_pdf(x), epsilon = 1e-4);
        }
    }

    // ==========================================================
    // Log-densities
    // ==========================================================

    #[test]
    fn test_normal_log_pdf_matches_pdf() {
        for x in [-2.0, -0.3, 0.0, 1.7] {
            assert_relative_eq!(normal_log_pdf(x, 0.0, 1.0), norm_pdf(x).ln(), epsilon = 1e-12);
        }
        // scaled: N(1, 0.5^2) at 2.0 -> z = 2
        let expected = -2.0 - 0.5_f64.ln() - LN_SQRT_2PI;
        assert_relative_eq!(normal_log_pdf(2.0, 1.0, 0.5), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_normal_log_pdf_non_positive_sd() {
        assert_eq!(normal_log_pdf(0.0, 0.0, 0.0), f64::NEG_INFINITY);
        assert_eq!(normal_log_pdf(0.0, 0.0, -1.0), f64::NEG_INFINITY);
        assert_eq!(normal_log_pdf(0.0, 0.0, f64::NAN), f64::NEG_INFINITY);
    }

    #[test]
    fn test_half_normal_log_pdf_formula() {
        let sd: f64 = 2.0;
        let x: f64 = 0.04;
        let expected = -(sd * (2.0 * std::f64::consts::PI).sqrt()).ln() - 0.5 * (x / sd).powi(2)
            + 2.0_f64.ln();
        assert_relative_eq!(half_normal_log_pdf(x, sd), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_half_normal_support() {
        assert_eq!(half_normal_log_pdf(0.0, 2.0), f64::NEG_INFINITY);
        assert_eq!(half_normal_log_pdf(-0.1, 2.0), f64::NEG_INFINITY);
        assert_eq!(half_normal_log_pdf(f64::INFINITY, 2.0), f64::NEG_INFINITY);
        assert!(half_normal_log_pdf(1e-9, 2.0).is_finite());
    }
}

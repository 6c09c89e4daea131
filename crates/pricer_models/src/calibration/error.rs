//! Calibration target error types.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Rejection reasons for a market quote.
///
/// # Examples
/// ```
/// use pricer_models::calibration::QuoteError;
///
/// let err = QuoteError::InvalidStrike(-1.0);
/// assert_eq!(err.to_string(), "Invalid strike: K = -1 (must be positive and finite)");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// Strike not positive and finite.
    #[error("Invalid strike: K = {0} (must be positive and finite)")]
    InvalidStrike(f64),

    /// Maturity not positive and finite.
    #[error("Invalid maturity: T = {0} (must be positive and finite)")]
    InvalidMaturity(f64),

    /// Observed price negative or non-finite.
    #[error("Invalid observed price: {0} (must be non-negative and finite)")]
    InvalidPrice(f64),

    /// Weight negative or non-finite.
    #[error("Invalid weight: {0} (must be non-negative and finite)")]
    InvalidWeight(f64),

    /// Option kind label not recognised.
    #[error("Unknown option kind: {0} (expected call or put)")]
    UnknownOptionKind(String),
}

impl From<QuoteError> for PricingError {
    fn from(err: QuoteError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

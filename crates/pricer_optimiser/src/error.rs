//! Calibration error types.

use pricer_core::types::PricingError;
use pricer_models::calibration::QuoteError;
use thiserror::Error;

/// Errors raised by the Bayesian calibration layer.
///
/// Domain violations of *proposed* parameters are not errors: the prior
/// scores them as impossible and the sampler rejects them. Everything here is
/// a caller mistake detected before sampling starts, or a failure of the
/// pricing capability.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::OptimiserError;
///
/// let err = OptimiserError::InvalidConfig("thin must be at least 1".into());
/// assert!(err.to_string().contains("thin"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimiserError {
    /// No quotes to calibrate against.
    #[error("Quote set is empty")]
    EmptyQuotes,

    /// A quote record failed validation.
    #[error("Invalid quote at row {index}: {source}")]
    InvalidQuote {
        /// Zero-based position in the input
        index: usize,
        /// Underlying validation failure
        source: QuoteError,
    },

    /// Sampler, market or step-size configuration rejected.
    #[error("Invalid calibration config: {0}")]
    InvalidConfig(String),

    /// The initial parameters have zero prior probability.
    #[error("Infeasible initial state: {0}")]
    InfeasibleInitialState(String),

    /// A score evaluated to NaN where a number is required.
    #[error("Non-finite log score: {0}")]
    NonFiniteScore(String),

    /// The pricing capability failed.
    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),
}

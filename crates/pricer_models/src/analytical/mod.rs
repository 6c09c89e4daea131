//! Closed-form references and density helpers.
//!
//! - [`distributions`]: standard normal CDF/PDF, Gaussian and half-normal
//!   log-densities
//! - [`black_scholes`]: Black-Scholes price with continuous carry
//! - [`error`]: [`AnalyticalError`]

pub mod black_scholes;
pub mod distributions;
pub mod error;

pub use black_scholes::BlackScholes;
pub use distributions::{half_normal_log_pdf, norm_cdf, norm_pdf, normal_log_pdf};
pub use error::AnalyticalError;

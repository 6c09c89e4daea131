//! Calibration targets.
//!
//! - [`MarketQuote`]: validated observed option price with a likelihood weight
//! - [`QuoteRecord`]: flat, unvalidated row form used by quote files
//! - [`QuoteError`]: rejection reasons

mod error;
pub mod quote;

pub use error::QuoteError;
pub use quote::{MarketQuote, QuoteRecord};

//! # pricer_optimiser
//!
//! Bayesian calibration of Heston parameters to observed option prices.
//!
//! ## Architecture Position
//!
//! Sits above the pricing engine: the likelihood prices every quote through
//! the [`OptionPricer`](pricer_pricing::engine::OptionPricer) capability, the
//! Heston Monte Carlo pricer by default.
//!
//! ## Modules
//!
//! - `bayesian`: prior, likelihood, proposal, Metropolis-Hastings sampler and
//!   posterior summaries
//!
//! ## Example
//!
//! ```rust
//! use pricer_core::types::OptionKind;
//! use pricer_models::calibration::MarketQuote;
//! use pricer_models::models::{HestonParams, HestonStepSizes};
//! use pricer_optimiser::bayesian::{MarketInputs, MetropolisHastings, SamplerConfig};
//! use pricer_pricing::engine::BlackScholesPricer;
//!
//! let quotes = vec![
//!     MarketQuote::new(95.0, 0.5, 8.4, OptionKind::Call).unwrap(),
//!     MarketQuote::new(105.0, 0.5, 3.6, OptionKind::Call).unwrap(),
//! ];
//! let config = SamplerConfig {
//!     n_iter: 50,
//!     burn_in: 10,
//!     ..SamplerConfig::default()
//! };
//! let sampler = MetropolisHastings::new(
//!     MarketInputs::new(100.0, 0.01, 0.0),
//!     quotes,
//!     config,
//!     BlackScholesPricer,
//! )
//! .unwrap();
//!
//! let chain = sampler
//!     .run(&HestonParams::default(), &HestonStepSizes::default())
//!     .unwrap();
//! assert_eq!(chain.len(), 40);
//! assert!((0.0..=1.0).contains(&chain.acceptance_rate()));
//! ```

#![deny(missing_docs)]

pub mod bayesian;

mod error;

pub use error::OptimiserError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bayesian::*;
    pub use crate::OptimiserError;
}

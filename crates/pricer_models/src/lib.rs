//! # pricer_models: Heston Model Definitions (Layer 2)
//!
//! Layer 2 of the workspace. Depends on `pricer_core` only and provides:
//!
//! - `models`: Heston parameters, variance discretisation schemes and the
//!   single-step evolution used by the Monte Carlo path simulator
//! - `analytical`: Normal distribution helpers, log-densities and the
//!   closed-form Black-Scholes reference price
//! - `calibration`: Market quotes used as calibration targets
//!
//! ## Example
//!
//! ```rust
//! use pricer_models::models::heston::HestonParams;
//! use pricer_models::calibration::MarketQuote;
//! use pricer_core::types::OptionKind;
//!
//! let params = HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap();
//! assert!(!params.satisfies_feller());
//!
//! let quote = MarketQuote::new(100.0, 0.5, 6.1, OptionKind::Call).unwrap();
//! assert_eq!(quote.weight(), 1.0);
//! ```

#![deny(missing_docs)]

pub mod analytical;
pub mod calibration;
pub mod models;

//! Stochastic model definitions.
//!
//! - [`heston`]: Heston stochastic volatility parameters and discretisation

pub mod heston;

pub use heston::{
    HestonError, HestonModel, HestonParams, HestonState, HestonStepSizes, VarianceScheme,
    PARAM_NAMES,
};

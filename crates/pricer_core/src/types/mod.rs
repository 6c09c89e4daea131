//! Core financial types.
//!
//! This module provides:
//! - `error`: Structured error types for pricing operations
//! - `option`: European option kinds (call/put) and their payoffs
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`PricingError`] from `error`
//! - [`OptionKind`], [`ParseOptionKindError`] from `option`

pub mod error;
pub mod option;

// Re-export commonly used types at module level
pub use error::PricingError;
pub use option::{OptionKind, ParseOptionKindError};

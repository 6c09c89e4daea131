//! # pricer_core: Foundation Types for Heston Pricing and Calibration
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer of the workspace, providing:
//! - Error types: `PricingError` (`types::error`)
//! - Option kinds and their terminal payoffs: `OptionKind` (`types::option`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - thiserror: Structured error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{OptionKind, PricingError};
//!
//! let call = OptionKind::Call;
//! assert_eq!(call.payoff(110.0, 100.0), 10.0);
//! assert_eq!(OptionKind::Put.payoff(110.0, 100.0), 0.0);
//!
//! let kind: OptionKind = "put".parse().unwrap();
//! assert_eq!(kind, OptionKind::Put);
//!
//! let err = PricingError::InvalidInput("Negative spot price".to_string());
//! assert_eq!(format!("{}", err), "Invalid input: Negative spot price");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `OptionKind`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod types;

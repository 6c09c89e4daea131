//! # pricer_pricing: Heston Monte Carlo Engine (Layer 3)
//!
//! Layer 3 of the workspace, built on `pricer_core` and `pricer_models`:
//!
//! - [`rng`]: seeded generators and named substreams
//! - [`mc`]: simulation config, Heston path simulator and the Monte Carlo
//!   pricer (sequential and partitioned parallel)
//! - [`engine`]: the [`OptionPricer`](engine::OptionPricer) capability consumed
//!   by calibration, with request/estimate types and a closed-form adapter
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::OptionKind;
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::engine::{BlackScholesPricer, OptionPricer, PricingRequest};
//! use pricer_pricing::mc::{HestonMcPricer, SimulationConfig};
//!
//! let request = PricingRequest {
//!     spot: 100.0,
//!     strike: 100.0,
//!     maturity: 1.0,
//!     rate: 0.02,
//!     carry: 0.0,
//!     params: HestonParams::new(1.5, 0.04, 0.3, -0.7, 0.04).unwrap(),
//!     config: SimulationConfig::calibration(123),
//!     kind: OptionKind::Call,
//! };
//!
//! let mc = HestonMcPricer.price(&request).unwrap();
//! let bs = BlackScholesPricer.price(&request).unwrap();
//! println!("Heston {:.4} vs Black-Scholes {:.4}", mc.price, bs.price);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod engine;
pub mod mc;
pub mod rng;

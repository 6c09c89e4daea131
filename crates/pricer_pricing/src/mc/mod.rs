//! Monte Carlo pricing under the Heston model.
//!
//! # Architecture
//!
//! ```text
//! HestonMcPricer
//! ├── SimulationConfig     (paths, steps, antithetic, scheme, seed)
//! ├── HestonPathSimulator  (Euler variance + log-Euler price)
//! ├── PricerRng            (root stream or partition substreams)
//! └── PayoffStats          (discounted mean, population std error)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::types::OptionKind;
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::engine::PricingRequest;
//! use pricer_pricing::mc::{HestonMcPricer, SimulationConfig};
//!
//! let request = PricingRequest {
//!     spot: 100.0,
//!     strike: 90.0,
//!     maturity: 0.5,
//!     rate: 0.01,
//!     carry: 0.0,
//!     params: HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap(),
//!     config: SimulationConfig::calibration(123),
//!     kind: OptionKind::Call,
//! };
//!
//! let estimate = HestonMcPricer.price(&request).unwrap();
//! println!("Price: {:.4} +/- {:.4}", estimate.price, estimate.confidence_95());
//! ```

pub mod config;
pub mod error;
pub mod paths;
pub mod pricer;

pub use config::{SimulationConfig, SimulationConfigBuilder, DEFAULT_SEED, MAX_PATHS, MAX_STEPS};
pub use error::ConfigError;
pub use paths::HestonPathSimulator;
pub use pricer::{HestonMcPricer, PayoffStats};

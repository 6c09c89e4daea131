//! # Random Number Generation
//!
//! Seeded pseudo-random streams for path simulation and the calibration
//! sampler.
//!
//! - **Reproducibility**: every generator is built from an explicit seed
//! - **Substreams**: [`PricerRng::for_stream`] derives independent generators
//!   for parallel partitions and for the sampler from one user seed
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::{PricerRng, SAMPLER_STREAM};
//!
//! let mut paths = PricerRng::from_seed(12345);
//! let mut sampler = PricerRng::for_stream(12345, SAMPLER_STREAM);
//!
//! let (z1, z2) = paths.gen_normal_pair();
//! let u = sampler.gen_uniform();
//! assert!(u >= 0.0 && u < 1.0);
//! # let _ = (z1, z2);
//! ```

mod prng;

pub use prng::{PricerRng, SAMPLER_STREAM};

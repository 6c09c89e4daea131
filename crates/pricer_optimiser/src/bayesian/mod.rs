//! Bayesian calibration of Heston parameters.
//!
//! # Architecture
//!
//! ```text
//! MetropolisHastings
//! ├── HalfNormalPrior      (support checks, short-circuits the likelihood)
//! ├── GaussianLikelihood   (prices every quote through an OptionPricer)
//! ├── RandomWalkProposal   (reflected positives, clamped rho)
//! └── Chain                (draws, acceptance, PosteriorSummary)
//! ```

mod likelihood;
mod prior;
mod proposal;
mod sampler;
mod summary;

pub use likelihood::{quotes_from_records, GaussianLikelihood, MarketInputs};
pub use prior::{HalfNormalPrior, DEFAULT_PRIOR_SD, RHO_BOUND};
pub use proposal::{RandomWalkProposal, MIN_POSITIVE};
pub use sampler::{Chain, MetropolisHastings, SamplerConfig};
pub use summary::{ParameterSummary, PosteriorSummary};

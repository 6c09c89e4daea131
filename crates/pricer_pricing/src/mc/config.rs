//! Monte Carlo simulation configuration.
//!
//! [`SimulationConfig`] carries everything a single pricing call needs besides
//! the market inputs: path and step counts, antithetic coupling, the variance
//! discretisation and the seed.

use pricer_models::models::VarianceScheme;

use super::error::ConfigError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Default seed shared by the presets.
pub const DEFAULT_SEED: u64 = 123;

/// Monte Carlo simulation configuration.
///
/// Immutable; use [`SimulationConfigBuilder`] or one of the presets.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::SimulationConfig;
/// use pricer_models::models::VarianceScheme;
///
/// let config = SimulationConfig::builder()
///     .n_paths(10_000)
///     .n_steps(50)
///     .antithetic(false)
///     .scheme(VarianceScheme::Euler)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert!(!config.antithetic());
///
/// let quoting = SimulationConfig::quoting(7);
/// assert_eq!((quoting.n_paths(), quoting.n_steps()), (20_000, 100));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    n_paths: usize,
    n_steps: usize,
    antithetic: bool,
    scheme: VarianceScheme,
    seed: u64,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Quoting budget: 20 000 antithetic paths, 100 steps, full truncation.
    pub fn quoting(seed: u64) -> Self {
        Self {
            n_paths: 20_000,
            n_steps: 100,
            antithetic: true,
            scheme: VarianceScheme::FullTruncation,
            seed,
        }
    }

    /// Calibration budget: 3 000 antithetic paths, 40 steps, full truncation.
    pub fn calibration(seed: u64) -> Self {
        Self {
            n_paths: 3_000,
            n_steps: 40,
            antithetic: true,
            scheme: VarianceScheme::FullTruncation,
            seed,
        }
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns whether paths are generated in antithetic pairs.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Returns the variance discretisation.
    #[inline]
    pub fn scheme(&self) -> VarianceScheme {
        self.scheme
    }

    /// Returns the seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of outer iterations: `n_paths / 2` when antithetic.
    ///
    /// An odd antithetic path count drops the remainder path.
    #[inline]
    pub fn outer_iterations(&self) -> usize {
        if self.antithetic {
            self.n_paths / 2
        } else {
            self.n_paths
        }
    }

    /// Same configuration with a different seed.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - `n_steps` is 0 or greater than 10,000
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::quoting(DEFAULT_SEED)
    }
}

/// Builder for [`SimulationConfig`].
///
/// `n_paths` and `n_steps` are required; antithetic defaults to `true`, the
/// scheme to full truncation and the seed to [`DEFAULT_SEED`].
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    antithetic: bool,
    scheme: VarianceScheme,
    seed: u64,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            n_paths: None,
            n_steps: None,
            antithetic: true,
            scheme: VarianceScheme::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets the number of simulation paths, in [1, 10_000_000].
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path, in [1, 10_000].
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Enables or disables antithetic first-step coupling.
    #[inline]
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Sets the variance discretisation.
    #[inline]
    pub fn scheme(mut self, scheme: VarianceScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` not set or invalid
    /// - `n_steps` not set or invalid
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let n_steps = self.n_steps.ok_or(ConfigError::InvalidParameter {
            name: "n_steps",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            n_paths,
            n_steps,
            antithetic: self.antithetic,
            scheme: self.scheme,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}

//! Calibration run configuration
//!
//! Loaded from a TOML file, environment variables and CLI flags.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`PRICER_` prefix)
//! 3. Config file
//! 4. Default values
//!
//! ```toml
//! log_level = "info"
//!
//! [market]
//! spot = 100.0
//! rate = 0.01
//! carry = 0.0
//!
//! [initial]
//! kappa = 1.0
//! theta = 0.03
//! sigma_v = 0.4
//! rho = -0.3
//! v0 = 0.03
//!
//! [steps]
//! kappa = 0.3
//! theta = 0.02
//! sigma_v = 0.2
//! rho = 0.1
//! v0 = 0.02
//!
//! [sampler]
//! n_iter = 1000
//! burn_in = 200
//! thin = 1
//! seed = 123
//! ```

use std::path::Path;
use std::str::FromStr;

use pricer_models::models::{HestonParams, HestonStepSizes};
use pricer_optimiser::bayesian::{MarketInputs, SamplerConfig};
use pricer_optimiser::OptimiserError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// `[market]` section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSection {
    pub spot: f64,
    pub rate: f64,
    pub carry: f64,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            spot: 100.0,
            rate: 0.01,
            carry: 0.0,
        }
    }
}

impl From<MarketSection> for MarketInputs {
    fn from(m: MarketSection) -> Self {
        MarketInputs::new(m.spot, m.rate, m.carry)
    }
}

/// Five Heston components; used for both `[initial]` and `[steps]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSection {
    pub kappa: f64,
    pub theta: f64,
    pub sigma_v: f64,
    pub rho: f64,
    pub v0: f64,
}

impl ParamSection {
    fn initial() -> Self {
        Self {
            kappa: 1.0,
            theta: 0.03,
            sigma_v: 0.4,
            rho: -0.3,
            v0: 0.03,
        }
    }

    fn steps() -> Self {
        Self {
            kappa: 0.3,
            theta: 0.02,
            sigma_v: 0.2,
            rho: 0.1,
            v0: 0.02,
        }
    }
}

/// Calibration file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationFileConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: LogLevel,
    pub market: MarketSection,
    pub initial: ParamSection,
    pub steps: ParamSection,
    pub sampler: SamplerConfig,
}

impl Default for CalibrationFileConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            market: MarketSection::default(),
            initial: ParamSection::initial(),
            steps: ParamSection::steps(),
            sampler: SamplerConfig::default(),
        }
    }
}

/// CLI overrides (CLI takes precedence)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub seed: Option<u64>,
    pub n_iter: Option<usize>,
    pub burn_in: Option<usize>,
    pub thin: Option<usize>,
    pub n_paths: Option<usize>,
    pub n_steps: Option<usize>,
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={} is not a valid value", key, value)))
}

impl CalibrationFileConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `PRICER_` environment overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("PRICER_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(v) = lookup("PRICER_MCMC_SEED") {
            self.sampler.seed = parse_env("PRICER_MCMC_SEED", &v)?;
        }
        if let Some(v) = lookup("PRICER_MCMC_ITERATIONS") {
            self.sampler.n_iter = parse_env("PRICER_MCMC_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("PRICER_MCMC_BURN_IN") {
            self.sampler.burn_in = parse_env("PRICER_MCMC_BURN_IN", &v)?;
        }
        if let Some(v) = lookup("PRICER_MCMC_THIN") {
            self.sampler.thin = parse_env("PRICER_MCMC_THIN", &v)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        let s = &mut self.sampler;
        s.seed = cli.seed.unwrap_or(s.seed);
        s.n_iter = cli.n_iter.unwrap_or(s.n_iter);
        s.burn_in = cli.burn_in.unwrap_or(s.burn_in);
        s.thin = cli.thin.unwrap_or(s.thin);
        s.n_paths = cli.n_paths.unwrap_or(s.n_paths);
        s.n_steps = cli.n_steps.unwrap_or(s.n_steps);
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: OptimiserError| ConfigError::Invalid(e.to_string());
        self.sampler.validate().map_err(invalid)?;
        self.sampler.simulation().map_err(invalid)?;
        MarketInputs::from(self.market).validate().map_err(invalid)?;
        self.initial_params()?;
        self.step_sizes()?;
        Ok(())
    }

    /// Initial chain state
    pub fn initial_params(&self) -> Result<HestonParams, ConfigError> {
        let p = self.initial;
        HestonParams::new(p.kappa, p.theta, p.sigma_v, p.rho, p.v0)
            .map_err(|e| ConfigError::Invalid(format!("[initial] {}", e)))
    }

    /// Proposal step sizes
    pub fn step_sizes(&self) -> Result<HestonStepSizes, ConfigError> {
        let s = self.steps;
        HestonStepSizes::new(s.kappa, s.theta, s.sigma_v, s.rho, s.v0)
            .map_err(|e| ConfigError::Invalid(format!("[steps] {}", e)))
    }
}

/// Build configuration from all sources
///
/// Only the log level is checked here; commands that run the sampler call
/// [`CalibrationFileConfig::validate`] themselves.
pub fn build_config(
    config_file: Option<&Path>,
    cli: &CliOverrides,
) -> Result<CalibrationFileConfig, ConfigError> {
    let mut config = match config_file {
        Some(path) => CalibrationFileConfig::from_file(path)?,
        None => CalibrationFileConfig::default(),
    };
    config.apply_env()?;
    config.merge_with_cli(cli)?;
    Ok(config)
}

//! CLI error types

use pricer_core::types::PricingError;
use pricer_optimiser::OptimiserError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Calibration error: {0}")]
    Calibration(#[from] OptimiserError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

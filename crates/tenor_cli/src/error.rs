//! CLI error types.

use tenor_core::market_data::MarketDataError;
use tenor_core::types::SimulationError;
use tenor_pricing::mc::ConfigError;
use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Simulation or valuation failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Curve construction failed.
    #[error("Curve error: {0}")]
    Curve(#[from] MarketDataError),

    /// Command line argument rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Result could not be serialised.
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

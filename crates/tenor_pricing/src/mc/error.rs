//! Error types for the configuration surface.

use tenor_core::types::SimulationError;
use thiserror::Error;

/// Configuration error for a simulation run.
///
/// Raised while loading or validating a [`SimulationConfig`](super::SimulationConfig);
/// errors from building grids, models or the simulation itself are wrapped.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Path count outside the valid range.
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },

    /// Configuration file could not be read.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// TOML syntax or schema error.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Error raised while constructing or running the simulation.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPathCount(0);
        assert!(err.to_string().contains("Invalid path count 0"));

        let err = ConfigError::InvalidParameter {
            name: "time_step",
            value: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("time_step"));

        let err: ConfigError = SimulationError::invalid("bad grid").into();
        assert_eq!(err.to_string(), "Invalid configuration: bad grid");
    }
}

//! Error types for structured error handling.
//!
//! Every fallible operation in the workspace reports one of four kinds:
//! - `InvalidConfiguration`: rejected inputs at construction time
//! - `UnsupportedTenor`: an observable requested off the model's grid
//! - `NumericalInstability`: a non-finite or non-positive value during evolution
//! - `InsufficientSamples`: a regression with fewer paths than basis functions

use thiserror::Error;

/// Categorised simulation and valuation errors.
///
/// # Examples
/// ```
/// use tenor_core::types::SimulationError;
///
/// let err = SimulationError::UnsupportedTenor { requested: 2.25, grid: "tenor" };
/// assert_eq!(format!("{}", err), "Unsupported tenor: 2.25 is not on the tenor grid");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Invalid grid, parameter or product definition.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Requested time is not representable on the model's grid.
    #[error("Unsupported tenor: {requested} is not on the {grid} grid")]
    UnsupportedTenor {
        /// The requested time
        requested: f64,
        /// Which grid was searched ("tenor", "time", ...)
        grid: &'static str,
    },

    /// Non-finite or otherwise invalid value produced during evolution.
    #[error("Numerical instability at time index {time_index}, path {path}: {quantity} = {value}")]
    NumericalInstability {
        /// Time index at which the value was produced
        time_index: usize,
        /// Offending path
        path: usize,
        /// Name of the offending quantity
        quantity: &'static str,
        /// The offending value
        value: f64,
    },

    /// Regression requested with fewer samples than basis functions.
    #[error("Insufficient samples at t = {time}: {paths} paths for {basis_functions} basis functions")]
    InsufficientSamples {
        /// Exercise time at which the regression was attempted
        time: f64,
        /// Number of available paths
        paths: usize,
        /// Number of basis functions
        basis_functions: usize,
    },
}

impl SimulationError {
    /// Shorthand for an [`SimulationError::InvalidConfiguration`] with a formatted message.
    pub fn invalid(message: impl Into<String>) -> Self {
        SimulationError::InvalidConfiguration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let err = SimulationError::invalid("number of paths must be positive");
        assert_eq!(
            format!("{}", err),
            "Invalid configuration: number of paths must be positive"
        );
    }

    #[test]
    fn test_numerical_instability_display() {
        let err = SimulationError::NumericalInstability {
            time_index: 7,
            path: 12,
            quantity: "state",
            value: f64::NAN,
        };
        let msg = err.to_string();
        assert!(msg.contains("time index 7"));
        assert!(msg.contains("path 12"));
        assert!(msg.contains("NaN"));
    }

    #[test]
    fn test_insufficient_samples_display() {
        let err = SimulationError::InsufficientSamples {
            time: 5.0,
            paths: 2,
            basis_functions: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient samples at t = 5: 2 paths for 3 basis functions"
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = SimulationError::invalid("x");
        let _: &dyn std::error::Error = &err;
    }
}

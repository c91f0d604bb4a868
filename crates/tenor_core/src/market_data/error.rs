//! Market data error types.

use crate::types::SimulationError;
use thiserror::Error;

/// Curve query errors.
///
/// # Examples
///
/// ```
/// use tenor_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Period end not after period start.
    #[error("Invalid period: [{start}, {end}]")]
    InvalidPeriod {
        /// Period start
        start: f64,
        /// Period end
        end: f64,
    },

    /// Invalid curve parameter.
    #[error("Invalid curve parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// The invalid value
        value: f64,
    },
}

impl From<MarketDataError> for SimulationError {
    fn from(err: MarketDataError) -> Self {
        SimulationError::InvalidConfiguration(err.to_string())
    }
}

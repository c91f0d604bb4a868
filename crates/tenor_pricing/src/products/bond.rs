//! Zero-coupon bond.

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use super::traits::{deflate, MonteCarloProduct};
use crate::mc::Simulation;

/// Unit notional paid at `maturity`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bond {
    maturity: f64,
}

impl Bond {
    /// Bond maturing at `maturity`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `maturity` is negative or not finite.
    pub fn new(maturity: f64) -> Result<Self, SimulationError> {
        if !maturity.is_finite() || maturity < 0.0 {
            return Err(SimulationError::invalid(format!("invalid bond maturity {maturity}")));
        }
        Ok(Self { maturity })
    }

    /// Maturity date.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }
}

impl MonteCarloProduct for Bond {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        let n_paths = simulation.n_paths();
        if self.maturity <= evaluation_time {
            return Ok(RandomVariable::constant(0.0, n_paths));
        }
        deflate(
            &RandomVariable::constant(1.0, n_paths),
            self.maturity,
            evaluation_time,
            simulation,
        )
    }
}

//! Option on the numeraire asset.
//!
//! Under the spot measure the numeraire is the rolled money-market account,
//! so the call pays `max(N(T) - K, 0)` and the put `max(K - N(T), 0)` at `T`.
//! Both depend on the measure: the value is only comparable across models
//! simulated under the same measure.

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use super::traits::{deflate, MonteCarloProduct};
use crate::mc::Simulation;

/// European option on the value of the numeraire at `maturity`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumeraireOption {
    maturity: f64,
    strike: f64,
    is_put: bool,
}

impl NumeraireOption {
    /// Call paying `max(N(maturity) - strike, 0)` at `maturity`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the maturity is negative or either value is
    /// not finite.
    pub fn call(maturity: f64, strike: f64) -> Result<Self, SimulationError> {
        if !(maturity >= 0.0) || !maturity.is_finite() || !strike.is_finite() {
            return Err(SimulationError::invalid(format!(
                "invalid numeraire option: maturity {maturity}, strike {strike}"
            )));
        }
        Ok(Self {
            maturity,
            strike,
            is_put: false,
        })
    }

    /// Put paying `max(strike - N(maturity), 0)` at `maturity`.
    ///
    /// # Errors
    ///
    /// See [`NumeraireOption::call`].
    pub fn put(maturity: f64, strike: f64) -> Result<Self, SimulationError> {
        Ok(Self {
            is_put: true,
            ..Self::call(maturity, strike)?
        })
    }

    /// Exercise and payment date.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Whether the payoff is `max(K - N, 0)`.
    #[inline]
    pub fn is_put(&self) -> bool {
        self.is_put
    }
}

impl MonteCarloProduct for NumeraireOption {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        if self.maturity <= evaluation_time {
            return Ok(RandomVariable::constant(0.0, simulation.n_paths()));
        }
        let numeraire = simulation.numeraire(self.maturity)?;
        let intrinsic = if self.is_put {
            self.strike - numeraire
        } else {
            numeraire - self.strike
        };
        deflate(&intrinsic.max_with(0.0), self.maturity, evaluation_time, simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::test_support::{curve, hull_white};
    use crate::products::Bond;
    use approx::assert_relative_eq;
    use tenor_core::market_data::curves::YieldCurve;

    #[test]
    fn test_put_call_parity() {
        // C - P = 1 - K / N(T) path by path, and the bond is 1 / N(T)
        let simulation = hull_white(0.015, 64);
        let call = NumeraireOption::call(3.0, 1.1).unwrap().value(0.0, &simulation).unwrap();
        let put = NumeraireOption::put(3.0, 1.1).unwrap().value(0.0, &simulation).unwrap();
        let bond = Bond::new(3.0).unwrap().value(0.0, &simulation).unwrap();
        for p in 0..64 {
            assert_relative_eq!(call.get(p) - put.get(p), 1.0 - 1.1 * bond.get(p), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_zero_volatility_call_is_intrinsic() {
        let simulation = hull_white(0.0, 4);
        let account = 1.0 / curve().discount_factor(2.0).unwrap();
        let call = NumeraireOption::call(2.0, 1.05).unwrap();
        let expected = (account - 1.05) / account;
        assert_relative_eq!(call.price(&simulation).unwrap(), expected, epsilon = 1e-12);
        let put = NumeraireOption::put(2.0, 1.05).unwrap();
        assert_eq!(put.price(&simulation).unwrap(), 0.0);
    }

    #[test]
    fn test_expired_option_and_invalid_definitions() {
        let simulation = hull_white(0.01, 4);
        let call = NumeraireOption::call(1.0, 1.0).unwrap();
        assert_eq!(call.value(1.5, &simulation).unwrap().max(), 0.0);
        assert!(NumeraireOption::call(-0.5, 1.0).is_err());
        assert!(NumeraireOption::put(1.0, f64::NAN).is_err());
        assert!(matches!(
            NumeraireOption::call(1.25, 1.0).unwrap().value(0.0, &simulation),
            Err(SimulationError::UnsupportedTenor { .. })
        ));
    }
}

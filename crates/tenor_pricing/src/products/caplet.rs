//! Caplet and floorlet on a forward rate.

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use super::traits::{deflate, MonteCarloProduct};
use crate::mc::Simulation;

/// Pays `max(L - K, 0) d` (caplet) or `max(K - L, 0) d` (floorlet) at
/// `maturity + period_length`, where `L` is the forward for
/// `[maturity, maturity + period_length]` fixed at `maturity` and `d` the
/// daycount fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Caplet {
    maturity: f64,
    period_length: f64,
    strike: f64,
    daycount_fraction: f64,
    is_floorlet: bool,
}

impl Caplet {
    /// Caplet with daycount fraction equal to the period length.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the maturity is negative, the period is not
    /// positive or the strike is not finite.
    pub fn new(maturity: f64, period_length: f64, strike: f64) -> Result<Self, SimulationError> {
        if !(maturity >= 0.0) || !(period_length > 0.0) || !period_length.is_finite() || !strike.is_finite() {
            return Err(SimulationError::invalid(format!(
                "invalid caplet: maturity {maturity}, period {period_length}, strike {strike}"
            )));
        }
        Ok(Self {
            maturity,
            period_length,
            strike,
            daycount_fraction: period_length,
            is_floorlet: false,
        })
    }

    /// Floorlet with the same conventions as [`Caplet::new`].
    ///
    /// # Errors
    ///
    /// See [`Caplet::new`].
    pub fn floorlet(maturity: f64, period_length: f64, strike: f64) -> Result<Self, SimulationError> {
        Ok(Self {
            is_floorlet: true,
            ..Self::new(maturity, period_length, strike)?
        })
    }

    /// Override the daycount fraction.
    pub fn with_daycount_fraction(mut self, daycount_fraction: f64) -> Self {
        self.daycount_fraction = daycount_fraction;
        self
    }

    /// Fixing date.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Payment date.
    #[inline]
    pub fn payment_date(&self) -> f64 {
        self.maturity + self.period_length
    }

    /// Strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Whether the payoff is `max(K - L, 0)`.
    #[inline]
    pub fn is_floorlet(&self) -> bool {
        self.is_floorlet
    }
}

impl MonteCarloProduct for Caplet {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        let payment = self.payment_date();
        if payment <= evaluation_time {
            return Ok(RandomVariable::constant(0.0, simulation.n_paths()));
        }
        let libor = simulation.forward_rate(self.maturity, self.maturity, payment)?;
        let intrinsic = if self.is_floorlet {
            self.strike - libor
        } else {
            libor - self.strike
        };
        let payoff = intrinsic.max_with(0.0) * self.daycount_fraction;
        deflate(&payoff, payment, evaluation_time, simulation)
    }
}

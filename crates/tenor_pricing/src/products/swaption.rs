//! European payer swaption.

use tenor_core::math::RandomVariable;
use tenor_core::types::{SimulationError, GRID_TOLERANCE};

use super::schedule::SwapSchedule;
use super::swap::{swap_value_at_exercise, validate_rates, Swap};
use super::traits::{deflate, MonteCarloProduct};
use crate::mc::Simulation;

/// Right to enter a payer swap at `exercise_date`.
///
/// Pays `max(V_swap(e), 0)` at the exercise date, where `V_swap(e)` is the
/// value of the underlying swap read from the model state at `e`.
#[derive(Clone, Debug, PartialEq)]
pub struct EuropeanSwaption {
    exercise_date: f64,
    schedule: SwapSchedule,
    swap_rates: Vec<f64>,
    notional: f64,
}

impl EuropeanSwaption {
    /// Swaption on the swap described by `schedule` and `swap_rates`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the exercise date is negative or after the
    /// first fixing, or the rates do not match the schedule.
    pub fn new(
        exercise_date: f64,
        schedule: SwapSchedule,
        swap_rates: Vec<f64>,
        notional: f64,
    ) -> Result<Self, SimulationError> {
        validate_rates(&schedule, &swap_rates, notional)?;
        if !(exercise_date >= 0.0) || exercise_date > schedule.fixing(0) + GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "exercise date {exercise_date} must lie in [0, {}]",
                schedule.fixing(0)
            )));
        }
        Ok(Self {
            exercise_date,
            schedule,
            swap_rates,
            notional,
        })
    }

    /// Swaption exercising into `swap` at `exercise_date`.
    ///
    /// # Errors
    ///
    /// See [`EuropeanSwaption::new`].
    pub fn on_swap(exercise_date: f64, swap: &Swap) -> Result<Self, SimulationError> {
        Self::new(
            exercise_date,
            swap.schedule().clone(),
            swap.swap_rates().to_vec(),
            swap.notional(),
        )
    }

    /// Exercise date.
    #[inline]
    pub fn exercise_date(&self) -> f64 {
        self.exercise_date
    }
}

impl MonteCarloProduct for EuropeanSwaption {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        if evaluation_time > self.exercise_date + GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "swaption cannot be valued at {evaluation_time}, after its exercise date {}",
                self.exercise_date
            )));
        }
        let (swap_value, _) = swap_value_at_exercise(
            &self.schedule,
            &self.swap_rates,
            self.notional,
            0,
            self.exercise_date,
            simulation,
        )?;
        deflate(&swap_value.max_with(0.0), self.exercise_date, evaluation_time, simulation)
    }
}

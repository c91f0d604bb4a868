//! Payer interest-rate swap and its annuity.
//!
//! A period `[T_i, T_{i+1}]` of a payer swap pays
//! `(L(T_i; T_i, T_{i+1}) - K_i) (T_{i+1} - T_i) notional` at `T_{i+1}`.

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use super::schedule::SwapSchedule;
use super::traits::MonteCarloProduct;
use crate::mc::Simulation;

/// Payer swap: receives the floating forward and pays the fixed rate of each period.
///
/// A receiver swap is obtained with a negative notional.
#[derive(Clone, Debug, PartialEq)]
pub struct Swap {
    schedule: SwapSchedule,
    swap_rates: Vec<f64>,
    notional: f64,
}

impl Swap {
    /// Swap with one fixed rate per period.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the number of rates does not match the
    /// schedule or a rate or the notional is not finite.
    pub fn new(schedule: SwapSchedule, swap_rates: Vec<f64>, notional: f64) -> Result<Self, SimulationError> {
        validate_rates(&schedule, &swap_rates, notional)?;
        Ok(Self {
            schedule,
            swap_rates,
            notional,
        })
    }

    /// Swap paying the same fixed rate on every period.
    ///
    /// # Errors
    ///
    /// See [`Swap::new`].
    pub fn with_fixed_rate(schedule: SwapSchedule, rate: f64, notional: f64) -> Result<Self, SimulationError> {
        let rates = vec![rate; schedule.n_periods()];
        Self::new(schedule, rates, notional)
    }

    /// Period dates.
    pub fn schedule(&self) -> &SwapSchedule {
        &self.schedule
    }

    /// Fixed rate of every period.
    pub fn swap_rates(&self) -> &[f64] {
        &self.swap_rates
    }

    /// Notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }
}

impl MonteCarloProduct for Swap {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        let n_paths = simulation.n_paths();
        let mut deflated = RandomVariable::constant(0.0, n_paths);
        for i in 0..self.schedule.n_periods() {
            let (fixing, payment) = (self.schedule.fixing(i), self.schedule.payment(i));
            if payment <= evaluation_time {
                continue;
            }
            let libor = simulation.forward_rate(fixing, fixing, payment)?;
            let cash_flow = (libor - self.swap_rates[i]) * (self.schedule.period_length(i) * self.notional);
            let numeraire = simulation.numeraire_at(simulation.time_index(payment)?);
            deflated = deflated + cash_flow / numeraire;
        }
        let now = simulation.numeraire_at(simulation.time_index(evaluation_time)?);
        Ok(deflated * now)
    }
}

/// Value of one unit of accrual paid on every payment date of a schedule,
/// `sum tau_i N(t) / N(T_{i+1})`.
///
/// Dividing a swap's value by its annuity gives the swap rate it is struck
/// away from par.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapAnnuity {
    schedule: SwapSchedule,
}

impl SwapAnnuity {
    /// Annuity of `schedule`.
    pub fn new(schedule: SwapSchedule) -> Self {
        Self { schedule }
    }

    /// Period dates.
    pub fn schedule(&self) -> &SwapSchedule {
        &self.schedule
    }
}

impl MonteCarloProduct for SwapAnnuity {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        let mut deflated = RandomVariable::constant(0.0, simulation.n_paths());
        for i in 0..self.schedule.n_periods() {
            let payment = self.schedule.payment(i);
            if payment <= evaluation_time {
                continue;
            }
            let numeraire = simulation.numeraire_at(simulation.time_index(payment)?);
            deflated = deflated + self.schedule.period_length(i) / numeraire;
        }
        let now = simulation.numeraire_at(simulation.time_index(evaluation_time)?);
        Ok(deflated * now)
    }
}

pub(crate) fn validate_rates(schedule: &SwapSchedule, swap_rates: &[f64], notional: f64) -> Result<(), SimulationError> {
    if swap_rates.len() != schedule.n_periods() {
        return Err(SimulationError::invalid(format!(
            "{} swap rates for {} periods",
            swap_rates.len(),
            schedule.n_periods()
        )));
    }
    if swap_rates.iter().any(|r| !r.is_finite()) || !notional.is_finite() {
        return Err(SimulationError::invalid("swap rates and notional must be finite"));
    }
    Ok(())
}

/// Exercise value at `exercise_time` of the periods from `first_period` on,
/// in currency at `exercise_time`, together with the remaining par swap rate.
///
/// Each period contributes `(F_i(e) - K_i) tau_i P(e, T_{i+1})` with the
/// forward and bond read from the model state at `e`.
pub(crate) fn swap_value_at_exercise(
    schedule: &SwapSchedule,
    swap_rates: &[f64],
    notional: f64,
    first_period: usize,
    exercise_time: f64,
    simulation: &Simulation,
) -> Result<(RandomVariable, RandomVariable), SimulationError> {
    let n_paths = simulation.n_paths();
    let mut value = RandomVariable::constant(0.0, n_paths);
    let mut float_leg = RandomVariable::constant(0.0, n_paths);
    let mut annuity = RandomVariable::constant(0.0, n_paths);
    for i in first_period..schedule.n_periods() {
        let (fixing, payment) = (schedule.fixing(i), schedule.payment(i));
        let tau = schedule.period_length(i);
        let forward = simulation.forward_rate(exercise_time, fixing, payment)?;
        let bond = simulation.discount_bond(exercise_time, payment)?;
        let weighted_bond = &bond * tau;
        value = value + (&forward - swap_rates[i]) * &weighted_bond;
        float_leg = float_leg + &forward * &weighted_bond;
        annuity = annuity + weighted_bond;
    }
    Ok((value * notional, float_leg / annuity))
}

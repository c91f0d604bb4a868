//! Bermudan payer swaption by least-squares backward induction.
//!
//! Exercise dates are processed from the last to the first. At each date the
//! immediate value is the remaining swap read from the model state, the
//! continuation value is estimated by regressing the value carried back from
//! later dates on polynomials of the standardised remaining swap rate, and a
//! path exercises iff the immediate value exceeds `max(fit, 0)`.
//!
//! The value carried back is either the fitted `max(immediate, fit)` or the
//! realised cash flow under the policy. The reported value always uses the
//! realised cash flow, so it is a low-biased estimate of the policy's value.

use tenor_core::math::{least_squares, least_squares_on, RandomVariable, RegressionFit};
use tenor_core::types::{SimulationError, GRID_TOLERANCE};
use tracing::debug;

use super::schedule::SwapSchedule;
use super::swap::{swap_value_at_exercise, validate_rates};
use super::traits::MonteCarloProduct;
use crate::mc::Simulation;

/// Degree of the default polynomial basis.
pub const DEFAULT_BASIS_DEGREE: usize = 2;

/// Value regressed on the basis at each exercise date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegressionTarget {
    /// Carry `max(immediate, fit)` back to the previous date.
    #[default]
    FittedValues,
    /// Carry the realised cash flow under the policy back (Longstaff-Schwartz).
    RealizedCashFlows,
}

/// Paths used to fit the continuation value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegressionSample {
    /// Fit on all paths and apply the fit to the same paths.
    #[default]
    InSample,
    /// Fit on even paths to decide odd ones and vice versa.
    CrossFitted,
}

/// Exercise decisions per date and path.
#[derive(Clone, Debug, PartialEq)]
pub struct ExercisePolicy {
    exercise_dates: Vec<f64>,
    decisions: Vec<Vec<bool>>,
}

impl ExercisePolicy {
    /// Exercise dates in increasing order.
    pub fn exercise_dates(&self) -> &[f64] {
        &self.exercise_dates
    }

    /// Whether each path would exercise at date `j` if still alive.
    pub fn decisions(&self, j: usize) -> &[bool] {
        &self.decisions[j]
    }

    /// Index of the first exercise date at which `path` exercises.
    pub fn first_exercise(&self, path: usize) -> Option<usize> {
        self.decisions.iter().position(|d| d[path])
    }

    /// Fraction of paths exercising first at date `j`.
    pub fn exercise_probability(&self, j: usize) -> f64 {
        let n_paths = self.decisions.first().map_or(0, Vec::len);
        if n_paths == 0 {
            return 0.0;
        }
        let count = (0..n_paths).filter(|&p| self.first_exercise(p) == Some(j)).count();
        count as f64 / n_paths as f64
    }
}

/// Right to enter, on any of several exercise dates, the payer swap made of
/// the periods fixing at or after that date.
#[derive(Clone, Debug, PartialEq)]
pub struct BermudanSwaption {
    exercise_dates: Vec<f64>,
    first_periods: Vec<usize>,
    schedule: SwapSchedule,
    swap_rates: Vec<f64>,
    notional: f64,
    target: RegressionTarget,
    sample: RegressionSample,
    basis_degree: usize,
}

impl BermudanSwaption {
    /// Bermudan swaption with the default regression settings.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if there are no exercise dates, they are not
    /// strictly increasing, the first is negative, the last is after the last
    /// fixing, or the rates do not match the schedule.
    pub fn new(
        exercise_dates: Vec<f64>,
        schedule: SwapSchedule,
        swap_rates: Vec<f64>,
        notional: f64,
    ) -> Result<Self, SimulationError> {
        validate_rates(&schedule, &swap_rates, notional)?;
        if exercise_dates.is_empty() {
            return Err(SimulationError::invalid("Bermudan swaption needs at least one exercise date"));
        }
        if exercise_dates.windows(2).any(|w| !(w[1] > w[0])) || !(exercise_dates[0] >= 0.0) {
            return Err(SimulationError::invalid(
                "exercise dates must be non-negative and strictly increasing",
            ));
        }
        let first_periods = exercise_dates
            .iter()
            .map(|&e| {
                schedule.first_period_fixing_at_or_after(e).ok_or_else(|| {
                    SimulationError::invalid(format!("no swap period fixes at or after exercise date {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            exercise_dates,
            first_periods,
            schedule,
            swap_rates,
            notional,
            target: RegressionTarget::default(),
            sample: RegressionSample::default(),
            basis_degree: DEFAULT_BASIS_DEGREE,
        })
    }

    /// Exercise at every fixing date of `schedule` into a swap at `rate`.
    ///
    /// # Errors
    ///
    /// See [`BermudanSwaption::new`].
    pub fn on_fixing_dates(schedule: SwapSchedule, rate: f64, notional: f64) -> Result<Self, SimulationError> {
        let dates = schedule.fixing_dates().to_vec();
        let rates = vec![rate; schedule.n_periods()];
        Self::new(dates, schedule, rates, notional)
    }

    /// Choose what is carried back between exercise dates.
    pub fn with_regression_target(mut self, target: RegressionTarget) -> Self {
        self.target = target;
        self
    }

    /// Choose which paths fit the continuation value.
    pub fn with_regression_sample(mut self, sample: RegressionSample) -> Self {
        self.sample = sample;
        self
    }

    /// Degree of the polynomial basis; `degree + 1` basis functions.
    pub fn with_basis_degree(mut self, degree: usize) -> Self {
        self.basis_degree = degree;
        self
    }

    /// Exercise dates.
    pub fn exercise_dates(&self) -> &[f64] {
        &self.exercise_dates
    }

    /// Value at `evaluation_time` together with the exercise policy.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `evaluation_time` is after the first
    /// exercise date, `InsufficientSamples` if an exercise date has fewer
    /// regression paths than basis functions, `UnsupportedTenor` if a date
    /// is not on the model's grids.
    pub fn value_with_policy(
        &self,
        evaluation_time: f64,
        simulation: &Simulation,
    ) -> Result<(RandomVariable, ExercisePolicy), SimulationError> {
        if evaluation_time > self.exercise_dates[0] + GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "Bermudan swaption cannot be valued at {evaluation_time}, after its first exercise date {}",
                self.exercise_dates[0]
            )));
        }

        let n_paths = simulation.n_paths();
        let n_dates = self.exercise_dates.len();
        // Both in units of the numeraire
        let mut realized = RandomVariable::constant(0.0, n_paths);
        let mut carried = RandomVariable::constant(0.0, n_paths);
        let mut decisions = vec![Vec::new(); n_dates];

        for j in (0..n_dates).rev() {
            let exercise_time = self.exercise_dates[j];
            let time_index = simulation.time_index(exercise_time)?;
            let numeraire = simulation.numeraire_at(time_index);
            let (immediate, swap_rate) = swap_value_at_exercise(
                &self.schedule,
                &self.swap_rates,
                self.notional,
                self.first_periods[j],
                exercise_time,
                simulation,
            )?;

            let continuation = if j + 1 == n_dates {
                RandomVariable::constant(0.0, n_paths)
            } else {
                let basis = self.basis(&swap_rate);
                let target = &carried * numeraire;
                self.fit(&basis, &target, time_index, exercise_time)?.max_with(0.0)
            };

            let exercise: Vec<bool> = immediate
                .values()
                .iter()
                .zip(continuation.values())
                .map(|(i, c)| i > c)
                .collect();
            let immediate_deflated = &immediate / numeraire;
            realized = RandomVariable::select(&exercise, &immediate_deflated, &realized);
            carried = match self.target {
                RegressionTarget::FittedValues => immediate.pointwise_max(&continuation) / numeraire,
                RegressionTarget::RealizedCashFlows => realized.clone(),
            };

            debug!(
                exercise_time,
                exercise_fraction = exercise.iter().filter(|&&e| e).count() as f64 / n_paths as f64,
                mean_continuation = continuation.average(),
                "Bermudan exercise date processed"
            );
            decisions[j] = exercise;
        }

        let now = simulation.numeraire_at(simulation.time_index(evaluation_time)?);
        let policy = ExercisePolicy {
            exercise_dates: self.exercise_dates.clone(),
            decisions,
        };
        Ok((realized * now, policy))
    }

    /// Polynomials `1, z, ..., z^d` of the standardised swap rate `z`.
    fn basis(&self, swap_rate: &RandomVariable) -> Vec<RandomVariable> {
        let mean = swap_rate.average();
        let std = swap_rate.standard_deviation();
        let z = if std > 0.0 {
            (swap_rate - mean) / std
        } else {
            swap_rate - mean
        };
        (0..=self.basis_degree).map(|d| z.powi(d as i32)).collect()
    }

    fn fit(
        &self,
        basis: &[RandomVariable],
        target: &RandomVariable,
        time_index: usize,
        exercise_time: f64,
    ) -> Result<RandomVariable, SimulationError> {
        match self.sample {
            RegressionSample::InSample => Ok(least_squares(basis, target, time_index, exercise_time)?.predict(basis)),
            RegressionSample::CrossFitted => {
                let n_paths = target.len();
                let even: Vec<usize> = (0..n_paths).step_by(2).collect();
                let odd: Vec<usize> = (1..n_paths).step_by(2).collect();
                let on_even: RegressionFit = least_squares_on(basis, target, &even, time_index, exercise_time)?;
                let on_odd: RegressionFit = least_squares_on(basis, target, &odd, time_index, exercise_time)?;
                Ok(RandomVariable::from_fn(n_paths, |p| {
                    if p % 2 == 0 {
                        on_odd.predict_path(basis, p)
                    } else {
                        on_even.predict_path(basis, p)
                    }
                }))
            }
        }
    }
}

impl MonteCarloProduct for BermudanSwaption {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        Ok(self.value_with_policy(evaluation_time, simulation)?.0)
    }
}

//! Time discretisation and tenor structure.
//!
//! Two grids drive every simulation:
//!
//! - [`TimeGrid`]: the simulation times `0 = t_0 < t_1 < ... < t_n` on which
//!   states and numeraires are cached.
//! - [`TenorGrid`]: the period boundaries `T_0 < T_1 < ... < T_N` defining the
//!   accrual periods `[T_i, T_{i+1})` of a LIBOR market model.
//!
//! Both are immutable after construction and are shared through `Arc` by the
//! models, the random driver and the simulation cache.
//!
//! # Example
//!
//! ```
//! use tenor_core::types::{TenorGrid, TimeGrid};
//!
//! let time = TimeGrid::uniform(10.0, 0.5).unwrap();
//! let tenor = TenorGrid::uniform(0.0, 10.0, 0.5).unwrap();
//!
//! assert_eq!(time.len(), 21);
//! assert_eq!(tenor.n_periods(), 20);
//! assert_eq!(tenor.period_containing(2.3), Some(4));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::SimulationError;

/// Absolute tolerance used when matching a requested time against grid points.
pub const GRID_TOLERANCE: f64 = 1e-8;

fn validate_points(points: &[f64], name: &str) -> Result<(), SimulationError> {
    if points.len() < 2 {
        return Err(SimulationError::invalid(format!(
            "{name} grid needs at least 2 points, got {}",
            points.len()
        )));
    }
    if let Some(bad) = points.iter().find(|t| !t.is_finite()) {
        return Err(SimulationError::invalid(format!(
            "{name} grid contains a non-finite point {bad}"
        )));
    }
    if let Some(w) = points.windows(2).find(|w| w[1] <= w[0]) {
        return Err(SimulationError::invalid(format!(
            "{name} grid must be strictly increasing, found {} followed by {}",
            w[0], w[1]
        )));
    }
    Ok(())
}

fn uniform_points(start: f64, end: f64, step: f64, name: &str) -> Result<Vec<f64>, SimulationError> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(SimulationError::invalid(format!(
            "{name} grid step must be positive, got {step}"
        )));
    }
    if !(end > start) {
        return Err(SimulationError::invalid(format!(
            "{name} grid end {end} must exceed start {start}"
        )));
    }
    let n = ((end - start) / step).round() as usize;
    if n == 0 || (start + n as f64 * step - end).abs() > GRID_TOLERANCE * (1.0 + end.abs()) {
        return Err(SimulationError::invalid(format!(
            "{name} grid step {step} does not divide [{start}, {end}]"
        )));
    }
    Ok((0..=n).map(|i| start + i as f64 * step).collect())
}

/// Index of the grid point matching `t` within [`GRID_TOLERANCE`].
fn find_point(points: &[f64], t: f64) -> Option<usize> {
    let idx = points.partition_point(|&x| x < t - GRID_TOLERANCE);
    match points.get(idx) {
        Some(&x) if (x - t).abs() <= GRID_TOLERANCE => Some(idx),
        _ => None,
    }
}

/// Simulation time discretisation `0 = t_0 < t_1 < ... < t_n`.
///
/// # Invariants
///
/// - At least two points
/// - All points finite and strictly increasing
/// - `t_0 = 0`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Construct a time grid from explicit points.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the points violate the grid invariants.
    ///
    /// # Example
    ///
    /// ```
    /// use tenor_core::types::TimeGrid;
    ///
    /// assert!(TimeGrid::new(vec![0.0, 0.25, 1.0]).is_ok());
    /// assert!(TimeGrid::new(vec![0.0]).is_err());
    /// assert!(TimeGrid::new(vec![0.0, 1.0, 1.0]).is_err());
    /// ```
    pub fn new(times: Vec<f64>) -> Result<Self, SimulationError> {
        validate_points(&times, "time")?;
        if times[0].abs() > GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "time grid must start at 0, got {}",
                times[0]
            )));
        }
        Ok(Self { times })
    }

    /// Construct an equidistant grid `0, dt, 2 dt, ..., horizon`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `dt` is not positive or does not divide the horizon.
    pub fn uniform(horizon: f64, dt: f64) -> Result<Self, SimulationError> {
        Self::new(uniform_points(0.0, horizon, dt, "time")?)
    }

    /// Number of grid points (`n + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false`; a valid grid holds at least two points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of time steps (`n`).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.times.len() - 1
    }

    /// Time of grid point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn time(&self, index: usize) -> f64 {
        self.times[index]
    }

    /// Length of step `index`, `t_{index+1} - t_index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_steps()`.
    #[inline]
    pub fn dt(&self, index: usize) -> f64 {
        self.times[index + 1] - self.times[index]
    }

    /// All grid points.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Last grid point (the simulation horizon).
    #[inline]
    pub fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Index of the grid point equal to `t`, if any.
    pub fn time_index(&self, t: f64) -> Option<usize> {
        find_point(&self.times, t)
    }

    /// Index of the last grid point not after `t`, if `t >= 0`.
    pub fn index_at_or_before(&self, t: f64) -> Option<usize> {
        let idx = self.times.partition_point(|&x| x <= t + GRID_TOLERANCE);
        idx.checked_sub(1)
    }
}

impl TryFrom<Vec<f64>> for TimeGrid {
    type Error = SimulationError;

    fn try_from(times: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(times)
    }
}

impl From<TimeGrid> for Vec<f64> {
    fn from(grid: TimeGrid) -> Self {
        grid.times
    }
}

/// Tenor structure `T_0 < T_1 < ... < T_N` of accrual periods `[T_i, T_{i+1})`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct TenorGrid {
    dates: Vec<f64>,
}

impl TenorGrid {
    /// Construct a tenor grid from explicit period boundaries.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if fewer than two boundaries are given, a boundary
    /// is negative or non-finite, or the boundaries are not strictly increasing.
    pub fn new(dates: Vec<f64>) -> Result<Self, SimulationError> {
        validate_points(&dates, "tenor")?;
        if dates[0] < 0.0 {
            return Err(SimulationError::invalid(format!(
                "tenor grid must not start before 0, got {}",
                dates[0]
            )));
        }
        Ok(Self { dates })
    }

    /// Construct an equidistant tenor grid `start, start + period, ..., end`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `period` does not divide `[start, end]`.
    pub fn uniform(start: f64, end: f64, period: f64) -> Result<Self, SimulationError> {
        Self::new(uniform_points(start, end, period, "tenor")?)
    }

    /// Number of period boundaries (`N + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always `false`; a valid grid holds at least two boundaries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of accrual periods (`N`).
    #[inline]
    pub fn n_periods(&self) -> usize {
        self.dates.len() - 1
    }

    /// Boundary `T_index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn date(&self, index: usize) -> f64 {
        self.dates[index]
    }

    /// Accrual fraction `T_{index+1} - T_index` of period `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_periods()`.
    #[inline]
    pub fn period_length(&self, index: usize) -> f64 {
        self.dates[index + 1] - self.dates[index]
    }

    /// All period boundaries.
    #[inline]
    pub fn dates(&self) -> &[f64] {
        &self.dates
    }

    /// First boundary `T_0`.
    #[inline]
    pub fn first_date(&self) -> f64 {
        self.dates[0]
    }

    /// Last boundary `T_N`.
    #[inline]
    pub fn last_date(&self) -> f64 {
        self.dates[self.dates.len() - 1]
    }

    /// Index of the boundary equal to `t`, if any.
    pub fn date_index(&self, t: f64) -> Option<usize> {
        find_point(&self.dates, t)
    }

    /// Index `i` of the period with `T_i <= t < T_{i+1}`.
    ///
    /// Returns `None` before `T_0` and from `T_N` onwards.
    pub fn period_containing(&self, t: f64) -> Option<usize> {
        let idx = self.dates.partition_point(|&x| x <= t + GRID_TOLERANCE);
        if idx == 0 || idx >= self.dates.len() {
            None
        } else {
            Some(idx - 1)
        }
    }

    /// Index of the first boundary not before `t`, if any.
    pub fn first_index_at_or_after(&self, t: f64) -> Option<usize> {
        let idx = self.dates.partition_point(|&x| x < t - GRID_TOLERANCE);
        (idx < self.dates.len()).then_some(idx)
    }
}

impl TryFrom<Vec<f64>> for TenorGrid {
    type Error = SimulationError;

    fn try_from(dates: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(dates)
    }
}

impl From<TenorGrid> for Vec<f64> {
    fn from(grid: TenorGrid) -> Self {
        grid.dates
    }
}

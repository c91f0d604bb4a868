//! Instantaneous volatility of forward-rate components.

use std::sync::Arc;

use tenor_core::types::{SimulationError, TenorGrid, TimeGrid};

/// Piecewise-constant volatility `sigma_i(t_k)` per time step and component.
///
/// Component `i` is the forward rate of tenor period `[T_i, T_{i+1})`. Once
/// `T_i <= t_k` the rate is fixed and its volatility is zero, whatever the
/// constructor was given.
///
/// All constructors precompute the full matrix; lookups are a single index.
///
/// # Example
///
/// ```
/// use tenor_core::types::{TenorGrid, TimeGrid};
/// use tenor_models::models::covariance::LiborVolatilityModel;
///
/// let time = TimeGrid::uniform(2.0, 0.5).unwrap();
/// let tenor = TenorGrid::uniform(0.0, 2.0, 0.5).unwrap();
/// let vol = LiborVolatilityModel::constant(&time, &tenor, 0.01).unwrap();
///
/// assert_eq!(vol.volatility(0, 3), 0.01);
/// // Period [0.5, 1.0) is fixed from t = 0.5 onwards.
/// assert_eq!(vol.volatility(1, 1), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LiborVolatilityModel {
    n_steps: usize,
    n_components: usize,
    values: Arc<[f64]>,
}

impl LiborVolatilityModel {
    /// Volatility from an explicit matrix `matrix[time_index][component]`.
    ///
    /// One row per time step (`time.n_steps()` rows) is required; a trailing
    /// row for the final grid point is accepted and ignored.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` on a dimension mismatch or a non-finite entry.
    pub fn from_matrix(
        time: &TimeGrid,
        tenor: &TenorGrid,
        matrix: &[Vec<f64>],
    ) -> Result<Self, SimulationError> {
        let n_steps = time.n_steps();
        let n_components = tenor.n_periods();
        if matrix.len() != n_steps && matrix.len() != n_steps + 1 {
            return Err(SimulationError::invalid(format!(
                "volatility matrix has {} rows, expected {} (one per time step)",
                matrix.len(),
                n_steps
            )));
        }
        if let Some((k, row)) = matrix.iter().enumerate().find(|(_, r)| r.len() != n_components) {
            return Err(SimulationError::invalid(format!(
                "volatility matrix row {k} has {} entries, expected {n_components}",
                row.len()
            )));
        }
        Self::from_fn(time, tenor, |k, i, _, _| matrix[k][i])
    }

    /// The same volatility for every live component.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `sigma` is not finite.
    pub fn constant(time: &TimeGrid, tenor: &TenorGrid, sigma: f64) -> Result<Self, SimulationError> {
        Self::from_fn(time, tenor, |_, _, _, _| sigma)
    }

    /// Functional form `(a + b tau) exp(-c tau) + d` with `tau = T_i - t_k`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if a parameter is not finite.
    pub fn abcd(
        time: &TimeGrid,
        tenor: &TenorGrid,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    ) -> Result<Self, SimulationError> {
        if ![a, b, c, d].iter().all(|p| p.is_finite()) {
            return Err(SimulationError::invalid("abcd volatility parameters must be finite"));
        }
        Self::from_fn(time, tenor, |k, i, time, tenor| {
            let tau = tenor.date(i) - time.time(k);
            (a + b * tau) * (-c * tau).exp() + d
        })
    }

    /// Volatility under which a normal forward-rate model with
    /// [`ForwardBond`](super::LocalVolatility::ForwardBond) local volatility
    /// reproduces a Hull-White model with constant `sigma` and `mean_reversion`.
    ///
    /// ```text
    /// sigma_i(t_k) = sigma exp(-a (T_i - t_k))
    ///                * sqrt((exp(2 a dt) - 1) / (2 a dt))
    ///                * (1 - exp(-a delta_i)) / (a delta_i)
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `sigma` or `mean_reversion` is not finite.
    pub fn hull_white_equivalent(
        time: &TimeGrid,
        tenor: &TenorGrid,
        sigma: f64,
        mean_reversion: f64,
    ) -> Result<Self, SimulationError> {
        if !sigma.is_finite() || !mean_reversion.is_finite() {
            return Err(SimulationError::invalid(
                "Hull-White equivalent volatility parameters must be finite",
            ));
        }
        let a = mean_reversion;
        Self::from_fn(time, tenor, |k, i, time, tenor| {
            let tau = tenor.date(i) - time.time(k);
            let dt = time.dt(k);
            let delta = tenor.period_length(i);
            sigma * (-a * tau).exp() * step_average_factor(a, dt) * decay_average(a, delta)
        })
    }

    fn from_fn(
        time: &TimeGrid,
        tenor: &TenorGrid,
        f: impl Fn(usize, usize, &TimeGrid, &TenorGrid) -> f64,
    ) -> Result<Self, SimulationError> {
        let n_steps = time.n_steps();
        let n_components = tenor.n_periods();
        let mut values = Vec::with_capacity(n_steps * n_components);
        for k in 0..n_steps {
            let t = time.time(k);
            for i in 0..n_components {
                let sigma = if tenor.date(i) <= t { 0.0 } else { f(k, i, time, tenor) };
                if !sigma.is_finite() {
                    return Err(SimulationError::invalid(format!(
                        "volatility of component {i} at time index {k} is not finite"
                    )));
                }
                values.push(sigma);
            }
        }
        Ok(Self {
            n_steps,
            n_components,
            values: values.into(),
        })
    }

    /// Volatility of `component` over time step `time_index`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn volatility(&self, time_index: usize, component: usize) -> f64 {
        assert!(time_index < self.n_steps && component < self.n_components);
        self.values[time_index * self.n_components + component]
    }

    /// Number of time steps covered.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of components.
    #[inline]
    pub fn n_components(&self) -> usize {
        self.n_components
    }
}

/// `sqrt((exp(2 a dt) - 1) / (2 a dt))`, tending to 1 as `a dt -> 0`.
fn step_average_factor(a: f64, dt: f64) -> f64 {
    let x = 2.0 * a * dt;
    if x.abs() < 1e-10 {
        1.0
    } else {
        (x.exp_m1() / x).sqrt()
    }
}

/// `(1 - exp(-a delta)) / (a delta)`, tending to 1 as `a delta -> 0`.
fn decay_average(a: f64, delta: f64) -> f64 {
    let x = a * delta;
    if x.abs() < 1e-10 {
        1.0
    } else {
        -(-x).exp_m1() / x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grids() -> (TimeGrid, TenorGrid) {
        (
            TimeGrid::uniform(5.0, 0.5).unwrap(),
            TenorGrid::uniform(0.0, 5.0, 0.5).unwrap(),
        )
    }

    #[test]
    fn test_fixed_components_have_zero_volatility() {
        let (time, tenor) = grids();
        let vol = LiborVolatilityModel::constant(&time, &tenor, 0.2).unwrap();
        for k in 0..time.n_steps() {
            for i in 0..tenor.n_periods() {
                let expected = if tenor.date(i) <= time.time(k) { 0.0 } else { 0.2 };
                assert_eq!(vol.volatility(k, i), expected);
            }
        }
    }

    #[test]
    fn test_from_matrix_dimension_checks() {
        let (time, tenor) = grids();
        let good = vec![vec![0.01; tenor.n_periods()]; time.n_steps()];
        assert!(LiborVolatilityModel::from_matrix(&time, &tenor, &good).is_ok());

        let short_rows = vec![vec![0.01; tenor.n_periods()]; time.n_steps() - 1];
        assert!(LiborVolatilityModel::from_matrix(&time, &tenor, &short_rows).is_err());

        let short_cols = vec![vec![0.01; tenor.n_periods() - 1]; time.n_steps()];
        assert!(LiborVolatilityModel::from_matrix(&time, &tenor, &short_cols).is_err());
    }

    #[test]
    fn test_from_matrix_rejects_nan() {
        let (time, tenor) = grids();
        let mut matrix = vec![vec![0.01; tenor.n_periods()]; time.n_steps()];
        matrix[0][5] = f64::NAN;
        assert!(LiborVolatilityModel::from_matrix(&time, &tenor, &matrix).is_err());
    }

    #[test]
    fn test_abcd_shape() {
        let (time, tenor) = grids();
        let vol = LiborVolatilityModel::abcd(&time, &tenor, 0.1, 0.2, 1.0, 0.05).unwrap();
        let tau: f64 = 2.0;
        let expected = (0.1 + 0.2 * tau) * (-tau).exp() + 0.05;
        assert_relative_eq!(vol.volatility(0, 4), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_hull_white_equivalent_small_step_limit() {
        let (time, tenor) = grids();
        let vol = LiborVolatilityModel::hull_white_equivalent(&time, &tenor, 0.02, 0.1).unwrap();
        // Component 3 at t = 0: tau = 1.5
        let expected = 0.02
            * (-0.1_f64 * 1.5).exp()
            * (((0.1_f64).exp() - 1.0) / 0.1).sqrt()
            * (1.0 - (-0.05_f64).exp())
            / 0.05;
        assert_relative_eq!(vol.volatility(0, 3), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_hull_white_equivalent_zero_mean_reversion() {
        let (time, tenor) = grids();
        let vol = LiborVolatilityModel::hull_white_equivalent(&time, &tenor, 0.02, 0.0).unwrap();
        assert_relative_eq!(vol.volatility(2, 7), 0.02, epsilon = 1e-14);
    }
}

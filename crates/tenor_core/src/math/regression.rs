//! Least-squares regression of a random variable on basis functions.
//!
//! Used by early-exercise valuation to estimate conditional expectations:
//! given basis functions `phi_1, ..., phi_m` evaluated path-wise and a target
//! `Y`, find `beta` minimising `sum_p (Y_p - sum_j beta_j phi_j(p))^2`.
//!
//! The normal equations `(X^T X) beta = X^T y` are solved with an SVD
//! pseudo-inverse, so collinear basis functions (for example a constant swap
//! rate on a degenerate date) do not fail.

use nalgebra::{DMatrix, DVector};

use super::RandomVariable;
use crate::types::SimulationError;

/// Singular values below this fraction of the largest are treated as zero.
const SINGULAR_VALUE_CUTOFF: f64 = 1e-12;

/// Fitted regression coefficients with their basis count.
#[derive(Clone, Debug, PartialEq)]
pub struct RegressionFit {
    coefficients: Vec<f64>,
}

impl RegressionFit {
    /// Fitted coefficients, one per basis function.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate the fitted combination on every path of `basis`.
    ///
    /// # Panics
    ///
    /// Panics if `basis` does not have one entry per coefficient.
    pub fn predict(&self, basis: &[RandomVariable]) -> RandomVariable {
        assert_eq!(basis.len(), self.coefficients.len(), "basis size mismatch");
        let n_paths = basis.first().map_or(0, RandomVariable::len);
        RandomVariable::from_fn(n_paths, |p| self.predict_path(basis, p))
    }

    /// Evaluate the fitted combination on a single path.
    pub fn predict_path(&self, basis: &[RandomVariable], path: usize) -> f64 {
        self.coefficients
            .iter()
            .zip(basis)
            .map(|(beta, phi)| beta * phi.get(path))
            .sum()
    }
}

/// Fit `target` on `basis` using the paths selected by `paths`.
///
/// `time_index` and `time` locate the regression on the simulation grid and
/// only label errors.
///
/// # Errors
///
/// - `InsufficientSamples` if fewer paths than basis functions are selected
/// - `InvalidConfiguration` if the basis is empty or lengths differ
/// - `NumericalInstability` at `time_index` for the first selected path with
///   a non-finite basis or target value; if the decomposition itself fails,
///   `path` is the first path of the sample
pub fn least_squares_on(
    basis: &[RandomVariable],
    target: &RandomVariable,
    paths: &[usize],
    time_index: usize,
    time: f64,
) -> Result<RegressionFit, SimulationError> {
    let m = basis.len();
    if m == 0 {
        return Err(SimulationError::invalid("regression needs at least one basis function"));
    }
    if basis.iter().any(|phi| phi.len() != target.len()) {
        return Err(SimulationError::invalid(
            "regression basis and target must have the same number of paths",
        ));
    }
    if paths.len() < m {
        return Err(SimulationError::InsufficientSamples {
            time,
            paths: paths.len(),
            basis_functions: m,
        });
    }

    for &p in paths {
        let target_value = target.get(p);
        let bad = if !target_value.is_finite() {
            Some(("regression target", target_value))
        } else {
            basis
                .iter()
                .map(|phi| phi.get(p))
                .find(|v| !v.is_finite())
                .map(|v| ("regression basis", v))
        };
        if let Some((quantity, value)) = bad {
            return Err(SimulationError::NumericalInstability {
                time_index,
                path: p,
                quantity,
                value,
            });
        }
    }

    let mut xtx = DMatrix::<f64>::zeros(m, m);
    let mut xty = DVector::<f64>::zeros(m);
    let mut row = vec![0.0; m];
    for &p in paths {
        for (slot, phi) in row.iter_mut().zip(basis) {
            *slot = phi.get(p);
        }
        let y = target.get(p);
        for i in 0..m {
            xty[i] += row[i] * y;
            for j in i..m {
                xtx[(i, j)] += row[i] * row[j];
            }
        }
    }
    for i in 0..m {
        for j in 0..i {
            xtx[(i, j)] = xtx[(j, i)];
        }
    }

    let svd = xtx.svd(true, true);
    let cutoff = svd.singular_values.max() * SINGULAR_VALUE_CUTOFF;
    let first_path = paths[0];
    let beta = svd
        .solve(&xty, cutoff)
        .map_err(|_| SimulationError::NumericalInstability {
            time_index,
            path: first_path,
            quantity: "regression",
            value: f64::NAN,
        })?;

    if let Some(&b) = beta.iter().find(|b| !b.is_finite()) {
        return Err(SimulationError::NumericalInstability {
            time_index,
            path: first_path,
            quantity: "regression coefficient",
            value: b,
        });
    }

    Ok(RegressionFit {
        coefficients: beta.iter().copied().collect(),
    })
}

/// Fit `target` on `basis` using every path.
///
/// # Errors
///
/// See [`least_squares_on`].
pub fn least_squares(
    basis: &[RandomVariable],
    target: &RandomVariable,
    time_index: usize,
    time: f64,
) -> Result<RegressionFit, SimulationError> {
    let paths: Vec<usize> = (0..target.len()).collect();
    least_squares_on(basis, target, &paths, time_index, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn polynomial_basis(x: &RandomVariable, degree: i32) -> Vec<RandomVariable> {
        (0..=degree).map(|d| x.powi(d)).collect()
    }

    #[test]
    fn test_exact_quadratic_recovered() {
        let x = RandomVariable::from_fn(50, |p| p as f64 / 10.0 - 2.0);
        let y = x.map(|v| 1.5 - 0.5 * v + 2.0 * v * v);
        let fit = least_squares(&polynomial_basis(&x, 2), &y, 2, 1.0).unwrap();

        assert_relative_eq!(fit.coefficients()[0], 1.5, epsilon = 1e-9);
        assert_relative_eq!(fit.coefficients()[1], -0.5, epsilon = 1e-9);
        assert_relative_eq!(fit.coefficients()[2], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_predict_matches_target_for_exact_fit() {
        let x = RandomVariable::from_fn(20, |p| p as f64);
        let y = &x * 3.0 + 1.0;
        let basis = polynomial_basis(&x, 1);
        let fit = least_squares(&basis, &y, 1, 0.5).unwrap();
        let fitted = fit.predict(&basis);
        for p in 0..20 {
            assert_relative_eq!(fitted.get(p), y.get(p), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_collinear_basis_does_not_fail() {
        let x = RandomVariable::constant(0.05, 30);
        let y = RandomVariable::from_fn(30, |p| (p % 3) as f64);
        let basis = polynomial_basis(&x, 2);
        let fit = least_squares(&basis, &y, 4, 2.0).unwrap();
        assert_relative_eq!(fit.predict(&basis).average(), y.average(), epsilon = 1e-8);
    }

    #[test]
    fn test_insufficient_samples() {
        let x = RandomVariable::from_vec(vec![1.0, 2.0]);
        let y = RandomVariable::from_vec(vec![1.0, 4.0]);
        match least_squares(&polynomial_basis(&x, 2), &y, 7, 3.5) {
            Err(SimulationError::InsufficientSamples {
                time,
                paths,
                basis_functions,
            }) => {
                assert_eq!(time, 3.5);
                assert_eq!(paths, 2);
                assert_eq!(basis_functions, 3);
            }
            other => panic!("Expected InsufficientSamples, got {other:?}"),
        }
    }

    #[test]
    fn test_subset_regression_uses_only_selected_paths() {
        let x = RandomVariable::from_fn(10, |p| p as f64);
        // Paths 0..5 follow y = x, the rest are outliers.
        let y = RandomVariable::from_fn(10, |p| if p < 5 { p as f64 } else { 100.0 });
        let fit = least_squares_on(&polynomial_basis(&x, 1), &y, &[0, 1, 2, 3, 4], 0, 0.0).unwrap();
        assert_relative_eq!(fit.coefficients()[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(fit.coefficients()[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_input_reports_grid_context() {
        let x = RandomVariable::from_fn(10, |p| p as f64);
        let y = RandomVariable::from_fn(10, |p| if p == 6 { f64::NAN } else { p as f64 });
        match least_squares(&polynomial_basis(&x, 1), &y, 5, 2.5) {
            Err(SimulationError::NumericalInstability {
                time_index,
                path,
                quantity,
                value,
            }) => {
                assert_eq!(time_index, 5);
                assert_eq!(path, 6);
                assert_eq!(quantity, "regression target");
                assert!(value.is_nan());
            }
            other => panic!("Expected NumericalInstability, got {other:?}"),
        }

        // Paths outside the sample are not inspected
        assert!(least_squares_on(&polynomial_basis(&x, 1), &y, &[0, 1, 2, 3], 5, 2.5).is_ok());

        let basis = vec![RandomVariable::constant(1.0, 10), x.map(|v| if v == 3.0 { f64::INFINITY } else { v })];
        assert!(matches!(
            least_squares_on(&basis, &x, &[1, 3, 5], 2, 1.0),
            Err(SimulationError::NumericalInstability {
                time_index: 2,
                path: 3,
                quantity: "regression basis",
                ..
            })
        ));
    }
}

//! Factor-reduced correlation between forward-rate components.

use std::sync::Arc;

use nalgebra::{DMatrix, SymmetricEigen};
use tenor_core::types::{SimulationError, TenorGrid};

/// Correlation `rho_ij = f_i . f_j` given by unit factor vectors `f_i in R^F`.
///
/// # Example
///
/// ```
/// use tenor_core::types::TenorGrid;
/// use tenor_models::models::covariance::FactorCorrelation;
///
/// let tenor = TenorGrid::uniform(0.0, 10.0, 0.5).unwrap();
/// let corr = FactorCorrelation::exponential_decay(&tenor, 0.1, 3).unwrap();
///
/// assert_eq!(corr.n_factors(), 3);
/// assert!((corr.correlation(4, 4) - 1.0).abs() < 1e-12);
/// assert!(corr.correlation(0, 19) < corr.correlation(0, 1));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FactorCorrelation {
    n_components: usize,
    n_factors: usize,
    factors: Arc<[f64]>,
}

impl FactorCorrelation {
    /// Exponential decay `rho_ij = exp(-decay |T_i - T_j|)` on the period start
    /// dates, reduced to `n_factors` factors.
    ///
    /// The reduction keeps the `n_factors` largest eigenpairs of the full
    /// correlation matrix and renormalises every row to unit length, so the
    /// reduced matrix keeps a unit diagonal. Each factor is signed so that its
    /// loadings sum to a non-negative number.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `decay` is negative or not finite, or
    /// `n_factors` is zero or exceeds the number of components.
    pub fn exponential_decay(
        tenor: &TenorGrid,
        decay: f64,
        n_factors: usize,
    ) -> Result<Self, SimulationError> {
        if !(decay >= 0.0) || !decay.is_finite() {
            return Err(SimulationError::invalid(format!(
                "correlation decay must be non-negative, got {decay}"
            )));
        }
        let n = tenor.n_periods();
        let full = DMatrix::from_fn(n, n, |i, j| {
            (-decay * (tenor.date(i) - tenor.date(j)).abs()).exp()
        });
        Self::from_correlation_matrix(full, n_factors)
    }

    /// Reduce an explicit symmetric correlation matrix to `n_factors` factors.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` on a non-square or non-finite matrix, or an
    /// invalid factor count.
    pub fn from_matrix(matrix: &[Vec<f64>], n_factors: usize) -> Result<Self, SimulationError> {
        let n = matrix.len();
        if n == 0 || matrix.iter().any(|row| row.len() != n) {
            return Err(SimulationError::invalid("correlation matrix must be square and non-empty"));
        }
        if matrix.iter().flatten().any(|v| !v.is_finite()) {
            return Err(SimulationError::invalid("correlation matrix contains a non-finite entry"));
        }
        Self::from_correlation_matrix(DMatrix::from_fn(n, n, |i, j| matrix[i][j]), n_factors)
    }

    fn from_correlation_matrix(full: DMatrix<f64>, n_factors: usize) -> Result<Self, SimulationError> {
        let n = full.nrows();
        if n_factors == 0 || n_factors > n {
            return Err(SimulationError::invalid(format!(
                "number of factors must be in [1, {n}], got {n_factors}"
            )));
        }

        let eigen = SymmetricEigen::new(full);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        let mut factors = vec![0.0; n * n_factors];
        for (f, &col) in order.iter().take(n_factors).enumerate() {
            let scale = eigen.eigenvalues[col].max(0.0).sqrt();
            let column = eigen.eigenvectors.column(col);
            let sign = if column.sum() < 0.0 { -1.0 } else { 1.0 };
            for i in 0..n {
                factors[i * n_factors + f] = sign * scale * column[i];
            }
        }

        for row in factors.chunks_mut(n_factors) {
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|v| *v /= norm);
            }
        }

        Ok(Self {
            n_components: n,
            n_factors,
            factors: factors.into(),
        })
    }

    /// Factor vector `f_i` of `component`.
    #[inline]
    pub fn factor(&self, component: usize) -> &[f64] {
        let start = component * self.n_factors;
        &self.factors[start..start + self.n_factors]
    }

    /// Reduced correlation between two components.
    pub fn correlation(&self, i: usize, j: usize) -> f64 {
        self.factor(i)
            .iter()
            .zip(self.factor(j))
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Number of factors `F`.
    #[inline]
    pub fn n_factors(&self) -> usize {
        self.n_factors
    }

    /// Number of components.
    #[inline]
    pub fn n_components(&self) -> usize {
        self.n_components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tenor() -> TenorGrid {
        TenorGrid::uniform(0.0, 10.0, 0.5).unwrap()
    }

    #[test]
    fn test_zero_decay_single_factor_is_perfect_correlation() {
        let corr = FactorCorrelation::exponential_decay(&tenor(), 0.0, 1).unwrap();
        for i in 0..corr.n_components() {
            assert_relative_eq!(corr.factor(i)[0], 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_full_rank_reproduces_matrix() {
        let tenor = TenorGrid::uniform(0.0, 3.0, 0.5).unwrap();
        let n = tenor.n_periods();
        let corr = FactorCorrelation::exponential_decay(&tenor, 0.3, n).unwrap();
        for i in 0..n {
            for j in 0..n {
                let expected = (-0.3 * (tenor.date(i) - tenor.date(j)).abs()).exp();
                assert_relative_eq!(corr.correlation(i, j), expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_reduced_rank_has_unit_diagonal() {
        let corr = FactorCorrelation::exponential_decay(&tenor(), 0.2, 2).unwrap();
        for i in 0..corr.n_components() {
            assert_relative_eq!(corr.correlation(i, i), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_first_factor_is_positive_level() {
        let corr = FactorCorrelation::exponential_decay(&tenor(), 0.05, 3).unwrap();
        let sum: f64 = (0..corr.n_components()).map(|i| corr.factor(i)[0]).sum();
        assert!(sum > 0.0);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(FactorCorrelation::exponential_decay(&tenor(), -0.1, 1).is_err());
        assert!(FactorCorrelation::exponential_decay(&tenor(), 0.1, 0).is_err());
        assert!(FactorCorrelation::exponential_decay(&tenor(), 0.1, 21).is_err());
        assert!(FactorCorrelation::from_matrix(&[vec![1.0, 0.5]], 1).is_err());
    }
}

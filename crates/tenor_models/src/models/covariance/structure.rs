//! Factor loadings from volatility, correlation and local volatility.

use std::sync::Arc;

use nalgebra::{DMatrix, SymmetricEigen};
use tenor_core::types::{SimulationError, TenorGrid, TimeGrid};

use super::{FactorCorrelation, LiborVolatilityModel, LocalVolatility, StateSpace};

/// Relative tolerance for the positive-semidefinite diagnostic.
const PSD_TOLERANCE: f64 = 1e-10;

/// Covariance of forward-rate components, expressed as factor loadings.
///
/// The loading of component `i` over step `k` is
///
/// ```text
/// lambda_i(t_k) = s_i(L) * sigma_i(t_k) * f_i
/// ```
///
/// where `s_i` is the local-volatility scaling and `f_i` the unit factor
/// vector, so the instantaneous covariance is `lambda_i . lambda_j`. The
/// loadings act in the state space given by [`StateSpace`].
#[derive(Clone, Debug)]
pub struct CovarianceStructure {
    time_grid: Arc<TimeGrid>,
    tenor_grid: Arc<TenorGrid>,
    volatility: Arc<LiborVolatilityModel>,
    correlation: Arc<FactorCorrelation>,
    state_space: StateSpace,
    local_volatility: LocalVolatility,
}

impl CovarianceStructure {
    /// Combine a volatility model and a factor correlation.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the volatility model does not cover the time
    /// grid or the components of the tenor grid, or the correlation has a
    /// different number of components.
    pub fn new(
        time_grid: Arc<TimeGrid>,
        tenor_grid: Arc<TenorGrid>,
        volatility: Arc<LiborVolatilityModel>,
        correlation: Arc<FactorCorrelation>,
        state_space: StateSpace,
        local_volatility: LocalVolatility,
    ) -> Result<Self, SimulationError> {
        let n_components = tenor_grid.n_periods();
        if volatility.n_steps() != time_grid.n_steps() {
            return Err(SimulationError::invalid(format!(
                "volatility covers {} time steps, time grid has {}",
                volatility.n_steps(),
                time_grid.n_steps()
            )));
        }
        if volatility.n_components() != n_components || correlation.n_components() != n_components {
            return Err(SimulationError::invalid(format!(
                "covariance components mismatch: volatility {}, correlation {}, tenor periods {}",
                volatility.n_components(),
                correlation.n_components(),
                n_components
            )));
        }
        Ok(Self {
            time_grid,
            tenor_grid,
            volatility,
            correlation,
            state_space,
            local_volatility,
        })
    }

    /// Simulation time grid.
    #[inline]
    pub fn time_grid(&self) -> &Arc<TimeGrid> {
        &self.time_grid
    }

    /// Tenor grid of the components.
    #[inline]
    pub fn tenor_grid(&self) -> &Arc<TenorGrid> {
        &self.tenor_grid
    }

    /// Number of factors `F`.
    #[inline]
    pub fn n_factors(&self) -> usize {
        self.correlation.n_factors()
    }

    /// Number of components `N`.
    #[inline]
    pub fn n_components(&self) -> usize {
        self.tenor_grid.n_periods()
    }

    /// State space of the scheme's additive update.
    #[inline]
    pub fn state_space(&self) -> StateSpace {
        self.state_space
    }

    /// Local-volatility option.
    #[inline]
    pub fn local_volatility(&self) -> LocalVolatility {
        self.local_volatility
    }

    /// Underlying volatility model.
    #[inline]
    pub fn volatility(&self) -> &LiborVolatilityModel {
        &self.volatility
    }

    /// Underlying factor correlation.
    #[inline]
    pub fn correlation(&self) -> &FactorCorrelation {
        &self.correlation
    }

    /// Write `lambda_component(t_k)` for the given state into `loading`.
    ///
    /// `state` holds the forward rates of all components.
    ///
    /// # Panics
    ///
    /// Panics if `loading.len() != n_factors()` or an index is out of range.
    pub fn factor_loading(&self, time_index: usize, component: usize, state: &[f64], loading: &mut [f64]) {
        let sigma = self.volatility.volatility(time_index, component);
        let scale = match self.local_volatility {
            LocalVolatility::None => 1.0,
            LocalVolatility::ForwardBond => {
                1.0 + self.tenor_grid.period_length(component) * state[component]
            }
        };
        let s = sigma * scale;
        for (out, f) in loading.iter_mut().zip(self.correlation.factor(component)) {
            *out = s * f;
        }
    }

    /// Instantaneous covariance `lambda_i . lambda_j` at step `k`.
    pub fn covariance(&self, time_index: usize, i: usize, j: usize, state: &[f64]) -> f64 {
        let f = self.n_factors();
        let mut li = vec![0.0; f];
        let mut lj = vec![0.0; f];
        self.factor_loading(time_index, i, state, &mut li);
        self.factor_loading(time_index, j, state, &mut lj);
        li.iter().zip(&lj).map(|(a, b)| a * b).sum()
    }

    /// Check that the covariance matrix at step `k` is positive semidefinite.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` naming the most negative eigenvalue.
    pub fn check_positive_semidefinite(&self, time_index: usize, state: &[f64]) -> Result<(), SimulationError> {
        let n = self.n_components();
        let matrix = DMatrix::from_fn(n, n, |i, j| self.covariance(time_index, i, j, state));
        let scale = (0..n).map(|i| matrix[(i, i)]).fold(0.0, f64::max);
        let eigen = SymmetricEigen::new(matrix);
        let min = eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
        if min < -PSD_TOLERANCE * scale.max(1e-300) {
            return Err(SimulationError::invalid(format!(
                "covariance at time index {time_index} is not positive semidefinite (eigenvalue {min})"
            )));
        }
        Ok(())
    }
}

//! LIBOR market model.
//!
//! The state holds one simple-compounded forward rate `L_i` per tenor period
//! `[T_i, T_{i+1})`, driven by the factor loadings of a
//! [`CovarianceStructure`]:
//!
//! ```text
//! dL_i = mu_i dt + lambda_i . dW          (normal state space)
//! d ln L_i = mu_i dt + lambda_i . dW      (log-normal state space)
//! ```
//!
//! ## Drift
//!
//! With `w_j = delta_j / (1 + delta_j L_j)` (times `L_j` in log-normal space):
//!
//! ```text
//! spot measure:      mu_i =  sum_{j <= i} w_j lambda_i . lambda_j
//! terminal measure:  mu_i = -sum_{j >  i} w_j lambda_i . lambda_j
//! ```
//!
//! with an additional `-1/2 |lambda_i|^2` in log-normal space. Both sums are
//! accumulated as running factor vectors, so a full drift costs `O(N F)`.
//!
//! ## Numeraire
//!
//! - Spot: `N(t) = prod_{T_{j+1} <= t} (1 + delta_j L_j) * (1 + L_m (t - T_m))`
//!   for `T_m < t < T_{m+1}`.
//! - Terminal: `N(t) = P(t; T_N)`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tenor_core::market_data::curves::FlatForwardCurve;
//! use tenor_core::types::{TenorGrid, TimeGrid};
//! use tenor_models::models::covariance::*;
//! use tenor_models::models::rates::LiborMarketModel;
//! use tenor_models::models::{Measure, TermStructureModel};
//!
//! let time = Arc::new(TimeGrid::uniform(5.0, 0.5).unwrap());
//! let tenor = Arc::new(TenorGrid::uniform(0.0, 5.0, 0.5).unwrap());
//! let vol = Arc::new(LiborVolatilityModel::constant(&time, &tenor, 0.2).unwrap());
//! let corr = Arc::new(FactorCorrelation::exponential_decay(&tenor, 0.1, 2).unwrap());
//! let cov = CovarianceStructure::new(
//!     time, tenor, vol, corr, StateSpace::LogNormal, LocalVolatility::None,
//! ).unwrap();
//!
//! let curve = FlatForwardCurve::new(0.03, 0.5).unwrap();
//! let lmm = LiborMarketModel::new(cov, &curve, Measure::Spot).unwrap();
//!
//! assert_eq!(lmm.n_components(), 10);
//! assert_eq!(lmm.numeraire(0, &lmm.initial_state()), 1.0);
//! ```

use std::sync::Arc;

use tenor_core::market_data::curves::YieldCurve;
use tenor_core::types::{SimulationError, TenorGrid, TimeGrid, GRID_TOLERANCE};

use crate::models::covariance::{CovarianceStructure, StateSpace};
use crate::models::term_structure::{Measure, TermStructureModel};

/// LIBOR market model on a tenor grid starting at 0.
#[derive(Clone, Debug)]
pub struct LiborMarketModel {
    time_grid: Arc<TimeGrid>,
    tenor_grid: Arc<TenorGrid>,
    covariance: CovarianceStructure,
    measure: Measure,
    initial_forwards: Vec<f64>,
}

impl LiborMarketModel {
    /// Seed the initial forward rates `L_i(0) = L(0; T_i, T_{i+1})` from `curve`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the curve cannot be queried on the tenor
    /// grid, or see [`LiborMarketModel::from_forwards`].
    pub fn new<C>(covariance: CovarianceStructure, curve: &C, measure: Measure) -> Result<Self, SimulationError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let tenor = covariance.tenor_grid();
        let forwards = (0..tenor.n_periods())
            .map(|i| curve.forward_rate(tenor.date(i), tenor.date(i + 1)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_forwards(covariance, forwards, measure)
    }

    /// Use explicit initial forward rates, one per tenor period.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if
    /// - the tenor grid does not start at 0,
    /// - the time grid extends beyond the last tenor date,
    /// - the number of forwards differs from the number of periods,
    /// - a forward is not finite, or not positive in log-normal state space.
    pub fn from_forwards(
        covariance: CovarianceStructure,
        initial_forwards: Vec<f64>,
        measure: Measure,
    ) -> Result<Self, SimulationError> {
        let time_grid = Arc::clone(covariance.time_grid());
        let tenor_grid = Arc::clone(covariance.tenor_grid());

        if tenor_grid.first_date().abs() > GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "LIBOR market model tenor grid must start at 0, got {}",
                tenor_grid.first_date()
            )));
        }
        if time_grid.last_time() > tenor_grid.last_date() + GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "simulation horizon {} exceeds the last tenor date {}",
                time_grid.last_time(),
                tenor_grid.last_date()
            )));
        }
        if initial_forwards.len() != tenor_grid.n_periods() {
            return Err(SimulationError::invalid(format!(
                "{} initial forwards for {} tenor periods",
                initial_forwards.len(),
                tenor_grid.n_periods()
            )));
        }
        for (i, &l) in initial_forwards.iter().enumerate() {
            if !l.is_finite() {
                return Err(SimulationError::invalid(format!("initial forward {i} is not finite")));
            }
            if covariance.state_space() == StateSpace::LogNormal && l <= 0.0 {
                return Err(SimulationError::invalid(format!(
                    "log-normal state space requires positive forwards, L_{i}(0) = {l}"
                )));
            }
        }

        Ok(Self {
            time_grid,
            tenor_grid,
            covariance,
            measure,
            initial_forwards,
        })
    }

    /// Simulation measure.
    #[inline]
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// Covariance structure driving the forwards.
    #[inline]
    pub fn covariance(&self) -> &CovarianceStructure {
        &self.covariance
    }

    /// Initial forward rates `L_i(0)`.
    #[inline]
    pub fn initial_forwards(&self) -> &[f64] {
        &self.initial_forwards
    }

    fn tenor_index(&self, date: f64) -> Result<usize, SimulationError> {
        self.tenor_grid
            .date_index(date)
            .ok_or(SimulationError::UnsupportedTenor {
                requested: date,
                grid: "tenor",
            })
    }

    /// Drift weight `delta_j / (1 + delta_j L_j)`, times `L_j` in log-normal space.
    #[inline]
    fn drift_weight(&self, component: usize, forward: f64) -> f64 {
        let delta = self.tenor_grid.period_length(component);
        let w = delta / (1.0 + delta * forward);
        match self.covariance.state_space() {
            StateSpace::Normal => w,
            StateSpace::LogNormal => w * forward,
        }
    }

    /// `P(t; T_maturity_index)` from forwards, with a stub for a partially
    /// elapsed period.
    fn bond_from_state(&self, t: f64, state: &[f64], maturity_index: usize) -> Result<f64, SimulationError> {
        let first = self
            .tenor_grid
            .first_index_at_or_after(t)
            .ok_or(SimulationError::UnsupportedTenor {
                requested: t,
                grid: "tenor",
            })?;
        if maturity_index < first {
            return Err(SimulationError::invalid(format!(
                "bond maturity {} lies before observation time {t}",
                self.tenor_grid.date(maturity_index)
            )));
        }
        let mut bond = 1.0;
        let next_date = self.tenor_grid.date(first);
        if first > 0 && next_date > t + GRID_TOLERANCE {
            bond /= 1.0 + state[first - 1] * (next_date - t);
        }
        for j in first..maturity_index {
            bond /= 1.0 + self.tenor_grid.period_length(j) * state[j];
        }
        Ok(bond)
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn axpy(acc: &mut [f64], w: f64, x: &[f64]) {
    acc.iter_mut().zip(x).for_each(|(a, v)| *a += w * v);
}

impl TermStructureModel for LiborMarketModel {
    fn model_name(&self) -> &'static str {
        "LiborMarketModel"
    }

    fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    fn tenor_grid(&self) -> &TenorGrid {
        &self.tenor_grid
    }

    fn n_components(&self) -> usize {
        self.tenor_grid.n_periods()
    }

    fn n_factors(&self) -> usize {
        self.covariance.n_factors()
    }

    fn state_space(&self, _component: usize) -> StateSpace {
        self.covariance.state_space()
    }

    fn initial_state(&self) -> Vec<f64> {
        self.initial_forwards.clone()
    }

    fn drift(&self, time_index: usize, state: &[f64], drift: &mut [f64]) {
        let n = self.n_components();
        let f = self.n_factors();
        let log_normal = self.covariance.state_space() == StateSpace::LogNormal;
        // Running sum of w_j lambda_j over the components already visited.
        let mut acc = vec![0.0; f];
        let mut loading = vec![0.0; f];
        let convexity = |loading: &[f64]| {
            if log_normal {
                0.5 * dot(loading, loading)
            } else {
                0.0
            }
        };

        match self.measure {
            Measure::Spot => {
                for i in 0..n {
                    self.covariance.factor_loading(time_index, i, state, &mut loading);
                    axpy(&mut acc, self.drift_weight(i, state[i]), &loading);
                    drift[i] = dot(&loading, &acc) - convexity(&loading);
                }
            }
            Measure::Terminal => {
                for i in (0..n).rev() {
                    self.covariance.factor_loading(time_index, i, state, &mut loading);
                    drift[i] = -dot(&loading, &acc) - convexity(&loading);
                    axpy(&mut acc, self.drift_weight(i, state[i]), &loading);
                }
            }
        }
    }

    fn factor_loading(&self, time_index: usize, component: usize, state: &[f64], loading: &mut [f64]) {
        self.covariance.factor_loading(time_index, component, state, loading);
    }

    fn numeraire(&self, time_index: usize, state: &[f64]) -> f64 {
        let t = self.time_grid.time(time_index);
        match self.measure {
            Measure::Spot => {
                let mut numeraire = 1.0;
                for j in 0..self.tenor_grid.n_periods() {
                    let start = self.tenor_grid.date(j);
                    let end = self.tenor_grid.date(j + 1);
                    if end <= t + GRID_TOLERANCE {
                        numeraire *= 1.0 + self.tenor_grid.period_length(j) * state[j];
                    } else {
                        if t > start + GRID_TOLERANCE {
                            numeraire *= 1.0 + state[j] * (t - start);
                        }
                        break;
                    }
                }
                numeraire
            }
            // The horizon never exceeds T_N, so the bond is always defined.
            Measure::Terminal => self
                .bond_from_state(t, state, self.tenor_grid.n_periods())
                .unwrap_or(f64::NAN),
        }
    }

    fn forward_rate(&self, _time_index: usize, state: &[f64], start: f64, end: f64) -> Result<f64, SimulationError> {
        let s = self.tenor_index(start)?;
        let e = self.tenor_index(end)?;
        if e <= s {
            return Err(SimulationError::invalid(format!(
                "forward period end {end} must be after start {start}"
            )));
        }
        let growth: f64 = (s..e)
            .map(|j| 1.0 + self.tenor_grid.period_length(j) * state[j])
            .product();
        Ok((growth - 1.0) / (end - start))
    }

    fn discount_bond(&self, time_index: usize, state: &[f64], maturity: f64) -> Result<f64, SimulationError> {
        let n = self.tenor_index(maturity)?;
        self.bond_from_state(self.time_grid.time(time_index), state, n)
    }

    fn initial_discount_factor(&self, maturity: f64) -> Result<f64, SimulationError> {
        let n = self.tenor_index(maturity)?;
        self.bond_from_state(0.0, &self.initial_forwards, n)
    }
}

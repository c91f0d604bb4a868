//! Simulated states and numeraires on every grid point.

use rayon::prelude::*;
use tenor_core::math::RandomVariable;
use tenor_core::types::{SimulationError, TenorGrid, TimeGrid};
use tenor_models::models::{RateModel, TermStructureModel};
use tracing::{debug, info, info_span};

use super::scheme::EulerScheme;
use crate::rng::BrownianDriver;

/// States of all paths at one time index.
#[derive(Clone, Copy, Debug)]
pub struct StateView<'a> {
    data: &'a [f64],
    n_components: usize,
}

impl<'a> StateView<'a> {
    /// State vector of `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is out of range.
    #[inline]
    pub fn path(&self, path: usize) -> &'a [f64] {
        &self.data[path * self.n_components..(path + 1) * self.n_components]
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.data.len() / self.n_components
    }

    /// Number of components per path.
    #[inline]
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// One component across all paths.
    pub fn component(&self, component: usize) -> RandomVariable {
        RandomVariable::from_fn(self.n_paths(), |p| self.data[p * self.n_components + component])
    }
}

/// A model evolved over its time grid.
///
/// Built once, then read-only: states and numeraires are cached for every
/// time index and products query them through the model's observables.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use tenor_core::market_data::curves::FlatForwardCurve;
/// use tenor_core::types::{TenorGrid, TimeGrid};
/// use tenor_models::models::rates::{HullWhiteModel, HullWhiteVariant, ShortRateVolatility};
/// use tenor_pricing::mc::{EulerScheme, Simulation};
/// use tenor_pricing::rng::BrownianDriver;
///
/// let time = Arc::new(TimeGrid::uniform(5.0, 0.5).unwrap());
/// let tenor = Arc::new(TenorGrid::uniform(0.0, 5.0, 0.5).unwrap());
/// let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
/// let vol = ShortRateVolatility::constant(0.02, 0.1).unwrap();
/// let model = HullWhiteModel::new(Arc::clone(&time), tenor, &curve, vol, HullWhiteVariant::Standard).unwrap();
///
/// let driver = BrownianDriver::new(time, 1, 1000, 3141).unwrap();
/// let simulation = Simulation::build(model.into(), &EulerScheme::default(), &driver).unwrap();
///
/// assert_eq!(simulation.numeraire_at(0).average(), 1.0);
/// let bond = simulation.discount_bond(2.0, 5.0).unwrap();
/// assert!(bond.min() > 0.0 && bond.max() < 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct Simulation {
    model: RateModel,
    n_paths: usize,
    /// Path-major states per time index.
    states: Vec<Vec<f64>>,
    numeraires: Vec<RandomVariable>,
}

impl Simulation {
    /// Evolve `model` with `scheme` over the increments of `driver`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the driver's grid or factor count differs
    ///   from the model's
    /// - `NumericalInstability` if a state component becomes non-finite or a
    ///   numeraire is not strictly positive; nothing is kept in that case
    pub fn build(model: RateModel, scheme: &EulerScheme, driver: &BrownianDriver) -> Result<Self, SimulationError> {
        if driver.n_factors() != model.n_factors() {
            return Err(SimulationError::invalid(format!(
                "driver has {} factors, model {} needs {}",
                driver.n_factors(),
                model.model_name(),
                model.n_factors()
            )));
        }
        if driver.time_grid().as_ref() != model.time_grid() {
            return Err(SimulationError::invalid(
                "driver and model use different time grids",
            ));
        }

        let n_paths = driver.n_paths();
        let n_steps = model.time_grid().n_steps();
        let n = model.n_components();
        let _span = info_span!(
            "simulation_build",
            model = model.model_name(),
            n_paths,
            n_steps,
            n_components = n,
            scheme = ?scheme.kind()
        )
        .entered();

        let initial = model.initial_state();
        let mut states = Vec::with_capacity(n_steps + 1);
        states.push(initial.repeat(n_paths));
        let mut numeraires = Vec::with_capacity(n_steps + 1);
        numeraires.push(numeraire_at(&model, 0, &states[0], n)?);

        for k in 0..n_steps {
            let mut next = vec![0.0; n_paths * n];
            scheme.step(&model, driver, k, &states[k], &mut next)?;
            let numeraire = numeraire_at(&model, k + 1, &next, n)?;
            debug!(
                time_index = k + 1,
                time = model.time_grid().time(k + 1),
                numeraire_mean = numeraire.average(),
                "step evolved"
            );
            states.push(next);
            numeraires.push(numeraire);
        }

        info!(n_paths, n_steps, "simulation built");
        Ok(Self {
            model,
            n_paths,
            states,
            numeraires,
        })
    }

    /// The simulated model.
    #[inline]
    pub fn model(&self) -> &RateModel {
        &self.model
    }

    /// Simulation time grid.
    #[inline]
    pub fn time_grid(&self) -> &TimeGrid {
        self.model.time_grid()
    }

    /// Tenor grid of the model.
    #[inline]
    pub fn tenor_grid(&self) -> &TenorGrid {
        self.model.tenor_grid()
    }

    /// Number of paths `P`.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Index of time `t` on the simulation grid.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if `t` is not a grid point.
    pub fn time_index(&self, t: f64) -> Result<usize, SimulationError> {
        self.time_grid()
            .time_index(t)
            .ok_or(SimulationError::UnsupportedTenor {
                requested: t,
                grid: "time",
            })
    }

    /// States of all paths at `time_index`.
    ///
    /// # Panics
    ///
    /// Panics if `time_index` is beyond the grid.
    #[inline]
    pub fn state_at(&self, time_index: usize) -> StateView<'_> {
        StateView {
            data: &self.states[time_index],
            n_components: self.model.n_components(),
        }
    }

    /// Numeraire at `time_index`.
    ///
    /// # Panics
    ///
    /// Panics if `time_index` is beyond the grid.
    #[inline]
    pub fn numeraire_at(&self, time_index: usize) -> &RandomVariable {
        &self.numeraires[time_index]
    }

    /// Numeraire at grid time `t`.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if `t` is not a grid point.
    pub fn numeraire(&self, t: f64) -> Result<RandomVariable, SimulationError> {
        Ok(self.numeraire_at(self.time_index(t)?).clone())
    }

    /// Forward rate `L(t; start, end)`.
    ///
    /// Observed at `min(t, start)`: a rate whose period has started is fixed
    /// at its start date.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if the observation time is not a grid point or the
    /// period is not representable by the model.
    pub fn forward_rate(&self, t: f64, start: f64, end: f64) -> Result<RandomVariable, SimulationError> {
        let k = self.time_index(t.min(start))?;
        let view = self.state_at(k);
        let values = (0..self.n_paths)
            .into_par_iter()
            .map(|p| self.model.forward_rate(k, view.path(p), start, end))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RandomVariable::from_vec(values))
    }

    /// Zero bond `P(t; maturity)`.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if `t` is not a grid point or `maturity` is not
    /// representable by the model; `InvalidConfiguration` if `maturity < t`.
    pub fn discount_bond(&self, t: f64, maturity: f64) -> Result<RandomVariable, SimulationError> {
        let k = self.time_index(t)?;
        let view = self.state_at(k);
        let values = (0..self.n_paths)
            .into_par_iter()
            .map(|p| self.model.discount_bond(k, view.path(p), maturity))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RandomVariable::from_vec(values))
    }
}

fn numeraire_at(
    model: &RateModel,
    time_index: usize,
    states: &[f64],
    n_components: usize,
) -> Result<RandomVariable, SimulationError> {
    let values: Vec<f64> = states
        .par_chunks(n_components)
        .map(|s| model.numeraire(time_index, s))
        .collect();
    if let Some((path, &value)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !(**v > 0.0) || !v.is_finite())
    {
        return Err(SimulationError::NumericalInstability {
            time_index,
            path,
            quantity: "numeraire",
            value,
        });
    }
    Ok(RandomVariable::from_vec(values))
}

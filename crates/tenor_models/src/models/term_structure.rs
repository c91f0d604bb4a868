//! Capability set shared by all term-structure models.
//!
//! The simulation engine only ever talks to a model through
//! [`TermStructureModel`]: it asks for the initial state, the drift and factor
//! loadings of each component, and the numeraire implied by a state. Products
//! read observables (forward rates, discount bonds) through the same trait.
//!
//! ## Conventions
//!
//! - A *state* is the slice of all components of one path at one time index.
//! - `drift` and `factor_loading` are expressed in the update space of each
//!   component (see [`StateSpace`]); for a log-normal component the drift is
//!   that of the logarithm.
//! - Observables take the time index at which the state was observed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tenor_core::types::{SimulationError, TenorGrid, TimeGrid};

use super::covariance::StateSpace;

/// Probability measure of the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum Measure {
    /// Numeraire is the discretely rolled money-market account.
    #[default]
    Spot,
    /// Numeraire is the zero bond maturing at the last tenor date.
    Terminal,
}

/// What a model must provide to be simulated and valued.
pub trait TermStructureModel: Send + Sync {
    /// Model name for logging.
    fn model_name(&self) -> &'static str;

    /// Simulation time grid.
    fn time_grid(&self) -> &TimeGrid;

    /// Tenor grid on which forward rates and bonds are observable.
    fn tenor_grid(&self) -> &TenorGrid;

    /// Number of state components per path.
    fn n_components(&self) -> usize;

    /// Number of Brownian factors driving the model.
    fn n_factors(&self) -> usize;

    /// Update space of `component`.
    fn state_space(&self, component: usize) -> StateSpace;

    /// State at time index 0.
    fn initial_state(&self) -> Vec<f64>;

    /// Drift of every component over step `time_index`, written into `drift`.
    fn drift(&self, time_index: usize, state: &[f64], drift: &mut [f64]);

    /// Factor loading of `component` over step `time_index`, written into `loading`.
    fn factor_loading(&self, time_index: usize, component: usize, state: &[f64], loading: &mut [f64]);

    /// Whether one step with the state-dependent drift taken at the start of
    /// the step is exact in distribution.
    ///
    /// Schemes must not re-evaluate the drift at a predicted state for such
    /// models: the drift already integrates the step and the numeraire
    /// increment depends on the start state only.
    fn exact_step(&self) -> bool {
        false
    }

    /// Numeraire implied by `state` at `time_index`.
    fn numeraire(&self, time_index: usize, state: &[f64]) -> f64;

    /// Simple-compounded forward rate for `[start, end]` seen from `state` at `time_index`.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if `start` or `end` is not representable on the model's grid.
    fn forward_rate(&self, time_index: usize, state: &[f64], start: f64, end: f64) -> Result<f64, SimulationError>;

    /// Zero bond `P(t_k; maturity)` seen from `state` at `time_index`.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if `maturity` is not representable on the model's grid,
    /// `InvalidConfiguration` if it lies before the observation time.
    fn discount_bond(&self, time_index: usize, state: &[f64], maturity: f64) -> Result<f64, SimulationError>;

    /// Closed-form time-0 zero bond implied by the model's initial state.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if `maturity` is not representable on the model's grid.
    fn initial_discount_factor(&self, maturity: f64) -> Result<f64, SimulationError>;
}

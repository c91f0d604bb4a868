//! Product trait definitions.
//!
//! Every product values itself against a built [`Simulation`]: it reads the
//! observables it needs at their fixing dates, forms its cash flows path by
//! path and discounts each one with the numeraire ratio `N(t) / N(T_pay)`.
//! Cash flows are combined as [`RandomVariable`]s and only averaged at the end.

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use crate::mc::Simulation;

/// Monte Carlo valuation of an interest-rate product.
///
/// # Required Methods
///
/// - [`value`](MonteCarloProduct::value): path-wise value at an evaluation time
///
/// # Provided Methods
///
/// - [`price`](MonteCarloProduct::price): the Monte Carlo average at time 0
///
/// # Examples
///
/// ```
/// use tenor_core::math::RandomVariable;
/// use tenor_core::types::SimulationError;
/// use tenor_pricing::mc::Simulation;
/// use tenor_pricing::products::{deflate, MonteCarloProduct};
///
/// /// Two units paid at `t = 1`.
/// struct Double;
///
/// impl MonteCarloProduct for Double {
///     fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
///         let cash = RandomVariable::constant(2.0, simulation.n_paths());
///         deflate(&cash, 1.0, evaluation_time, simulation)
///     }
/// }
/// ```
pub trait MonteCarloProduct {
    /// Value at `evaluation_time` of all cash flows strictly after it, in
    /// units of currency at `evaluation_time`, one entry per path.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if a required date is not on the model's grids,
    /// `InvalidConfiguration` if the product cannot be valued at
    /// `evaluation_time`, `InsufficientSamples` for regression-based products.
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError>;

    /// Monte Carlo price at time 0.
    ///
    /// # Errors
    ///
    /// See [`MonteCarloProduct::value`].
    fn price(&self, simulation: &Simulation) -> Result<f64, SimulationError> {
        Ok(self.value(0.0, simulation)?.average())
    }
}

/// Discount `cash_flow` paid at `payment_time` to `evaluation_time` with
/// `N(evaluation_time) / N(payment_time)`.
///
/// # Errors
///
/// `UnsupportedTenor` if either time is not on the simulation grid.
pub fn deflate(
    cash_flow: &RandomVariable,
    payment_time: f64,
    evaluation_time: f64,
    simulation: &Simulation,
) -> Result<RandomVariable, SimulationError> {
    let paid = simulation.numeraire_at(simulation.time_index(payment_time)?);
    let now = simulation.numeraire_at(simulation.time_index(evaluation_time)?);
    Ok(cash_flow / paid * now)
}

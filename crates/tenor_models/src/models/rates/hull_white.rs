//! Hull-White short-rate model.
//!
//! The short rate is written as `r(t) = f(0, t) + x(t)` with
//!
//! ```text
//! dx = (y(t) - a x) dt + sigma(t) dW
//! ```
//!
//! under the risk-neutral measure, where `y(t)` is the accumulated variance of
//! [`ShortRateVolatility::y`]. Bonds follow in closed form from `x`:
//!
//! ```text
//! P(t, T) = P(0, T) / P(0, t) * exp(-B(t, T) x - 1/2 B(t, T)^2 y(t))
//! ```
//!
//! ## Variants
//!
//! The last component is always `ln N`, the log of the numeraire.
//!
//! | Variant | Components | Numeraire |
//! |---------|------------|-----------|
//! | `Standard` | `[x, ln N]` | discretely rolled bond account |
//! | `DirectSimulation` | `[r, ln N]` | `exp(sum r_k dt_k)` |
//! | `ShiftExtension` | `[x~, phi, ln N]`, `x = x~ + phi` | discretely rolled bond account |
//!
//! `Standard` and `ShiftExtension` integrate the mean and variance of `x`
//! exactly over each step under the measure of the rolled bond account, so a
//! single Euler step with their drift and loading is exact in distribution
//! (reported by `exact_step`, so schemes skip any corrector).
//! `DirectSimulation` is a plain Euler discretisation of the short rate under
//! the risk-neutral measure and carries a time-step bias.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tenor_core::market_data::curves::YieldCurve;
use tenor_core::types::{SimulationError, TenorGrid, TimeGrid, GRID_TOLERANCE};

use super::short_rate_volatility::{exp_decay_integral, ShortRateVolatility};
use crate::models::covariance::StateSpace;
use crate::models::term_structure::TermStructureModel;

/// Simpson panels per integration piece.
const SIMPSON_PANELS: usize = 16;

/// Bump for the slope of the initial instantaneous forward curve.
const FORWARD_SLOPE_BUMP: f64 = 1e-4;

/// How the Hull-White state is represented and evolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum HullWhiteVariant {
    /// Deviation `x` from the initial forward curve, exact step moments.
    #[default]
    Standard,
    /// Short rate `r` itself, Euler discretisation.
    DirectSimulation,
    /// Stochastic part `x~` and deterministic shift `phi` as separate components.
    ShiftExtension,
}

/// Per-step coefficients, precomputed on construction.
#[derive(Clone, Copy, Debug)]
struct StepCoefficients {
    /// `1 - exp(-a dt)`
    decay: f64,
    /// `int exp(-a (t_{k+1} - u)) y(u) du`
    mean_shift: f64,
    /// `int exp(-a (t_{k+1} - u)) sigma(u)^2 B(u, t_{k+1}) du`
    mean_measure: f64,
    /// `sqrt(Var[x(t_{k+1}) | x(t_k)] / dt)`
    effective_volatility: f64,
    /// `sigma(t_k)`
    volatility: f64,
    /// `d f(0, t) / dt + a f(0, t) + y(t)` at `t_k`
    theta: f64,
}

/// Hull-White model seeded from a yield curve.
///
/// Observables are available at any point of the time grid or the tenor grid.
#[derive(Clone, Debug)]
pub struct HullWhiteModel {
    time_grid: Arc<TimeGrid>,
    tenor_grid: Arc<TenorGrid>,
    volatility: ShortRateVolatility,
    variant: HullWhiteVariant,
    /// Sorted union of time and tenor points.
    discount_dates: Vec<f64>,
    /// `P(0, T)` on `discount_dates`.
    discount_factors: Vec<f64>,
    /// `P(0, t_k)` on the time grid.
    time_discounts: Vec<f64>,
    /// `f(0, t_k)` on the time grid.
    initial_forwards: Vec<f64>,
    /// `y(t_k)` on the time grid.
    accumulated_variance: Vec<f64>,
    steps: Vec<StepCoefficients>,
}

impl HullWhiteModel {
    /// Calibrate the drift to `curve` and precompute step coefficients.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the curve cannot be queried on the grids or
    /// returns a non-positive discount factor.
    pub fn new<C>(
        time_grid: Arc<TimeGrid>,
        tenor_grid: Arc<TenorGrid>,
        curve: &C,
        volatility: ShortRateVolatility,
        variant: HullWhiteVariant,
    ) -> Result<Self, SimulationError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let mut discount_dates: Vec<f64> = time_grid
            .times()
            .iter()
            .chain(tenor_grid.dates())
            .copied()
            .collect();
        discount_dates.sort_by(f64::total_cmp);
        discount_dates.dedup_by(|a, b| (*a - *b).abs() <= GRID_TOLERANCE);

        let discount_factors = discount_dates
            .iter()
            .map(|&t| curve.discount_factor(t))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some((t, p)) = discount_dates
            .iter()
            .zip(&discount_factors)
            .find(|(_, p)| !(**p > 0.0) || !p.is_finite())
        {
            return Err(SimulationError::invalid(format!(
                "discount factor P(0, {t}) = {p} must be positive and finite"
            )));
        }

        let times = time_grid.times();
        let time_discounts = times
            .iter()
            .map(|&t| curve.discount_factor(t))
            .collect::<Result<Vec<_>, _>>()?;
        let initial_forwards = times
            .iter()
            .map(|&t| curve.instantaneous_forward(t))
            .collect::<Result<Vec<_>, _>>()?;
        let accumulated_variance: Vec<f64> = times.iter().map(|&t| volatility.y(t)).collect();

        let a = volatility.mean_reversion();
        let mut steps = Vec::with_capacity(time_grid.n_steps());
        for k in 0..time_grid.n_steps() {
            let t0 = time_grid.time(k);
            let t1 = time_grid.time(k + 1);
            let dt = t1 - t0;
            let discount = |u: f64| (-a * (t1 - u)).exp();

            let mean_shift = integrate(&volatility, t0, t1, |u, _| discount(u) * volatility.y(u));
            let mean_measure = integrate(&volatility, t0, t1, |u, sigma| {
                discount(u) * sigma * sigma * volatility.b(u, t1)
            });

            let lo = (t0 - FORWARD_SLOPE_BUMP).max(0.0);
            let hi = t0 + FORWARD_SLOPE_BUMP;
            let slope = (curve.instantaneous_forward(hi)? - curve.instantaneous_forward(lo)?) / (hi - lo);

            steps.push(StepCoefficients {
                decay: exp_decay_integral(a, dt) * a,
                mean_shift,
                mean_measure,
                effective_volatility: (volatility.variance_integral(t0, t1) / dt).sqrt(),
                volatility: volatility.sigma(t0),
                theta: slope + a * initial_forwards[k] + accumulated_variance[k],
            });
        }

        Ok(Self {
            time_grid,
            tenor_grid,
            volatility,
            variant,
            discount_dates,
            discount_factors,
            time_discounts,
            initial_forwards,
            accumulated_variance,
            steps,
        })
    }

    /// Simulation variant.
    #[inline]
    pub fn variant(&self) -> HullWhiteVariant {
        self.variant
    }

    /// Short-rate volatility and mean reversion.
    #[inline]
    pub fn volatility(&self) -> &ShortRateVolatility {
        &self.volatility
    }

    /// Deviation `x = r - f(0, t_k)` of a state at `time_index`.
    pub fn short_rate_deviation(&self, time_index: usize, state: &[f64]) -> f64 {
        match self.variant {
            HullWhiteVariant::Standard => state[0],
            HullWhiteVariant::DirectSimulation => state[0] - self.initial_forwards[time_index],
            HullWhiteVariant::ShiftExtension => state[0] + state[1],
        }
    }

    /// Short rate `r(t_k)` of a state at `time_index`.
    pub fn short_rate(&self, time_index: usize, state: &[f64]) -> f64 {
        self.short_rate_deviation(time_index, state) + self.initial_forwards[time_index]
    }

    #[inline]
    fn numeraire_component(&self) -> usize {
        self.n_components() - 1
    }

    fn initial_discount(&self, maturity: f64) -> Result<f64, SimulationError> {
        let idx = self
            .discount_dates
            .partition_point(|&d| d < maturity - GRID_TOLERANCE);
        match self.discount_dates.get(idx) {
            Some(&d) if (d - maturity).abs() <= GRID_TOLERANCE => Ok(self.discount_factors[idx]),
            _ => Err(SimulationError::UnsupportedTenor {
                requested: maturity,
                grid: "time or tenor",
            }),
        }
    }

    /// `P(t_k, T)` for deviation `x`, with `P(0, T)` already looked up.
    #[inline]
    fn bond_given_deviation(&self, time_index: usize, x: f64, maturity: f64, initial: f64) -> f64 {
        let b = self.volatility.b(self.time_grid.time(time_index), maturity);
        initial / self.time_discounts[time_index]
            * (-b * x - 0.5 * b * b * self.accumulated_variance[time_index]).exp()
    }

    fn bond(&self, time_index: usize, state: &[f64], maturity: f64) -> Result<f64, SimulationError> {
        let t = self.time_grid.time(time_index);
        if maturity < t - GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "bond maturity {maturity} lies before observation time {t}"
            )));
        }
        let initial = self.initial_discount(maturity)?;
        let x = self.short_rate_deviation(time_index, state);
        Ok(self.bond_given_deviation(time_index, x, maturity, initial))
    }
}

/// Simpson rule on `[lo, hi]`, split at the volatility breakpoints. The
/// integrand receives the volatility of the piece it is evaluated on.
fn integrate<F>(volatility: &ShortRateVolatility, lo: f64, hi: f64, f: F) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let mut nodes = vec![lo];
    nodes.extend(volatility.breakpoints().iter().copied().filter(|&b| b > lo && b < hi));
    nodes.push(hi);

    nodes
        .windows(2)
        .map(|w| {
            let (a, b) = (w[0], w[1]);
            let sigma = volatility.sigma(0.5 * (a + b));
            let h = (b - a) / SIMPSON_PANELS as f64;
            let interior: f64 = (1..SIMPSON_PANELS)
                .map(|i| {
                    let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
                    weight * f(a + i as f64 * h, sigma)
                })
                .sum();
            (f(a, sigma) + interior + f(b, sigma)) * h / 3.0
        })
        .sum()
}

impl TermStructureModel for HullWhiteModel {
    fn model_name(&self) -> &'static str {
        "HullWhite"
    }

    fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    fn tenor_grid(&self) -> &TenorGrid {
        &self.tenor_grid
    }

    fn n_components(&self) -> usize {
        match self.variant {
            HullWhiteVariant::Standard | HullWhiteVariant::DirectSimulation => 2,
            HullWhiteVariant::ShiftExtension => 3,
        }
    }

    fn n_factors(&self) -> usize {
        1
    }

    fn state_space(&self, _component: usize) -> StateSpace {
        StateSpace::Normal
    }

    fn initial_state(&self) -> Vec<f64> {
        match self.variant {
            HullWhiteVariant::Standard => vec![0.0, 0.0],
            HullWhiteVariant::DirectSimulation => vec![self.initial_forwards[0], 0.0],
            HullWhiteVariant::ShiftExtension => vec![0.0, 0.0, 0.0],
        }
    }

    fn drift(&self, time_index: usize, state: &[f64], drift: &mut [f64]) {
        let step = &self.steps[time_index];
        let dt = self.time_grid.dt(time_index);
        let a = self.volatility.mean_reversion();

        // ln N(t_{k+1}) - ln N(t_k) = -ln P(t_k, t_{k+1})
        let rolled_bond_rate = |x: f64| {
            let t1 = self.time_grid.time(time_index + 1);
            let p = self.bond_given_deviation(time_index, x, t1, self.time_discounts[time_index + 1]);
            -p.ln() / dt
        };

        match self.variant {
            HullWhiteVariant::Standard => {
                let x = state[0];
                drift[0] = (-x * step.decay + step.mean_shift - step.mean_measure) / dt;
                drift[1] = rolled_bond_rate(x);
            }
            HullWhiteVariant::DirectSimulation => {
                let r = state[0];
                drift[0] = step.theta - a * r;
                drift[1] = r;
            }
            HullWhiteVariant::ShiftExtension => {
                let (stochastic, shift) = (state[0], state[1]);
                drift[0] = (-stochastic * step.decay - step.mean_measure) / dt;
                drift[1] = (-shift * step.decay + step.mean_shift) / dt;
                drift[2] = rolled_bond_rate(stochastic + shift);
            }
        }
    }

    fn factor_loading(&self, time_index: usize, component: usize, _state: &[f64], loading: &mut [f64]) {
        let step = &self.steps[time_index];
        loading[0] = match (component, self.variant) {
            (0, HullWhiteVariant::DirectSimulation) => step.volatility,
            (0, _) => step.effective_volatility,
            _ => 0.0,
        };
    }

    fn exact_step(&self) -> bool {
        self.variant != HullWhiteVariant::DirectSimulation
    }

    fn numeraire(&self, _time_index: usize, state: &[f64]) -> f64 {
        state[self.numeraire_component()].exp()
    }

    fn forward_rate(&self, time_index: usize, state: &[f64], start: f64, end: f64) -> Result<f64, SimulationError> {
        if !(end > start) {
            return Err(SimulationError::invalid(format!(
                "forward period end {end} must be after start {start}"
            )));
        }
        let p_start = self.bond(time_index, state, start)?;
        let p_end = self.bond(time_index, state, end)?;
        Ok((p_start / p_end - 1.0) / (end - start))
    }

    fn discount_bond(&self, time_index: usize, state: &[f64], maturity: f64) -> Result<f64, SimulationError> {
        self.bond(time_index, state, maturity)
    }

    fn initial_discount_factor(&self, maturity: f64) -> Result<f64, SimulationError> {
        self.initial_discount(maturity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tenor_core::market_data::curves::FlatForwardCurve;

    fn model(variant: HullWhiteVariant, sigma: f64) -> HullWhiteModel {
        let time = Arc::new(TimeGrid::uniform(10.0, 0.5).unwrap());
        let tenor = Arc::new(TenorGrid::uniform(0.0, 10.0, 0.5).unwrap());
        let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
        let vol = ShortRateVolatility::constant(sigma, 0.1).unwrap();
        HullWhiteModel::new(time, tenor, &curve, vol, variant).unwrap()
    }

    /// Deterministic evolution with the given shocks.
    fn evolve(model: &HullWhiteModel, shocks: &[f64]) -> Vec<Vec<f64>> {
        let n = model.n_components();
        let mut states = vec![model.initial_state()];
        let mut drift = vec![0.0; n];
        let mut loading = [0.0];
        for (k, &dw) in shocks.iter().enumerate() {
            let state = &states[k];
            let dt = model.time_grid().dt(k);
            model.drift(k, state, &mut drift);
            let next = (0..n)
                .map(|c| {
                    model.factor_loading(k, c, state, &mut loading);
                    state[c] + drift[c] * dt + loading[0] * dw
                })
                .collect();
            states.push(next);
        }
        states
    }

    // ========================================
    // Closed Form Tests
    // ========================================

    #[test]
    fn test_initial_discount_factor_matches_curve() {
        let hw = model(HullWhiteVariant::Standard, 0.02);
        let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
        for t in [0.0, 0.5, 3.0, 10.0] {
            assert_relative_eq!(
                hw.initial_discount_factor(t).unwrap(),
                curve.discount_factor(t).unwrap(),
                epsilon = 1e-15
            );
        }
        assert!(matches!(
            hw.initial_discount_factor(3.3),
            Err(SimulationError::UnsupportedTenor { .. })
        ));
    }

    #[test]
    fn test_bond_at_zero_deviation_has_convexity_adjustment() {
        let hw = model(HullWhiteVariant::Standard, 0.02);
        let state = [0.0, 0.0];
        let p = hw.discount_bond(4, &state, 7.0).unwrap();
        let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
        let b = hw.volatility().b(2.0, 7.0);
        let expected = curve.discount_factor(7.0).unwrap() / curve.discount_factor(2.0).unwrap()
            * (-0.5 * b * b * hw.volatility().y(2.0)).exp();
        assert_relative_eq!(p, expected, epsilon = 1e-15);
        assert_eq!(hw.discount_bond(4, &state, 2.0).unwrap(), 1.0);
    }

    #[test]
    fn test_bond_before_observation_rejected() {
        let hw = model(HullWhiteVariant::Standard, 0.02);
        assert!(matches!(
            hw.discount_bond(4, &[0.0, 0.0], 1.5),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    // ========================================
    // Drift and Loading Tests
    // ========================================

    #[test]
    fn test_first_step_mean_vanishes() {
        // From x(0) = 0 the t_1-forward mean of x(t_1) is zero.
        let hw = model(HullWhiteVariant::Standard, 0.02);
        let mut drift = [0.0; 2];
        hw.drift(0, &[0.0, 0.0], &mut drift);
        assert_relative_eq!(drift[0], 0.0, epsilon = 1e-13);
    }

    #[test]
    fn test_effective_loading_matches_step_variance() {
        let hw = model(HullWhiteVariant::Standard, 0.02);
        let mut loading = [0.0];
        hw.factor_loading(3, 0, &[0.0, 0.0], &mut loading);
        let variance = hw.volatility().variance_integral(1.5, 2.0);
        assert_relative_eq!(loading[0] * loading[0] * 0.5, variance, epsilon = 1e-16);

        hw.factor_loading(3, 1, &[0.0, 0.0], &mut loading);
        assert_eq!(loading[0], 0.0);

        let direct = model(HullWhiteVariant::DirectSimulation, 0.02);
        direct.factor_loading(3, 0, &[0.05, 0.0], &mut loading);
        assert_eq!(loading[0], 0.02);
    }

    #[test]
    fn test_zero_volatility_numeraire_reproduces_curve() {
        let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
        for variant in [
            HullWhiteVariant::Standard,
            HullWhiteVariant::DirectSimulation,
            HullWhiteVariant::ShiftExtension,
        ] {
            let hw = model(variant, 0.0);
            let states = evolve(&hw, &[0.0; 20]);
            for k in [1, 7, 20] {
                let t = hw.time_grid().time(k);
                let tolerance = if variant == HullWhiteVariant::DirectSimulation { 1e-8 } else { 1e-12 };
                assert_relative_eq!(
                    hw.numeraire(k, &states[k]),
                    1.0 / curve.discount_factor(t).unwrap(),
                    max_relative = tolerance
                );
            }
        }
    }

    #[test]
    fn test_shift_extension_matches_standard_path() {
        let standard = model(HullWhiteVariant::Standard, 0.02);
        let shifted = model(HullWhiteVariant::ShiftExtension, 0.02);
        let shocks: Vec<f64> = (0..20).map(|k| 0.3 * ((k as f64) * 1.7).sin()).collect();
        let a = evolve(&standard, &shocks);
        let b = evolve(&shifted, &shocks);
        for k in [5, 12, 20] {
            assert_relative_eq!(
                standard.short_rate_deviation(k, &a[k]),
                shifted.short_rate_deviation(k, &b[k]),
                epsilon = 1e-12
            );
            assert_relative_eq!(standard.numeraire(k, &a[k]), shifted.numeraire(k, &b[k]), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_direct_simulation_starts_at_initial_forward() {
        let hw = model(HullWhiteVariant::DirectSimulation, 0.02);
        let state = hw.initial_state();
        assert_relative_eq!(state[0], 0.025_f64.ln_1p() / 0.5, epsilon = 1e-9);
        assert_relative_eq!(hw.short_rate_deviation(0, &state), 0.0, epsilon = 1e-15);
        assert_eq!(hw.n_components(), 2);
        assert_eq!(model(HullWhiteVariant::ShiftExtension, 0.02).n_components(), 3);
    }

    #[test]
    fn test_only_exact_variants_report_exact_step() {
        assert!(model(HullWhiteVariant::Standard, 0.02).exact_step());
        assert!(model(HullWhiteVariant::ShiftExtension, 0.02).exact_step());
        assert!(!model(HullWhiteVariant::DirectSimulation, 0.02).exact_step());
    }

    #[test]
    fn test_forward_rate_at_zero_volatility() {
        let hw = model(HullWhiteVariant::Standard, 0.0);
        let f = hw.forward_rate(2, &[0.0, 0.0], 3.0, 3.5).unwrap();
        assert_relative_eq!(f, 0.05, epsilon = 1e-12);
    }
}

//! Hull-White against its LIBOR market model equivalent.
//!
//! A normal LMM with forward-bond local volatility and the Hull-White
//! equivalent volatility has the same Gaussian forward-bond dynamics as the
//! Hull-White model, so both must agree on every product up to Monte Carlo
//! and discretisation error.
//!
//! # Test Categories
//!
//! 1. **Linear products**: bonds and par swaps
//! 2. **Caplets**: both models against the Hull-White zero-bond-put formula
//! 3. **Swaptions**: Hull-White against LMM
//! 4. **Numeraire options**: the continuously observed bank account against
//!    the discretely rolled LIBOR account

use statrs::distribution::{ContinuousCDF, Normal};
use tenor_core::market_data::curves::{FlatForwardCurve, YieldCurve};
use tenor_pricing::mc::{Simulation, SimulationConfig};
use tenor_pricing::products::{
    Bond, Caplet, EuropeanSwaption, MonteCarloProduct, NumeraireOption, Swap, SwapSchedule,
};

const SIGMA: f64 = 0.01;
const MEAN_REVERSION: f64 = 0.1;
const N_PATHS: usize = 10_000;

fn curve() -> FlatForwardCurve {
    FlatForwardCurve::new(0.05, 0.5).unwrap()
}

fn grids() -> String {
    format!(
        r#"
        n_paths = {N_PATHS}
        seed = 3141
        time_step = 0.5
        time_horizon = 10.0
        tenor_period = 0.5
        tenor_horizon = 10.0
        "#
    )
}

fn hull_white() -> Simulation {
    let config = format!(
        r#"{}
        [model]
        type = "hull-white"
        mean_reversion = {MEAN_REVERSION}
        volatilities = [{SIGMA}]
        "#,
        grids()
    );
    SimulationConfig::from_toml_str(&config).unwrap().simulate(&curve()).unwrap()
}

fn lmm() -> Simulation {
    let config = format!(
        r#"{}
        [model]
        type = "lmm"
        state_space = "normal"
        local_volatility = "forward-bond"

        [model.volatility]
        form = "hull-white-equivalent"
        sigma = {SIGMA}
        mean_reversion = {MEAN_REVERSION}
        "#,
        grids()
    );
    SimulationConfig::from_toml_str(&config).unwrap().simulate(&curve()).unwrap()
}

/// Hull-White caplet as `(1 + K d)` zero-bond puts struck at `1 / (1 + K d)`.
fn hull_white_caplet(maturity: f64, period: f64, strike: f64) -> f64 {
    let curve = curve();
    let a = MEAN_REVERSION;
    let p_fix = curve.discount_factor(maturity).unwrap();
    let p_pay = curve.discount_factor(maturity + period).unwrap();
    let b = (1.0 - (-a * period).exp()) / a;
    let sigma_p = SIGMA * ((1.0 - (-2.0 * a * maturity).exp()) / (2.0 * a)).sqrt() * b;
    let bond_strike = 1.0 / (1.0 + strike * period);
    let h = (p_pay / (p_fix * bond_strike)).ln() / sigma_p + 0.5 * sigma_p;
    let n = Normal::new(0.0, 1.0).unwrap();
    let put = bond_strike * p_fix * n.cdf(-h + sigma_p) - p_pay * n.cdf(-h);
    put / bond_strike
}

// ============================================================================
// Linear Products
// ============================================================================

#[test]
fn test_bonds_agree() {
    let (hw, lmm) = (hull_white(), lmm());
    for maturity in [2.0, 5.0, 10.0] {
        let bond = Bond::new(maturity).unwrap();
        let a = bond.price(&hw).unwrap();
        let b = bond.price(&lmm).unwrap();
        assert!((a - b).abs() < 5e-3, "maturity {maturity}: HW {a}, LMM {b}");
        let analytic = curve().discount_factor(maturity).unwrap();
        assert!((a - analytic).abs() < 5e-3, "maturity {maturity}: HW {a}, curve {analytic}");
    }
}

#[test]
fn test_par_swap_is_worth_zero_in_both_models() {
    let (hw, lmm) = (hull_white(), lmm());
    let schedule = SwapSchedule::regular(1.0, 6.0, 0.5).unwrap();
    let par = schedule.par_rate(&curve()).unwrap();
    let swap = Swap::with_fixed_rate(schedule, par, 1.0).unwrap();
    let a = swap.price(&hw).unwrap();
    let b = swap.price(&lmm).unwrap();
    assert!(a.abs() < 1.5e-3, "HW par swap {a}");
    assert!(b.abs() < 1.5e-3, "LMM par swap {b}");
}

// ============================================================================
// Caplets
// ============================================================================

#[test]
fn test_caplet_matches_closed_form() {
    let (hw, lmm) = (hull_white(), lmm());
    for (maturity, strike) in [(3.0, 0.05), (5.0, 0.04), (2.0, 0.06)] {
        let caplet = Caplet::new(maturity, 0.5, strike).unwrap();
        let analytic = hull_white_caplet(maturity, 0.5, strike);

        let mc = caplet.value(0.0, &hw).unwrap();
        let error = (mc.average() - analytic).abs();
        assert!(
            error < 4.0 * mc.standard_error() + 5e-5,
            "HW caplet T={maturity} K={strike}: {} vs {analytic}",
            mc.average()
        );

        let mc = caplet.value(0.0, &lmm).unwrap();
        let error = (mc.average() - analytic).abs();
        assert!(
            error < 4.0 * mc.standard_error() + 2e-4,
            "LMM caplet T={maturity} K={strike}: {} vs {analytic}",
            mc.average()
        );
    }
}

// ============================================================================
// Swaptions
// ============================================================================

#[test]
fn test_swaption_agrees() {
    let (hw, lmm) = (hull_white(), lmm());
    let schedule = SwapSchedule::regular(2.0, 7.0, 0.5).unwrap();
    let par = schedule.par_rate(&curve()).unwrap();
    let swap = Swap::with_fixed_rate(schedule, par, 1.0).unwrap();
    let swaption = EuropeanSwaption::on_swap(2.0, &swap).unwrap();
    let hw_value = swaption.value(0.0, &hw).unwrap();
    let (a, b) = (hw_value.average(), swaption.price(&lmm).unwrap());
    assert!(a > 0.0 && b > 0.0);
    let tolerance = 3.0 * hw_value.standard_error() + 1e-4;
    assert!((a - b).abs() < tolerance, "HW {a}, LMM {b}, tolerance {tolerance}");
}

// ============================================================================
// Numeraire Options
// ============================================================================

/// Both models on quarterly time steps over half-year tenor periods.
fn quarterly(model: &str) -> Simulation {
    let config = format!(
        r#"
        n_paths = {N_PATHS}
        seed = 3141
        time_step = 0.25
        time_horizon = 2.0
        tenor_period = 0.5
        tenor_horizon = 2.0
        {model}
        "#
    );
    SimulationConfig::from_toml_str(&config).unwrap().simulate(&curve()).unwrap()
}

#[test]
fn test_option_on_money_market_account() {
    let hw = quarterly(&format!(
        r#"
        [model]
        type = "hull-white"
        mean_reversion = {MEAN_REVERSION}
        volatilities = [{SIGMA}]
        "#
    ));
    let lmm = quarterly(&format!(
        r#"
        [model]
        type = "lmm"
        state_space = "normal"
        local_volatility = "forward-bond"

        [model.volatility]
        form = "hull-white-equivalent"
        sigma = {SIGMA}
        mean_reversion = {MEAN_REVERSION}
        "#
    ));
    // The LIBOR account at 0.5 is fixed at time 0; the Hull-White account
    // picks up the short rate over the second quarter.
    let option = NumeraireOption::call(0.5, 1.025).unwrap();
    let a = option.value(0.0, &hw).unwrap();
    let b = option.value(0.0, &lmm).unwrap();
    assert!(b.max() < 1e-12, "LMM {}", b.max());
    assert!(a.average() > 3.0 * a.standard_error(), "HW {} ({})", a.average(), a.standard_error());
    assert!(a.average() - b.average() >= 0.0);
}


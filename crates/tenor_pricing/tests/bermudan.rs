//! Bermudan swaption valuation by backward induction.

use tenor_core::market_data::curves::FlatForwardCurve;
use tenor_core::types::SimulationError;
use tenor_pricing::mc::{Simulation, SimulationConfig};
use tenor_pricing::products::{
    BermudanSwaption, EuropeanSwaption, MonteCarloProduct, RegressionSample, RegressionTarget, Swap, SwapSchedule,
};

fn simulate(model: &str, n_paths: usize, seed: u64) -> Simulation {
    let config = format!(
        r#"
        n_paths = {n_paths}
        seed = {seed}
        time_step = 0.5
        time_horizon = 6.0
        tenor_period = 0.5
        tenor_horizon = 6.0
        {model}
        "#
    );
    let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
    SimulationConfig::from_toml_str(&config).unwrap().simulate(&curve).unwrap()
}

const HULL_WHITE: &str = r#"
    [model]
    type = "hull-white"
    mean_reversion = 0.05
    volatilities = [0.01]
"#;

const LMM: &str = r#"
    [model]
    type = "lmm"
    state_space = "log-normal"
    n_factors = 2
    correlation_decay = 0.1

    [model.volatility]
    form = "constant"
    sigma = 0.2
"#;

fn schedule() -> SwapSchedule {
    SwapSchedule::regular(1.0, 6.0, 0.5).unwrap()
}

// ============================================================================
// Early Exercise Premium
// ============================================================================

#[test]
fn test_bermudan_dominates_european() {
    for seed in [3141, 42, 7] {
        let simulation = simulate(HULL_WHITE, 5000, seed);
        let bermudan = BermudanSwaption::on_fixing_dates(schedule(), 0.05, 1.0).unwrap();
        let swap = Swap::with_fixed_rate(schedule(), 0.05, 1.0).unwrap();
        let european = EuropeanSwaption::on_swap(1.0, &swap).unwrap();

        let b = bermudan.price(&simulation).unwrap();
        let e = european.price(&simulation).unwrap();
        assert!(b >= e, "seed {seed}: Bermudan {b} < European {e}");
    }
}

#[test]
fn test_bermudan_dominates_every_european_in_lmm() {
    let simulation = simulate(LMM, 5000, 3141);
    let bermudan = BermudanSwaption::on_fixing_dates(schedule(), 0.05, 1.0).unwrap();
    let b = bermudan.price(&simulation).unwrap();
    for exercise in [1.0, 2.0, 3.0] {
        let tail = SwapSchedule::regular(exercise, 6.0, 0.5).unwrap();
        let swap = Swap::with_fixed_rate(tail, 0.05, 1.0).unwrap();
        let e = EuropeanSwaption::on_swap(exercise, &swap).unwrap().price(&simulation).unwrap();
        // The regression policy is estimated, so allow a small low bias
        assert!(b >= 0.98 * e, "exercise {exercise}: Bermudan {b} < European {e}");
    }
}

// ============================================================================
// Regression Settings
// ============================================================================

#[test]
fn test_regression_settings_are_close() {
    let simulation = simulate(HULL_WHITE, 5000, 3141);
    let base = BermudanSwaption::on_fixing_dates(schedule(), 0.05, 1.0).unwrap();
    let reference = base.price(&simulation).unwrap();
    let variants = [
        base.clone().with_regression_target(RegressionTarget::RealizedCashFlows),
        base.clone().with_regression_sample(RegressionSample::CrossFitted),
        base.clone().with_basis_degree(3),
    ];
    for variant in &variants {
        let price = variant.price(&simulation).unwrap();
        assert!(
            (price - reference).abs() < 0.08 * reference,
            "{price} vs {reference}"
        );
    }
}

#[test]
fn test_policy_exercise_probabilities() {
    let simulation = simulate(HULL_WHITE, 2000, 42);
    let bermudan = BermudanSwaption::on_fixing_dates(schedule(), 0.05, 1.0).unwrap();
    let (_, policy) = bermudan.value_with_policy(0.0, &simulation).unwrap();
    let total: f64 = (0..policy.exercise_dates().len())
        .map(|j| policy.exercise_probability(j))
        .sum();
    assert!(total > 0.3 && total <= 1.0 + 1e-12, "total exercise probability {total}");
    // An at-the-money swap has a positive value for roughly half the paths at the first date
    let first = policy.decisions(0).iter().filter(|&&d| d).count() as f64 / 2000.0;
    assert!(first < 0.6);
}

#[test]
fn test_too_few_paths() {
    let simulation = simulate(HULL_WHITE, 2, 3141);
    let bermudan = BermudanSwaption::on_fixing_dates(schedule(), 0.05, 1.0).unwrap();
    let err = bermudan.price(&simulation).unwrap_err();
    assert!(matches!(err, SimulationError::InsufficientSamples { basis_functions: 3, .. }));
}

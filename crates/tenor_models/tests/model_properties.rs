//! Property-based tests for model observables.

use std::sync::Arc;

use proptest::prelude::*;
use tenor_core::market_data::curves::{FlatForwardCurve, YieldCurve};
use tenor_core::types::{TenorGrid, TimeGrid};
use tenor_models::models::covariance::{
    CovarianceStructure, FactorCorrelation, LiborVolatilityModel, LocalVolatility, StateSpace,
};
use tenor_models::models::rates::{HullWhiteModel, HullWhiteVariant, LiborMarketModel, ShortRateVolatility};
use tenor_models::models::{Measure, TermStructureModel};

fn grids() -> (Arc<TimeGrid>, Arc<TenorGrid>) {
    (
        Arc::new(TimeGrid::uniform(10.0, 0.5).unwrap()),
        Arc::new(TenorGrid::uniform(0.0, 10.0, 0.5).unwrap()),
    )
}

fn lmm(forward: f64, measure: Measure) -> LiborMarketModel {
    let (time, tenor) = grids();
    let vol = Arc::new(LiborVolatilityModel::constant(&time, &tenor, 0.2).unwrap());
    let corr = Arc::new(FactorCorrelation::exponential_decay(&tenor, 0.1, 2).unwrap());
    let cov = CovarianceStructure::new(time, tenor, vol, corr, StateSpace::LogNormal, LocalVolatility::None)
        .unwrap();
    let curve = FlatForwardCurve::new(forward, 0.5).unwrap();
    LiborMarketModel::new(cov, &curve, measure).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn spot_numeraire_at_initial_state_inverts_curve(forward in 0.001f64..0.15, k in 0usize..=20) {
        let model = lmm(forward, Measure::Spot);
        let curve = FlatForwardCurve::new(forward, 0.5).unwrap();
        let t = model.time_grid().time(k);
        let n = model.numeraire(k, &model.initial_state());
        prop_assert!((n * curve.discount_factor(t).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn terminal_numeraire_ratio_is_bond(forward in 0.001f64..0.15, k in 0usize..20) {
        let model = lmm(forward, Measure::Terminal);
        let state = model.initial_state();
        let t = model.time_grid().time(k);
        let ratio = model.numeraire(k, &state) / model.numeraire(0, &state);
        // P(t; T_N) / P(0; T_N) = 1 / P(0; t) on the initial forwards
        prop_assert!((ratio * model.initial_discount_factor(t).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hull_white_bond_has_negative_convexity(
        sigma in 0.0f64..0.05,
        a in -0.05f64..0.5,
        k in 0usize..20,
        m in 1usize..=20,
    ) {
        let (time, tenor) = grids();
        let curve = FlatForwardCurve::new(0.03, 0.5).unwrap();
        let vol = ShortRateVolatility::constant(sigma, a).unwrap();
        let model = HullWhiteModel::new(time, tenor, &curve, vol, HullWhiteVariant::Standard).unwrap();
        let t = model.time_grid().time(k);
        let maturity = t.max(m as f64 * 0.5);
        let p = model.discount_bond(k, &[0.0, 0.0], maturity).unwrap();
        let forward_bond = curve.discount_factor(maturity).unwrap() / curve.discount_factor(t).unwrap();
        prop_assert!(p <= forward_bond * (1.0 + 1e-14));
        prop_assert!(p > 0.0);
    }

    #[test]
    fn hull_white_forward_rate_is_bond_ratio(x in -0.05f64..0.05, k in 0usize..18) {
        let (time, tenor) = grids();
        let curve = FlatForwardCurve::new(0.04, 0.5).unwrap();
        let vol = ShortRateVolatility::constant(0.015, 0.08).unwrap();
        let model = HullWhiteModel::new(time, tenor, &curve, vol, HullWhiteVariant::Standard).unwrap();
        let state = [x, 0.0];
        let start = model.time_grid().time(k + 1);
        let end = start + 1.0;
        let f = model.forward_rate(k, &state, start, end).unwrap();
        let ratio = model.discount_bond(k, &state, start).unwrap() / model.discount_bond(k, &state, end).unwrap();
        prop_assert!((1.0 + f * (end - start) - ratio).abs() < 1e-12);
    }
}

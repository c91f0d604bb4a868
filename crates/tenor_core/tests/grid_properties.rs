//! Property-based tests for grids and random variables.

use proptest::prelude::*;
use tenor_core::math::RandomVariable;
use tenor_core::types::{TenorGrid, TimeGrid};

proptest! {
    #[test]
    fn uniform_grid_points_are_found(n_steps in 1usize..200, dt in prop::sample::select(vec![0.125, 0.25, 0.5, 1.0])) {
        let horizon = n_steps as f64 * dt;
        let grid = TimeGrid::uniform(horizon, dt).unwrap();
        prop_assert_eq!(grid.n_steps(), n_steps);
        for k in 0..grid.len() {
            prop_assert_eq!(grid.time_index(grid.time(k)), Some(k));
        }
    }

    #[test]
    fn period_containing_brackets_time(t in 0.0f64..9.999) {
        let tenor = TenorGrid::uniform(0.0, 10.0, 0.5).unwrap();
        let i = tenor.period_containing(t).unwrap();
        prop_assert!(tenor.date(i) <= t + 1e-8);
        prop_assert!(t < tenor.date(i + 1));
    }

    #[test]
    fn standard_error_shrinks_with_duplication(values in prop::collection::vec(-10.0f64..10.0, 2..50)) {
        // Quadrupling the sample (same empirical distribution) halves the standard error, up to the n-1 correction.
        let x = RandomVariable::from_vec(values.clone());
        let repeated: Vec<f64> = values.iter().cycle().take(values.len() * 4).copied().collect();
        let y = RandomVariable::from_vec(repeated);
        prop_assert!((x.average() - y.average()).abs() < 1e-9);
        prop_assert!(y.standard_error() <= x.standard_error() * 0.5 * 1.5 + 1e-12);
    }

    #[test]
    fn sum_is_linear(a in prop::collection::vec(-1.0f64..1.0, 1..40), c in -5.0f64..5.0) {
        let x = RandomVariable::from_vec(a);
        let y = &x * c + &x;
        prop_assert!((y.average() - (c + 1.0) * x.average()).abs() < 1e-12);
    }
}

//! Brownian increments for every path, step and factor.

use std::sync::Arc;

use rayon::prelude::*;
use tenor_core::types::{SimulationError, TimeGrid};
use tracing::debug;

use super::prng::PricerRng;

/// Independent `N(0, dt_k)` increments `dW[p][k][f]`.
///
/// # Draw order
///
/// Path `p` owns a [`PricerRng`] seeded with [`path_seed(seed, p)`](super::path_seed)
/// and draws its increments step by step, all factors of a step together.
/// The increments of a path therefore depend only on `(seed, p)` and the
/// grid, never on the number of paths or on the thread schedule.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use tenor_core::types::TimeGrid;
/// use tenor_pricing::rng::BrownianDriver;
///
/// let grid = Arc::new(TimeGrid::uniform(1.0, 0.25).unwrap());
/// let driver = BrownianDriver::new(grid, 2, 100, 3141).unwrap();
///
/// assert_eq!(driver.increments(7, 3).len(), 2);
///
/// // A larger driver with the same seed starts with the same paths.
/// let grid = Arc::new(TimeGrid::uniform(1.0, 0.25).unwrap());
/// let larger = BrownianDriver::new(grid, 2, 200, 3141).unwrap();
/// assert_eq!(driver.increments(99, 0), larger.increments(99, 0));
/// ```
#[derive(Clone, Debug)]
pub struct BrownianDriver {
    time_grid: Arc<TimeGrid>,
    n_factors: usize,
    n_paths: usize,
    seed: u64,
    /// Path-major storage, `n_steps * n_factors` values per path.
    increments: Vec<f64>,
}

impl BrownianDriver {
    /// Draw all increments for `n_paths` paths and `n_factors` factors.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `n_factors` or `n_paths` is zero.
    pub fn new(
        time_grid: Arc<TimeGrid>,
        n_factors: usize,
        n_paths: usize,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        if n_factors == 0 {
            return Err(SimulationError::invalid("number of factors must be positive"));
        }
        if n_paths == 0 {
            return Err(SimulationError::invalid("number of paths must be positive"));
        }

        let n_steps = time_grid.n_steps();
        let stride = n_steps * n_factors;
        let scales: Vec<f64> = (0..n_steps).map(|k| time_grid.dt(k).sqrt()).collect();

        let mut increments = vec![0.0; n_paths * stride];
        increments
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(path, block)| {
                let mut rng = PricerRng::for_path(seed, path);
                for (step, scale) in block.chunks_mut(n_factors).zip(&scales) {
                    rng.fill_scaled_normal(step, *scale);
                }
            });

        debug!(n_paths, n_factors, n_steps, seed, "Brownian increments generated");

        Ok(Self {
            time_grid,
            n_factors,
            n_paths,
            seed,
            increments,
        })
    }

    /// Time grid the increments refer to.
    #[inline]
    pub fn time_grid(&self) -> &Arc<TimeGrid> {
        &self.time_grid
    }

    /// Number of factors `F`.
    #[inline]
    pub fn n_factors(&self) -> usize {
        self.n_factors
    }

    /// Number of paths `P`.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.time_grid.n_steps()
    }

    /// Seed the driver was created with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Increments of all factors of `path` over step `step`.
    ///
    /// # Panics
    ///
    /// Panics if `path >= n_paths()` or `step >= n_steps()`.
    #[inline]
    pub fn increments(&self, path: usize, step: usize) -> &[f64] {
        let start = (path * self.n_steps() + step) * self.n_factors;
        &self.increments[start..start + self.n_factors]
    }

    /// Increments of `path` for all steps, step-major.
    #[inline]
    pub fn path_increments(&self, path: usize) -> &[f64] {
        let stride = self.n_steps() * self.n_factors;
        &self.increments[path * stride..(path + 1) * stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Arc<TimeGrid> {
        Arc::new(TimeGrid::uniform(2.0, 0.25).unwrap())
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(matches!(
            BrownianDriver::new(grid(), 0, 10, 1),
            Err(SimulationError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BrownianDriver::new(grid(), 1, 0, 1),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_same_seed_is_bitwise_reproducible() {
        let a = BrownianDriver::new(grid(), 3, 50, 3141).unwrap();
        let b = BrownianDriver::new(grid(), 3, 50, 3141).unwrap();
        for p in 0..50 {
            assert_eq!(a.path_increments(p), b.path_increments(p));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = BrownianDriver::new(grid(), 1, 5, 1).unwrap();
        let b = BrownianDriver::new(grid(), 1, 5, 2).unwrap();
        assert_ne!(a.path_increments(0), b.path_increments(0));
    }

    #[test]
    fn test_increment_variance_matches_step_length() {
        let grid = Arc::new(TimeGrid::new(vec![0.0, 0.1, 1.0]).unwrap());
        let driver = BrownianDriver::new(grid, 1, 40_000, 7).unwrap();
        for (step, dt) in [(0, 0.1), (1, 0.9)] {
            let draws: Vec<f64> = (0..driver.n_paths()).map(|p| driver.increments(p, step)[0]).collect();
            let n = draws.len() as f64;
            let mean = draws.iter().sum::<f64>() / n;
            let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            assert!((var / dt - 1.0).abs() < 0.03, "step {step}: variance {var}, dt {dt}");
        }
    }

    #[test]
    fn test_factors_are_uncorrelated() {
        let driver = BrownianDriver::new(grid(), 2, 40_000, 11).unwrap();
        let n = driver.n_paths() as f64;
        let cross: f64 = (0..driver.n_paths())
            .map(|p| {
                let dw = driver.increments(p, 0);
                dw[0] * dw[1]
            })
            .sum::<f64>()
            / n;
        // Var of the product is dt^2 / n
        assert!(cross.abs() < 4.0 * 0.25 / n.sqrt());
    }
}

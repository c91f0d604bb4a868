//! Path-wise random variables.
//!
//! A [`RandomVariable`] holds one realisation per Monte Carlo path. All
//! arithmetic returns a new value; the underlying buffer is shared through an
//! `Arc`, so clones are cheap and values can be handed across threads freely.
//!
//! Binary operations between two random variables require equal path counts
//! and panic otherwise, mirroring slice indexing.
//!
//! # Example
//!
//! ```
//! use tenor_core::math::RandomVariable;
//!
//! let libor = RandomVariable::from_vec(vec![0.04, 0.05, 0.06]);
//! let payoff = (&libor - 0.05).max_with(0.0) * 0.5;
//!
//! assert!((payoff.average() - 0.005 / 3.0).abs() < 1e-15);
//! ```

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Immutable vector of per-path realisations.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomVariable {
    values: Arc<[f64]>,
}

impl RandomVariable {
    /// Wrap per-path values.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// The same `value` on each of `n_paths` paths.
    pub fn constant(value: f64, n_paths: usize) -> Self {
        Self::from_vec(vec![value; n_paths])
    }

    /// Build from a per-path function.
    pub fn from_fn(n_paths: usize, f: impl FnMut(usize) -> f64) -> Self {
        Self::from_vec((0..n_paths).map(f).collect())
    }

    /// Number of paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the variable holds no realisations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Per-path values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Realisation on `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path >= len()`.
    #[inline]
    pub fn get(&self, path: usize) -> f64 {
        self.values[path]
    }

    /// Sample mean. Zero for an empty variable.
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        // Sequential sum keeps results bit-reproducible.
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Unbiased sample variance. Zero for fewer than two paths.
    pub fn variance(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.average();
        let sum_sq: f64 = self.values.iter().map(|v| (v - mean) * (v - mean)).sum();
        sum_sq / (n - 1) as f64
    }

    /// Sample standard deviation.
    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Monte Carlo standard error of the mean, `std / sqrt(P)`.
    pub fn standard_error(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.standard_deviation() / (self.values.len() as f64).sqrt()
    }

    /// Smallest realisation.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest realisation.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Apply `f` path-wise.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_vec(self.values.iter().map(|&v| f(v)).collect())
    }

    /// Combine with `other` path-wise.
    ///
    /// # Panics
    ///
    /// Panics if the path counts differ.
    pub fn zip_map(&self, other: &RandomVariable, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(
            self.len(),
            other.len(),
            "random variables must have the same number of paths"
        );
        Self::from_vec(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    /// Path-wise `max(x, floor)`.
    pub fn max_with(&self, floor: f64) -> Self {
        self.map(|v| v.max(floor))
    }

    /// Path-wise `min(x, cap)`.
    pub fn min_with(&self, cap: f64) -> Self {
        self.map(|v| v.min(cap))
    }

    /// Path-wise maximum of two variables.
    pub fn pointwise_max(&self, other: &RandomVariable) -> Self {
        self.zip_map(other, f64::max)
    }

    /// Path-wise exponential.
    pub fn exp(&self) -> Self {
        self.map(f64::exp)
    }

    /// Path-wise natural logarithm.
    pub fn ln(&self) -> Self {
        self.map(f64::ln)
    }

    /// Path-wise square root.
    pub fn sqrt(&self) -> Self {
        self.map(f64::sqrt)
    }

    /// Path-wise integer power.
    pub fn powi(&self, n: i32) -> Self {
        self.map(|v| v.powi(n))
    }

    /// Path-wise selection: `if_true[p]` where `condition[p]`, else `if_false[p]`.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn select(condition: &[bool], if_true: &RandomVariable, if_false: &RandomVariable) -> Self {
        assert_eq!(condition.len(), if_true.len(), "condition length mismatch");
        assert_eq!(if_true.len(), if_false.len(), "random variables must have the same number of paths");
        Self::from_vec(
            condition
                .iter()
                .zip(if_true.values.iter().zip(if_false.values.iter()))
                .map(|(&c, (&a, &b))| if c { a } else { b })
                .collect(),
        )
    }

    /// Whether every realisation is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl From<Vec<f64>> for RandomVariable {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&RandomVariable> for &RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: &RandomVariable) -> RandomVariable {
                self.zip_map(rhs, |a, b| a $op b)
            }
        }

        impl $trait<RandomVariable> for RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: RandomVariable) -> RandomVariable {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&RandomVariable> for RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: &RandomVariable) -> RandomVariable {
                (&self).$method(rhs)
            }
        }

        impl $trait<RandomVariable> for &RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: RandomVariable) -> RandomVariable {
                self.$method(&rhs)
            }
        }

        impl $trait<f64> for &RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: f64) -> RandomVariable {
                self.map(|a| a $op rhs)
            }
        }

        impl $trait<f64> for RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: f64) -> RandomVariable {
                (&self).$method(rhs)
            }
        }

        impl $trait<&RandomVariable> for f64 {
            type Output = RandomVariable;

            fn $method(self, rhs: &RandomVariable) -> RandomVariable {
                rhs.map(|b| self $op b)
            }
        }

        impl $trait<RandomVariable> for f64 {
            type Output = RandomVariable;

            fn $method(self, rhs: RandomVariable) -> RandomVariable {
                self.$method(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);
impl_binary_op!(Mul, mul, *);
impl_binary_op!(Div, div, /);

impl Neg for &RandomVariable {
    type Output = RandomVariable;

    fn neg(self) -> RandomVariable {
        self.map(|v| -v)
    }
}

impl Neg for RandomVariable {
    type Output = RandomVariable;

    fn neg(self) -> RandomVariable {
        -&self
    }
}

//! Monte Carlo numerics.
//!
//! - [`random_variable`]: per-path values with immutable arithmetic
//! - [`regression`]: least squares on path-wise basis functions

pub mod random_variable;
pub mod regression;

pub use random_variable::RandomVariable;
pub use regression::{least_squares, least_squares_on, RegressionFit};

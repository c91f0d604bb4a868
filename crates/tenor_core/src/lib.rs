//! # tenor_core: Foundation for Term-Structure Monte Carlo
//!
//! ## Layer 1 (Foundation) Role
//!
//! tenor_core is the bottom layer of the workspace, providing:
//! - Time discretisation and tenor structure: `TimeGrid`, `TenorGrid` (`types::grid`)
//! - Error kinds shared by every layer: `SimulationError` (`types::error`)
//! - The curve provider interface used to seed models: `YieldCurve` (`market_data`)
//! - Path-wise random variables with immutable arithmetic: `RandomVariable` (`math`)
//! - Least-squares regression on random variables (`math::regression`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other tenor_* crates, with minimal external dependencies:
//! - num-traits: Generic floating-point curves
//! - nalgebra: Linear algebra for regression
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use tenor_core::math::RandomVariable;
//! use tenor_core::types::TimeGrid;
//!
//! let grid = TimeGrid::uniform(20.0, 0.5).unwrap();
//! assert_eq!(grid.n_steps(), 40);
//! assert_eq!(grid.time_index(10.0), Some(20));
//!
//! let x = RandomVariable::from_vec(vec![1.0, 2.0, 3.0]);
//! let y = &x * 2.0 + 1.0;
//! assert_eq!(y.average(), 5.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for grids

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;

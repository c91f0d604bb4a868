//! Core grid and error types.
//!
//! This module provides:
//! - `grid`: Simulation time discretisation (`TimeGrid`) and tenor structure (`TenorGrid`)
//! - `error`: Structured error kinds shared by models, engine and products
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`TimeGrid`], [`TenorGrid`] from `grid`
//! - [`SimulationError`] from `error`

pub mod error;
pub mod grid;

pub use error::SimulationError;
pub use grid::{TenorGrid, TimeGrid, GRID_TOLERANCE};

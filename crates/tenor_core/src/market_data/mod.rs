//! Market data consumed at model construction.
//!
//! This module provides:
//! - [`curves`]: the curve provider interface and flat reference curves
//! - [`error`]: [`MarketDataError`] for curve queries
//!
//! Models query the curve once, while seeding their initial state; the
//! simulation itself never calls back into market data.

pub mod curves;
pub mod error;

pub use error::MarketDataError;

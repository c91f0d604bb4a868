//! # tenor_models: Term-Structure Models for Monte Carlo Simulation
//!
//! ## Layer 2 (Models) Role
//!
//! tenor_models describes *what* is simulated; the engine in `tenor_pricing`
//! decides *how*. It provides:
//!
//! - Covariance structures for forward-rate models: volatility x correlation,
//!   factor reduction, state space and local volatility (`models::covariance`)
//! - The LIBOR market model under spot or terminal measure (`models::rates::lmm`)
//! - The Hull-White short-rate model with three simulation variants
//!   (`models::rates::hull_white`)
//! - The capability set every model offers to the engine
//!   (`models::term_structure::TermStructureModel`) and the closed set of
//!   models (`models::model_enum::RateModel`)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tenor_core::market_data::curves::FlatForwardCurve;
//! use tenor_core::types::{TenorGrid, TimeGrid};
//! use tenor_models::models::rates::{HullWhiteModel, HullWhiteVariant, ShortRateVolatility};
//! use tenor_models::models::{RateModel, TermStructureModel};
//!
//! let time = Arc::new(TimeGrid::uniform(10.0, 0.5).unwrap());
//! let tenor = Arc::new(TenorGrid::uniform(0.0, 10.0, 0.5).unwrap());
//! let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
//! let vol = ShortRateVolatility::constant(0.02, 0.1).unwrap();
//!
//! let model = RateModel::from(
//!     HullWhiteModel::new(time, tenor, &curve, vol, HullWhiteVariant::Standard).unwrap(),
//! );
//! assert_eq!(model.n_factors(), 1);
//! assert_eq!(model.model_name(), "HullWhite");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod models;

//! # tenor_pricing: Monte Carlo Engine and Product Valuation
//!
//! ## Layer 3 (Engine) Role
//!
//! tenor_pricing turns a model from `tenor_models` into simulated paths and
//! values products on them:
//!
//! - Seeded, per-path Brownian increments (`rng`)
//! - Euler and predictor-corrector evolution, parallel across paths, and the
//!   immutable cache of states and numeraires (`mc::scheme`, `mc::simulation`)
//! - TOML configuration wiring grids, model, driver and scheme (`mc::config`)
//! - Bonds, swaps, swap legs on composable indices, caplets, European and
//!   Bermudan swaptions (`products`)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tenor_core::market_data::curves::{FlatForwardCurve, YieldCurve};
//! use tenor_core::types::{TenorGrid, TimeGrid};
//! use tenor_models::models::rates::{HullWhiteModel, HullWhiteVariant, ShortRateVolatility};
//! use tenor_pricing::mc::{EulerScheme, SchemeKind, Simulation};
//! use tenor_pricing::products::{Bond, MonteCarloProduct};
//! use tenor_pricing::rng::BrownianDriver;
//!
//! let time = Arc::new(TimeGrid::uniform(10.0, 0.5).unwrap());
//! let tenor = Arc::new(TenorGrid::uniform(0.0, 10.0, 0.5).unwrap());
//! let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
//! let vol = ShortRateVolatility::constant(0.02, 0.1).unwrap();
//! let model = HullWhiteModel::new(time.clone(), tenor, &curve, vol, HullWhiteVariant::Standard).unwrap();
//!
//! let driver = BrownianDriver::new(time, 1, 5000, 3141).unwrap();
//! let simulation = Simulation::build(model.into(), &EulerScheme::new(SchemeKind::Euler), &driver).unwrap();
//!
//! let bond = Bond::new(10.0).unwrap().value(0.0, &simulation).unwrap();
//! let analytic = curve.discount_factor(10.0).unwrap();
//! assert!((bond.average() - analytic).abs() < 4.0 * bond.standard_error());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod products;
pub mod rng;

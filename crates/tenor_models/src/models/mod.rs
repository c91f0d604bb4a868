//! Term-structure models and their covariance structures.
//!
//! - [`term_structure`]: the capability set consumed by the simulation engine
//! - [`model_enum`]: static dispatch over the closed set of models
//! - [`covariance`]: volatility, correlation and factor loadings for forward-rate models
//! - [`rates`]: LIBOR market model and Hull-White model

pub mod covariance;
pub mod model_enum;
pub mod rates;
pub mod term_structure;

pub use model_enum::RateModel;
pub use term_structure::{Measure, TermStructureModel};

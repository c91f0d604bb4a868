//! Interest rate models.
//!
//! - [`lmm`]: LIBOR market model on a tenor grid
//! - [`hull_white`]: Hull-White short-rate model in three simulation variants
//! - [`short_rate_volatility`]: piecewise-constant short-rate volatility and its closed forms

pub mod hull_white;
pub mod lmm;
pub mod short_rate_volatility;

pub use hull_white::{HullWhiteModel, HullWhiteVariant};
pub use lmm::LiborMarketModel;
pub use short_rate_volatility::ShortRateVolatility;

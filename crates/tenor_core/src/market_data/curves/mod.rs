//! Curve provider interface and reference implementations.
//!
//! - [`YieldCurve`]: discount factors and simple-compounded forward rates
//! - [`FlatCurve`]: constant continuously compounded rate
//! - [`FlatForwardCurve`]: constant simple-compounded forward for a fixed period length

mod flat;
mod flat_forward;
mod traits;

pub use flat::FlatCurve;
pub use flat_forward::FlatForwardCurve;
pub use traits::YieldCurve;

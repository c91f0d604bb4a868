//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Curve provider used to seed term-structure models.
///
/// Generic over `T: Float` so the same curve can serve `f64` and `f32`
/// consumers.
///
/// # Contract
///
/// - `discount_factor(t)` returns the discount factor P(0, t) for maturity t
/// - `zero_rate(t)` returns the continuously compounded zero rate
/// - `forward_rate(t1, t2)` returns the simple-compounded (LIBOR) forward for `[t1, t2]`
/// - `instantaneous_forward(t)` returns f(0, t) = -d ln P(0, t) / dt
///
/// # Invariants
///
/// - P(0, 0) = 1
/// - P(0, t) > 0 for all t >= 0
///
/// # Example
///
/// ```
/// use tenor_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
///
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
///
/// // Simple-compounded forward over half a year
/// let fwd = curve.forward_rate(1.0, 1.5).unwrap();
/// assert!((fwd - ((0.025_f64).exp() - 1.0) / 0.5).abs() < 1e-12);
/// ```
pub trait YieldCurve<T: Float> {
    /// Return the discount factor P(0, t).
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if t < 0.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the continuously compounded zero rate for maturity `t`.
    ///
    /// # Default Implementation
    ///
    /// ```text
    /// r(t) = -ln(P(0, t)) / t
    /// ```
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Return the simple-compounded forward rate for the period `[t1, t2]`.
    ///
    /// # Default Implementation
    ///
    /// ```text
    /// L(t1, t2) = (P(0, t1) / P(0, t2) - 1) / (t2 - t1)
    /// ```
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidPeriod {
                start: t1.to_f64().unwrap_or(0.0),
                end: t2.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2 - T::one()) / dt)
    }

    /// Return the instantaneous forward rate f(0, t).
    ///
    /// # Default Implementation
    ///
    /// Central difference of `ln P(0, t)` with a one-basis-point-of-a-year bump,
    /// one-sided at t = 0.
    fn instantaneous_forward(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let h = T::from(1e-4).unwrap_or_else(T::epsilon);
        let lo = if t > h { t - h } else { T::zero() };
        let hi = t + h;
        let ln_lo = self.discount_factor(lo)?.ln();
        let ln_hi = self.discount_factor(hi)?.ln();
        Ok(-(ln_hi - ln_lo) / (hi - lo))
    }
}

//! Curve with one continuously compounded rate for every maturity.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// `P(0, t) = exp(-r t)`.
///
/// Forward rates over a period of length `d` are `(exp(r d) - 1) / d` for
/// every start date, so a model seeded from this curve sees the same LIBOR
/// forward on each tenor period.
///
/// # Example
///
/// ```
/// use tenor_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
/// assert!((curve.discount_factor(10.0).unwrap() - (-0.5_f64).exp()).abs() < 1e-15);
/// assert_eq!(curve.zero_rate(5.0).unwrap(), 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Curve at continuously compounded `rate`.
    #[inline]
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// Continuously compounded rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }
}

fn non_negative<T: Float>(t: T) -> Result<T, MarketDataError> {
    if t < T::zero() {
        return Err(MarketDataError::InvalidMaturity {
            t: t.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(t)
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        Ok((-self.rate * non_negative(t)?).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if !(t > T::zero()) {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(self.rate)
    }

    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        non_negative(t1)?;
        let period = t2 - t1;
        if !(period > T::zero()) {
            return Err(MarketDataError::InvalidPeriod {
                start: t1.to_f64().unwrap_or(f64::NAN),
                end: t2.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok((self.rate * period).exp_m1() / period)
    }

    fn instantaneous_forward(&self, t: T) -> Result<T, MarketDataError> {
        non_negative(t)?;
        Ok(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_negative_maturity_rejected() {
        let curve = FlatCurve::new(0.05_f64);
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        assert!(matches!(
            curve.discount_factor(-0.5),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
        assert!(curve.instantaneous_forward(-1.0).is_err());
        assert!(curve.zero_rate(0.0).is_err());
    }

    #[test]
    fn test_closed_form_forward_matches_discount_ratio() {
        let curve = FlatCurve::new(0.03_f64);
        let f = curve.forward_rate(1.0, 3.0).unwrap();
        let growth = curve.discount_factor(1.0).unwrap() / curve.discount_factor(3.0).unwrap();
        assert_relative_eq!(1.0 + 2.0 * f, growth, epsilon = 1e-14);
        assert!(curve.forward_rate(2.0, 2.0).is_err());
    }

    #[test]
    fn test_forward_independent_of_start() {
        let curve = FlatCurve::new(0.05_f64);
        let first = curve.forward_rate(0.0, 0.5).unwrap();
        let later = curve.forward_rate(7.5, 8.0).unwrap();
        assert_eq!(first, later);
        assert_relative_eq!(first, (0.025_f64.exp() - 1.0) / 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_f32_curve() {
        let curve = FlatCurve::new(0.05_f32);
        assert!((curve.discount_factor(1.0).unwrap() - 0.951229).abs() < 1e-5);
    }
}

//! Curve with a constant simple-compounded forward over a fixed period length.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;

/// Curve on which every forward rate over `period_length` equals `forward`.
///
/// Discount factors compound the forward geometrically,
/// `P(0, t) = (1 + forward * period_length)^(-t / period_length)`, which is
/// log-linear interpolation between the period boundaries.
///
/// # Example
///
/// ```
/// use tenor_core::market_data::curves::{FlatForwardCurve, YieldCurve};
///
/// let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
/// let libor = curve.forward_rate(4.5, 5.0).unwrap();
/// assert!((libor - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatForwardCurve {
    forward: f64,
    period_length: f64,
    /// Continuously compounded equivalent of `forward`
    log_growth_rate: f64,
}

impl FlatForwardCurve {
    /// Construct from a simple-compounded forward and its period length.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the period length is not positive or
    /// `1 + forward * period_length` is not positive.
    pub fn new(forward: f64, period_length: f64) -> Result<Self, MarketDataError> {
        if !(period_length > 0.0) || !period_length.is_finite() {
            return Err(MarketDataError::InvalidParameter {
                name: "period_length",
                value: period_length,
            });
        }
        let growth = 1.0 + forward * period_length;
        if !(growth > 0.0) || !forward.is_finite() {
            return Err(MarketDataError::InvalidParameter {
                name: "forward",
                value: forward,
            });
        }
        Ok(Self {
            forward,
            period_length,
            log_growth_rate: growth.ln() / period_length,
        })
    }

    /// Simple-compounded forward per period.
    #[inline]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// Period length the forward refers to.
    #[inline]
    pub fn period_length(&self) -> f64 {
        self.period_length
    }
}

impl YieldCurve<f64> for FlatForwardCurve {
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok((-self.log_growth_rate * t).exp())
    }

    fn instantaneous_forward(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok(self.log_growth_rate)
    }
}

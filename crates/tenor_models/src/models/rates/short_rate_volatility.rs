//! Piecewise-constant short-rate volatility with constant mean reversion.
//!
//! Closed forms used by the Hull-White model, for `x = r - f(0, t)`:
//!
//! ```text
//! B(t, T) = (1 - exp(-a (T - t))) / a
//! y(t)    = int_0^t sigma(u)^2 exp(-2 a (t - u)) du
//! P(t, T) = P(0, T) / P(0, t) * exp(-B(t, T) x(t) - 1/2 B(t, T)^2 y(t))
//! ```

use tenor_core::types::SimulationError;

/// Short-rate volatility `sigma(t)`, constant on `[times[i], times[i+1])`,
/// with mean reversion `a`.
///
/// # Example
///
/// ```
/// use tenor_models::models::rates::ShortRateVolatility;
///
/// let vol = ShortRateVolatility::new(vec![0.0, 5.0], vec![0.01, 0.02], 0.1).unwrap();
/// assert_eq!(vol.sigma(4.9), 0.01);
/// assert_eq!(vol.sigma(5.0), 0.02);
/// assert_eq!(vol.sigma(50.0), 0.02);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ShortRateVolatility {
    times: Vec<f64>,
    sigmas: Vec<f64>,
    mean_reversion: f64,
}

impl ShortRateVolatility {
    /// Piecewise-constant volatility starting at `times[0] = 0`; the last
    /// value extends indefinitely.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the arrays are empty or of different length,
    /// the breakpoints do not start at 0 or are not increasing, a volatility
    /// is negative or non-finite, or the mean reversion is not finite.
    pub fn new(times: Vec<f64>, sigmas: Vec<f64>, mean_reversion: f64) -> Result<Self, SimulationError> {
        if times.is_empty() || times.len() != sigmas.len() {
            return Err(SimulationError::invalid(format!(
                "short-rate volatility needs matching breakpoints and values, got {} and {}",
                times.len(),
                sigmas.len()
            )));
        }
        if times[0] != 0.0 {
            return Err(SimulationError::invalid("short-rate volatility breakpoints must start at 0"));
        }
        if times.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(SimulationError::invalid(
                "short-rate volatility breakpoints must be strictly increasing",
            ));
        }
        if let Some(s) = sigmas.iter().find(|s| !(**s >= 0.0) || !s.is_finite()) {
            return Err(SimulationError::invalid(format!(
                "short-rate volatility must be non-negative and finite, got {s}"
            )));
        }
        if !mean_reversion.is_finite() {
            return Err(SimulationError::invalid("mean reversion must be finite"));
        }
        Ok(Self {
            times,
            sigmas,
            mean_reversion,
        })
    }

    /// Constant volatility.
    ///
    /// # Errors
    ///
    /// See [`ShortRateVolatility::new`].
    pub fn constant(sigma: f64, mean_reversion: f64) -> Result<Self, SimulationError> {
        Self::new(vec![0.0], vec![sigma], mean_reversion)
    }

    /// Mean reversion `a`.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Breakpoints of the volatility.
    #[inline]
    pub fn breakpoints(&self) -> &[f64] {
        &self.times
    }

    /// Volatility in force at `t`.
    pub fn sigma(&self, t: f64) -> f64 {
        let idx = self.times.partition_point(|&x| x <= t);
        self.sigmas[idx.saturating_sub(1)]
    }

    /// `B(t, T) = (1 - exp(-a (T - t))) / a`.
    pub fn b(&self, t: f64, maturity: f64) -> f64 {
        exp_decay_integral(self.mean_reversion, maturity - t)
    }

    /// `int_s^t sigma(u)^2 exp(-2 a (t - u)) du`.
    pub fn variance_integral(&self, s: f64, t: f64) -> f64 {
        let a = self.mean_reversion;
        let mut total = 0.0;
        for (i, &sigma) in self.sigmas.iter().enumerate() {
            let piece_start = self.times[i];
            let piece_end = self.times.get(i + 1).copied().unwrap_or(f64::INFINITY);
            let lo = piece_start.max(s);
            let hi = piece_end.min(t);
            if hi > lo {
                // int_lo^hi exp(-2a (t - u)) du
                let weight = (-2.0 * a * (t - hi)).exp() * exp_decay_integral(2.0 * a, hi - lo);
                total += sigma * sigma * weight;
            }
        }
        total
    }

    /// `y(t) = int_0^t sigma(u)^2 exp(-2 a (t - u)) du`.
    pub fn y(&self, t: f64) -> f64 {
        self.variance_integral(0.0, t)
    }

    /// `int_0^t sigma(u)^2 (B(u, T) - B(u, t))^2 du = B(t, T)^2 y(t)`,
    /// the variance of `ln P(t, T)` seen from 0.
    pub fn integrated_bond_squared_volatility(&self, t: f64, maturity: f64) -> f64 {
        let b = self.b(t, maturity);
        b * b * self.y(t)
    }
}

/// `(1 - exp(-a x)) / a`, tending to `x` as `a -> 0`.
pub(crate) fn exp_decay_integral(a: f64, x: f64) -> f64 {
    if (a * x).abs() < 1e-12 {
        x
    } else {
        -(-a * x).exp_m1() / a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_y_closed_form() {
        let vol = ShortRateVolatility::constant(0.02, 0.1).unwrap();
        let expected = 0.02 * 0.02 * (1.0 - (-0.2_f64 * 3.0).exp()) / 0.2;
        assert_relative_eq!(vol.y(3.0), expected, epsilon = 1e-16);
    }

    #[test]
    fn test_zero_mean_reversion_limits() {
        let vol = ShortRateVolatility::constant(0.01, 0.0).unwrap();
        assert_relative_eq!(vol.b(1.0, 3.5), 2.5, epsilon = 1e-14);
        assert_relative_eq!(vol.y(4.0), 0.0001 * 4.0, epsilon = 1e-16);
    }

    #[test]
    fn test_piecewise_y_matches_recursion() {
        let vol = ShortRateVolatility::new(vec![0.0, 1.0, 2.5], vec![0.01, 0.03, 0.015], 0.2).unwrap();
        // y(t) = exp(-2a (t - s)) y(s) + int_s^t ...
        let s: f64 = 1.7;
        let t = 4.0;
        let recursive = (-2.0 * 0.2 * (t - s)).exp() * vol.y(s) + vol.variance_integral(s, t);
        assert_relative_eq!(vol.y(t), recursive, epsilon = 1e-15);
    }

    #[test]
    fn test_piecewise_y_numerical() {
        let vol = ShortRateVolatility::new(vec![0.0, 1.0], vec![0.01, 0.03], 0.3).unwrap();
        let t = 2.0;
        let n = 200_000;
        let h = t / n as f64;
        let numeric: f64 = (0..n)
            .map(|i| {
                let u = (i as f64 + 0.5) * h;
                vol.sigma(u).powi(2) * (-2.0 * 0.3 * (t - u)).exp() * h
            })
            .sum();
        assert_relative_eq!(vol.y(t), numeric, max_relative = 1e-8);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(ShortRateVolatility::new(vec![], vec![], 0.1).is_err());
        assert!(ShortRateVolatility::new(vec![0.5], vec![0.01], 0.1).is_err());
        assert!(ShortRateVolatility::new(vec![0.0, 0.0], vec![0.01, 0.02], 0.1).is_err());
        assert!(ShortRateVolatility::constant(-0.01, 0.1).is_err());
        assert!(ShortRateVolatility::constant(0.01, f64::NAN).is_err());
    }
}

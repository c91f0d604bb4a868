//! Fixing and payment dates of a strip of accrual periods.

use tenor_core::market_data::curves::YieldCurve;
use tenor_core::types::{SimulationError, GRID_TOLERANCE};

/// Accrual periods `[fixing_i, payment_i]`, ordered by fixing date.
///
/// The accrual fraction of period `i` is `payment_i - fixing_i`.
///
/// # Example
///
/// ```
/// use tenor_pricing::products::SwapSchedule;
///
/// let schedule = SwapSchedule::regular(1.0, 3.0, 0.5).unwrap();
/// assert_eq!(schedule.n_periods(), 4);
/// assert_eq!(schedule.fixing(1), 1.5);
/// assert_eq!(schedule.payment(3), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SwapSchedule {
    fixing_dates: Vec<f64>,
    payment_dates: Vec<f64>,
}

impl SwapSchedule {
    /// Schedule from explicit fixing and payment dates.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the arrays are empty or of different length,
    /// a date is negative or not finite, a payment does not come after its
    /// fixing, or the fixings are not strictly increasing.
    pub fn new(fixing_dates: Vec<f64>, payment_dates: Vec<f64>) -> Result<Self, SimulationError> {
        if fixing_dates.is_empty() || fixing_dates.len() != payment_dates.len() {
            return Err(SimulationError::invalid(format!(
                "schedule needs matching fixing and payment dates, got {} and {}",
                fixing_dates.len(),
                payment_dates.len()
            )));
        }
        if fixing_dates
            .iter()
            .chain(&payment_dates)
            .any(|d| !d.is_finite() || *d < 0.0)
        {
            return Err(SimulationError::invalid("schedule dates must be finite and non-negative"));
        }
        if let Some((f, p)) = fixing_dates
            .iter()
            .zip(&payment_dates)
            .find(|(f, p)| !(**p > **f))
        {
            return Err(SimulationError::invalid(format!(
                "payment date {p} must come after fixing date {f}"
            )));
        }
        if fixing_dates.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(SimulationError::invalid("fixing dates must be strictly increasing"));
        }
        Ok(Self {
            fixing_dates,
            payment_dates,
        })
    }

    /// Back-to-back periods of length `period` from `start` to `end`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `period` is not positive or does not divide
    /// `end - start`.
    pub fn regular(start: f64, end: f64, period: f64) -> Result<Self, SimulationError> {
        if !(period > 0.0) || !(end > start) {
            return Err(SimulationError::invalid(format!(
                "regular schedule needs start < end and a positive period, got [{start}, {end}] by {period}"
            )));
        }
        let ratio = (end - start) / period;
        let n = ratio.round();
        if (ratio - n).abs() > GRID_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "period {period} does not divide [{start}, {end}]"
            )));
        }
        let n = n as usize;
        let dates: Vec<f64> = (0..=n).map(|i| start + i as f64 * period).collect();
        Self::new(dates[..n].to_vec(), dates[1..].to_vec())
    }

    /// Number of periods.
    #[inline]
    pub fn n_periods(&self) -> usize {
        self.fixing_dates.len()
    }

    /// Fixing date of period `i`.
    #[inline]
    pub fn fixing(&self, i: usize) -> f64 {
        self.fixing_dates[i]
    }

    /// Payment date of period `i`.
    #[inline]
    pub fn payment(&self, i: usize) -> f64 {
        self.payment_dates[i]
    }

    /// Accrual fraction of period `i`.
    #[inline]
    pub fn period_length(&self, i: usize) -> f64 {
        self.payment_dates[i] - self.fixing_dates[i]
    }

    /// All fixing dates.
    pub fn fixing_dates(&self) -> &[f64] {
        &self.fixing_dates
    }

    /// All payment dates.
    pub fn payment_dates(&self) -> &[f64] {
        &self.payment_dates
    }

    /// First period whose fixing is at or after `t`.
    pub fn first_period_fixing_at_or_after(&self, t: f64) -> Option<usize> {
        self.fixing_dates.iter().position(|&f| f >= t - GRID_TOLERANCE)
    }

    /// Present value at `evaluation_time` of one unit of accrual paid on every
    /// payment date strictly after it, `sum tau_i P(pay_i) / P(t)`.
    ///
    /// # Errors
    ///
    /// Propagates curve errors as `InvalidConfiguration`.
    pub fn annuity<C>(&self, curve: &C, evaluation_time: f64) -> Result<f64, SimulationError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let mut value = 0.0;
        for i in 0..self.n_periods() {
            if self.payment(i) > evaluation_time {
                value += self.period_length(i) * curve.discount_factor(self.payment(i))?;
            }
        }
        Ok(value / curve.discount_factor(evaluation_time)?)
    }

    /// Par swap rate implied by `curve`: the fixed rate at which a payer swap
    /// on this schedule is worth zero at time 0.
    ///
    /// # Errors
    ///
    /// Propagates curve errors as `InvalidConfiguration`.
    pub fn par_rate<C>(&self, curve: &C) -> Result<f64, SimulationError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let mut float_leg = 0.0;
        let mut annuity = 0.0;
        for i in 0..self.n_periods() {
            let tau = self.period_length(i);
            let df = curve.discount_factor(self.payment(i))?;
            float_leg += tau * curve.forward_rate(self.fixing(i), self.payment(i))? * df;
            annuity += tau * df;
        }
        Ok(float_leg / annuity)
    }
}

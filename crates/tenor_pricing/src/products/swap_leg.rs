//! Single leg of a swap paying an index plus a spread.

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use super::index::RateIndex;
use super::schedule::SwapSchedule;
use super::traits::MonteCarloProduct;
use crate::mc::Simulation;

/// Dates of one coupon period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegPeriod {
    /// Fixing date of the index
    pub fixing: f64,
    /// Accrual start
    pub start: f64,
    /// Accrual end
    pub end: f64,
    /// Payment date
    pub payment: f64,
}

/// Leg receiving `(index(fixing) + spread) (end - start) notional` at each
/// payment date, optionally exchanging the notional at the start and end of
/// every period.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapLeg {
    periods: Vec<LegPeriod>,
    index: RateIndex,
    spread: f64,
    notional: f64,
    notional_exchange: bool,
}

impl SwapLeg {
    /// Leg over explicit periods.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if there are no periods, a period does not
    /// accrue forward, a payment precedes the fixing, the spread or notional
    /// is not finite, or the index is invalid.
    pub fn new(
        periods: Vec<LegPeriod>,
        index: RateIndex,
        spread: f64,
        notional: f64,
        notional_exchange: bool,
    ) -> Result<Self, SimulationError> {
        if periods.is_empty() {
            return Err(SimulationError::invalid("swap leg needs at least one period"));
        }
        if let Some(p) = periods.iter().find(|p| !(p.end > p.start) || p.payment < p.fixing) {
            return Err(SimulationError::invalid(format!("malformed swap leg period {p:?}")));
        }
        if !spread.is_finite() || !notional.is_finite() {
            return Err(SimulationError::invalid("swap leg spread and notional must be finite"));
        }
        index.validate()?;
        Ok(Self {
            periods,
            index,
            spread,
            notional,
            notional_exchange,
        })
    }

    /// Leg fixing at the start of each schedule period and paying at its end.
    ///
    /// # Errors
    ///
    /// See [`SwapLeg::new`].
    pub fn from_schedule(
        schedule: &SwapSchedule,
        index: RateIndex,
        spread: f64,
        notional: f64,
        notional_exchange: bool,
    ) -> Result<Self, SimulationError> {
        let periods = (0..schedule.n_periods())
            .map(|i| LegPeriod {
                fixing: schedule.fixing(i),
                start: schedule.fixing(i),
                end: schedule.payment(i),
                payment: schedule.payment(i),
            })
            .collect();
        Self::new(periods, index, spread, notional, notional_exchange)
    }

    /// Coupon periods.
    pub fn periods(&self) -> &[LegPeriod] {
        &self.periods
    }

    /// Index paid by the leg.
    pub fn index(&self) -> &RateIndex {
        &self.index
    }
}

impl MonteCarloProduct for SwapLeg {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        let mut deflated = RandomVariable::constant(0.0, simulation.n_paths());
        let deflator = |t: f64| simulation.time_index(t).map(|k| simulation.numeraire_at(k));

        for period in &self.periods {
            if period.payment > evaluation_time {
                let rate = self.index.value(period.fixing, simulation)? + self.spread;
                let coupon = rate * ((period.end - period.start) * self.notional);
                deflated = deflated + coupon / deflator(period.payment)?;
            }
            if self.notional_exchange {
                if period.start > evaluation_time {
                    deflated = deflated - self.notional / deflator(period.start)?;
                }
                if period.end > evaluation_time {
                    deflated = deflated + self.notional / deflator(period.end)?;
                }
            }
        }
        Ok(deflated * deflator(evaluation_time)?)
    }
}

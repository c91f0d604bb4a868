//! Rate indices observed at a fixing date.
//!
//! An index turns a fixing time into a path-wise rate read from the
//! simulation. Indices compose: a lagged index fixes a LIBOR rate in arrears,
//! a linear combination builds spreads between indices and a capped or floored
//! index bounds any of them.

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use crate::mc::Simulation;

/// Rate observable at a fixing date.
///
/// # Example
///
/// ```
/// use tenor_pricing::products::RateIndex;
///
/// // 6M LIBOR fixed in arrears, floored at zero
/// let index = RateIndex::CappedFloored {
///     index: Box::new(RateIndex::Lagged {
///         index: Box::new(RateIndex::libor(0.5)),
///         fixing_offset: 0.5,
///     }),
///     cap: None,
///     floor: Some(0.0),
/// };
/// assert!(index.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum RateIndex {
    /// Forward rate for `[fix + period_start_offset, fix + period_start_offset + period_length]`.
    Libor {
        /// Offset of the accrual start from the fixing date
        period_start_offset: f64,
        /// Accrual length
        period_length: f64,
    },
    /// Deterministic rate.
    Fixed {
        /// Rate
        rate: f64,
    },
    /// `index` fixed at `fix + fixing_offset`.
    Lagged {
        /// Underlying index
        index: Box<RateIndex>,
        /// Shift of the fixing date
        fixing_offset: f64,
    },
    /// `sum w_i index_i`.
    LinearCombination {
        /// Weights and indices
        terms: Vec<(f64, RateIndex)>,
    },
    /// `min(max(index, floor), cap)`, either bound optional.
    CappedFloored {
        /// Underlying index
        index: Box<RateIndex>,
        /// Upper bound
        cap: Option<f64>,
        /// Lower bound
        floor: Option<f64>,
    },
    /// Par rate of a swap starting at the fixing date, `(1 - P(t, t + L)) / sum tau P(t, t + j tau)`.
    SwapRate {
        /// Length `L` of the underlying swap
        swap_length: f64,
        /// Period length `tau` of its fixed leg
        period_length: f64,
    },
}

impl RateIndex {
    /// Forward rate for the period of length `period_length` starting at the fixing date.
    pub fn libor(period_length: f64) -> Self {
        RateIndex::Libor {
            period_start_offset: 0.0,
            period_length,
        }
    }

    /// Check the parameters of this index and of every nested index.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for non-positive lengths, negative offsets,
    /// non-finite parameters, empty combinations, a floor above the cap or
    /// a swap length that is not a whole number of periods.
    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            RateIndex::Libor {
                period_start_offset,
                period_length,
            } => {
                if !(*period_start_offset >= 0.0) || !(*period_length > 0.0) || !period_length.is_finite() {
                    return Err(SimulationError::invalid(format!(
                        "LIBOR index needs a non-negative offset and positive length, got {period_start_offset} and {period_length}"
                    )));
                }
                Ok(())
            }
            RateIndex::Fixed { rate } => {
                if !rate.is_finite() {
                    return Err(SimulationError::invalid("fixed index rate must be finite"));
                }
                Ok(())
            }
            RateIndex::Lagged { index, fixing_offset } => {
                if !fixing_offset.is_finite() {
                    return Err(SimulationError::invalid("fixing offset must be finite"));
                }
                index.validate()
            }
            RateIndex::LinearCombination { terms } => {
                if terms.is_empty() {
                    return Err(SimulationError::invalid("linear combination needs at least one index"));
                }
                for (weight, index) in terms {
                    if !weight.is_finite() {
                        return Err(SimulationError::invalid("linear combination weights must be finite"));
                    }
                    index.validate()?;
                }
                Ok(())
            }
            RateIndex::CappedFloored { index, cap, floor } => {
                if let (Some(c), Some(f)) = (cap, floor) {
                    if f > c {
                        return Err(SimulationError::invalid(format!("floor {f} is above cap {c}")));
                    }
                }
                index.validate()
            }
            RateIndex::SwapRate {
                swap_length,
                period_length,
            } => {
                if !(*period_length > 0.0) || !(*swap_length >= *period_length) {
                    return Err(SimulationError::invalid(format!(
                        "swap rate index needs 0 < period <= length, got {period_length} and {swap_length}"
                    )));
                }
                let n = swap_length / period_length;
                if (n - n.round()).abs() > 1e-8 {
                    return Err(SimulationError::invalid(format!(
                        "swap length {swap_length} is not a multiple of {period_length}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Value of the index fixed at `fixing_time`.
    ///
    /// # Errors
    ///
    /// `UnsupportedTenor` if a date the index needs is not on the model's grids.
    pub fn value(&self, fixing_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        match self {
            RateIndex::Libor {
                period_start_offset,
                period_length,
            } => {
                let start = fixing_time + period_start_offset;
                simulation.forward_rate(fixing_time, start, start + period_length)
            }
            RateIndex::Fixed { rate } => Ok(RandomVariable::constant(*rate, simulation.n_paths())),
            RateIndex::Lagged { index, fixing_offset } => index.value(fixing_time + fixing_offset, simulation),
            RateIndex::LinearCombination { terms } => {
                let mut total = RandomVariable::constant(0.0, simulation.n_paths());
                for (weight, index) in terms {
                    total = total + index.value(fixing_time, simulation)? * *weight;
                }
                Ok(total)
            }
            RateIndex::CappedFloored { index, cap, floor } => {
                let mut rate = index.value(fixing_time, simulation)?;
                if let Some(f) = floor {
                    rate = rate.max_with(*f);
                }
                if let Some(c) = cap {
                    rate = rate.min_with(*c);
                }
                Ok(rate)
            }
            RateIndex::SwapRate {
                swap_length,
                period_length,
            } => {
                let n = (swap_length / period_length).round() as usize;
                let bonds = (1..=n)
                    .map(|j| simulation.discount_bond(fixing_time, fixing_time + j as f64 * period_length))
                    .collect::<Result<Vec<_>, _>>()?;
                let Some(last) = bonds.last() else {
                    return Err(SimulationError::invalid("swap rate index has no periods"));
                };
                let annuity = bonds
                    .iter()
                    .fold(RandomVariable::constant(0.0, simulation.n_paths()), |acc, bond| {
                        acc + bond * *period_length
                    });
                Ok((1.0 - last) / annuity)
            }
        }
    }
}

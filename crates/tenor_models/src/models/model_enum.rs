//! Static dispatch enum for term-structure models.
//!
//! The engine is generic over [`TermStructureModel`]; `RateModel` closes the
//! set of models so a configured simulation can hold any of them by value
//! without a trait object.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tenor_core::market_data::curves::FlatForwardCurve;
//! use tenor_core::types::{TenorGrid, TimeGrid};
//! use tenor_models::models::rates::{HullWhiteModel, HullWhiteVariant, ShortRateVolatility};
//! use tenor_models::models::{RateModel, TermStructureModel};
//!
//! let time = Arc::new(TimeGrid::uniform(5.0, 0.5).unwrap());
//! let tenor = Arc::new(TenorGrid::uniform(0.0, 5.0, 0.5).unwrap());
//! let curve = FlatForwardCurve::new(0.04, 0.5).unwrap();
//! let vol = ShortRateVolatility::constant(0.01, 0.05).unwrap();
//! let hw = HullWhiteModel::new(time, tenor, &curve, vol, HullWhiteVariant::ShiftExtension).unwrap();
//!
//! let model: RateModel = hw.into();
//! match &model {
//!     RateModel::HullWhite(m) => assert_eq!(m.n_components(), 3),
//!     RateModel::Lmm(_) => unreachable!(),
//! }
//! ```

use tenor_core::types::{SimulationError, TenorGrid, TimeGrid};

use super::covariance::StateSpace;
use super::rates::{HullWhiteModel, LiborMarketModel};
use super::term_structure::TermStructureModel;

/// Closed set of simulated term-structure models.
#[derive(Clone, Debug)]
pub enum RateModel {
    /// LIBOR market model
    Lmm(LiborMarketModel),
    /// Hull-White short-rate model
    HullWhite(HullWhiteModel),
}

impl From<LiborMarketModel> for RateModel {
    fn from(model: LiborMarketModel) -> Self {
        RateModel::Lmm(model)
    }
}

impl From<HullWhiteModel> for RateModel {
    fn from(model: HullWhiteModel) -> Self {
        RateModel::HullWhite(model)
    }
}

macro_rules! dispatch {
    ($self:ident, $m:ident => $body:expr) => {
        match $self {
            RateModel::Lmm($m) => $body,
            RateModel::HullWhite($m) => $body,
        }
    };
}

impl TermStructureModel for RateModel {
    fn model_name(&self) -> &'static str {
        dispatch!(self, m => m.model_name())
    }

    fn time_grid(&self) -> &TimeGrid {
        dispatch!(self, m => m.time_grid())
    }

    fn tenor_grid(&self) -> &TenorGrid {
        dispatch!(self, m => m.tenor_grid())
    }

    fn n_components(&self) -> usize {
        dispatch!(self, m => m.n_components())
    }

    fn n_factors(&self) -> usize {
        dispatch!(self, m => m.n_factors())
    }

    fn state_space(&self, component: usize) -> StateSpace {
        dispatch!(self, m => m.state_space(component))
    }

    fn initial_state(&self) -> Vec<f64> {
        dispatch!(self, m => m.initial_state())
    }

    #[inline]
    fn drift(&self, time_index: usize, state: &[f64], drift: &mut [f64]) {
        dispatch!(self, m => m.drift(time_index, state, drift))
    }

    #[inline]
    fn factor_loading(&self, time_index: usize, component: usize, state: &[f64], loading: &mut [f64]) {
        dispatch!(self, m => m.factor_loading(time_index, component, state, loading))
    }

    #[inline]
    fn exact_step(&self) -> bool {
        dispatch!(self, m => m.exact_step())
    }

    fn numeraire(&self, time_index: usize, state: &[f64]) -> f64 {
        dispatch!(self, m => m.numeraire(time_index, state))
    }

    fn forward_rate(&self, time_index: usize, state: &[f64], start: f64, end: f64) -> Result<f64, SimulationError> {
        dispatch!(self, m => m.forward_rate(time_index, state, start, end))
    }

    fn discount_bond(&self, time_index: usize, state: &[f64], maturity: f64) -> Result<f64, SimulationError> {
        dispatch!(self, m => m.discount_bond(time_index, state, maturity))
    }

    fn initial_discount_factor(&self, maturity: f64) -> Result<f64, SimulationError> {
        dispatch!(self, m => m.initial_discount_factor(maturity))
    }
}

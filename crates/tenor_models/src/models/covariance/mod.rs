//! Covariance structures for forward-rate models.
//!
//! A [`CovarianceStructure`] combines
//!
//! - a [`LiborVolatilityModel`]: instantaneous volatility per time step and component,
//! - a [`FactorCorrelation`]: correlation reduced to a small number of factors,
//! - a [`StateSpace`] flag: whether the scheme evolves rates or their logarithms,
//! - a [`LocalVolatility`] option: state-dependent scaling of the loadings,
//!
//! into factor loadings `lambda_i(t_k) in R^F` with
//! `lambda_i . lambda_j = sigma_i sigma_j rho_ij`.

mod correlation;
mod structure;
mod volatility;

pub use correlation::FactorCorrelation;
pub use structure::CovarianceStructure;
pub use volatility::LiborVolatilityModel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Space in which the discretisation scheme performs its additive update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum StateSpace {
    /// Evolve the component itself.
    #[default]
    Normal,
    /// Evolve the logarithm of the component; the component stays positive.
    LogNormal,
}

impl StateSpace {
    /// Map a component value into the scheme's update space.
    #[inline]
    pub fn to_update_space(self, value: f64) -> f64 {
        match self {
            StateSpace::Normal => value,
            StateSpace::LogNormal => value.ln(),
        }
    }

    /// Map a value from the scheme's update space back to the component.
    #[inline]
    pub fn from_update_space(self, value: f64) -> f64 {
        match self {
            StateSpace::Normal => value,
            StateSpace::LogNormal => value.exp(),
        }
    }
}

/// State-dependent scaling of the factor loadings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum LocalVolatility {
    /// Loadings used as given.
    #[default]
    None,
    /// Loadings scaled by `1 + delta_i L_i`.
    ///
    /// With a normal state space this gives forward rates the Gaussian
    /// forward-bond dynamics of the Hull-White model.
    ForwardBond,
}

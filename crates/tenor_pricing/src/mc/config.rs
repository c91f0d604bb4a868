//! Simulation configuration.
//!
//! A [`SimulationConfig`] describes a complete run: grids, model, scheme,
//! path count and seed. It is usually read from TOML:
//!
//! ```toml
//! n_paths = 20000
//! seed = 3141
//! time_step = 0.5
//! time_horizon = 20.0
//! tenor_period = 0.5
//! tenor_horizon = 20.0
//!
//! [model]
//! type = "hull-white"
//! variant = "standard"
//! mean_reversion = 0.1
//! volatilities = [0.02]
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tenor_core::market_data::curves::YieldCurve;
use tenor_core::types::{SimulationError, TenorGrid, TimeGrid};
use tenor_models::models::covariance::{
    CovarianceStructure, FactorCorrelation, LiborVolatilityModel, LocalVolatility, StateSpace,
};
use tenor_models::models::rates::{HullWhiteModel, HullWhiteVariant, LiborMarketModel, ShortRateVolatility};
use tenor_models::models::{Measure, RateModel, TermStructureModel};
use tracing::info;

use super::error::ConfigError;
use super::scheme::{EulerScheme, SchemeKind};
use super::simulation::Simulation;
use crate::rng::BrownianDriver;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

fn default_seed() -> u64 {
    3141
}

fn default_factors() -> usize {
    1
}

/// Forward-rate volatility of a LIBOR market model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "kebab-case")]
pub enum VolatilityConfig {
    /// Same volatility for every live forward rate.
    Constant {
        /// Volatility
        sigma: f64,
    },
    /// Explicit matrix, one row per time step.
    Matrix {
        /// `values[time_index][component]`
        values: Vec<Vec<f64>>,
    },
    /// `(a + b tau) exp(-c tau) + d`.
    Abcd {
        /// Level at zero time to maturity
        a: f64,
        /// Slope
        b: f64,
        /// Decay
        c: f64,
        /// Long-term level
        d: f64,
    },
    /// Volatility equivalent to a constant-coefficient Hull-White model.
    HullWhiteEquivalent {
        /// Short-rate volatility
        sigma: f64,
        /// Mean reversion
        mean_reversion: f64,
    },
}

/// LIBOR market model parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LmmConfig {
    /// Simulation measure.
    #[serde(default)]
    pub measure: Measure,
    /// Update space of the forward rates.
    #[serde(default)]
    pub state_space: StateSpace,
    /// Local-volatility scaling of the loadings.
    #[serde(default)]
    pub local_volatility: LocalVolatility,
    /// Number of Brownian factors.
    #[serde(default = "default_factors")]
    pub n_factors: usize,
    /// Decay of the exponential correlation between forward rates.
    #[serde(default)]
    pub correlation_decay: f64,
    /// Forward-rate volatility.
    pub volatility: VolatilityConfig,
}

/// Hull-White model parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HullWhiteConfig {
    /// Simulation variant.
    #[serde(default)]
    pub variant: HullWhiteVariant,
    /// Mean reversion `a`.
    pub mean_reversion: f64,
    /// Piecewise-constant short-rate volatilities.
    pub volatilities: Vec<f64>,
    /// Start times of the volatility pieces; may be omitted for a single value.
    #[serde(default)]
    pub volatility_times: Vec<f64>,
}

/// Model choice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModelConfig {
    /// LIBOR market model.
    Lmm(LmmConfig),
    /// Hull-White short-rate model.
    HullWhite(HullWhiteConfig),
}

/// Complete description of a simulation run.
///
/// # Examples
///
/// ```rust
/// use tenor_core::market_data::curves::FlatForwardCurve;
/// use tenor_pricing::mc::SimulationConfig;
///
/// let config = SimulationConfig::from_toml_str(r#"
///     n_paths = 500
///     time_step = 0.5
///     time_horizon = 5.0
///     tenor_period = 0.5
///     tenor_horizon = 5.0
///
///     [model]
///     type = "lmm"
///     state_space = "log-normal"
///     n_factors = 2
///     correlation_decay = 0.1
///
///     [model.volatility]
///     form = "constant"
///     sigma = 0.2
/// "#).unwrap();
///
/// let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
/// let simulation = config.simulate(&curve).unwrap();
/// assert_eq!(simulation.n_paths(), 500);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of paths.
    pub n_paths: usize,
    /// Seed of the Brownian driver.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Uniform simulation time step.
    pub time_step: f64,
    /// Last simulation time.
    pub time_horizon: f64,
    /// Uniform tenor period length.
    pub tenor_period: f64,
    /// Last tenor date.
    pub tenor_horizon: f64,
    /// Drift evaluation of the scheme.
    #[serde(default)]
    pub scheme: SchemeKind,
    /// Model and its parameters.
    pub model: ModelConfig,
}

impl SimulationConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` on malformed TOML or unknown fields, otherwise
    /// see [`SimulationConfig::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        info!(
            n_paths = config.n_paths,
            seed = config.seed,
            time_step = config.time_step,
            time_horizon = config.time_horizon,
            model = config.model_label(),
            "Simulation configuration loaded"
        );
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// `ConfigError::FileError` if the file cannot be read, otherwise see
    /// [`SimulationConfig::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    fn model_label(&self) -> &'static str {
        match &self.model {
            ModelConfig::Lmm(_) => "lmm",
            ModelConfig::HullWhite(_) => "hull-white",
        }
    }

    /// Check ranges that the model constructors do not see.
    ///
    /// # Errors
    ///
    /// - `InvalidPathCount` if `n_paths` is 0 or above [`MAX_PATHS`]
    /// - `InvalidParameter` for a non-positive step, period or horizon, or a
    ///   zero factor count
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        for (name, value) in [
            ("time_step", self.time_step),
            ("time_horizon", self.time_horizon),
            ("tenor_period", self.tenor_period),
            ("tenor_horizon", self.tenor_horizon),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value: format!("{value} must be positive and finite"),
                });
            }
        }
        if let ModelConfig::Lmm(lmm) = &self.model {
            if lmm.n_factors == 0 {
                return Err(ConfigError::InvalidParameter {
                    name: "n_factors",
                    value: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Simulation time grid.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the step does not divide the horizon.
    pub fn time_grid(&self) -> Result<Arc<TimeGrid>, SimulationError> {
        TimeGrid::uniform(self.time_horizon, self.time_step).map(Arc::new)
    }

    /// Tenor grid starting at 0.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the period does not divide the horizon.
    pub fn tenor_grid(&self) -> Result<Arc<TenorGrid>, SimulationError> {
        TenorGrid::uniform(0.0, self.tenor_horizon, self.tenor_period).map(Arc::new)
    }

    /// Construct the configured model, seeded from `curve`.
    ///
    /// # Errors
    ///
    /// Any construction error of the grids, the covariance structure or the model.
    pub fn build_model<C>(&self, curve: &C) -> Result<RateModel, SimulationError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let time = self.time_grid()?;
        let tenor = self.tenor_grid()?;
        match &self.model {
            ModelConfig::Lmm(lmm) => {
                let volatility = match &lmm.volatility {
                    VolatilityConfig::Constant { sigma } => LiborVolatilityModel::constant(&time, &tenor, *sigma)?,
                    VolatilityConfig::Matrix { values } => LiborVolatilityModel::from_matrix(&time, &tenor, values)?,
                    VolatilityConfig::Abcd { a, b, c, d } => {
                        LiborVolatilityModel::abcd(&time, &tenor, *a, *b, *c, *d)?
                    }
                    VolatilityConfig::HullWhiteEquivalent { sigma, mean_reversion } => {
                        LiborVolatilityModel::hull_white_equivalent(&time, &tenor, *sigma, *mean_reversion)?
                    }
                };
                let correlation = FactorCorrelation::exponential_decay(&tenor, lmm.correlation_decay, lmm.n_factors)?;
                let covariance = CovarianceStructure::new(
                    time,
                    tenor,
                    Arc::new(volatility),
                    Arc::new(correlation),
                    lmm.state_space,
                    lmm.local_volatility,
                )?;
                Ok(LiborMarketModel::new(covariance, curve, lmm.measure)?.into())
            }
            ModelConfig::HullWhite(hw) => {
                let times = if hw.volatility_times.is_empty() && hw.volatilities.len() == 1 {
                    vec![0.0]
                } else {
                    hw.volatility_times.clone()
                };
                let volatility = ShortRateVolatility::new(times, hw.volatilities.clone(), hw.mean_reversion)?;
                Ok(HullWhiteModel::new(time, tenor, curve, volatility, hw.variant)?.into())
            }
        }
    }

    /// Build the model, draw the Brownian increments and evolve all paths.
    ///
    /// # Errors
    ///
    /// Any error of [`SimulationConfig::build_model`], [`BrownianDriver::new`]
    /// or [`Simulation::build`].
    pub fn simulate<C>(&self, curve: &C) -> Result<Simulation, SimulationError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let model = self.build_model(curve)?;
        let time = Arc::new(model.time_grid().clone());
        let driver = BrownianDriver::new(time, model.n_factors(), self.n_paths, self.seed)?;
        Simulation::build(model, &EulerScheme::new(self.scheme), &driver)
    }
}

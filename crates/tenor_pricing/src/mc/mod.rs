//! Monte Carlo simulation of term-structure models.
//!
//! - [`scheme`]: Euler and predictor-corrector discretisation, parallel over paths
//! - [`simulation`]: the cache of states and numeraires on every time index
//! - [`config`]: TOML configuration wiring grids, model, driver and scheme
//! - [`error`]: configuration errors
//!
//! A simulation is built in one pass, sequential over time steps and parallel
//! across paths, and is immutable afterwards.

pub mod config;
pub mod error;
pub mod scheme;
pub mod simulation;

pub use config::{HullWhiteConfig, LmmConfig, ModelConfig, SimulationConfig, VolatilityConfig, MAX_PATHS};
pub use error::ConfigError;
pub use scheme::{EulerScheme, SchemeKind};
pub use simulation::{Simulation, StateView};

//! Interest-rate products valued on a built simulation.
//!
//! - [`traits`]: the [`MonteCarloProduct`] interface and numeraire deflation
//! - [`schedule`]: fixing and payment dates, curve annuity and par rate
//! - [`bond`], [`swap`], [`swap_leg`], [`caplet`]: linear and vanilla products
//! - [`index`]: composable rate indices paid by swap legs
//! - [`swaption`], [`bermudan`]: European and early-exercise swaptions
//! - [`numeraire_option`]: option on the numeraire asset
//!
//! Products never modify the simulation; any number of them can be valued
//! against one cache, concurrently if needed.
//!
//! # Examples
//!
//! ```
//! use tenor_core::market_data::curves::FlatForwardCurve;
//! use tenor_pricing::mc::SimulationConfig;
//! use tenor_pricing::products::{Bond, MonteCarloProduct, Product, Swap, SwapSchedule};
//!
//! let config = SimulationConfig::from_toml_str(r#"
//!     n_paths = 1000
//!     time_step = 0.5
//!     time_horizon = 5.0
//!     tenor_period = 0.5
//!     tenor_horizon = 5.0
//!
//!     [model]
//!     type = "hull-white"
//!     mean_reversion = 0.1
//!     volatilities = [0.01]
//! "#).unwrap();
//! let curve = FlatForwardCurve::new(0.05, 0.5).unwrap();
//! let simulation = config.simulate(&curve).unwrap();
//!
//! let products: Vec<Product> = vec![
//!     Bond::new(5.0).unwrap().into(),
//!     Swap::with_fixed_rate(SwapSchedule::regular(1.0, 5.0, 0.5).unwrap(), 0.05, 1.0).unwrap().into(),
//! ];
//! for product in &products {
//!     let price = product.price(&simulation).unwrap();
//!     assert!(price.is_finite(), "{}", product.name());
//! }
//! ```

pub mod bermudan;
pub mod bond;
pub mod caplet;
pub mod index;
pub mod numeraire_option;
pub mod schedule;
pub mod swap;
pub mod swap_leg;
pub mod swaption;
pub mod traits;

pub use bermudan::{BermudanSwaption, ExercisePolicy, RegressionSample, RegressionTarget, DEFAULT_BASIS_DEGREE};
pub use bond::Bond;
pub use caplet::Caplet;
pub use index::RateIndex;
pub use numeraire_option::NumeraireOption;
pub use schedule::SwapSchedule;
pub use swap::{Swap, SwapAnnuity};
pub use swap_leg::{LegPeriod, SwapLeg};
pub use swaption::EuropeanSwaption;
pub use traits::{deflate, MonteCarloProduct};

use tenor_core::math::RandomVariable;
use tenor_core::types::SimulationError;

use crate::mc::Simulation;

/// Closed set of products for static dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum Product {
    /// Zero-coupon bond
    Bond(Bond),
    /// Payer swap
    Swap(Swap),
    /// Annuity of a schedule
    SwapAnnuity(SwapAnnuity),
    /// Index-linked swap leg
    SwapLeg(SwapLeg),
    /// Caplet or floorlet
    Caplet(Caplet),
    /// European payer swaption
    EuropeanSwaption(EuropeanSwaption),
    /// Bermudan payer swaption
    BermudanSwaption(BermudanSwaption),
    /// Call or put on the numeraire
    NumeraireOption(NumeraireOption),
}

impl Product {
    /// Product kind for logging and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Product::Bond(_) => "bond",
            Product::Swap(_) => "swap",
            Product::SwapAnnuity(_) => "swap annuity",
            Product::SwapLeg(_) => "swap leg",
            Product::Caplet(c) if c.is_floorlet() => "floorlet",
            Product::Caplet(_) => "caplet",
            Product::EuropeanSwaption(_) => "European swaption",
            Product::BermudanSwaption(_) => "Bermudan swaption",
            Product::NumeraireOption(o) if o.is_put() => "numeraire put",
            Product::NumeraireOption(_) => "numeraire call",
        }
    }
}

impl MonteCarloProduct for Product {
    fn value(&self, evaluation_time: f64, simulation: &Simulation) -> Result<RandomVariable, SimulationError> {
        match self {
            Product::Bond(p) => p.value(evaluation_time, simulation),
            Product::Swap(p) => p.value(evaluation_time, simulation),
            Product::SwapAnnuity(p) => p.value(evaluation_time, simulation),
            Product::SwapLeg(p) => p.value(evaluation_time, simulation),
            Product::Caplet(p) => p.value(evaluation_time, simulation),
            Product::EuropeanSwaption(p) => p.value(evaluation_time, simulation),
            Product::BermudanSwaption(p) => p.value(evaluation_time, simulation),
            Product::NumeraireOption(p) => p.value(evaluation_time, simulation),
        }
    }
}

macro_rules! impl_from_product {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Product {
                fn from(product: $variant) -> Self {
                    Product::$variant(product)
                }
            }
        )*
    };
}

impl_from_product!(
    Bond,
    Swap,
    SwapAnnuity,
    SwapLeg,
    Caplet,
    EuropeanSwaption,
    BermudanSwaption,
    NumeraireOption
);

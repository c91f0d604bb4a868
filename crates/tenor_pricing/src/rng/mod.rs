//! # Random Number Generation
//!
//! - [`prng`]: seeded generator wrapper and the per-path seed derivation
//! - [`brownian`]: the Brownian increments consumed by the evolution scheme
//!
//! Every path draws from its own generator, so a simulation is reproducible
//! bit for bit from its seed regardless of the rayon thread count.

pub mod brownian;
pub mod prng;

pub use brownian::BrownianDriver;
pub use prng::{path_seed, PricerRng};

//! Price path generation for the crisis-market simulator.
//!
//! This crate holds the only stochastic component of the core: a
//! geometric random walk over the 6-day week, biased per stock by
//! whatever crisis shocks are active for the stock's sector. The
//! generator owns a seeded [`rand::rngs::StdRng`] so that paths are
//! reproducible given the same seed and call sequence.

mod paths;

pub use paths::{crisis_factor, PathConfig, PricePathGenerator};

//! The simulation engine.
//!
//! [`CrisisSim`] owns the record store and the price path generator and
//! exposes every operation of the simulator as a method: run lifecycle,
//! admin actions, trade execution, queries, and weekly analytics.
//!
//! # Concurrency
//!
//! The engine is a single-actor synchronous state machine: every
//! operation takes `&mut self` and runs to completion. Callers serving
//! multiple clients wrap the whole engine in one lock; there is no
//! interior locking.

mod admin;
mod analytics;
mod config;
mod error;
mod queries;
mod run;
mod trading;
mod users;

pub use admin::CrisisSpec;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use queries::PortfolioPerformance;
pub use trading::TradeReceipt;

use chrono::Utc;
use market::PricePathGenerator;
use store::MarketStore;
use types::Timestamp;

/// The crisis-market simulator.
pub struct CrisisSim {
    store: MarketStore,
    paths: PricePathGenerator,
    config: EngineConfig,
    /// Frozen clock for deterministic tests; `None` uses wall time.
    manual_now: Option<Timestamp>,
}

impl CrisisSim {
    /// Create an engine seeded with the default stock universe and
    /// admin account.
    pub fn new(config: EngineConfig) -> Self {
        let store = MarketStore::seeded(config.admin_starting_balance);
        let paths = PricePathGenerator::with_config(config.seed, config.path_config());
        Self {
            store,
            paths,
            config,
            manual_now: None,
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &MarketStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Freeze (or unfreeze) the engine clock.
    pub fn set_now(&mut self, now: Option<Timestamp>) {
        self.manual_now = now;
    }

    /// Current time in milliseconds since epoch.
    pub(crate) fn now(&self) -> Timestamp {
        match self.manual_now {
            Some(now) => now,
            None => Utc::now().timestamp_millis() as Timestamp,
        }
    }
}

impl Default for CrisisSim {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

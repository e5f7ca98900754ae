//! Quantitative analysis for the crisis-market simulator: basic
//! statistics, the per-trade volatility measure, and the weekly
//! analytics aggregation.

pub mod stats;
pub mod weekly;

pub use stats::{mean, returns, std_dev, variance, volatility};
pub use weekly::{
    behavior_stats, compute_metrics, narrative, BehaviorStats, RunLedger, TraderSnapshot,
    TOP_TRADER_COUNT,
};

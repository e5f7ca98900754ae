//! Core types for the crisis-market simulator.
//!
//! This crate provides the shared data model used across the engine:
//! newtype ids, fixed-point monetary values, sector classification,
//! and the record structs held by the flat store.

pub mod ids;
pub mod market;
pub mod money;
pub mod sector;
pub mod summary;
pub mod trade;
pub mod user;

pub use ids::{
    CrisisId, DayIndex, EventId, RunId, StockId, SummaryId, Timestamp, TxId, UserId, DAY_MS,
    FINAL_DAY,
};
pub use market::{CrisisEvent, PricePoint, SimulationRun, Stock};
pub use money::{Cash, Price, Quantity, PRICE_SCALE};
pub use sector::Sector;
pub use summary::{CrisisMilestone, TraderRank, WeeklyMetrics, WeeklySummary};
pub use trade::{BehaviorEvent, Holding, TradeAction, TradeType, Transaction};
pub use user::{Role, User};

//! Weekly summary records produced by the analytics aggregator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{DayIndex, RunId, SummaryId, Timestamp};
use crate::money::Cash;
use crate::sector::Sector;

/// One entry of the top-performers leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderRank {
    pub username: String,
    /// Unrealized profit: holdings value at current prices minus cost basis.
    pub profit: Cash,
}

/// One crisis event as it appears in the summary timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisMilestone {
    pub title: String,
    pub day: DayIndex,
    /// Signed fractional daily drift of the crisis.
    pub impact: f64,
}

/// Aggregate metrics for one completed simulation week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetrics {
    /// Per-sector mean percent change from day 0 to the final day.
    pub sector_impact: BTreeMap<Sector, f64>,
    /// Mean non-null reaction time, in hours.
    pub avg_reaction_hours: f64,
    pub total_trades: usize,
    pub panic_sells: usize,
    pub fomo_buys: usize,
    /// Mean over non-admin users of their summed risk deltas.
    pub risk_index_change: f64,
    /// Top 5 non-admin users by unrealized profit, descending.
    pub top_traders: Vec<TraderRank>,
    /// Crisis events of the run, in creation order.
    pub crisis_timeline: Vec<CrisisMilestone>,
}

/// Persisted weekly summary. Multiple summaries may exist for one run
/// when an admin regenerates the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub id: SummaryId,
    pub run_id: RunId,
    pub metrics: WeeklyMetrics,
    pub created_at: Timestamp,
}

//! Market-side records: stocks, simulation runs, crisis events, and
//! generated price points.

use serde::{Deserialize, Serialize};

use crate::ids::{CrisisId, DayIndex, RunId, StockId, Timestamp};
use crate::money::Price;
use crate::sector::Sector;

// =============================================================================
// Stock
// =============================================================================

/// A listed stock. Seeded once; `base_price` is only mutated by the
/// admin price-import action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: StockId,
    pub ticker: String,
    pub name: String,
    pub sector: Sector,
    /// Baseline used to seed day 0 of a new run.
    pub base_price: Price,
}

// =============================================================================
// SimulationRun
// =============================================================================

/// One 5-day simulation week ("snapshot" in the admin UI).
///
/// At most one run is active at any time; `current_day` only moves
/// forward, one day per explicit admin action, capped at
/// [`crate::FINAL_DAY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub id: RunId,
    /// Calendar date of the run's creation (RFC 3339).
    pub date: String,
    pub current_day: DayIndex,
    pub is_active: bool,
    pub created_at: Timestamp,
}

// =============================================================================
// CrisisEvent
// =============================================================================

/// Admin-defined sector shock active over an inclusive day range.
///
/// `impact_strength` is a signed fractional daily drift, e.g. -0.10
/// drags the sector's prices down 10% per day while active. Multiple
/// crises on the same sector/day stack linearly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisEvent {
    pub id: CrisisId,
    pub run_id: RunId,
    pub title: String,
    pub description: String,
    pub sector: Sector,
    pub impact_strength: f64,
    pub start_day: DayIndex,
    pub end_day: DayIndex,
    pub created_at: Timestamp,
}

impl CrisisEvent {
    /// Whether this crisis is active on the given day.
    pub fn is_active_on(&self, day: DayIndex) -> bool {
        self.start_day <= day && day <= self.end_day
    }

    /// Whether this crisis moves the given sector on the given day.
    pub fn applies_to(&self, sector: Sector, day: DayIndex) -> bool {
        self.sector == sector && self.is_active_on(day)
    }
}

// =============================================================================
// PricePoint
// =============================================================================

/// One generated price for (run, stock, day).
///
/// Exactly one point exists per (run, stock, day); the series is
/// immutable once generated and replaced wholesale when the run's
/// crisis set changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub run_id: RunId,
    pub stock_id: StockId,
    pub day: DayIndex,
    pub price: Price,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crisis(sector: Sector, start: DayIndex, end: DayIndex) -> CrisisEvent {
        CrisisEvent {
            id: CrisisId(1),
            run_id: RunId(1),
            title: "Test".to_string(),
            description: String::new(),
            sector,
            impact_strength: -0.1,
            start_day: start,
            end_day: end,
            created_at: 0,
        }
    }

    #[test]
    fn test_crisis_day_range_is_inclusive() {
        let c = crisis(Sector::Banking, 1, 3);
        assert!(!c.is_active_on(0));
        assert!(c.is_active_on(1));
        assert!(c.is_active_on(3));
        assert!(!c.is_active_on(4));
    }

    #[test]
    fn test_crisis_applies_only_to_its_sector() {
        let c = crisis(Sector::Banking, 0, 5);
        assert!(c.applies_to(Sector::Banking, 2));
        assert!(!c.applies_to(Sector::It, 2));
    }
}

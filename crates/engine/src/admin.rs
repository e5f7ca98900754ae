//! Admin actions: price imports and crisis management.
//!
//! Adding or deleting a crisis invalidates the affected run's price
//! series, so both regenerate it wholesale.

use tracing::info;

use types::{CrisisEvent, CrisisId, DayIndex, RunId, Sector, FINAL_DAY};

use crate::error::{EngineError, Result};
use crate::CrisisSim;

/// Parameters for a new crisis event.
#[derive(Debug, Clone)]
pub struct CrisisSpec {
    pub run_id: RunId,
    pub title: String,
    pub description: String,
    pub sector: Sector,
    /// Signed fractional daily drift (-0.10 = -10% per active day).
    pub impact_strength: f64,
    pub start_day: DayIndex,
    pub end_day: DayIndex,
}

impl CrisisSim {
    /// Re-import base prices: jitter every stock's baseline by an
    /// independent uniform ±5% (the "fetch Monday prices" action).
    pub fn import_prices(&mut self) {
        let stocks = self.store.stocks().to_vec();
        for mut stock in stocks {
            stock.base_price = self.paths.jitter_base_price(stock.base_price);
            self.store.update_stock(stock);
        }
        info!("imported fresh base prices for all stocks");
    }

    /// Create a crisis event and regenerate the run's price series.
    pub fn create_crisis(&mut self, spec: CrisisSpec) -> Result<CrisisEvent> {
        if self.store.run(spec.run_id).is_none() {
            return Err(EngineError::UnknownRun(spec.run_id));
        }
        if spec.start_day > spec.end_day || spec.end_day > FINAL_DAY {
            return Err(EngineError::InvalidDayRange(spec.start_day, spec.end_day));
        }

        let crisis = CrisisEvent {
            id: self.store.alloc_crisis_id(),
            run_id: spec.run_id,
            title: spec.title,
            description: spec.description,
            sector: spec.sector,
            impact_strength: spec.impact_strength,
            start_day: spec.start_day,
            end_day: spec.end_day,
            created_at: self.now(),
        };
        self.store.add_crisis(crisis.clone());
        self.regenerate_prices(spec.run_id);

        info!(
            crisis = %crisis.id,
            run = %crisis.run_id,
            sector = %crisis.sector,
            impact = crisis.impact_strength,
            "created crisis event"
        );
        Ok(crisis)
    }

    /// Delete a crisis event and regenerate the run's price series.
    pub fn delete_crisis(&mut self, id: CrisisId) -> Result<CrisisEvent> {
        let crisis = self
            .store
            .remove_crisis(id)
            .ok_or(EngineError::UnknownCrisis(id))?;
        self.regenerate_prices(crisis.run_id);

        info!(crisis = %crisis.id, run = %crisis.run_id, "deleted crisis event");
        Ok(crisis)
    }
}

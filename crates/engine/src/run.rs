//! Run lifecycle: starting weeks and advancing the market clock.

use chrono::{TimeZone, Utc};
use tracing::info;

use types::{DayIndex, RunId, SimulationRun, Timestamp, FINAL_DAY};

use crate::error::{EngineError, Result};
use crate::CrisisSim;

fn date_string(now: Timestamp) -> String {
    Utc.timestamp_millis_opt(now as i64)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

impl CrisisSim {
    /// Start a new simulation week.
    ///
    /// Any previously active run is deactivated, then a fresh run is
    /// created at day 0 and its full price series generated for every
    /// stock.
    pub fn start_new_run(&mut self) -> SimulationRun {
        self.store.deactivate_all_runs();

        let now = self.now();
        let run = SimulationRun {
            id: self.store.alloc_run_id(),
            date: date_string(now),
            current_day: 0,
            is_active: true,
            created_at: now,
        };
        self.store.add_run(run.clone());
        self.regenerate_prices(run.id);

        info!(run = %run.id, date = %run.date, "started new simulation run");
        run
    }

    /// Advance the active run's clock by one day.
    ///
    /// Fails when no run is active or the run is already at the final
    /// day.
    pub fn advance_day(&mut self) -> Result<DayIndex> {
        let mut run = self
            .store
            .active_run()
            .cloned()
            .ok_or(EngineError::NoActiveRun)?;
        if run.current_day >= FINAL_DAY {
            return Err(EngineError::WeekComplete(run.id));
        }

        run.current_day += 1;
        let day = run.current_day;
        self.store.update_run(run.clone());

        info!(run = %run.id, day, "advanced simulation day");
        Ok(day)
    }

    /// Regenerate the run's entire price series from its current
    /// crisis set, replacing any prior points wholesale.
    pub(crate) fn regenerate_prices(&mut self, run_id: RunId) {
        let Some(run) = self.store.run(run_id).cloned() else {
            return;
        };
        let stocks = self.store.stocks().to_vec();
        let crises = self.store.crises_for_run(run_id);

        let points = self.paths.generate_week(&run, &stocks, &crises);
        self.store.replace_run_prices(run_id, points);
    }
}

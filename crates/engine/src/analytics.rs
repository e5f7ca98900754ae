//! Weekly summary generation.

use tracing::info;

use quant::{compute_metrics, RunLedger, TraderSnapshot};
use types::{BehaviorEvent, Cash, RunId, TxId, WeeklySummary, FINAL_DAY};

use crate::error::{EngineError, Result};
use crate::CrisisSim;

impl CrisisSim {
    /// Aggregate a completed week into a persisted summary.
    ///
    /// The run must be at the final day. Calling this again produces
    /// an additional summary record for the same run.
    pub fn generate_weekly_summary(&mut self, run_id: RunId) -> Result<WeeklySummary> {
        let run = self
            .store
            .run(run_id)
            .cloned()
            .ok_or(EngineError::UnknownRun(run_id))?;
        if run.current_day < FINAL_DAY {
            return Err(EngineError::WeekNotComplete(run_id, run.current_day));
        }

        let prices = self.store.prices_for_run(run_id);
        let transactions = self.store.transactions_for_run(run_id);
        let tx_ids: Vec<TxId> = transactions.iter().map(|t| t.id).collect();
        let events: Vec<BehaviorEvent> = self
            .store
            .behavior_events()
            .iter()
            .filter(|e| tx_ids.contains(&e.transaction_id))
            .cloned()
            .collect();
        let crises = self.store.crises_for_run(run_id);
        let traders = self.trader_snapshots()?;

        let metrics = compute_metrics(&RunLedger {
            stocks: self.store.stocks(),
            prices: &prices,
            transactions: &transactions,
            events: &events,
            crises: &crises,
            traders: &traders,
        });

        let summary = WeeklySummary {
            id: self.store.alloc_summary_id(),
            run_id,
            metrics,
            created_at: self.now(),
        };
        self.store.add_summary(summary.clone());

        info!(
            summary = %summary.id,
            run = %run_id,
            trades = summary.metrics.total_trades,
            "generated weekly summary"
        );
        Ok(summary)
    }

    /// Persisted summaries for a run, oldest first.
    pub fn summaries_for(&self, run_id: RunId) -> Result<Vec<WeeklySummary>> {
        if self.store.run(run_id).is_none() {
            return Err(EngineError::UnknownRun(run_id));
        }
        Ok(self.store.summaries_for_run(run_id))
    }

    /// The most recent summary for a run.
    pub fn latest_summary(&self, run_id: RunId) -> Result<WeeklySummary> {
        self.summaries_for(run_id)?
            .into_iter()
            .max_by_key(|s| s.id)
            .ok_or(EngineError::SummaryNotFound(run_id))
    }

    /// Snapshot every account with its unrealized profit at current
    /// prices, for top-trader ranking.
    fn trader_snapshots(&self) -> Result<Vec<TraderSnapshot>> {
        let mut snapshots = Vec::with_capacity(self.store.users().len());
        for user in self.store.users() {
            let mut profit = Cash::ZERO;
            for holding in self.store.portfolio(user.id) {
                let price = self.current_price(holding.stock_id)?;
                profit += (price - holding.avg_buy_price) * holding.quantity;
            }
            snapshots.push(TraderSnapshot {
                user_id: user.id,
                username: user.username.clone(),
                admin: user.is_admin(),
                profit,
            });
        }
        Ok(snapshots)
    }
}

//! Read-only queries: prices, crises, portfolios, behavior stats.

use quant::{behavior_stats, BehaviorStats};
use types::{
    BehaviorEvent, Cash, CrisisEvent, Holding, Price, PricePoint, RunId, StockId, TxId, UserId,
};

use crate::error::{EngineError, Result};
use crate::CrisisSim;

/// Portfolio valuation at current prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioPerformance {
    /// Holdings marked to current prices.
    pub total_value: Cash,
    /// Cost basis of those holdings.
    pub invested: Cash,
    /// `total_value - invested`.
    pub profit_loss: Cash,
    /// Profit as a percent of the invested amount (0 when nothing is
    /// invested).
    pub profit_pct: f64,
}

impl CrisisSim {
    /// The stock's simulated price on the active run's current day;
    /// falls back to the base price when no run or point exists.
    pub fn current_price(&self, stock_id: StockId) -> Result<Price> {
        let stock = self
            .store
            .stock(stock_id)
            .ok_or(EngineError::UnknownStock(stock_id))?;
        let price = self
            .store
            .active_run()
            .and_then(|run| self.store.price_at(run.id, stock_id, run.current_day))
            .unwrap_or(stock.base_price);
        Ok(price)
    }

    /// The stock's full generated series for a run, in day order.
    pub fn price_history(&self, run_id: RunId, stock_id: StockId) -> Result<Vec<PricePoint>> {
        if self.store.run(run_id).is_none() {
            return Err(EngineError::UnknownRun(run_id));
        }
        if self.store.stock(stock_id).is_none() {
            return Err(EngineError::UnknownStock(stock_id));
        }
        Ok(self.store.price_series(run_id, stock_id))
    }

    /// Crises of the active run that are in effect on its current day,
    /// in creation order. Empty when no run is active.
    pub fn active_crises(&self) -> Vec<CrisisEvent> {
        let Some(run) = self.store.active_run() else {
            return Vec::new();
        };
        self.store
            .crises_for_run(run.id)
            .into_iter()
            .filter(|c| c.is_active_on(run.current_day))
            .collect()
    }

    /// The user's current holdings.
    pub fn portfolio(&self, user_id: UserId) -> Result<Vec<Holding>> {
        if self.store.user(user_id).is_none() {
            return Err(EngineError::UnknownUser(user_id));
        }
        Ok(self.store.portfolio(user_id).to_vec())
    }

    /// Holdings marked to current prices.
    pub fn portfolio_value(&self, user_id: UserId) -> Result<Cash> {
        Ok(self.portfolio_performance(user_id)?.total_value)
    }

    /// Full valuation of the user's portfolio at current prices.
    pub fn portfolio_performance(&self, user_id: UserId) -> Result<PortfolioPerformance> {
        let holdings = self.portfolio(user_id)?;

        let mut total_value = Cash::ZERO;
        let mut invested = Cash::ZERO;
        for holding in &holdings {
            let price = self.current_price(holding.stock_id)?;
            total_value += price * holding.quantity;
            invested += holding.avg_buy_price * holding.quantity;
        }

        let profit_loss = total_value - invested;
        let profit_pct = if invested == Cash::ZERO {
            0.0
        } else {
            profit_loss.to_float() / invested.to_float() * 100.0
        };
        Ok(PortfolioPerformance {
            total_value,
            invested,
            profit_loss,
            profit_pct,
        })
    }

    /// The user's behavioral profile, optionally scoped to one run.
    pub fn user_behavior_stats(
        &self,
        user_id: UserId,
        run_id: Option<RunId>,
    ) -> Result<BehaviorStats> {
        if self.store.user(user_id).is_none() {
            return Err(EngineError::UnknownUser(user_id));
        }

        let transactions: Vec<_> = self
            .store
            .transactions_for_user(user_id)
            .into_iter()
            .filter(|t| run_id.is_none_or(|r| t.run_id == r))
            .collect();
        let tx_ids: Vec<TxId> = transactions.iter().map(|t| t.id).collect();
        let events: Vec<BehaviorEvent> = self
            .store
            .behavior_events()
            .iter()
            .filter(|e| e.user_id == user_id && tx_ids.contains(&e.transaction_id))
            .cloned()
            .collect();

        Ok(behavior_stats(transactions.len(), &events))
    }
}

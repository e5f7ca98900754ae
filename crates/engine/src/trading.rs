//! Trade execution.
//!
//! Every precondition is validated before any mutation, so a failed
//! trade leaves no trace. A committed trade appends the transaction,
//! moves cash, upserts the portfolio entry, and classifies the trade
//! in the same call.

use tracing::debug;

use behavior::{classify, TradeContext};
use types::{
    BehaviorEvent, Holding, Price, Quantity, StockId, TradeAction, Transaction, UserId,
};

use crate::error::{EngineError, Result};
use crate::CrisisSim;

/// The two records produced by one executed trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub transaction: Transaction,
    pub event: BehaviorEvent,
}

impl CrisisSim {
    /// Buy shares at the current simulated price.
    pub fn buy(&mut self, user_id: UserId, stock_id: StockId, qty: Quantity) -> Result<TradeReceipt> {
        self.execute(user_id, stock_id, TradeAction::Buy, qty)
    }

    /// Sell shares at the current simulated price.
    pub fn sell(
        &mut self,
        user_id: UserId,
        stock_id: StockId,
        qty: Quantity,
    ) -> Result<TradeReceipt> {
        self.execute(user_id, stock_id, TradeAction::Sell, qty)
    }

    fn execute(
        &mut self,
        user_id: UserId,
        stock_id: StockId,
        action: TradeAction,
        qty: Quantity,
    ) -> Result<TradeReceipt> {
        // Validate everything up front; mutations start only below.
        if qty.is_zero() {
            return Err(EngineError::InvalidQuantity);
        }
        let mut user = self
            .store
            .user(user_id)
            .cloned()
            .ok_or(EngineError::UnknownUser(user_id))?;
        let stock = self
            .store
            .stock(stock_id)
            .cloned()
            .ok_or(EngineError::UnknownStock(stock_id))?;
        let run = self
            .store
            .active_run()
            .cloned()
            .ok_or(EngineError::NoActiveRun)?;

        let price = self
            .store
            .price_at(run.id, stock_id, run.current_day)
            .unwrap_or(stock.base_price);
        let gross = price * qty;

        let held = self.store.holding(user_id, stock_id);
        match action {
            TradeAction::Buy => {
                if user.balance < gross {
                    return Err(EngineError::InsufficientBalance);
                }
            }
            TradeAction::Sell => {
                let held_qty = held.map_or(Quantity::ZERO, |h| h.quantity);
                if held_qty < qty {
                    return Err(EngineError::InsufficientHoldings);
                }
            }
        }

        let now = self.now();
        let tx = Transaction {
            id: self.store.alloc_tx_id(),
            user_id,
            stock_id,
            action,
            quantity: qty,
            price,
            timestamp: now,
            run_id: run.id,
        };
        self.store.add_transaction(tx.clone());

        match action {
            TradeAction::Buy => {
                user.balance -= gross;
                let holding = match held {
                    Some(prior) => Holding {
                        stock_id,
                        quantity: prior.quantity + qty,
                        avg_buy_price: weighted_avg(prior, price, qty),
                    },
                    None => Holding {
                        stock_id,
                        quantity: qty,
                        avg_buy_price: price,
                    },
                };
                self.store.set_holding(user_id, holding);
            }
            TradeAction::Sell => {
                user.balance += gross;
                // Validated above, so a holding must exist.
                if let Some(prior) = held {
                    let remaining = prior.quantity.saturating_sub(qty);
                    if remaining.is_zero() {
                        self.store.remove_holding(user_id, stock_id);
                    } else {
                        self.store.set_holding(
                            user_id,
                            Holding {
                                stock_id,
                                quantity: remaining,
                                avg_buy_price: prior.avg_buy_price,
                            },
                        );
                    }
                }
            }
        }

        // Classify against the first crisis active for the stock's
        // sector on the current day.
        let crises = self.store.crises_for_run(run.id);
        let crisis = crises
            .iter()
            .find(|c| c.applies_to(stock.sector, run.current_day));
        let prices: Vec<f64> = self
            .store
            .price_series(run.id, stock_id)
            .iter()
            .map(|p| p.price.to_float())
            .collect();

        let classification = classify(&TradeContext {
            action,
            now,
            run_created_at: run.created_at,
            crisis,
            prices: &prices,
        });

        let event = BehaviorEvent {
            id: self.store.alloc_event_id(),
            user_id,
            stock_id,
            transaction_id: tx.id,
            reaction_ms: classification.reaction_ms,
            trade_type: classification.trade_type,
            risk_delta: classification.risk_delta,
            timestamp: now,
            crisis_id: classification.crisis_id,
        };
        self.store.add_behavior_event(event.clone());

        user.risk_index += classification.risk_delta;
        self.store.update_user(user);

        debug!(
            tx = %tx.id,
            user = %user_id,
            stock = %stock.ticker,
            %action,
            qty = %qty,
            price = %price,
            trade_type = %event.trade_type,
            "executed trade"
        );
        Ok(TradeReceipt {
            transaction: tx,
            event,
        })
    }
}

/// Quantity-weighted average cost basis after adding a buy fill.
fn weighted_avg(prior: Holding, fill: Price, qty: Quantity) -> Price {
    let total_qty = (prior.quantity + qty).raw() as i64;
    let total_cost = prior.avg_buy_price.raw() * prior.quantity.raw() as i64 + fill.raw() * qty.raw() as i64;
    Price(total_cost / total_qty)
}

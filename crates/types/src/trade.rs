//! Trading-side records: transactions, holdings, and behavior events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{CrisisId, EventId, RunId, StockId, Timestamp, TxId, UserId};
use crate::money::{Price, Quantity};

// =============================================================================
// TradeAction
// =============================================================================

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => f.write_str("buy"),
            TradeAction::Sell => f.write_str("sell"),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Append-only ledger entry for one executed trade.
///
/// `price` is the fill price: the simulated price at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub user_id: UserId,
    pub stock_id: StockId,
    pub action: TradeAction,
    pub quantity: Quantity,
    pub price: Price,
    pub timestamp: Timestamp,
    pub run_id: RunId,
}

// =============================================================================
// Holding
// =============================================================================

/// Portfolio position for one (user, stock) pair.
///
/// `avg_buy_price` is the quantity-weighted mean of all buy fills not
/// yet sold. Sells reduce quantity only; the entry is removed when
/// quantity reaches exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub stock_id: StockId,
    pub quantity: Quantity,
    pub avg_buy_price: Price,
}

// =============================================================================
// TradeType
// =============================================================================

/// Behavioral category assigned to a trade by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// Sell within 2 hours of a crisis start.
    PanicSell,
    /// Buy during a non-negative crisis (chasing the move).
    FomoBuy,
    /// Sell more than 24 hours after a crisis start.
    DelayedReaction,
    /// Contrarian buy during a negative crisis.
    CrisisBuy,
    /// No crisis context, or a sell inside the neutral window.
    Normal,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeType::PanicSell => "panic_sell",
            TradeType::FomoBuy => "fomo_buy",
            TradeType::DelayedReaction => "delayed_reaction",
            TradeType::CrisisBuy => "crisis_buy",
            TradeType::Normal => "normal",
        };
        f.write_str(s)
    }
}

// =============================================================================
// BehaviorEvent
// =============================================================================

/// Behavioral classification of one transaction (1:1).
///
/// `reaction_ms` is the elapsed time between the relevant crisis's
/// nominal start and the trade, in milliseconds. It is `None` when no
/// crisis was active for the stock's sector, and may be negative when
/// the crisis starts later in the week than the trade (not clamped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub id: EventId,
    pub user_id: UserId,
    pub stock_id: StockId,
    pub transaction_id: TxId,
    pub reaction_ms: Option<i64>,
    pub trade_type: TradeType,
    /// Signed volatility contribution applied to the user's risk index.
    pub risk_delta: f64,
    pub timestamp: Timestamp,
    pub crisis_id: Option<CrisisId>,
}

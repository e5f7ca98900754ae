//! Weekly analytics aggregation.
//!
//! [`compute_metrics`] folds a completed run's records into one
//! [`WeeklyMetrics`]; [`narrative`] renders the deterministic report
//! string the UI shows verbatim. The engine collects the run-scoped
//! record slices into a [`RunLedger`] and pre-computes per-trader
//! profit, since profit needs current prices and portfolios.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use types::{
    BehaviorEvent, Cash, CrisisEvent, CrisisMilestone, PricePoint, Sector, Stock, TradeType,
    TraderRank, Transaction, UserId, WeeklyMetrics,
};

/// Leaderboard length for top performers.
pub const TOP_TRADER_COUNT: usize = 5;

const MS_PER_HOUR: f64 = 3_600_000.0;

// =============================================================================
// Inputs
// =============================================================================

/// Per-trader snapshot at summary time.
#[derive(Debug, Clone, PartialEq)]
pub struct TraderSnapshot {
    pub user_id: UserId,
    pub username: String,
    pub admin: bool,
    /// Unrealized profit at current prices.
    pub profit: Cash,
}

/// All records of one run, as borrowed slices.
#[derive(Debug)]
pub struct RunLedger<'a> {
    pub stocks: &'a [Stock],
    /// Every price point of the run.
    pub prices: &'a [PricePoint],
    /// The run's transactions.
    pub transactions: &'a [Transaction],
    /// Behavior events for those transactions.
    pub events: &'a [BehaviorEvent],
    /// The run's crises, in creation order.
    pub crises: &'a [CrisisEvent],
    /// Every registered trader (admins included; filtered here).
    pub traders: &'a [TraderSnapshot],
}

// =============================================================================
// Aggregation
// =============================================================================

/// Fold a run's ledger into weekly metrics.
pub fn compute_metrics(ledger: &RunLedger) -> WeeklyMetrics {
    WeeklyMetrics {
        sector_impact: sector_impact(ledger.stocks, ledger.prices),
        avg_reaction_hours: avg_reaction_hours(ledger.events),
        total_trades: ledger.transactions.len(),
        panic_sells: count_type(ledger.events, TradeType::PanicSell),
        fomo_buys: count_type(ledger.events, TradeType::FomoBuy),
        risk_index_change: risk_index_change(ledger.events, ledger.traders),
        top_traders: top_traders(ledger.traders),
        crisis_timeline: ledger
            .crises
            .iter()
            .map(|c| CrisisMilestone {
                title: c.title.clone(),
                day: c.start_day,
                impact: c.impact_strength,
            })
            .collect(),
    }
}

/// Mean percent change day 0 → final day, averaged over each sector's
/// stocks. Sectors with no priced stock are omitted.
fn sector_impact(stocks: &[Stock], prices: &[PricePoint]) -> BTreeMap<Sector, f64> {
    let mut summed: BTreeMap<Sector, f64> = BTreeMap::new();

    for stock in stocks {
        let mut series: Vec<&PricePoint> =
            prices.iter().filter(|p| p.stock_id == stock.id).collect();
        series.sort_by_key(|p| p.day);

        if series.len() > 1 {
            let start = series[0].price.to_float();
            let end = series[series.len() - 1].price.to_float();
            let change = (end - start) / start * 100.0;
            *summed.entry(stock.sector).or_insert(0.0) += change;
        }
    }

    // Average over every stock in the sector, priced or not.
    summed
        .into_iter()
        .map(|(sector, total)| {
            let count = stocks.iter().filter(|s| s.sector == sector).count();
            (sector, total / count as f64)
        })
        .collect()
}

/// Mean non-null reaction time in hours; zero when no trade had
/// crisis context.
fn avg_reaction_hours(events: &[BehaviorEvent]) -> f64 {
    let reactions: Vec<f64> = events
        .iter()
        .filter_map(|e| e.reaction_ms)
        .map(|ms| ms as f64)
        .collect();
    if reactions.is_empty() {
        return 0.0;
    }
    reactions.iter().sum::<f64>() / reactions.len() as f64 / MS_PER_HOUR
}

fn count_type(events: &[BehaviorEvent], trade_type: TradeType) -> usize {
    events.iter().filter(|e| e.trade_type == trade_type).count()
}

/// Mean over non-admin users of their summed risk deltas within the
/// run. Users who never traded contribute zero to the mean.
fn risk_index_change(events: &[BehaviorEvent], traders: &[TraderSnapshot]) -> f64 {
    let participants: Vec<&TraderSnapshot> = traders.iter().filter(|t| !t.admin).collect();
    if participants.is_empty() {
        return 0.0;
    }

    let total: f64 = participants
        .iter()
        .map(|t| {
            events
                .iter()
                .filter(|e| e.user_id == t.user_id)
                .map(|e| e.risk_delta)
                .sum::<f64>()
        })
        .sum();
    total / participants.len() as f64
}

/// Top non-admin users by profit, descending. The sort is stable, so
/// ties keep registration order.
fn top_traders(traders: &[TraderSnapshot]) -> Vec<TraderRank> {
    let mut ranked: Vec<&TraderSnapshot> = traders.iter().filter(|t| !t.admin).collect();
    ranked.sort_by(|a, b| b.profit.cmp(&a.profit));
    ranked
        .into_iter()
        .take(TOP_TRADER_COUNT)
        .map(|t| TraderRank {
            username: t.username.clone(),
            profit: t.profit,
        })
        .collect()
}

// =============================================================================
// Narrative
// =============================================================================

fn signed(v: f64) -> String {
    if v > 0.0 {
        format!("+{v:.2}")
    } else {
        format!("{v:.2}")
    }
}

fn pct_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Render the deterministic weekly report.
pub fn narrative(metrics: &WeeklyMetrics) -> String {
    let mut text = String::new();

    text.push_str("Weekly Simulation Summary\n\n");

    text.push_str("Market Overview:\n");
    let _ = writeln!(text, "- Total trades executed: {}", metrics.total_trades);
    let _ = writeln!(
        text,
        "- Panic sells: {} ({:.1}%)",
        metrics.panic_sells,
        pct_of(metrics.panic_sells, metrics.total_trades)
    );
    let _ = writeln!(
        text,
        "- FOMO buys: {} ({:.1}%)",
        metrics.fomo_buys,
        pct_of(metrics.fomo_buys, metrics.total_trades)
    );
    let _ = writeln!(
        text,
        "- Average reaction time: {:.2} hours\n",
        metrics.avg_reaction_hours
    );

    text.push_str("Sector Performance:\n");
    for (sector, impact) in &metrics.sector_impact {
        let _ = writeln!(text, "- {}: {}%", sector, signed(*impact));
    }
    text.push('\n');

    if !metrics.crisis_timeline.is_empty() {
        text.push_str("Crisis Events:\n");
        for c in &metrics.crisis_timeline {
            let sign = if c.impact > 0.0 { "+" } else { "" };
            let _ = writeln!(
                text,
                "- Day {}: {} (Impact: {}{:.1}%)",
                c.day,
                c.title,
                sign,
                c.impact * 100.0
            );
        }
        text.push('\n');
    }

    text.push_str("Behavioral Insights:\n");
    let sign = if metrics.risk_index_change > 0.0 { "+" } else { "" };
    let _ = writeln!(
        text,
        "- Average risk index change: {}{:.3}",
        sign, metrics.risk_index_change
    );
    let speed = if metrics.avg_reaction_hours < 2.0 {
        "quick"
    } else if metrics.avg_reaction_hours < 12.0 {
        "moderate"
    } else {
        "slow"
    };
    let _ = writeln!(
        text,
        "- Traders showed {speed} reactions to crisis events."
    );
    let bias = if metrics.panic_sells > metrics.fomo_buys {
        "Risk-averse"
    } else {
        "Risk-seeking"
    };
    let _ = writeln!(text, "- {bias} behavior was dominant this week.\n");

    if !metrics.top_traders.is_empty() {
        text.push_str("Top Performers:\n");
        for (i, t) in metrics.top_traders.iter().enumerate() {
            let _ = writeln!(
                text,
                "{}. {}: ₹{:.2}",
                i + 1,
                t.username,
                t.profit.to_float()
            );
        }
    }

    text
}

// =============================================================================
// Per-user behavior stats
// =============================================================================

/// Behavioral profile of one user, optionally scoped to a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BehaviorStats {
    pub total_trades: usize,
    pub panic_sells: usize,
    pub fomo_buys: usize,
    pub delayed_reactions: usize,
    pub crisis_buys: usize,
    pub normal_trades: usize,
    /// Mean non-null reaction time in hours.
    pub avg_reaction_hours: f64,
    /// Sum of risk deltas over the events.
    pub total_risk_delta: f64,
}

/// Fold a user's behavior events into a stats block.
pub fn behavior_stats(total_trades: usize, events: &[BehaviorEvent]) -> BehaviorStats {
    BehaviorStats {
        total_trades,
        panic_sells: count_type(events, TradeType::PanicSell),
        fomo_buys: count_type(events, TradeType::FomoBuy),
        delayed_reactions: count_type(events, TradeType::DelayedReaction),
        crisis_buys: count_type(events, TradeType::CrisisBuy),
        normal_trades: count_type(events, TradeType::Normal),
        avg_reaction_hours: avg_reaction_hours(events),
        total_risk_delta: events.iter().map(|e| e.risk_delta).sum(),
    }
}

// =============================================================================
// Tests
// =============================================================================

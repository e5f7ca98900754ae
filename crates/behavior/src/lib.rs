//! Behavioral classification of executed trades.
//!
//! Every committed trade is classified immediately against the crisis
//! context at execution time:
//!
//! - sells inside the panic window after a crisis start are
//!   [`TradeType::PanicSell`]; sells after more than a day are
//!   [`TradeType::DelayedReaction`];
//! - buys during a negative crisis are contrarian
//!   [`TradeType::CrisisBuy`]; buys during a non-negative crisis are
//!   [`TradeType::FomoBuy`];
//! - trades without crisis context are [`TradeType::Normal`].
//!
//! The risk delta is the volatility of the stock's price series for
//! the run, signed by trade direction.

use quant::volatility;
use types::{CrisisEvent, CrisisId, Timestamp, TradeAction, TradeType, DAY_MS};

/// A sell within this window of a crisis start is a panic sell.
pub const PANIC_WINDOW_MS: i64 = 2 * 60 * 60 * 1000;

/// A sell after this much time is a delayed reaction.
pub const DELAYED_THRESHOLD_MS: i64 = DAY_MS;

// =============================================================================
// Context & result
// =============================================================================

/// Everything the classifier needs about one committed trade.
#[derive(Debug)]
pub struct TradeContext<'a> {
    pub action: TradeAction,
    /// Execution wall-clock time.
    pub now: Timestamp,
    /// Creation time of the active run (crisis starts are measured
    /// from it in whole simulated days).
    pub run_created_at: Timestamp,
    /// First crisis active for the stock's sector on the current day,
    /// if any.
    pub crisis: Option<&'a CrisisEvent>,
    /// The stock's full price series for the run, in day order.
    pub prices: &'a [f64],
}

/// Classifier output, applied by the engine as a behavior event plus
/// a risk-index mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub trade_type: TradeType,
    /// Milliseconds since the crisis's nominal start; negative when
    /// the crisis starts in the future, `None` without a crisis.
    pub reaction_ms: Option<i64>,
    pub crisis_id: Option<CrisisId>,
    /// Signed volatility: positive for buys, negative for sells.
    pub risk_delta: f64,
}

// =============================================================================
// Classification
// =============================================================================

/// Classify one committed trade.
pub fn classify(ctx: &TradeContext) -> Classification {
    let (trade_type, reaction_ms, crisis_id) = match ctx.crisis {
        None => (TradeType::Normal, None, None),
        Some(crisis) => {
            let crisis_start = ctx.run_created_at as i64 + crisis.start_day as i64 * DAY_MS;
            let reaction = ctx.now as i64 - crisis_start;
            let trade_type = match ctx.action {
                TradeAction::Sell => {
                    if reaction < PANIC_WINDOW_MS {
                        TradeType::PanicSell
                    } else if reaction > DELAYED_THRESHOLD_MS {
                        TradeType::DelayedReaction
                    } else {
                        TradeType::Normal
                    }
                }
                TradeAction::Buy => {
                    if crisis.impact_strength < 0.0 {
                        TradeType::CrisisBuy
                    } else {
                        TradeType::FomoBuy
                    }
                }
            };
            (trade_type, Some(reaction), Some(crisis.id))
        }
    };

    let vol = volatility(ctx.prices);
    let risk_delta = match ctx.action {
        TradeAction::Buy => vol,
        TradeAction::Sell => -vol,
    };

    Classification {
        trade_type,
        reaction_ms,
        crisis_id,
        risk_delta,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use types::{DayIndex, RunId, Sector};

    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn crisis(impact: f64, start_day: DayIndex) -> CrisisEvent {
        CrisisEvent {
            id: CrisisId(7),
            run_id: RunId(1),
            title: "Shock".to_string(),
            description: String::new(),
            sector: Sector::Banking,
            impact_strength: impact,
            start_day,
            end_day: start_day + 2,
            created_at: 0,
        }
    }

    fn ctx<'a>(
        action: TradeAction,
        offset_ms: i64,
        crisis: Option<&'a CrisisEvent>,
        prices: &'a [f64],
    ) -> TradeContext<'a> {
        let created = 1_700_000_000_000u64;
        let start_day = crisis.map_or(0, |c| c.start_day) as i64;
        TradeContext {
            action,
            now: (created as i64 + start_day * DAY_MS + offset_ms) as u64,
            run_created_at: created,
            crisis,
            prices,
        }
    }

    #[test]
    fn test_sell_within_two_hours_is_panic() {
        let c = crisis(-0.10, 1);
        let out = classify(&ctx(TradeAction::Sell, HOUR_MS, Some(&c), &[]));
        assert_eq!(out.trade_type, TradeType::PanicSell);
        assert_eq!(out.reaction_ms, Some(HOUR_MS));
        assert_eq!(out.crisis_id, Some(CrisisId(7)));
    }

    #[test]
    fn test_sell_after_a_day_is_delayed() {
        let c = crisis(-0.10, 0);
        let out = classify(&ctx(TradeAction::Sell, DAY_MS + HOUR_MS, Some(&c), &[]));
        assert_eq!(out.trade_type, TradeType::DelayedReaction);
    }

    #[test]
    fn test_sell_in_neutral_window_is_normal() {
        let c = crisis(-0.10, 0);
        let out = classify(&ctx(TradeAction::Sell, 6 * HOUR_MS, Some(&c), &[]));
        assert_eq!(out.trade_type, TradeType::Normal);
        assert_eq!(out.reaction_ms, Some(6 * HOUR_MS));
    }

    #[test]
    fn test_buy_during_negative_crisis_is_contrarian() {
        let c = crisis(-0.10, 1);
        let out = classify(&ctx(TradeAction::Buy, HOUR_MS, Some(&c), &[]));
        assert_eq!(out.trade_type, TradeType::CrisisBuy);
    }

    #[test]
    fn test_buy_during_positive_crisis_is_fomo() {
        let c = crisis(0.08, 1);
        let out = classify(&ctx(TradeAction::Buy, HOUR_MS, Some(&c), &[]));
        assert_eq!(out.trade_type, TradeType::FomoBuy);
    }

    #[test]
    fn test_no_crisis_is_normal_with_null_reaction() {
        let out = classify(&ctx(TradeAction::Sell, 0, None, &[]));
        assert_eq!(out.trade_type, TradeType::Normal);
        assert_eq!(out.reaction_ms, None);
        assert_eq!(out.crisis_id, None);
    }

    #[test]
    fn test_reaction_may_be_negative_for_future_crisis() {
        // Trade happens at run creation; the crisis starts on day 2.
        let c = crisis(-0.10, 2);
        let created = 1_700_000_000_000u64;
        let out = classify(&TradeContext {
            action: TradeAction::Sell,
            now: created,
            run_created_at: created,
            crisis: Some(&c),
            prices: &[],
        });
        assert_eq!(out.reaction_ms, Some(-2 * DAY_MS));
        // Negative reaction is still inside the panic window.
        assert_eq!(out.trade_type, TradeType::PanicSell);
    }

    #[test]
    fn test_risk_delta_signed_by_direction() {
        let prices = [100.0, 110.0, 99.0];
        let buy = classify(&ctx(TradeAction::Buy, 0, None, &prices));
        let sell = classify(&ctx(TradeAction::Sell, 0, None, &prices));
        assert!(buy.risk_delta > 0.0);
        assert!((buy.risk_delta + sell.risk_delta).abs() < 1e-12);
        assert!((buy.risk_delta - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_risk_delta_zero_with_short_history() {
        let out = classify(&ctx(TradeAction::Buy, 0, None, &[100.0]));
        assert_eq!(out.risk_delta, 0.0);
    }
}

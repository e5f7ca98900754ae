//! A full scripted simulation week: run lifecycle, crisis shocks,
//! behavioral classification, and the weekly summary.

use engine::{CrisisSim, CrisisSpec, EngineConfig, EngineError};
use types::{Quantity, Sector, TradeType, DAY_MS, FINAL_DAY};

const T0: u64 = 1_700_000_000_000;
const HOUR_MS: i64 = 60 * 60 * 1000;

fn engine() -> CrisisSim {
    let mut sim = CrisisSim::new(EngineConfig::default().seed(42));
    sim.set_now(Some(T0));
    sim
}

fn banking_crisis(sim: &CrisisSim) -> CrisisSpec {
    CrisisSpec {
        run_id: sim.store().active_run().unwrap().id,
        title: "Banking Liquidity Crunch".to_string(),
        description: "Overnight funding dries up".to_string(),
        sector: Sector::Banking,
        impact_strength: -0.10,
        start_day: 1,
        end_day: 3,
    }
}

#[test]
fn test_new_run_generates_one_point_per_stock_per_day() {
    let mut sim = engine();
    let run = sim.start_new_run();

    assert!(run.is_active);
    assert_eq!(run.current_day, 0);
    assert_eq!(run.created_at, T0);

    // 12 stocks x 6 days
    assert_eq!(sim.store().prices_for_run(run.id).len(), 72);
    for stock in sim.store().stocks() {
        let series = sim.price_history(run.id, stock.id).unwrap();
        assert_eq!(series.len(), 6);
        for (day, point) in series.iter().enumerate() {
            assert_eq!(point.day, day as u8);
        }
    }
}

#[test]
fn test_starting_a_run_deactivates_the_previous_one() {
    let mut sim = engine();
    let first = sim.start_new_run();
    let second = sim.start_new_run();

    assert_ne!(first.id, second.id);
    assert_eq!(sim.store().active_run().unwrap().id, second.id);
    assert!(!sim.store().run(first.id).unwrap().is_active);
}

#[test]
fn test_advance_day_caps_at_final_day() {
    let mut sim = engine();
    assert_eq!(sim.advance_day(), Err(EngineError::NoActiveRun));

    let run = sim.start_new_run();
    for expected in 1..=FINAL_DAY {
        assert_eq!(sim.advance_day(), Ok(expected));
    }
    assert_eq!(sim.advance_day(), Err(EngineError::WeekComplete(run.id)));
    assert_eq!(sim.store().active_run().unwrap().current_day, FINAL_DAY);
}

#[test]
fn test_crisis_changes_regenerate_the_series() {
    let mut sim = engine();
    let run = sim.start_new_run();
    let hdfc = sim.store().stock_by_ticker("HDFCBANK").unwrap().id;

    let before = sim.price_history(run.id, hdfc).unwrap();
    let crisis = sim.create_crisis(banking_crisis(&sim)).unwrap();
    let during = sim.price_history(run.id, hdfc).unwrap();

    assert_eq!(during.len(), 6);
    assert_ne!(before, during, "crisis creation must regenerate prices");
    // -10% daily drift dominates the ±2% noise on every crisis day.
    for day in 1..=3usize {
        assert!(during[day].price < during[day - 1].price);
    }

    sim.delete_crisis(crisis.id).unwrap();
    let after = sim.price_history(run.id, hdfc).unwrap();
    assert_eq!(after.len(), 6);
    assert_ne!(during, after, "crisis deletion must regenerate prices");

    assert_eq!(
        sim.delete_crisis(crisis.id),
        Err(EngineError::UnknownCrisis(crisis.id))
    );
}

#[test]
fn test_crisis_day_range_validation() {
    let mut sim = engine();
    sim.start_new_run();

    let mut inverted = banking_crisis(&sim);
    inverted.start_day = 3;
    inverted.end_day = 1;
    assert_eq!(
        sim.create_crisis(inverted),
        Err(EngineError::InvalidDayRange(3, 1))
    );

    let mut out_of_week = banking_crisis(&sim);
    out_of_week.end_day = 6;
    assert_eq!(
        sim.create_crisis(out_of_week),
        Err(EngineError::InvalidDayRange(1, 6))
    );
}

#[test]
fn test_active_crises_follow_the_clock() {
    let mut sim = engine();
    sim.start_new_run();
    let crisis = sim.create_crisis(banking_crisis(&sim)).unwrap();

    // Day 0: the crisis has not started.
    assert!(sim.active_crises().is_empty());

    sim.advance_day().unwrap();
    let active = sim.active_crises();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, crisis.id);

    for _ in 2..=4 {
        sim.advance_day().unwrap();
    }
    // Day 4: past the crisis window.
    assert!(sim.active_crises().is_empty());
}

#[test]
fn test_panic_sell_classification() {
    let mut sim = engine();
    let alice = sim.register_user("alice", "alice@test.com", "pw").unwrap().id;
    sim.start_new_run();
    sim.create_crisis(banking_crisis(&sim)).unwrap();

    let hdfc = sim.store().stock_by_ticker("HDFCBANK").unwrap().id;
    let buy = sim.buy(alice, hdfc, Quantity(10)).unwrap();
    // Day 0, crisis not yet active for the sector.
    assert_eq!(buy.event.trade_type, TradeType::Normal);
    assert_eq!(buy.event.reaction_ms, None);

    // Thirty minutes after the crisis opens on day 1.
    sim.advance_day().unwrap();
    sim.set_now(Some((T0 as i64 + DAY_MS + HOUR_MS / 2) as u64));
    let sell = sim.sell(alice, hdfc, Quantity(10)).unwrap();

    assert_eq!(sell.event.trade_type, TradeType::PanicSell);
    assert_eq!(sell.event.reaction_ms, Some(HOUR_MS / 2));
    assert!(sell.event.reaction_ms.unwrap() < 2 * HOUR_MS);
    assert!(sell.event.crisis_id.is_some());

    let stats = sim.user_behavior_stats(alice, None).unwrap();
    assert_eq!(stats.total_trades, 2);
    assert_eq!(stats.panic_sells, 1);
    assert_eq!(stats.normal_trades, 1);
}

#[test]
fn test_contrarian_buy_during_negative_crisis() {
    let mut sim = engine();
    let bob = sim.register_user("bob", "bob@test.com", "pw").unwrap().id;
    sim.start_new_run();
    sim.create_crisis(banking_crisis(&sim)).unwrap();
    sim.advance_day().unwrap();
    sim.advance_day().unwrap();

    let sbin = sim.store().stock_by_ticker("SBIN").unwrap().id;
    let buy = sim.buy(bob, sbin, Quantity(5)).unwrap();
    assert_eq!(buy.event.trade_type, TradeType::CrisisBuy);
    assert!(buy.event.risk_delta > 0.0);
}

#[test]
fn test_weekly_summary_requires_final_day() {
    let mut sim = engine();
    let alice = sim.register_user("alice", "alice@test.com", "pw").unwrap().id;
    let run = sim.start_new_run();
    sim.create_crisis(banking_crisis(&sim)).unwrap();

    let tcs = sim.store().stock_by_ticker("TCS").unwrap().id;
    sim.buy(alice, tcs, Quantity(5)).unwrap();

    for day in 1..=3 {
        sim.advance_day().unwrap();
        assert_eq!(
            sim.generate_weekly_summary(run.id),
            Err(EngineError::WeekNotComplete(run.id, day))
        );
    }
    sim.advance_day().unwrap();
    sim.advance_day().unwrap();

    let summary = sim.generate_weekly_summary(run.id).unwrap();
    assert_eq!(summary.run_id, run.id);
    assert_eq!(summary.metrics.total_trades, 1);
    assert!(summary.metrics.top_traders.len() <= 5);
    assert_eq!(summary.metrics.crisis_timeline.len(), 1);
    assert_eq!(summary.metrics.crisis_timeline[0].day, 1);
    // Every sector of the universe was priced.
    assert_eq!(summary.metrics.sector_impact.len(), 7);

    let text = quant::narrative(&summary.metrics);
    assert!(text.starts_with("Weekly Simulation Summary"));
    assert!(text.contains("Banking Liquidity Crunch"));
}

#[test]
fn test_repeat_summaries_accumulate() {
    let mut sim = engine();
    let run = sim.start_new_run();
    for _ in 0..5 {
        sim.advance_day().unwrap();
    }

    let first = sim.generate_weekly_summary(run.id).unwrap();
    let second = sim.generate_weekly_summary(run.id).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(sim.summaries_for(run.id).unwrap().len(), 2);
    assert_eq!(sim.latest_summary(run.id).unwrap().id, second.id);
}

#[test]
fn test_top_traders_exclude_admin_and_rank_by_profit() {
    let mut sim = engine();
    let alice = sim.register_user("alice", "alice@test.com", "pw").unwrap().id;
    let bob = sim.register_user("bob", "bob@test.com", "pw").unwrap().id;
    let admin = sim.store().user_by_name("admin").unwrap().id;
    let run = sim.start_new_run();

    let itc = sim.store().stock_by_ticker("ITC").unwrap().id;
    sim.buy(alice, itc, Quantity(10)).unwrap();
    sim.buy(bob, itc, Quantity(10)).unwrap();
    sim.buy(admin, itc, Quantity(100)).unwrap();

    for _ in 0..5 {
        sim.advance_day().unwrap();
    }
    let summary = sim.generate_weekly_summary(run.id).unwrap();

    let names: Vec<&str> = summary
        .metrics
        .top_traders
        .iter()
        .map(|t| t.username.as_str())
        .collect();
    assert!(!names.contains(&"admin"));
    assert_eq!(names.len(), 2);
    // Identical positions mean identical profit; registration order
    // breaks the tie.
    assert_eq!(names, vec!["alice", "bob"]);
}

#[test]
fn test_current_price_falls_back_to_base() {
    let sim = engine();
    let reliance = sim.store().stock_by_ticker("RELIANCE").unwrap().clone();
    assert_eq!(sim.current_price(reliance.id).unwrap(), reliance.base_price);
}

#[test]
fn test_import_prices_jitters_within_five_percent() {
    let mut sim = engine();
    let before: Vec<f64> = sim
        .store()
        .stocks()
        .iter()
        .map(|s| s.base_price.to_float())
        .collect();

    sim.import_prices();

    let mut moved = 0;
    for (stock, old) in sim.store().stocks().iter().zip(&before) {
        let deviation = (stock.base_price.to_float() - old).abs() / old;
        assert!(deviation <= 0.0501, "jitter beyond ±5% for {}", stock.ticker);
        if stock.base_price.to_float() != *old {
            moved += 1;
        }
    }
    assert!(moved > 0, "at least one base price should move");
}

//! Crisis-market simulator demo binary.
//!
//! Runs one scripted simulation week headlessly: seeds demo traders,
//! starts a run, injects crisis events, trades through the week, and
//! prints the weekly summary narrative (or the raw summary as JSON
//! with `--json`).

use clap::Parser;
use tracing_subscriber::EnvFilter;

use engine::{CrisisSim, CrisisSpec, EngineConfig};
use types::{Quantity, Sector, UserId, FINAL_DAY};

/// Crisis-market simulator: 5-day price paths, crisis shocks, and
/// behavioral trade classification.
#[derive(Parser, Debug)]
#[command(name = "crisis-sim")]
#[command(about = "A behavioral crisis-market simulation")]
#[command(version)]
struct Args {
    /// Seed for the price path generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Days to advance after day 0 (capped at 5).
    #[arg(long, default_value_t = 5)]
    days: u8,

    /// Print the weekly summary as JSON instead of the narrative.
    #[arg(long)]
    json: bool,

    /// Suppress the banner and progress output.
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut sim = CrisisSim::new(EngineConfig::default().seed(args.seed));

    if !args.quiet {
        eprintln!("╔══════════════════════════════════════════════╗");
        eprintln!("║  Crisis Market Simulator - Headless Week     ║");
        eprintln!("╠══════════════════════════════════════════════╣");
        eprintln!(
            "║  Seed: {:<10}  Stocks: {:<2}  Days: 0..={}     ║",
            args.seed,
            sim.store().stocks().len(),
            args.days.min(FINAL_DAY)
        );
        eprintln!("╚══════════════════════════════════════════════╝");
    }

    // Demo traders.
    let alice = sim.register_user("alice", "alice@market.com", "alice123")?.id;
    let bob = sim.register_user("bob", "bob@market.com", "bob123")?.id;

    let run = sim.start_new_run();
    sim.create_crisis(CrisisSpec {
        run_id: run.id,
        title: "Banking Liquidity Crunch".to_string(),
        description: "Overnight funding dries up across major banks".to_string(),
        sector: Sector::Banking,
        impact_strength: -0.10,
        start_day: 1,
        end_day: 3,
    })?;
    sim.create_crisis(CrisisSpec {
        run_id: run.id,
        title: "Energy Export Windfall".to_string(),
        description: "Refining margins spike on export demand".to_string(),
        sector: Sector::Energy,
        impact_strength: 0.06,
        start_day: 2,
        end_day: 4,
    })?;

    let hdfc = stock_id(&sim, "HDFCBANK");
    let reliance = stock_id(&sim, "RELIANCE");
    let tcs = stock_id(&sim, "TCS");

    // Day 0: both traders take positions before the shocks land.
    sim.buy(alice, hdfc, Quantity(20))?;
    sim.buy(alice, tcs, Quantity(5))?;
    sim.buy(bob, reliance, Quantity(10))?;

    let days = args.days.min(FINAL_DAY);
    for day in 1..=days {
        sim.advance_day()?;
        if !args.quiet {
            eprintln!("── Day {day} ──");
            for &(name, id) in &[("HDFCBANK", hdfc), ("RELIANCE", reliance), ("TCS", tcs)] {
                eprintln!("  {:10} {}", name, sim.current_price(id)?);
            }
        }

        // Scripted reactions: alice dumps her bank position as the
        // crunch opens, bob chases the energy move.
        match day {
            1 => {
                sim.sell(alice, hdfc, Quantity(20))?;
            }
            2 => {
                sim.buy(bob, reliance, Quantity(10))?;
                sim.buy(alice, hdfc, Quantity(10))?;
            }
            4 => {
                sim.sell(bob, reliance, Quantity(15))?;
            }
            _ => {}
        }
    }

    if days < FINAL_DAY {
        report_partial_week(&sim, alice, bob)?;
        return Ok(());
    }

    let summary = sim.generate_weekly_summary(run.id)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", quant::narrative(&summary.metrics));
    }
    Ok(())
}

fn stock_id(sim: &CrisisSim, ticker: &str) -> types::StockId {
    // The seeded universe always contains the demo tickers.
    sim.store()
        .stock_by_ticker(ticker)
        .map(|s| s.id)
        .unwrap_or_default()
}

/// Without a complete week there is no summary; show balances instead.
fn report_partial_week(
    sim: &CrisisSim,
    alice: UserId,
    bob: UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Week incomplete; no summary generated.");
    for id in [alice, bob] {
        if let Some(user) = sim.store().user(id) {
            let perf = sim.portfolio_performance(id)?;
            println!(
                "{}: balance {}, holdings {}, P/L {}",
                user.username, user.balance, perf.total_value, perf.profit_loss
            );
        }
    }
    Ok(())
}

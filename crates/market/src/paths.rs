//! The price path generator.
//!
//! For each stock, day 0 seeds from the stock's base price and every
//! later day seeds from the previous day's generated price, so a run's
//! series forms one continuous path. Per (stock, day) the generator
//! draws one uniform noise term and adds the summed impact of every
//! crisis active for the stock's sector that day:
//!
//! ```text
//! price[d] = price[d-1] * (1 + noise + crisis_factor)
//! ```
//!
//! rounded to currency precision and floored at the minimum tick.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use types::{
    CrisisEvent, DayIndex, Price, PricePoint, Sector, SimulationRun, Stock, StockId, DAY_MS,
    FINAL_DAY,
};

// =============================================================================
// PathConfig
// =============================================================================

/// Tuning knobs for path generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConfig {
    /// Half-width of the uniform daily noise term (0.02 = ±2%).
    pub noise_amplitude: f64,
    /// Generated prices never drop below this tick.
    pub price_floor: Price,
    /// Half-width of the admin price-import jitter (0.05 = ±5%).
    pub base_jitter: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            noise_amplitude: 0.02,
            price_floor: Price::MIN_TICK,
            base_jitter: 0.05,
        }
    }
}

// =============================================================================
// Crisis factor
// =============================================================================

/// Summed impact of every crisis active for (sector, day).
///
/// Overlapping crises on the same sector/day stack linearly.
pub fn crisis_factor(crises: &[CrisisEvent], sector: Sector, day: DayIndex) -> f64 {
    crises
        .iter()
        .filter(|c| c.applies_to(sector, day))
        .map(|c| c.impact_strength)
        .sum()
}

// =============================================================================
// PricePathGenerator
// =============================================================================

/// Generates price series for simulation runs.
///
/// Deterministic given the same seed and call sequence; regenerating a
/// run after its crisis set changed draws fresh noise, so the new
/// series is structurally identical but numerically different.
pub struct PricePathGenerator {
    rng: StdRng,
    config: PathConfig,
}

impl PricePathGenerator {
    /// Create a generator with the default config.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, PathConfig::default())
    }

    pub fn with_config(seed: u64, config: PathConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Generate the full week's series for every stock: exactly one
    /// point per (stock, day) for days 0 through [`FINAL_DAY`].
    ///
    /// Point timestamps are the run's creation time plus one simulated
    /// day per day index.
    pub fn generate_week(
        &mut self,
        run: &SimulationRun,
        stocks: &[Stock],
        crises: &[CrisisEvent],
    ) -> Vec<PricePoint> {
        let mut points = Vec::with_capacity(stocks.len() * (FINAL_DAY as usize + 1));
        let mut previous: HashMap<StockId, Price> = HashMap::with_capacity(stocks.len());

        for day in 0..=FINAL_DAY {
            for stock in stocks {
                let seed_price = previous.get(&stock.id).copied().unwrap_or(stock.base_price);
                let noise = self
                    .rng
                    .random_range(-self.config.noise_amplitude..=self.config.noise_amplitude);
                let factor = crisis_factor(crises, stock.sector, day);

                let raw = seed_price.to_float() * (1.0 + noise + factor);
                let price = Price::from_float(raw)
                    .round_to_paise()
                    .max(self.config.price_floor);

                previous.insert(stock.id, price);
                points.push(PricePoint {
                    run_id: run.id,
                    stock_id: stock.id,
                    day,
                    price,
                    timestamp: run.created_at + (day as i64 * DAY_MS) as u64,
                });
            }
        }

        points
    }

    /// Jitter a base price by an independent uniform ±`base_jitter`,
    /// rounded to currency precision (admin price-import).
    pub fn jitter_base_price(&mut self, price: Price) -> Price {
        let variation = self
            .rng
            .random_range(-self.config.base_jitter..=self.config.base_jitter);
        Price::from_float(price.to_float() * (1.0 + variation))
            .round_to_paise()
            .max(self.config.price_floor)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use types::{CrisisId, RunId};

    fn run() -> SimulationRun {
        SimulationRun {
            id: RunId(1),
            date: "2026-01-05T09:00:00+00:00".to_string(),
            current_day: 0,
            is_active: true,
            created_at: 1_700_000_000_000,
        }
    }

    fn stock(id: u64, sector: Sector, base: f64) -> Stock {
        Stock {
            id: StockId(id),
            ticker: format!("S{id}"),
            name: format!("Stock {id}"),
            sector,
            base_price: Price::from_float(base),
        }
    }

    fn crisis(sector: Sector, impact: f64, start: DayIndex, end: DayIndex) -> CrisisEvent {
        CrisisEvent {
            id: CrisisId(1),
            run_id: RunId(1),
            title: "Shock".to_string(),
            description: String::new(),
            sector,
            impact_strength: impact,
            start_day: start,
            end_day: end,
            created_at: 0,
        }
    }

    #[test]
    fn test_one_point_per_stock_per_day() {
        let stocks = vec![
            stock(1, Sector::Banking, 1580.25),
            stock(2, Sector::It, 3650.75),
        ];
        let mut generator = PricePathGenerator::new(42);
        let points = generator.generate_week(&run(), &stocks, &[]);

        assert_eq!(points.len(), 12);
        for s in &stocks {
            for day in 0..=FINAL_DAY {
                let matching: Vec<_> = points
                    .iter()
                    .filter(|p| p.stock_id == s.id && p.day == day)
                    .collect();
                assert_eq!(matching.len(), 1, "one point per (stock, day)");
            }
        }
    }

    #[test]
    fn test_deterministic_given_seed() {
        let stocks = vec![stock(1, Sector::Energy, 2450.50)];
        let mut a = PricePathGenerator::new(7);
        let mut b = PricePathGenerator::new(7);
        assert_eq!(
            a.generate_week(&run(), &stocks, &[]),
            b.generate_week(&run(), &stocks, &[])
        );
    }

    #[test]
    fn test_noise_bounds_without_crisis() {
        let stocks = vec![stock(1, Sector::Fmcg, 420.35)];
        let mut generator = PricePathGenerator::new(99);
        let points = generator.generate_week(&run(), &stocks, &[]);

        let mut prev = stocks[0].base_price.to_float();
        for p in &points {
            let ret = (p.price.to_float() - prev) / prev;
            // ±2% noise plus up to half a paise of rounding slack.
            assert!(ret.abs() < 0.021, "daily move {ret} outside noise bounds");
            prev = p.price.to_float();
        }
    }

    #[test]
    fn test_negative_crisis_depresses_sector() {
        let stocks = vec![
            stock(1, Sector::Banking, 1580.25),
            stock(2, Sector::It, 3650.75),
        ];
        let crises = vec![crisis(Sector::Banking, -0.5, 1, 3)];
        let mut generator = PricePathGenerator::new(11);
        let points = generator.generate_week(&run(), &stocks, &crises);

        // With a -50% daily drift the banking path must fall every
        // crisis day (noise is at most ±2%).
        let series: Vec<_> = points.iter().filter(|p| p.stock_id == StockId(1)).collect();
        for day in 1..=3usize {
            assert!(series[day].price < series[day - 1].price);
        }

        // The IT path is untouched by the crisis factor.
        let it: Vec<_> = points.iter().filter(|p| p.stock_id == StockId(2)).collect();
        for day in 1..=3usize {
            let ret =
                (it[day].price.to_float() - it[day - 1].price.to_float()) / it[day - 1].price.to_float();
            assert!(ret.abs() < 0.021);
        }
    }

    #[test]
    fn test_price_floored_at_min_tick() {
        let stocks = vec![stock(1, Sector::Telecom, 10.0)];
        let crises = vec![crisis(Sector::Telecom, -5.0, 0, 5)];
        let mut generator = PricePathGenerator::new(3);
        let points = generator.generate_week(&run(), &stocks, &crises);

        for p in &points {
            assert!(p.price >= Price::MIN_TICK, "price {:?} below floor", p.price);
        }
    }

    #[test]
    fn test_overlapping_crises_stack_linearly() {
        assert_eq!(
            crisis_factor(
                &[
                    crisis(Sector::Banking, -0.10, 1, 3),
                    crisis(Sector::Banking, -0.05, 2, 4),
                    crisis(Sector::It, -0.50, 0, 5),
                ],
                Sector::Banking,
                2
            ),
            -0.15
        );
    }

    #[test]
    fn test_jitter_stays_within_five_percent() {
        let mut generator = PricePathGenerator::new(21);
        let base = Price::from_float(1000.0);
        for _ in 0..100 {
            let jittered = generator.jitter_base_price(base);
            let deviation = (jittered.to_float() - 1000.0).abs() / 1000.0;
            assert!(deviation <= 0.0501);
        }
    }

    #[test]
    fn test_timestamps_advance_one_day_per_index() {
        let stocks = vec![stock(1, Sector::Automobile, 10500.25)];
        let mut generator = PricePathGenerator::new(5);
        let points = generator.generate_week(&run(), &stocks, &[]);
        assert_eq!(points[1].timestamp - points[0].timestamp, DAY_MS as u64);
    }
}

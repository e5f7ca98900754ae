//! In-memory flat record store for the simulator.
//!
//! One table per entity, keyed by newtype id. Tables are Vec-backed
//! and preserve insertion order: the weekly summary's crisis timeline
//! and its top-trader tie-break are both defined by that order.
//!
//! Updates are explicit read-modify-write: callers clone a record,
//! mutate the clone, and put it back with `update_*`. Nothing hands
//! out aliasing mutable references to table rows.

mod seed;

use std::collections::HashMap;

use types::{
    BehaviorEvent, Cash, CrisisEvent, CrisisId, DayIndex, EventId, Holding, Price, PricePoint,
    RunId, SimulationRun, Stock, StockId, SummaryId, Transaction, TxId, User, UserId,
    WeeklySummary,
};

pub use seed::default_stocks;

// =============================================================================
// Id allocation
// =============================================================================

/// Monotonic id counters, one per table.
#[derive(Debug, Default)]
struct IdGen {
    user: u64,
    stock: u64,
    run: u64,
    crisis: u64,
    tx: u64,
    event: u64,
    summary: u64,
}

impl IdGen {
    fn next(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }
}

// =============================================================================
// MarketStore
// =============================================================================

/// The flat keyed record store behind the engine.
#[derive(Debug, Default)]
pub struct MarketStore {
    users: Vec<User>,
    stocks: Vec<Stock>,
    runs: Vec<SimulationRun>,
    prices: Vec<PricePoint>,
    crises: Vec<CrisisEvent>,
    transactions: Vec<Transaction>,
    events: Vec<BehaviorEvent>,
    summaries: Vec<WeeklySummary>,
    portfolios: HashMap<UserId, Vec<Holding>>,
    session: Option<UserId>,
    ids: IdGen,
}

impl MarketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the default stock universe
    /// and the seeded admin account.
    pub fn seeded(admin_balance: Cash) -> Self {
        let mut store = Self::new();
        seed::seed(&mut store, admin_balance);
        store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alloc_user_id(&mut self) -> UserId {
        UserId(IdGen::next(&mut self.ids.user))
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_name(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn add_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// Replace the stored record with the same id. Returns false if
    /// the user does not exist.
    pub fn update_user(&mut self, user: User) -> bool {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stocks
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alloc_stock_id(&mut self) -> StockId {
        StockId(IdGen::next(&mut self.ids.stock))
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn stock(&self, id: StockId) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.id == id)
    }

    pub fn stock_by_ticker(&self, ticker: &str) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.ticker == ticker)
    }

    pub fn add_stock(&mut self, stock: Stock) {
        self.stocks.push(stock);
    }

    pub fn update_stock(&mut self, stock: Stock) -> bool {
        match self.stocks.iter_mut().find(|s| s.id == stock.id) {
            Some(slot) => {
                *slot = stock;
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Simulation runs
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alloc_run_id(&mut self) -> RunId {
        RunId(IdGen::next(&mut self.ids.run))
    }

    pub fn runs(&self) -> &[SimulationRun] {
        &self.runs
    }

    pub fn run(&self, id: RunId) -> Option<&SimulationRun> {
        self.runs.iter().find(|r| r.id == id)
    }

    pub fn active_run(&self) -> Option<&SimulationRun> {
        self.runs.iter().find(|r| r.is_active)
    }

    pub fn add_run(&mut self, run: SimulationRun) {
        self.runs.push(run);
    }

    pub fn update_run(&mut self, run: SimulationRun) -> bool {
        match self.runs.iter_mut().find(|r| r.id == run.id) {
            Some(slot) => {
                *slot = run;
                true
            }
            None => false,
        }
    }

    /// Clear the active flag on every run (single-active-run invariant,
    /// enforced before a new run is inserted).
    pub fn deactivate_all_runs(&mut self) {
        for run in &mut self.runs {
            run.is_active = false;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Price series
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the full price series for a run.
    pub fn replace_run_prices(&mut self, run_id: RunId, points: Vec<PricePoint>) {
        self.prices.retain(|p| p.run_id != run_id);
        self.prices.extend(points);
    }

    /// All points for (run, stock), ordered by day.
    pub fn price_series(&self, run_id: RunId, stock_id: StockId) -> Vec<PricePoint> {
        let mut series: Vec<PricePoint> = self
            .prices
            .iter()
            .filter(|p| p.run_id == run_id && p.stock_id == stock_id)
            .copied()
            .collect();
        series.sort_by_key(|p| p.day);
        series
    }

    pub fn price_at(&self, run_id: RunId, stock_id: StockId, day: DayIndex) -> Option<Price> {
        self.prices
            .iter()
            .find(|p| p.run_id == run_id && p.stock_id == stock_id && p.day == day)
            .map(|p| p.price)
    }

    pub fn prices_for_run(&self, run_id: RunId) -> Vec<PricePoint> {
        self.prices
            .iter()
            .filter(|p| p.run_id == run_id)
            .copied()
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Crisis events
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alloc_crisis_id(&mut self) -> CrisisId {
        CrisisId(IdGen::next(&mut self.ids.crisis))
    }

    pub fn crisis(&self, id: CrisisId) -> Option<&CrisisEvent> {
        self.crises.iter().find(|c| c.id == id)
    }

    /// Crises belonging to a run, in creation order.
    pub fn crises_for_run(&self, run_id: RunId) -> Vec<CrisisEvent> {
        self.crises
            .iter()
            .filter(|c| c.run_id == run_id)
            .cloned()
            .collect()
    }

    pub fn add_crisis(&mut self, crisis: CrisisEvent) {
        self.crises.push(crisis);
    }

    pub fn remove_crisis(&mut self, id: CrisisId) -> Option<CrisisEvent> {
        let idx = self.crises.iter().position(|c| c.id == id)?;
        Some(self.crises.remove(idx))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alloc_tx_id(&mut self) -> TxId {
        TxId(IdGen::next(&mut self.ids.tx))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transactions_for_run(&self, run_id: RunId) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.run_id == run_id)
            .cloned()
            .collect()
    }

    pub fn transactions_for_user(&self, user_id: UserId) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Behavior events
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alloc_event_id(&mut self) -> EventId {
        EventId(IdGen::next(&mut self.ids.event))
    }

    pub fn behavior_events(&self) -> &[BehaviorEvent] {
        &self.events
    }

    pub fn add_behavior_event(&mut self, event: BehaviorEvent) {
        self.events.push(event);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Portfolios
    // ─────────────────────────────────────────────────────────────────────────

    pub fn portfolio(&self, user_id: UserId) -> &[Holding] {
        self.portfolios.get(&user_id).map_or(&[], |v| v.as_slice())
    }

    pub fn holding(&self, user_id: UserId, stock_id: StockId) -> Option<Holding> {
        self.portfolios
            .get(&user_id)?
            .iter()
            .find(|h| h.stock_id == stock_id)
            .copied()
    }

    /// Insert or replace the holding for (user, holding.stock_id).
    pub fn set_holding(&mut self, user_id: UserId, holding: Holding) {
        let entries = self.portfolios.entry(user_id).or_default();
        match entries.iter_mut().find(|h| h.stock_id == holding.stock_id) {
            Some(slot) => *slot = holding,
            None => entries.push(holding),
        }
    }

    pub fn remove_holding(&mut self, user_id: UserId, stock_id: StockId) {
        if let Some(entries) = self.portfolios.get_mut(&user_id) {
            entries.retain(|h| h.stock_id != stock_id);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Weekly summaries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alloc_summary_id(&mut self) -> SummaryId {
        SummaryId(IdGen::next(&mut self.ids.summary))
    }

    pub fn summaries_for_run(&self, run_id: RunId) -> Vec<WeeklySummary> {
        self.summaries
            .iter()
            .filter(|s| s.run_id == run_id)
            .cloned()
            .collect()
    }

    pub fn add_summary(&mut self, summary: WeeklySummary) {
        self.summaries.push(summary);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_user(&self) -> Option<UserId> {
        self.session
    }

    pub fn set_session_user(&mut self, user_id: Option<UserId>) {
        self.session = user_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Quantity, Role, Sector};

    #[test]
    fn test_seeded_store_has_admin_and_stocks() {
        let store = MarketStore::seeded(Cash::from_float(1_000_000.0));

        let admin = store.user_by_name("admin").expect("admin seeded");
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.balance, Cash::from_float(1_000_000.0));
        assert_eq!(admin.risk_index, 0.0);

        assert_eq!(store.stocks().len(), 12);
        let hdfc = store.stock_by_ticker("HDFCBANK").expect("HDFCBANK seeded");
        assert_eq!(hdfc.sector, Sector::Banking);
        assert_eq!(hdfc.base_price, Price::from_float(1580.25));
    }

    #[test]
    fn test_update_user_replaces_record() {
        let mut store = MarketStore::seeded(Cash::from_float(1_000_000.0));
        let mut admin = store.user_by_name("admin").unwrap().clone();
        admin.balance = Cash::from_float(5.0);
        assert!(store.update_user(admin.clone()));
        assert_eq!(store.user(admin.id).unwrap().balance, Cash::from_float(5.0));
    }

    #[test]
    fn test_replace_run_prices_is_wholesale() {
        let mut store = MarketStore::new();
        let run = RunId(1);
        let stock = StockId(1);
        let point = |day, raw| PricePoint {
            run_id: run,
            stock_id: stock,
            day,
            price: Price(raw),
            timestamp: 0,
        };

        store.replace_run_prices(run, vec![point(0, 100), point(1, 200)]);
        store.replace_run_prices(run, vec![point(0, 300)]);

        let series = store.price_series(run, stock);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].price, Price(300));
    }

    #[test]
    fn test_holding_upsert_and_remove() {
        let mut store = MarketStore::new();
        let user = UserId(1);
        let stock = StockId(9);
        store.set_holding(
            user,
            Holding {
                stock_id: stock,
                quantity: Quantity(10),
                avg_buy_price: Price::from_float(100.0),
            },
        );
        store.set_holding(
            user,
            Holding {
                stock_id: stock,
                quantity: Quantity(20),
                avg_buy_price: Price::from_float(150.0),
            },
        );
        assert_eq!(store.portfolio(user).len(), 1);
        assert_eq!(store.holding(user, stock).unwrap().quantity, Quantity(20));

        store.remove_holding(user, stock);
        assert!(store.holding(user, stock).is_none());
        assert!(store.portfolio(user).is_empty());
    }

    #[test]
    fn test_id_allocation_is_monotonic() {
        let mut store = MarketStore::new();
        assert_eq!(store.alloc_tx_id(), TxId(1));
        assert_eq!(store.alloc_tx_id(), TxId(2));
        assert_eq!(store.alloc_event_id(), EventId(1));
    }
}

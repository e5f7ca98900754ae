//! Seed data: the default NSE stock universe and the admin account.

use types::{Cash, Price, Role, Sector, Stock, StockId, User};

use crate::MarketStore;

/// The default stock universe, (ticker, name, sector, base price).
const STOCKS: &[(&str, &str, Sector, f64)] = &[
    ("RELIANCE", "Reliance Industries Ltd", Sector::Energy, 2450.50),
    ("TCS", "Tata Consultancy Services", Sector::It, 3650.75),
    ("HDFCBANK", "HDFC Bank Ltd", Sector::Banking, 1580.25),
    ("INFY", "Infosys Ltd", Sector::It, 1450.80),
    ("ICICIBANK", "ICICI Bank Ltd", Sector::Banking, 950.60),
    ("HINDUNILVR", "Hindustan Unilever Ltd", Sector::Fmcg, 2380.90),
    ("BHARTIARTL", "Bharti Airtel Ltd", Sector::Telecom, 880.45),
    ("ITC", "ITC Ltd", Sector::Fmcg, 420.35),
    ("SBIN", "State Bank of India", Sector::Banking, 580.70),
    ("WIPRO", "Wipro Ltd", Sector::It, 425.15),
    ("LT", "Larsen & Toubro Ltd", Sector::Infrastructure, 3250.40),
    ("MARUTI", "Maruti Suzuki India Ltd", Sector::Automobile, 10500.25),
];

/// Build the default stock list with fresh ids starting at 1.
pub fn default_stocks() -> Vec<Stock> {
    STOCKS
        .iter()
        .enumerate()
        .map(|(i, (ticker, name, sector, price))| Stock {
            id: StockId(i as u64 + 1),
            ticker: (*ticker).to_string(),
            name: (*name).to_string(),
            sector: *sector,
            base_price: Price::from_float(*price),
        })
        .collect()
}

/// Populate an empty store with the stock universe and the admin user.
pub(crate) fn seed(store: &mut MarketStore, admin_balance: Cash) {
    for stock in default_stocks() {
        // Keep the id counter in sync with the pre-assigned ids.
        let _ = store.alloc_stock_id();
        store.add_stock(stock);
    }

    let admin_id = store.alloc_user_id();
    store.add_user(User {
        id: admin_id,
        username: "admin".to_string(),
        email: "admin@market.com".to_string(),
        password: "admin123".to_string(),
        role: Role::Admin,
        balance: admin_balance,
        risk_index: 0.0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe_spans_seven_sectors() {
        let stocks = default_stocks();
        assert_eq!(stocks.len(), 12);

        let mut sectors: Vec<Sector> = stocks.iter().map(|s| s.sector).collect();
        sectors.sort();
        sectors.dedup();
        assert_eq!(sectors.len(), 7);
    }

    #[test]
    fn test_stock_ids_start_at_one() {
        let stocks = default_stocks();
        assert_eq!(stocks[0].id, StockId(1));
        assert_eq!(stocks[11].id, StockId(12));
    }
}

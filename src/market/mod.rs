pub mod exchange_rate;
pub mod quotes;
pub mod types;

pub use exchange_rate::{fetch_exchange_rate, FALLBACK_USD_CAD_RATE};
pub use quotes::fetch_stock_details;
pub use types::{Market, MarketError, RateSnapshot, StockDetails};

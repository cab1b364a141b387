use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::trade::Currency;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("please enter a valid stock symbol")]
    EmptySymbol,
    #[error("invalid {market} stock symbol or no data available: {symbol}")]
    SymbolNotFound { symbol: String, market: String },
    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),
    #[error("unexpected response from {provider}: {detail}")]
    InvalidResponse {
        provider: &'static str,
        detail: String,
    },
    #[error("network error while fetching market data")]
    Http(#[from] reqwest::Error),
}

/// Which exchange family a symbol trades on. Canadian listings carry a
/// venue suffix; everything else is treated as US.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Us,
    Canada,
}

impl Market {
    pub fn classify(symbol: &str) -> Market {
        let upper = symbol.to_uppercase();
        let canadian = [".TO", ".TSE", ".V", ".CN"]
            .iter()
            .any(|suffix| upper.ends_with(suffix));
        if canadian {
            Market::Canada
        } else {
            Market::Us
        }
    }

    pub fn currency(self) -> Currency {
        match self {
            Market::Us => Currency::Usd,
            Market::Canada => Currency::Cad,
        }
    }
}

/// USD to CAD rate as resolved for one comparison run. `degraded` marks a
/// fallback value substituted after a fetch failure.
#[derive(Debug, Clone, Serialize)]
pub struct RateSnapshot {
    pub rate: f64,
    pub degraded: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Quote plus descriptive metadata for one listing.
#[derive(Debug, Clone, Serialize)]
pub struct StockDetails {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    /// None when the previous close is zero and the percentage is
    /// undefined.
    pub change_percent: Option<f64>,
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weburl: Option<String>,
    pub high: f64,
    pub low: f64,
    pub open: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_suffixes_classify_as_canadian() {
        assert_eq!(Market::classify("SHOP.TO"), Market::Canada);
        assert_eq!(Market::classify("ry.to"), Market::Canada);
        assert_eq!(Market::classify("WEED.V"), Market::Canada);
        assert_eq!(Market::classify("ACME.CN"), Market::Canada);
    }

    #[test]
    fn plain_symbols_classify_as_us() {
        assert_eq!(Market::classify("AAPL"), Market::Us);
        assert_eq!(Market::classify("BRK.B"), Market::Us);
    }

    #[test]
    fn market_currency_mapping() {
        assert_eq!(Market::Us.currency(), Currency::Usd);
        assert_eq!(Market::Canada.currency(), Currency::Cad);
    }
}

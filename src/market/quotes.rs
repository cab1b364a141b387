use serde::Deserialize;

use crate::market::types::{Market, MarketError, StockDetails};

const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
const FMP_BASE_URL: &str = "https://financialmodelingprep.com";

/// Look up price and profile for a symbol. US listings go through Finnhub,
/// Canadian listings through Financial Modeling Prep; both upstreams need
/// an API key from the environment (`FINNHUB_API_KEY` / `FMP_API_KEY`).
///
/// A not-found symbol is a typed error, never a zero price.
pub async fn fetch_stock_details(
    client: &reqwest::Client,
    symbol: &str,
    market: Market,
) -> Result<StockDetails, MarketError> {
    let clean = symbol.trim().to_uppercase();
    if clean.is_empty() {
        return Err(MarketError::EmptySymbol);
    }

    match market {
        Market::Us => fetch_us(client, &clean).await,
        Market::Canada => fetch_canadian(client, &clean).await,
    }
}

#[derive(Deserialize)]
struct FinnhubQuote {
    #[serde(rename = "c", default)]
    current: f64,
    #[serde(rename = "pc", default)]
    previous_close: f64,
    #[serde(rename = "h", default)]
    high: f64,
    #[serde(rename = "l", default)]
    low: f64,
    #[serde(rename = "o", default)]
    open: f64,
}

#[derive(Deserialize)]
struct FinnhubProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "marketCapitalization", default)]
    market_cap: Option<f64>,
    #[serde(rename = "finnhubIndustry", default)]
    industry: Option<String>,
    #[serde(default)]
    weburl: Option<String>,
}

async fn fetch_us(client: &reqwest::Client, symbol: &str) -> Result<StockDetails, MarketError> {
    let api_key =
        std::env::var("FINNHUB_API_KEY").map_err(|_| MarketError::MissingApiKey("Finnhub"))?;

    let quote_url = format!("{FINNHUB_BASE_URL}/quote?symbol={symbol}&token={api_key}");
    let profile_url = format!("{FINNHUB_BASE_URL}/stock/profile2?symbol={symbol}&token={api_key}");

    let (quote_resp, profile_resp) =
        tokio::try_join!(client.get(&quote_url).send(), client.get(&profile_url).send())?;

    let quote: FinnhubQuote = quote_resp.error_for_status()?.json().await?;
    let profile: FinnhubProfile = profile_resp.error_for_status()?.json().await?;

    // Finnhub reports unknown symbols as an all-zero quote.
    if quote.current <= 0.0 {
        return Err(MarketError::SymbolNotFound {
            symbol: symbol.to_string(),
            market: "US".to_string(),
        });
    }

    let change = quote.current - quote.previous_close;
    Ok(StockDetails {
        symbol: symbol.to_string(),
        name: profile.name.unwrap_or_else(|| symbol.to_string()),
        price: quote.current,
        previous_close: quote.previous_close,
        change,
        change_percent: percent_change(change, quote.previous_close),
        currency: Market::Us.currency(),
        market_cap: profile.market_cap,
        industry: profile.industry,
        weburl: profile.weburl,
        high: quote.high,
        low: quote.low,
        open: quote.open,
    })
}

#[derive(Deserialize)]
struct FmpQuote {
    #[serde(default)]
    price: f64,
    #[serde(rename = "previousClose", default)]
    previous_close: f64,
    #[serde(default)]
    change: f64,
    #[serde(rename = "changesPercentage", default)]
    changes_percentage: Option<f64>,
    #[serde(rename = "dayHigh", default)]
    day_high: f64,
    #[serde(rename = "dayLow", default)]
    day_low: f64,
    #[serde(default)]
    open: f64,
}

#[derive(Deserialize)]
struct FmpProfile {
    #[serde(rename = "companyName", default)]
    company_name: Option<String>,
    #[serde(rename = "mktCap", default)]
    market_cap: Option<f64>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

async fn fetch_canadian(
    client: &reqwest::Client,
    symbol: &str,
) -> Result<StockDetails, MarketError> {
    let api_key = std::env::var("FMP_API_KEY")
        .map_err(|_| MarketError::MissingApiKey("Financial Modeling Prep"))?;

    let quote_url = format!("{FMP_BASE_URL}/api/v3/quote/{symbol}?apikey={api_key}");
    let profile_url = format!("{FMP_BASE_URL}/api/v3/profile/{symbol}?apikey={api_key}");

    let (quote_resp, profile_resp) =
        tokio::try_join!(client.get(&quote_url).send(), client.get(&profile_url).send())?;

    // FMP wraps both payloads in single-element arrays; an empty array
    // means the symbol is unknown.
    let quotes: Vec<FmpQuote> = quote_resp.error_for_status()?.json().await?;
    let profiles: Vec<FmpProfile> = profile_resp.error_for_status()?.json().await?;

    let quote = quotes.into_iter().next().filter(|q| q.price > 0.0).ok_or_else(|| {
        MarketError::SymbolNotFound {
            symbol: symbol.to_string(),
            market: "Canadian".to_string(),
        }
    })?;
    let profile = profiles
        .into_iter()
        .next()
        .ok_or_else(|| MarketError::InvalidResponse {
            provider: "Financial Modeling Prep",
            detail: format!("no profile data for {symbol}"),
        })?;

    Ok(StockDetails {
        symbol: symbol.to_string(),
        name: profile.company_name.unwrap_or_else(|| symbol.to_string()),
        price: quote.price,
        previous_close: quote.previous_close,
        change: quote.change,
        change_percent: quote
            .changes_percentage
            .or_else(|| percent_change(quote.change, quote.previous_close)),
        currency: Market::Canada.currency(),
        market_cap: profile.market_cap,
        industry: profile.industry,
        weburl: profile.website,
        high: quote.day_high,
        low: quote.day_low,
        open: quote.open,
    })
}

/// Percent change is undefined when the previous close is zero.
fn percent_change(change: f64, previous_close: f64) -> Option<f64> {
    if previous_close == 0.0 {
        None
    } else {
        Some(change / previous_close * 100.0)
    }
}

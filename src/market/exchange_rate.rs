use chrono::Utc;
use serde::Deserialize;

use crate::market::types::{MarketError, RateSnapshot};

/// Approximate USD to CAD rate substituted when the rate service is
/// unreachable. Results computed with it are marked degraded.
pub const FALLBACK_USD_CAD_RATE: f64 = 1.35;

const EXCHANGE_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

#[derive(Deserialize)]
struct ExchangeRateResponse {
    rates: Rates,
}

#[derive(Deserialize)]
struct Rates {
    #[serde(rename = "CAD")]
    cad: f64,
}

/// Resolve the USD to CAD rate, falling back to [`FALLBACK_USD_CAD_RATE`]
/// on any failure instead of aborting the comparison.
pub async fn fetch_exchange_rate(client: &reqwest::Client) -> RateSnapshot {
    match try_fetch(client).await {
        Ok(rate) => RateSnapshot {
            rate,
            degraded: false,
            fetched_at: Utc::now(),
        },
        Err(_) => RateSnapshot {
            rate: FALLBACK_USD_CAD_RATE,
            degraded: true,
            fetched_at: Utc::now(),
        },
    }
}

async fn try_fetch(client: &reqwest::Client) -> Result<f64, MarketError> {
    let response = client
        .get(EXCHANGE_RATE_API_URL)
        .send()
        .await?
        .error_for_status()?;

    let body: ExchangeRateResponse = response.json().await?;

    if !body.rates.cad.is_finite() || body.rates.cad <= 0.0 {
        return Err(MarketError::InvalidResponse {
            provider: "exchange-rate",
            detail: format!("non-positive CAD rate: {}", body.rates.cad),
        });
    }

    Ok(body.rates.cad)
}

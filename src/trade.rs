use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fees::calculator::FeeError;

/// Currency a trade settles in. The account's base currency is CAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cad,
    Usd,
}

impl Currency {
    pub const HOME: Currency = Currency::Cad;

    pub fn is_home(self) -> bool {
        self == Self::HOME
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Cad => write!(f, "CAD"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CAD" => Ok(Currency::Cad),
            "USD" => Ok(Currency::Usd),
            other => Err(format!("Unsupported currency: {other} (use CAD or USD)")),
        }
    }
}

/// One user-submitted trade. Built once per comparison request and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInput {
    pub shares: u32,
    pub price_per_share: f64,
    pub currency: Currency,
    /// Broker ids to evaluate. Empty means every configured broker.
    #[serde(default)]
    pub selected_broker_ids: Vec<String>,
}

impl TradeInput {
    pub fn new(shares: u32, price_per_share: f64, currency: Currency) -> Self {
        Self {
            shares,
            price_per_share,
            currency,
            selected_broker_ids: Vec::new(),
        }
    }

    /// Notional value of the trade in its own currency. Every
    /// percentage-based clamp in the fee engine works off this number.
    pub fn trade_value(&self) -> f64 {
        self.shares as f64 * self.price_per_share
    }

    pub fn validate(&self) -> Result<(), FeeError> {
        if self.shares < 1 {
            return Err(FeeError::InvalidShares(self.shares));
        }
        if !self.price_per_share.is_finite() || self.price_per_share < 0.01 {
            return Err(FeeError::InvalidPrice(self.price_per_share));
        }
        Ok(())
    }
}

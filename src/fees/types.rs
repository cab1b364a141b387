use serde::{Deserialize, Serialize};

use crate::trade::Currency;

/// How a broker charges commission for one currency of trade.
///
/// Unknown `type` tags are rejected at deserialization, so a schedule that
/// reaches the calculator is always one of these shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommissionSchedule {
    /// No commission at all.
    #[serde(rename = "free")]
    Free,
    /// Fixed fee per trade regardless of share count.
    #[serde(rename = "flat")]
    Flat { base_fee: f64 },
    /// Per-share rate clamped between a minimum fee and a cap expressed as
    /// a fraction of trade value. Some brokers layer a second platform fee
    /// on top, computed with the same clamp procedure.
    #[serde(rename = "per_share")]
    PerShare {
        per_share_fee: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum_fee: Option<f64>,
        /// Fraction of trade value, never an absolute amount.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum_fee_pct: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        platform_fee: Option<PlatformFee>,
    },
    /// Legacy per-share shape with only a rate and minimum, no value cap.
    /// Kept so historical broker configs still load.
    #[serde(rename = "tiered")]
    Tiered {
        per_share_fee: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum_fee: Option<f64>,
    },
}

impl CommissionSchedule {
    pub fn base_fee(&self) -> f64 {
        match self {
            CommissionSchedule::Flat { base_fee } => *base_fee,
            _ => 0.0,
        }
    }

    pub fn per_share_fee(&self) -> f64 {
        match self {
            CommissionSchedule::PerShare { per_share_fee, .. }
            | CommissionSchedule::Tiered { per_share_fee, .. } => *per_share_fee,
            _ => 0.0,
        }
    }

    pub fn minimum_fee(&self) -> f64 {
        match self {
            CommissionSchedule::PerShare { minimum_fee, .. }
            | CommissionSchedule::Tiered { minimum_fee, .. } => minimum_fee.unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn maximum_fee_pct(&self) -> f64 {
        match self {
            CommissionSchedule::PerShare {
                maximum_fee_pct, ..
            } => maximum_fee_pct.unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Secondary per-share fee some brokers add on top of the base commission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformFee {
    pub per_share_fee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fee_pct: Option<f64>,
}

/// How the currency-conversion minimum interacts with the percentage fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FxPolicy {
    /// The minimum is a floor: charge `max(value * rate, minimum)`.
    Floor,
    /// The fixed amount is added on top: charge `value * rate + minimum`.
    AdditivePlusFixed,
}

/// Currency-conversion charge, applied only when the trade currency differs
/// from the account's home currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxFee {
    /// Fraction of trade value.
    pub rate: f64,
    /// Currency-absolute amount; floor or addend depending on `policy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    pub policy: FxPolicy,
}

/// Everything a broker charges for trades in one currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub commission: CommissionSchedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<FxFee>,
}

/// Static schedule fields echoed back for display, plus the computed
/// home-currency FX amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base_fee: f64,
    pub per_share_fee: f64,
    pub minimum_fee: f64,
    pub maximum_fee_pct: f64,
    pub fx_fee_amount: f64,
}

/// Outcome of running one broker's schedule against one trade. Amounts are
/// reported twice: converted to the home currency (CAD) and in the trade's
/// native currency. Created fresh per calculation, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerFeeResult {
    pub broker_id: String,
    pub broker_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub has_free_usd_account: bool,
    pub trade_currency: Currency,
    pub commission: f64,
    pub fx_fee: f64,
    pub total_fee: f64,
    pub original_commission: f64,
    pub original_fx_fee: f64,
    pub original_total_fee: f64,
    pub breakdown: FeeBreakdown,
}

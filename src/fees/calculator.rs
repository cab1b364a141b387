use thiserror::Error;

use crate::brokers::Broker;
use crate::fees::types::{BrokerFeeResult, CommissionSchedule, FeeBreakdown, FxFee, FxPolicy};
use crate::trade::{Currency, TradeInput};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeeError {
    #[error("shares must be at least 1, got {0}")]
    InvalidShares(u32),
    #[error("price per share must be at least 0.01, got {0}")]
    InvalidPrice(f64),
    #[error("exchange rate must be a positive number, got {0}")]
    InvalidExchangeRate(f64),
    #[error("unknown broker id: {0}")]
    UnknownBroker(String),
}

/// Compute one broker's full fee bill for one trade.
///
/// Pure and synchronous: no I/O, no shared state, no division. The only
/// failure modes are invalid inputs, which are rejected up front rather
/// than allowed to produce negative or NaN fees.
///
/// `exchange_rate` is the home-currency amount per 1 USD.
pub fn compute_fee(
    broker: &Broker,
    trade: &TradeInput,
    exchange_rate: f64,
) -> Result<BrokerFeeResult, FeeError> {
    trade.validate()?;
    if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
        return Err(FeeError::InvalidExchangeRate(exchange_rate));
    }

    // CAD trades price against the CAD schedule, USD trades against the
    // USD schedule. The two are independent and never cross-applied.
    let schedule = broker.fee_schedule(trade.currency);
    let trade_value = trade.trade_value();

    let original_commission = commission_for(&schedule.commission, trade.shares, trade_value);
    let original_fx_fee = fx_fee_for(schedule.fx.as_ref(), trade.currency, trade_value);

    let (commission, fx_fee) = if trade.currency.is_home() {
        (original_commission, original_fx_fee)
    } else {
        (
            original_commission * exchange_rate,
            original_fx_fee * exchange_rate,
        )
    };

    Ok(BrokerFeeResult {
        broker_id: broker.id.clone(),
        broker_name: broker.name.clone(),
        website: broker.website.clone(),
        has_free_usd_account: broker.has_free_usd_account,
        trade_currency: trade.currency,
        commission,
        fx_fee,
        total_fee: commission + fx_fee,
        original_commission,
        original_fx_fee,
        original_total_fee: original_commission + original_fx_fee,
        breakdown: FeeBreakdown {
            base_fee: schedule.commission.base_fee(),
            per_share_fee: schedule.commission.per_share_fee(),
            minimum_fee: schedule.commission.minimum_fee(),
            maximum_fee_pct: schedule.commission.maximum_fee_pct(),
            fx_fee_amount: fx_fee,
        },
    })
}

/// Commission in the trade's own currency.
fn commission_for(schedule: &CommissionSchedule, shares: u32, trade_value: f64) -> f64 {
    match schedule {
        CommissionSchedule::Free => 0.0,
        CommissionSchedule::Flat { base_fee } => *base_fee,
        CommissionSchedule::PerShare {
            per_share_fee,
            minimum_fee,
            maximum_fee_pct,
            platform_fee,
        } => {
            let mut commission = clamp_fee(
                shares as f64 * per_share_fee,
                *minimum_fee,
                *maximum_fee_pct,
                trade_value,
            );
            // The platform fee runs through the identical clamp with its
            // own parameters and is added on top, never substituted.
            if let Some(platform) = platform_fee {
                commission += clamp_fee(
                    shares as f64 * platform.per_share_fee,
                    platform.minimum_fee,
                    platform.maximum_fee_pct,
                    trade_value,
                );
            }
            commission
        }
        CommissionSchedule::Tiered {
            per_share_fee,
            minimum_fee,
        } => clamp_fee(shares as f64 * per_share_fee, *minimum_fee, None, trade_value),
    }
}

/// Minimum floor first, value cap second. A cap below the minimum pulls
/// the fee back down after the minimum bump; low-value trades rely on it.
fn clamp_fee(
    raw: f64,
    minimum: Option<f64>,
    maximum_pct: Option<f64>,
    trade_value: f64,
) -> f64 {
    let mut fee = raw;
    if let Some(min) = minimum {
        if fee < min {
            fee = min;
        }
    }
    if let Some(pct) = maximum_pct {
        let cap = trade_value * pct;
        if fee > cap {
            fee = cap;
        }
    }
    fee
}

/// Currency-conversion fee in the trade's own currency. Zero for trades
/// already in the home currency or for schedules without an FX charge.
fn fx_fee_for(fx: Option<&FxFee>, currency: Currency, trade_value: f64) -> f64 {
    let Some(fx) = fx else {
        return 0.0;
    };
    if currency.is_home() {
        return 0.0;
    }

    let percentage_fee = trade_value * fx.rate;
    let minimum = fx.minimum.unwrap_or(0.0);

    match fx.policy {
        // The fixed amount is charged per conversion on top of the
        // percentage, not used as a floor. USD only; any future non-home
        // currency falls back to the floor rule.
        FxPolicy::AdditivePlusFixed if currency == Currency::Usd => percentage_fee + minimum,
        _ => percentage_fee.max(minimum),
    }
}

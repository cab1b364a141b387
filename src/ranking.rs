use std::cmp::Ordering;

use serde::Serialize;

use crate::fees::types::BrokerFeeResult;

/// Which total the comparison sorts and ranks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBasis {
    /// Home-currency (CAD) totals, the default display.
    HomeCurrency,
    /// Native-currency totals, for USD trades shown in USD.
    NativeCurrency,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedFee {
    pub rank: u32,
    #[serde(flatten)]
    pub result: BrokerFeeResult,
}

/// Sort ascending by total fee and assign competition ranks over unique
/// fee values: brokers with identical totals share a rank, and the next
/// distinct total takes the immediately following rank number. The sort is
/// stable, so tied brokers keep their input order.
pub fn rank_results(results: Vec<BrokerFeeResult>, basis: RankBasis) -> Vec<RankedFee> {
    let total = |r: &BrokerFeeResult| match basis {
        RankBasis::HomeCurrency => r.total_fee,
        RankBasis::NativeCurrency => r.original_total_fee,
    };

    let mut sorted = results;
    sorted.sort_by(|a, b| total(a).partial_cmp(&total(b)).unwrap_or(Ordering::Equal));

    let mut ranked = Vec::with_capacity(sorted.len());
    let mut rank = 0u32;
    let mut last_total = None;
    for result in sorted {
        let fee = total(&result);
        if last_total != Some(fee) {
            rank += 1;
            last_total = Some(fee);
        }
        ranked.push(RankedFee { rank, result });
    }
    ranked
}

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::market::types::RateSnapshot;
use crate::ranking::RankedFee;
use crate::trade::TradeInput;

/// Full output of one comparison run, as written to disk.
#[derive(Serialize)]
pub struct ComparisonReport<'a> {
    pub trade: &'a TradeInput,
    pub exchange_rate: &'a RateSnapshot,
    pub results: &'a [RankedFee],
}

pub fn write_comparison(report: &ComparisonReport, out_path: &Path) -> Result<()> {
    // Write JSON
    let json_str = serde_json::to_string_pretty(report)?;
    std::fs::write(out_path, json_str)?;

    // Also write a CSV sibling
    let base_path = out_path.parent().unwrap_or(Path::new("."));
    let base_name = out_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("comparison");

    let csv_path = base_path.join(format!("{}_fees.csv", base_name));
    let mut wtr = csv::Writer::from_path(&csv_path)?;
    wtr.write_record([
        "rank",
        "broker_id",
        "broker_name",
        "trade_currency",
        "commission_cad",
        "fx_fee_cad",
        "total_fee_cad",
        "commission_native",
        "fx_fee_native",
        "total_fee_native",
    ])?;
    for ranked in report.results {
        let r = &ranked.result;
        wtr.write_record([
            ranked.rank.to_string(),
            r.broker_id.clone(),
            r.broker_name.clone(),
            r.trade_currency.to_string(),
            r.commission.to_string(),
            r.fx_fee.to_string(),
            r.total_fee.to_string(),
            r.original_commission.to_string(),
            r.original_fx_fee.to_string(),
            r.original_total_fee.to_string(),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}

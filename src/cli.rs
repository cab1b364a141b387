use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::brokers::{default_brokers, load_brokers, Broker};
use crate::compare::compare_brokers;
use crate::market::exchange_rate::fetch_exchange_rate;
use crate::market::quotes::fetch_stock_details;
use crate::market::types::{Market, RateSnapshot};
use crate::ranking::{rank_results, RankBasis};
use crate::report::{write_comparison, ComparisonReport};
use crate::trade::{Currency, TradeInput};

#[derive(Parser)]
#[command(name = "fee-compare")]
#[command(about = "Compare Canadian broker fees for a stock trade")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank brokers by total cost for one trade
    Compare {
        /// Number of shares
        #[arg(long)]
        shares: u32,
        /// Price per share, in the trade currency
        #[arg(long)]
        price: f64,
        /// Trade currency (CAD or USD)
        #[arg(long, default_value = "CAD")]
        currency: String,
        /// Comma-separated broker ids to evaluate (default: all)
        #[arg(long)]
        brokers: Option<String>,
        /// USD to CAD rate override; fetched live when omitted
        #[arg(long)]
        exchange_rate: Option<f64>,
        /// Rank and display native-currency amounts instead of CAD
        #[arg(long)]
        native: bool,
        /// Broker registry JSON file (default: built-in registry)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file path (JSON, with a CSV sibling)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Look up a stock quote by symbol
    Quote {
        /// Symbol (e.g., AAPL, SHOP.TO)
        #[arg(long)]
        symbol: String,
    },
    /// Show the current USD to CAD exchange rate
    Rate,
    /// List the configured brokers
    Brokers {
        /// Broker registry JSON file (default: built-in registry)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn registry(config: Option<&PathBuf>) -> Result<Vec<Broker>> {
    match config {
        Some(path) => load_brokers(path),
        None => Ok(default_brokers()),
    }
}

async fn resolve_rate(
    client: &reqwest::Client,
    override_rate: Option<f64>,
) -> Result<RateSnapshot> {
    if let Some(rate) = override_rate {
        if !rate.is_finite() || rate <= 0.0 {
            anyhow::bail!("Exchange rate must be a positive number, got {rate}");
        }
        return Ok(RateSnapshot {
            rate,
            degraded: false,
            fetched_at: chrono::Utc::now(),
        });
    }
    Ok(fetch_exchange_rate(client).await)
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Compare {
                shares,
                price,
                currency,
                brokers,
                exchange_rate,
                native,
                config,
                out,
            } => {
                let currency = Currency::from_str(&currency)
                    .map_err(|e| anyhow::anyhow!(e))
                    .context("Invalid --currency")?;

                let mut trade = TradeInput::new(shares, price, currency);
                if let Some(list) = brokers {
                    trade.selected_broker_ids = list
                        .split(',')
                        .map(|id| id.trim().to_string())
                        .filter(|id| !id.is_empty())
                        .collect();
                }
                trade.validate()?;

                let registry = registry(config.as_ref())?;

                let client = reqwest::Client::new();
                let snapshot = resolve_rate(&client, exchange_rate).await?;
                if snapshot.degraded {
                    println!(
                        "Rate service unavailable; using fallback rate {} (degraded)",
                        snapshot.rate
                    );
                }

                let results = compare_brokers(&registry, &trade, snapshot.rate)?;

                let basis = if native && currency == Currency::Usd {
                    RankBasis::NativeCurrency
                } else {
                    RankBasis::HomeCurrency
                };
                let ranked = rank_results(results, basis);

                let display_currency = match basis {
                    RankBasis::HomeCurrency => Currency::Cad,
                    RankBasis::NativeCurrency => currency,
                };
                println!(
                    "Trade: {} shares @ {:.2} {} (value {:.2} {}), rate {:.4}",
                    trade.shares,
                    trade.price_per_share,
                    trade.currency,
                    trade.trade_value(),
                    trade.currency,
                    snapshot.rate
                );
                println!(
                    "{:<4} {:<24} {:>12} {:>12} {:>12}",
                    "Rank", "Broker", "Commission", "FX fee", "Total"
                );
                for entry in &ranked {
                    let r = &entry.result;
                    let (commission, fx, total) = match basis {
                        RankBasis::HomeCurrency => (r.commission, r.fx_fee, r.total_fee),
                        RankBasis::NativeCurrency => {
                            (r.original_commission, r.original_fx_fee, r.original_total_fee)
                        }
                    };
                    println!(
                        "{:<4} {:<24} {:>12} {:>12} {:>12}",
                        entry.rank,
                        r.broker_name,
                        format!("{commission:.2} {display_currency}"),
                        format!("{fx:.2} {display_currency}"),
                        format!("{total:.2} {display_currency}"),
                    );
                }

                if let Some(out_path) = out {
                    let report = ComparisonReport {
                        trade: &trade,
                        exchange_rate: &snapshot,
                        results: &ranked,
                    };
                    write_comparison(&report, &out_path)?;
                    println!("Results written to {}", out_path.display());
                }

                Ok(())
            }
            Commands::Quote { symbol } => {
                let market = Market::classify(&symbol);
                let client = reqwest::Client::new();
                let details = fetch_stock_details(&client, &symbol, market)
                    .await
                    .with_context(|| format!("Failed to fetch quote for {symbol}"))?;

                println!("{} ({})", details.name, details.symbol);
                println!("Price:          {:.2} {}", details.price, details.currency);
                println!("Previous close: {:.2}", details.previous_close);
                match details.change_percent {
                    Some(pct) => println!("Change:         {:+.2} ({pct:+.2}%)", details.change),
                    None => println!("Change:         {:+.2}", details.change),
                }
                println!(
                    "Day range:      {:.2} - {:.2} (open {:.2})",
                    details.low, details.high, details.open
                );
                if let Some(industry) = &details.industry {
                    println!("Industry:       {industry}");
                }
                Ok(())
            }
            Commands::Rate => {
                let client = reqwest::Client::new();
                let snapshot = fetch_exchange_rate(&client).await;
                if snapshot.degraded {
                    println!(
                        "USD/CAD: {} (fallback; rate service unavailable)",
                        snapshot.rate
                    );
                } else {
                    println!("USD/CAD: {}", snapshot.rate);
                }
                Ok(())
            }
            Commands::Brokers { config } => {
                let registry = registry(config.as_ref())?;
                println!("{:<16} {:<24} {:<10} {:<6}", "Id", "Name", "USD acct", "TFSA");
                for broker in &registry {
                    println!(
                        "{:<16} {:<24} {:<10} {:<6}",
                        broker.id,
                        broker.name,
                        if broker.has_free_usd_account { "yes" } else { "no" },
                        if broker.supports_tfsa { "yes" } else { "no" },
                    );
                }
                Ok(())
            }
        }
    }
}

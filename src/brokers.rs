use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fees::types::{CommissionSchedule, FeeSchedule, FxFee, FxPolicy, PlatformFee};
use crate::trade::Currency;

/// One brokerage firm: identity, account-type support flags, and a fee
/// schedule per trade currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub has_free_usd_account: bool,
    pub supports_tfsa: bool,
    pub supports_rrsp: bool,
    pub supports_fhsa: bool,
    pub beginner_friendly: bool,
    pub cad_fees: FeeSchedule,
    pub usd_fees: FeeSchedule,
}

impl Broker {
    pub fn fee_schedule(&self, currency: Currency) -> &FeeSchedule {
        match currency {
            Currency::Cad => &self.cad_fees,
            Currency::Usd => &self.usd_fees,
        }
    }
}

/// Load a broker registry from a JSON file, replacing the built-in set.
pub fn load_brokers(path: &Path) -> Result<Vec<Broker>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read broker config: {}", path.display()))?;
    let brokers: Vec<Broker> =
        serde_json::from_str(&raw).context("Failed to parse broker config JSON")?;
    validate_registry(&brokers)?;
    Ok(brokers)
}

fn validate_registry(brokers: &[Broker]) -> Result<()> {
    if brokers.is_empty() {
        anyhow::bail!("Broker config contains no brokers");
    }
    let mut seen = HashSet::new();
    for broker in brokers {
        if !seen.insert(broker.id.as_str()) {
            anyhow::bail!("Duplicate broker id in config: {}", broker.id);
        }
    }
    Ok(())
}

/// The built-in registry. Rates current as of mid-2025; a JSON config file
/// overrides this set entirely.
pub fn default_brokers() -> Vec<Broker> {
    vec![
        Broker {
            id: "wealthsimple".to_string(),
            name: "Wealthsimple".to_string(),
            website: Some("https://www.wealthsimple.com".to_string()),
            has_free_usd_account: false,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: true,
            beginner_friendly: true,
            cad_fees: FeeSchedule {
                commission: CommissionSchedule::Free,
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
            usd_fees: FeeSchedule {
                commission: CommissionSchedule::Free,
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
        },
        Broker {
            id: "questrade".to_string(),
            name: "Questrade".to_string(),
            website: Some("https://www.questrade.com".to_string()),
            has_free_usd_account: true,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: true,
            beginner_friendly: false,
            cad_fees: FeeSchedule {
                commission: CommissionSchedule::Free,
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
            usd_fees: FeeSchedule {
                commission: CommissionSchedule::Free,
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
        },
        Broker {
            id: "ibkr".to_string(),
            name: "Interactive Brokers".to_string(),
            website: Some("https://www.interactivebrokers.com".to_string()),
            has_free_usd_account: true,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: true,
            beginner_friendly: false,
            cad_fees: FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.01,
                    minimum_fee: Some(1.00),
                    // 0.5% of trade value
                    maximum_fee_pct: Some(0.005),
                    platform_fee: None,
                },
                fx: Some(FxFee {
                    rate: 0.00002,
                    minimum: Some(2.00),
                    policy: FxPolicy::Floor,
                }),
            },
            usd_fees: FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.005,
                    minimum_fee: Some(1.00),
                    // 1% of trade value
                    maximum_fee_pct: Some(0.01),
                    platform_fee: None,
                },
                fx: Some(FxFee {
                    rate: 0.00002,
                    minimum: Some(2.00),
                    policy: FxPolicy::Floor,
                }),
            },
        },
        Broker {
            id: "webull".to_string(),
            name: "Webull".to_string(),
            website: Some("https://www.webull.com".to_string()),
            has_free_usd_account: false,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: false,
            beginner_friendly: false,
            cad_fees: FeeSchedule {
                commission: CommissionSchedule::Flat { base_fee: 2.99 },
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
            usd_fees: FeeSchedule {
                commission: CommissionSchedule::Flat { base_fee: 2.99 },
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
        },
        Broker {
            id: "moomoo".to_string(),
            name: "Moomoo".to_string(),
            website: Some("https://www.moomoo.com".to_string()),
            has_free_usd_account: true,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: false,
            beginner_friendly: false,
            cad_fees: FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.0049,
                    minimum_fee: Some(0.49),
                    maximum_fee_pct: None,
                    platform_fee: Some(PlatformFee {
                        per_share_fee: 0.01,
                        minimum_fee: Some(1.00),
                        maximum_fee_pct: Some(0.005),
                    }),
                },
                // 0.09% of the conversion amount plus a fixed 2.00 per
                // transaction, not a floor.
                fx: Some(FxFee {
                    rate: 0.0009,
                    minimum: Some(2.00),
                    policy: FxPolicy::AdditivePlusFixed,
                }),
            },
            usd_fees: FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.0049,
                    minimum_fee: Some(0.99),
                    maximum_fee_pct: None,
                    platform_fee: Some(PlatformFee {
                        per_share_fee: 0.005,
                        minimum_fee: Some(1.00),
                        maximum_fee_pct: Some(0.01),
                    }),
                },
                fx: Some(FxFee {
                    rate: 0.0009,
                    minimum: Some(2.00),
                    policy: FxPolicy::AdditivePlusFixed,
                }),
            },
        },
        Broker {
            id: "rbc".to_string(),
            name: "RBC Direct Investing".to_string(),
            website: Some("https://www.rbcdirectinvesting.com".to_string()),
            has_free_usd_account: true,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: true,
            beginner_friendly: true,
            cad_fees: FeeSchedule {
                commission: CommissionSchedule::Flat { base_fee: 9.95 },
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
            usd_fees: FeeSchedule {
                commission: CommissionSchedule::Flat { base_fee: 9.95 },
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
        },
        Broker {
            id: "td".to_string(),
            name: "TD Direct Investing".to_string(),
            website: Some("https://www.td.com/ca/en/investing".to_string()),
            has_free_usd_account: true,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: true,
            beginner_friendly: true,
            cad_fees: FeeSchedule {
                commission: CommissionSchedule::Flat { base_fee: 9.99 },
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
            usd_fees: FeeSchedule {
                commission: CommissionSchedule::Flat { base_fee: 9.99 },
                fx: Some(FxFee {
                    rate: 0.015,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
        },
    ]
}

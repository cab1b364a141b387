#[cfg(test)]
mod tests {
    use fee_compare::brokers::Broker;
    use fee_compare::fees::calculator::{compute_fee, FeeError};
    use fee_compare::fees::types::{
        CommissionSchedule, FeeSchedule, FxFee, FxPolicy, PlatformFee,
    };
    use fee_compare::trade::{Currency, TradeInput};

    const TOLERANCE: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    // Helper to build a broker with the same schedule for both currencies
    fn test_broker(id: &str, schedule: FeeSchedule) -> Broker {
        Broker {
            id: id.to_string(),
            name: id.to_string(),
            website: None,
            has_free_usd_account: false,
            supports_tfsa: true,
            supports_rrsp: true,
            supports_fhsa: false,
            beginner_friendly: false,
            cad_fees: schedule.clone(),
            usd_fees: schedule,
        }
    }

    fn flat_with_fx(base_fee: f64, fx_rate: f64) -> Broker {
        test_broker(
            "flat",
            FeeSchedule {
                commission: CommissionSchedule::Flat { base_fee },
                fx: Some(FxFee {
                    rate: fx_rate,
                    minimum: None,
                    policy: FxPolicy::Floor,
                }),
            },
        )
    }

    #[test]
    fn flat_usd_commission_with_percentage_fx() {
        // 100 shares @ 50 USD, rate 1.35: trade value 5000 USD,
        // commission 9.99, FX 5000 * 0.015 = 75, total 84.99 USD.
        let broker = flat_with_fx(9.99, 0.015);
        let trade = TradeInput::new(100, 50.0, Currency::Usd);

        let result = compute_fee(&broker, &trade, 1.35).unwrap();

        assert!(approx_eq(result.original_commission, 9.99));
        assert!(approx_eq(result.original_fx_fee, 75.0));
        assert!(approx_eq(result.original_total_fee, 84.99));
        assert!(approx_eq(result.total_fee, 84.99 * 1.35));
        assert!(approx_eq(result.total_fee, 114.7365));
    }

    #[test]
    fn minimum_equal_to_value_cap_is_stable() {
        // 10 shares @ 20 USD: naive 0.10 raised to the 1.00 minimum;
        // cap = 200 * 0.005 = 1.00, so the result stays exactly 1.00.
        let broker = test_broker(
            "min-cap",
            FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.01,
                    minimum_fee: Some(1.00),
                    maximum_fee_pct: Some(0.005),
                    platform_fee: None,
                },
                fx: None,
            },
        );
        let trade = TradeInput::new(10, 20.0, Currency::Usd);

        let result = compute_fee(&broker, &trade, 1.35).unwrap();
        assert_eq!(result.original_commission, 1.00);
    }

    #[test]
    fn value_cap_overrides_minimum_for_low_value_trades() {
        // Minimum 5.00 exceeds the 1.00 value cap; the cap wins and the
        // commission lands below the nominal minimum.
        let broker = test_broker(
            "cap-below-min",
            FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.001,
                    minimum_fee: Some(5.00),
                    maximum_fee_pct: Some(0.005),
                    platform_fee: None,
                },
                fx: None,
            },
        );
        let trade = TradeInput::new(10, 20.0, Currency::Usd);

        let result = compute_fee(&broker, &trade, 1.35).unwrap();
        assert!(approx_eq(result.original_commission, 1.00));
    }

    #[test]
    fn platform_fee_is_additive_not_substituted() {
        // Base commission clamps to 1.00 and the platform fee
        // independently clamps to 1.00: the pre-FX total must be 2.00.
        let broker = test_broker(
            "platform",
            FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.01,
                    minimum_fee: Some(1.00),
                    maximum_fee_pct: Some(0.005),
                    platform_fee: Some(PlatformFee {
                        per_share_fee: 0.02,
                        minimum_fee: Some(1.00),
                        maximum_fee_pct: Some(0.005),
                    }),
                },
                fx: None,
            },
        );
        let trade = TradeInput::new(10, 20.0, Currency::Usd);

        let result = compute_fee(&broker, &trade, 1.35).unwrap();
        assert!(approx_eq(result.original_commission, 2.00));
    }

    #[test]
    fn free_commission_is_zero_for_any_trade_size() {
        let broker = test_broker(
            "free",
            FeeSchedule {
                commission: CommissionSchedule::Free,
                fx: None,
            },
        );
        for (shares, price) in [(1u32, 0.01), (100, 50.0), (1_000_000, 9999.99)] {
            let trade = TradeInput::new(shares, price, Currency::Cad);
            let result = compute_fee(&broker, &trade, 1.35).unwrap();
            assert_eq!(result.original_commission, 0.0);
            assert_eq!(result.total_fee, 0.0);
        }
    }

    #[test]
    fn fx_fee_is_zero_for_cad_trades_across_all_defaults() {
        let brokers = fee_compare::brokers::default_brokers();
        let trade = TradeInput::new(100, 50.0, Currency::Cad);
        for broker in &brokers {
            let result = compute_fee(broker, &trade, 1.35).unwrap();
            assert_eq!(result.fx_fee, 0.0, "broker {}", broker.id);
            assert_eq!(result.original_fx_fee, 0.0, "broker {}", broker.id);
        }
    }

    #[test]
    fn pre_clamp_commission_grows_monotonically_with_shares() {
        let broker = test_broker(
            "per-share",
            FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.005,
                    minimum_fee: None,
                    maximum_fee_pct: None,
                    platform_fee: None,
                },
                fx: None,
            },
        );
        let mut last = 0.0;
        for shares in [1u32, 10, 100, 1000, 10_000] {
            let trade = TradeInput::new(shares, 50.0, Currency::Usd);
            let result = compute_fee(&broker, &trade, 1.35).unwrap();
            assert!(result.original_commission > last);
            last = result.original_commission;
        }
    }

    #[test]
    fn value_cap_is_recomputed_per_call() {
        // Once the cap is active the commission tracks trade value, so
        // doubling the shares doubles the capped commission.
        let broker = test_broker(
            "capped",
            FeeSchedule {
                commission: CommissionSchedule::PerShare {
                    per_share_fee: 0.005,
                    minimum_fee: Some(1.00),
                    maximum_fee_pct: Some(0.01),
                    platform_fee: None,
                },
                fx: None,
            },
        );

        // 10_000 shares @ 0.10: naive 50, value 1000, cap 10.
        let trade_small = TradeInput::new(10_000, 0.10, Currency::Usd);
        let small = compute_fee(&broker, &trade_small, 1.35).unwrap();
        assert!(approx_eq(small.original_commission, 10.0));

        // 20_000 shares @ 0.10: naive 100, value 2000, cap 20.
        let trade_large = TradeInput::new(20_000, 0.10, Currency::Usd);
        let large = compute_fee(&broker, &trade_large, 1.35).unwrap();
        assert!(approx_eq(large.original_commission, 20.0));
    }

    #[test]
    fn tiered_schedule_has_no_value_cap() {
        let broker = test_broker(
            "tiered",
            FeeSchedule {
                commission: CommissionSchedule::Tiered {
                    per_share_fee: 0.01,
                    minimum_fee: Some(1.00),
                },
                fx: None,
            },
        );

        // Below minimum: raised to 1.00.
        let small = compute_fee(&broker, &TradeInput::new(50, 1.0, Currency::Usd), 1.35).unwrap();
        assert!(approx_eq(small.original_commission, 1.00));

        // A per-share total that a 0.5% cap would have trimmed passes
        // through untouched.
        let large = compute_fee(&broker, &TradeInput::new(200, 1.0, Currency::Usd), 1.35).unwrap();
        assert!(approx_eq(large.original_commission, 2.00));
    }

    #[test]
    fn usd_amounts_round_trip_through_exchange_rate() {
        let brokers = fee_compare::brokers::default_brokers();
        let trade = TradeInput::new(137, 42.17, Currency::Usd);
        let rate = 1.3721;
        for broker in &brokers {
            let result = compute_fee(broker, &trade, rate).unwrap();
            assert!(
                approx_eq(result.total_fee / rate, result.original_total_fee),
                "broker {}",
                broker.id
            );
            assert!(approx_eq(result.commission / rate, result.original_commission));
            assert!(approx_eq(result.fx_fee / rate, result.original_fx_fee));
        }
    }

    #[test]
    fn additive_fx_policy_charges_percentage_plus_fixed() {
        let brokers = fee_compare::brokers::default_brokers();
        let moomoo = brokers.iter().find(|b| b.id == "moomoo").unwrap();
        let trade = TradeInput::new(100, 50.0, Currency::Usd);

        let result = compute_fee(moomoo, &trade, 1.35).unwrap();

        // Base: 100 * 0.0049 = 0.49 raised to 0.99. Platform: 100 * 0.005
        // = 0.50 raised to 1.00. FX: 5000 * 0.0009 + 2.00 = 6.50.
        assert!(approx_eq(result.original_commission, 1.99));
        assert!(approx_eq(result.original_fx_fee, 6.50));
        assert!(approx_eq(result.original_total_fee, 8.49));
    }

    #[test]
    fn floor_fx_policy_charges_larger_of_percentage_and_minimum() {
        let brokers = fee_compare::brokers::default_brokers();
        let ibkr = brokers.iter().find(|b| b.id == "ibkr").unwrap();

        // 5000 * 0.00002 = 0.10 is below the 2.00 floor.
        let small = TradeInput::new(100, 50.0, Currency::Usd);
        let result = compute_fee(ibkr, &small, 1.35).unwrap();
        assert!(approx_eq(result.original_fx_fee, 2.00));

        // 400_000 * 0.00002 = 8.00 is above it.
        let large = TradeInput::new(8000, 50.0, Currency::Usd);
        let result = compute_fee(ibkr, &large, 1.35).unwrap();
        assert!(approx_eq(result.original_fx_fee, 8.00));
    }

    #[test]
    fn cad_and_usd_schedules_are_never_cross_applied() {
        let brokers = fee_compare::brokers::default_brokers();
        let ibkr = brokers.iter().find(|b| b.id == "ibkr").unwrap();

        // Same share count and price, different currencies: the CAD trade
        // uses the 0.01/share CAD schedule, the USD trade the 0.005/share
        // USD schedule.
        let cad = compute_fee(ibkr, &TradeInput::new(500, 10.0, Currency::Cad), 1.35).unwrap();
        let usd = compute_fee(ibkr, &TradeInput::new(500, 10.0, Currency::Usd), 1.35).unwrap();

        assert!(approx_eq(cad.original_commission, 5.00));
        assert!(approx_eq(usd.original_commission, 2.50));
    }

    #[test]
    fn breakdown_echoes_schedule_fields() {
        let brokers = fee_compare::brokers::default_brokers();
        let ibkr = brokers.iter().find(|b| b.id == "ibkr").unwrap();
        let trade = TradeInput::new(100, 50.0, Currency::Usd);

        let result = compute_fee(ibkr, &trade, 1.35).unwrap();
        assert_eq!(result.breakdown.per_share_fee, 0.005);
        assert_eq!(result.breakdown.minimum_fee, 1.00);
        assert_eq!(result.breakdown.maximum_fee_pct, 0.01);
        assert_eq!(result.breakdown.base_fee, 0.0);
        assert!(approx_eq(result.breakdown.fx_fee_amount, result.fx_fee));
    }

    #[test]
    fn invalid_inputs_are_rejected_loudly() {
        let broker = flat_with_fx(9.99, 0.015);

        let zero_shares = TradeInput::new(0, 50.0, Currency::Usd);
        assert!(matches!(
            compute_fee(&broker, &zero_shares, 1.35),
            Err(FeeError::InvalidShares(0))
        ));

        let bad_price = TradeInput::new(100, 0.0, Currency::Usd);
        assert!(matches!(
            compute_fee(&broker, &bad_price, 1.35),
            Err(FeeError::InvalidPrice(_))
        ));

        let trade = TradeInput::new(100, 50.0, Currency::Usd);
        assert!(matches!(
            compute_fee(&broker, &trade, 0.0),
            Err(FeeError::InvalidExchangeRate(_))
        ));
        assert!(matches!(
            compute_fee(&broker, &trade, -1.35),
            Err(FeeError::InvalidExchangeRate(_))
        ));
        assert!(matches!(
            compute_fee(&broker, &trade, f64::NAN),
            Err(FeeError::InvalidExchangeRate(_))
        ));
    }
}

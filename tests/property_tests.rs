//! Property-based tests for the order lifecycle and execution rules.
//!
//! These tests verify the lifecycle and pricing invariants hold under
//! random inputs.

use paper_core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Strategies for generating test data
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..100_000i64).prop_map(|x| Decimal::new(x, 2)) // $1.00 to $1,000.00
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000i64).prop_map(Decimal::from) // whole shares
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

fn sym() -> Symbol {
    Symbol::from("AAPL")
}

fn px(value: Decimal) -> Price {
    Price::new_unchecked(value)
}

proptest! {
    /// Two buys at different prices average to cost / quantity, exactly.
    #[test]
    fn cost_basis_is_cost_weighted_average(
        qty1 in quantity_strategy(),
        qty2 in quantity_strategy(),
        p1 in price_strategy(),
        p2 in price_strategy(),
    ) {
        let mut ledger = Ledger::new(Cash::new(dec!(10000000)));

        assert!(ledger.buy(Timestamp::from_millis(0), &sym(), qty1, px(p1), Cash::zero()));
        assert!(ledger.buy(Timestamp::from_millis(1), &sym(), qty2, px(p2), Cash::zero()));

        let position = ledger.position(&sym()).unwrap();
        let total_cost = qty1 * p1 + qty2 * p2;

        prop_assert_eq!(position.quantity, qty1 + qty2);
        prop_assert_eq!(position.cost_basis().value(), total_cost);
        prop_assert_eq!(position.avg_price.value(), total_cost / (qty1 + qty2));
    }

    /// Orders that reached a terminal state never change again, whatever
    /// ticks come later.
    #[test]
    fn terminal_orders_never_change(
        later_prices in proptest::collection::vec(price_strategy(), 3..10),
    ) {
        let mut engine = Engine::new(EngineConfig::default());

        // one fill, one rejection, one cancellation
        let filled = engine.place_market_order(sym(), Side::Buy, dec!(1)).unwrap();
        let rejected = engine.place_market_order(sym(), Side::Sell, dec!(500)).unwrap();
        let cancelled = engine.place_stop_order(sym(), Side::Buy, dec!(1), px(dec!(999999))).unwrap();
        engine.cancel_order(cancelled).unwrap();

        engine.process_tick(&Tick::new(sym(), Timestamp::from_millis(1_000), px(dec!(100)))).unwrap();

        let snapshot = |e: &Engine, id: OrderId| {
            let order = e.get_order(id).unwrap();
            (order.status, order.order_type, order.filled_price, order.filled_quantity)
        };

        let filled_before = snapshot(&engine, filled);
        let rejected_before = snapshot(&engine, rejected);
        let cancelled_before = snapshot(&engine, cancelled);

        prop_assert_eq!(filled_before.0, OrderStatus::Filled);
        prop_assert_eq!(rejected_before.0, OrderStatus::Rejected);
        prop_assert_eq!(cancelled_before.0, OrderStatus::Cancelled);

        for (i, price) in later_prices.iter().enumerate() {
            let ts = Timestamp::from_millis(2_000 + i as i64 * 1_000);
            engine.process_tick(&Tick::new(sym(), ts, px(*price))).unwrap();
        }

        prop_assert_eq!(snapshot(&engine, filled), filled_before);
        prop_assert_eq!(snapshot(&engine, rejected), rejected_before);
        prop_assert_eq!(snapshot(&engine, cancelled), cancelled_before);
    }

    /// A limit buy fills exactly at min(limit, ask) when marketable, and
    /// stays pending otherwise.
    #[test]
    fn limit_buy_fills_at_limit_or_better(
        last in price_strategy(),
        bid_off in 0i64..50i64,
        ask_off in 0i64..50i64,
        limit in price_strategy(),
    ) {
        let bid = last - Decimal::new(bid_off, 2);
        let ask = last + Decimal::new(ask_off, 2);
        prop_assume!(bid > Decimal::ZERO);

        let mut engine = Engine::new(EngineConfig {
            initial_cash: Cash::new(dec!(10000000)),
            ..EngineConfig::default()
        });

        let order_id = engine.place_limit_order(sym(), Side::Buy, dec!(1), px(limit)).unwrap();
        let tick = Tick::new(sym(), Timestamp::from_millis(1_000), px(last))
            .with_bid(px(bid))
            .with_ask(px(ask));
        let outcomes = engine.process_tick(&tick).unwrap();

        if limit >= bid {
            prop_assert_eq!(outcomes.len(), 1);
            match &outcomes[0].disposition {
                Disposition::Filled { price, .. } => {
                    prop_assert_eq!(price.value(), limit.min(ask));
                    prop_assert!(price.value() <= limit, "filled above the limit");
                }
                other => prop_assert!(false, "expected fill, got {:?}", other),
            }
        } else {
            prop_assert!(outcomes.is_empty());
            prop_assert!(engine.get_order(order_id).unwrap().is_open());
        }
    }

    /// A limit sell fills exactly at max(limit, bid) when marketable.
    #[test]
    fn limit_sell_fills_at_limit_or_better(
        last in price_strategy(),
        bid_off in 0i64..50i64,
        ask_off in 0i64..50i64,
        limit in price_strategy(),
    ) {
        let bid = last - Decimal::new(bid_off, 2);
        let ask = last + Decimal::new(ask_off, 2);
        prop_assume!(bid > Decimal::ZERO);

        let mut engine = Engine::new(EngineConfig {
            initial_cash: Cash::new(dec!(10000000)),
            ..EngineConfig::default()
        });

        // seed one share to sell
        engine.place_market_order(sym(), Side::Buy, dec!(1)).unwrap();
        engine.process_tick(&Tick::new(sym(), Timestamp::from_millis(500), px(dec!(1)))).unwrap();

        let order_id = engine.place_limit_order(sym(), Side::Sell, dec!(1), px(limit)).unwrap();
        let tick = Tick::new(sym(), Timestamp::from_millis(1_000), px(last))
            .with_bid(px(bid))
            .with_ask(px(ask));
        let outcomes = engine.process_tick(&tick).unwrap();

        if limit <= ask {
            prop_assert_eq!(outcomes.len(), 1);
            match &outcomes[0].disposition {
                Disposition::Filled { price, .. } => {
                    prop_assert_eq!(price.value(), limit.max(bid));
                    prop_assert!(price.value() >= limit, "filled below the limit");
                }
                other => prop_assert!(false, "expected fill, got {:?}", other),
            }
        } else {
            prop_assert!(outcomes.is_empty());
            prop_assert!(engine.get_order(order_id).unwrap().is_open());
        }
    }

    /// Stops fire at or beyond the trigger in their own direction only.
    #[test]
    fn stop_triggers_only_in_its_direction(
        trigger in price_strategy(),
        last in price_strategy(),
        side in side_strategy(),
    ) {
        let mut engine = Engine::new(EngineConfig::default());
        let order_id = engine.place_stop_order(sym(), side, dec!(1), px(trigger)).unwrap();

        let outcomes = engine
            .process_tick(&Tick::new(sym(), Timestamp::from_millis(1_000), px(last)))
            .unwrap();

        let should_fire = match side {
            Side::Buy => last >= trigger,
            Side::Sell => last <= trigger,
        };

        if should_fire {
            prop_assert_eq!(outcomes.len(), 1);
            // a triggered stop settles as a market order
            prop_assert_eq!(outcomes[0].order_type, OrderType::Market);
            prop_assert!(engine.get_order(order_id).unwrap().status.is_terminal());
        } else {
            prop_assert!(outcomes.is_empty());
            let order = engine.get_order(order_id).unwrap();
            prop_assert!(order.is_open());
            prop_assert_eq!(order.order_type, OrderType::Stop);
        }
    }

    /// Analytics are read-only: repeated calls agree and mutate nothing.
    #[test]
    fn read_paths_mutate_nothing(
        ops in proptest::collection::vec((0u8..2u8, 1i64..20i64, 100i64..10_000i64), 1..15),
    ) {
        let mut engine = Engine::new(EngineConfig::default());
        let mut prices = PriceTable::new();
        let mut series = Vec::new();

        let mut ts = 0i64;
        for (kind, qty, price_raw) in ops {
            ts += 60_000;
            let side = if kind == 0 { Side::Buy } else { Side::Sell };
            engine.place_market_order(sym(), side, Decimal::from(qty)).unwrap();

            let tick = Tick::new(sym(), Timestamp::from_millis(ts), px(Decimal::new(price_raw, 2)));
            engine.process_tick(&tick).unwrap();
            prices.apply(&tick);
            series.push(ValuePoint::new(tick.timestamp, engine.ledger().total_value(prices.prices())));
        }

        let cash_before = engine.ledger().cash();
        let tx_before = engine.ledger().transactions().len();

        let first = (
            realized_pnl(engine.ledger()),
            unrealized_pnl(engine.ledger(), prices.prices()),
            total_pnl(engine.ledger(), prices.prices()),
            engine.ledger().total_value(prices.prices()),
        );
        let report_first = performance_report(&series, dec!(0.02));

        let second = (
            realized_pnl(engine.ledger()),
            unrealized_pnl(engine.ledger(), prices.prices()),
            total_pnl(engine.ledger(), prices.prices()),
            engine.ledger().total_value(prices.prices()),
        );
        let report_second = performance_report(&series, dec!(0.02));

        prop_assert_eq!(first, second);
        prop_assert_eq!(report_first, report_second);
        prop_assert_eq!(engine.ledger().cash(), cash_before);
        prop_assert_eq!(engine.ledger().transactions().len(), tx_before);
    }
}

/// Non-proptest lifecycle tests.
#[cfg(test)]
mod deterministic_lifecycle {
    use super::*;

    #[test]
    fn stop_buy_converts_and_fills_in_the_same_tick() {
        let mut engine = Engine::new(EngineConfig::default());
        let order_id = engine
            .place_stop_order(sym(), Side::Buy, dec!(1), px(dec!(100)))
            .unwrap();

        let outcomes = engine
            .process_tick(&Tick::new(sym(), Timestamp::from_millis(1_000), px(dec!(99))))
            .unwrap();
        assert!(outcomes.is_empty());
        assert!(engine.get_order(order_id).unwrap().is_open());

        let outcomes = engine
            .process_tick(&Tick::new(sym(), Timestamp::from_millis(2_000), px(dec!(101))))
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].order_type, OrderType::Market);
        match &outcomes[0].disposition {
            Disposition::Filled { price, .. } => assert_eq!(price.value(), dec!(101)),
            other => panic!("expected fill, got {other:?}"),
        }

        let order = engine.get_order(order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.stop_price, Some(px(dec!(100))));
    }

    #[test]
    fn placement_stamps_the_manual_clock() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_time(Timestamp::from_millis(5_000));

        let order_id = engine.place_market_order(sym(), Side::Buy, dec!(1)).unwrap();
        assert_eq!(
            engine.get_order(order_id).unwrap().submitted_at,
            Timestamp::from_millis(5_000)
        );

        // the manual clock participates in the monotonic tick guard
        let stale = Tick::new(sym(), Timestamp::from_millis(4_000), px(dec!(10)));
        assert!(matches!(
            engine.process_tick(&stale),
            Err(EngineError::TickOutOfOrder { .. })
        ));
        assert!(engine.get_order(order_id).unwrap().is_open());
    }

    #[test]
    fn limit_buy_takes_the_better_price() {
        let mut engine = Engine::new(EngineConfig::default());
        let order_id = engine
            .place_limit_order(sym(), Side::Buy, dec!(10), px(dec!(150)))
            .unwrap();

        // ask defaults to last, which beats the limit
        let outcomes = engine
            .process_tick(&Tick::new(sym(), Timestamp::from_millis(1_000), px(dec!(149))))
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        match &outcomes[0].disposition {
            Disposition::Filled { price, quantity } => {
                assert_eq!(price.value(), dec!(149));
                assert_eq!(*quantity, dec!(10));
            }
            other => panic!("expected fill, got {other:?}"),
        }
        assert_eq!(
            engine.get_order(order_id).unwrap().filled_price,
            Some(px(dec!(149)))
        );
    }

    #[test]
    fn stop_fires_exactly_at_the_trigger() {
        let mut engine = Engine::new(EngineConfig::default());
        engine
            .place_stop_order(sym(), Side::Buy, dec!(1), px(dec!(100)))
            .unwrap();

        let outcomes = engine
            .process_tick(&Tick::new(sym(), Timestamp::from_millis(1_000), px(dec!(100))))
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].disposition.is_fill());
    }

    #[test]
    fn candidates_settle_in_placement_order() {
        let mut engine = Engine::new(EngineConfig::default());
        let first = engine.place_market_order(sym(), Side::Buy, dec!(1)).unwrap();
        let second = engine.place_market_order(sym(), Side::Buy, dec!(2)).unwrap();
        let third = engine.place_market_order(sym(), Side::Buy, dec!(3)).unwrap();

        let outcomes = engine
            .process_tick(&Tick::new(sym(), Timestamp::from_millis(1_000), px(dec!(10))))
            .unwrap();

        let ids: Vec<OrderId> = outcomes.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn ticks_for_other_symbols_leave_orders_alone() {
        let mut engine = Engine::new(EngineConfig::default());
        let order_id = engine.place_market_order(sym(), Side::Buy, dec!(1)).unwrap();

        let outcomes = engine
            .process_tick(&Tick::new(Symbol::from("TSLA"), Timestamp::from_millis(1_000), px(dec!(10))))
            .unwrap();

        assert!(outcomes.is_empty());
        assert!(engine.get_order(order_id).unwrap().is_open());
        assert_eq!(engine.open_order_count(), 1);
    }

    #[test]
    fn cancel_rejects_unknown_and_terminal_orders() {
        let mut engine = Engine::new(EngineConfig::default());

        match engine.cancel_order(OrderId(42)) {
            Err(EngineError::OrderNotFound(id)) => assert_eq!(id, OrderId(42)),
            other => panic!("expected OrderNotFound, got {other:?}"),
        }

        let order_id = engine.place_market_order(sym(), Side::Buy, dec!(1)).unwrap();
        engine
            .process_tick(&Tick::new(sym(), Timestamp::from_millis(1_000), px(dec!(10))))
            .unwrap();

        match engine.cancel_order(order_id) {
            Err(EngineError::InvalidState { status, .. }) => {
                assert_eq!(status, OrderStatus::Filled);
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn placement_validation_covers_all_three_shapes() {
        let mut engine = Engine::new(EngineConfig::default());

        let bad_qty = OrderSpec::market(sym(), Side::Buy, dec!(0));
        assert!(matches!(
            engine.place_order(bad_qty),
            Err(EngineError::Validation(ValidationError::NonPositiveQuantity))
        ));

        let mut no_limit = OrderSpec::limit(sym(), Side::Buy, dec!(1), px(dec!(10)));
        no_limit.limit_price = None;
        assert!(matches!(
            engine.place_order(no_limit),
            Err(EngineError::Validation(ValidationError::MissingLimitPrice))
        ));

        let mut no_stop = OrderSpec::stop(sym(), Side::Sell, dec!(1), px(dec!(10)));
        no_stop.stop_price = None;
        assert!(matches!(
            engine.place_order(no_stop),
            Err(EngineError::Validation(ValidationError::MissingStopPrice))
        ));

        // nothing was registered
        assert_eq!(engine.open_order_count(), 0);
        assert!(engine.events().is_empty());
    }
}

//! Paper Trading Engine Simulation.
//!
//! Demonstrates the full order lifecycle against synthetic market data:
//! market, limit, and stop orders, commission accounting, rejection and
//! cancellation semantics, and the session analytics suite.

use paper_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Paper Trading Engine Simulation");
    println!("Single Ledger, Tick-Driven Execution, Exact Decimal Math\n");

    scenario_1_market_orders();
    scenario_2_limit_and_stop();
    scenario_3_rejection_and_cancellation();
    scenario_4_random_walk_session();

    println!("\nAll simulations completed successfully.");
}

fn px(value: Decimal) -> Price {
    Price::new(value).unwrap()
}

fn aapl() -> Symbol {
    Symbol::from("AAPL")
}

/// Market orders round-tripping through the ledger with retail commissions.
fn scenario_1_market_orders() {
    println!("Scenario 1: Market Orders and Commission\n");

    let mut engine = Engine::new(EngineConfig {
        initial_cash: Cash::new(dec!(100000)),
        fees: FeeConfig::retail(),
        ..EngineConfig::default()
    });

    println!("  Starting cash: ${}", engine.ledger().cash());

    let mut tape = ScriptedFeed::new(vec![
        Tick::new(aapl(), Timestamp::from_millis(1_000), px(dec!(150)))
            .with_bid(px(dec!(149.99)))
            .with_ask(px(dec!(150.01))),
        Tick::new(aapl(), Timestamp::from_millis(2_000), px(dec!(152)))
            .with_bid(px(dec!(151.99)))
            .with_ask(px(dec!(152.01))),
    ]);

    engine.place_market_order(aapl(), Side::Buy, dec!(10)).unwrap();

    let tick = tape.next_tick().unwrap();
    let outcomes = engine.process_tick(&tick).unwrap();

    for outcome in &outcomes {
        if let Disposition::Filled { price, quantity } = &outcome.disposition {
            println!("  {} {} {} filled @ ${}", outcome.order_id, outcome.side, quantity, price);
        }
    }

    let position = engine.ledger().position(&aapl()).unwrap();
    println!("  Position: {} AAPL @ ${}", position.quantity, position.avg_price);
    println!("  Cash after buy: ${}", engine.ledger().cash());

    engine.place_market_order(aapl(), Side::Sell, dec!(10)).unwrap();
    let tick = tape.next_tick().unwrap();
    engine.process_tick(&tick).unwrap();

    println!("  Sold 10 @ bid after price rose to $152");
    println!("  Cash after round trip: ${}", engine.ledger().cash());
    println!("  Realized PnL (commissions included): ${}\n", realized_pnl(engine.ledger()));
}

/// Limit orders fill at the limit or better; stops rewrite themselves to market.
fn scenario_2_limit_and_stop() {
    println!("Scenario 2: Limit Favorability and Stop Conversion\n");

    let mut engine = Engine::new(EngineConfig::default());

    let limit_id = engine
        .place_limit_order(aapl(), Side::Buy, dec!(10), px(dec!(150)))
        .unwrap();
    println!("  Placed LIMIT BUY 10 @ $150");

    let tick = Tick::new(aapl(), Timestamp::from_millis(1_000), px(dec!(149)));
    let outcomes = engine.process_tick(&tick).unwrap();
    if let Disposition::Filled { price, .. } = &outcomes[0].disposition {
        println!("  Quote came in at $149: filled @ ${} (limit was $150)", price);
    }
    let order = engine.get_order(limit_id).unwrap();
    println!("  Order {} status: {:?}", limit_id, order.status);

    let stop_id = engine
        .place_stop_order(aapl(), Side::Sell, dec!(10), px(dec!(145)))
        .unwrap();
    println!("\n  Placed STOP SELL 10, trigger $145");

    let tick = Tick::new(aapl(), Timestamp::from_millis(2_000), px(dec!(146)));
    let outcomes = engine.process_tick(&tick).unwrap();
    println!("  Tick @ $146: {} outcome(s), stop stays parked", outcomes.len());
    for parked in engine.open_orders() {
        println!("  Still pending: {} {} {:?} {}", parked.id, parked.side, parked.order_type, parked.quantity);
    }

    let tick = Tick::new(aapl(), Timestamp::from_millis(3_000), px(dec!(144)));
    let outcomes = engine.process_tick(&tick).unwrap();
    if let Disposition::Filled { price, .. } = &outcomes[0].disposition {
        println!("  Tick @ $144: triggered, converted, filled @ ${}", price);
    }
    let order = engine.get_order(stop_id).unwrap();
    println!("  Final type: {:?} (trigger kept on record: {:?})", order.order_type, order.stop_price);
    println!("  Cash: ${}, events logged: {}\n", engine.ledger().cash(), engine.events().len());
}

/// A refused fill is a terminal rejection, not an error. Cancels only work
/// while an order is still pending.
fn scenario_3_rejection_and_cancellation() {
    println!("Scenario 3: Rejection and Cancellation\n");

    let mut engine = Engine::new(EngineConfig {
        initial_cash: Cash::new(dec!(100)),
        ..EngineConfig::default()
    });

    println!("  Starting cash: ${}", engine.ledger().cash());

    engine.place_limit_order(aapl(), Side::Buy, dec!(5), px(dec!(200))).unwrap();
    let tick = Tick::new(aapl(), Timestamp::from_millis(1_000), px(dec!(199)));
    let outcomes = engine.process_tick(&tick).unwrap();

    if let Disposition::Rejected { reason } = &outcomes[0].disposition {
        println!("  LIMIT BUY 5 @ $200 on $100 cash: REJECTED ({})", reason);
    }
    println!("  Cash untouched: ${}", engine.ledger().cash());

    let stop_id = engine
        .place_stop_order(aapl(), Side::Buy, dec!(1), px(dec!(250)))
        .unwrap();
    engine.cancel_order(stop_id).unwrap();
    println!("\n  Stop order {} cancelled while pending", stop_id);

    match engine.cancel_order(stop_id) {
        Err(err) => println!("  Cancelling it again: {}", err),
        Ok(()) => unreachable!(),
    }
    match engine.cancel_order(OrderId(99)) {
        Err(err) => println!("  Cancelling an unknown id: {}", err),
        Ok(()) => unreachable!(),
    }

    let stale = Tick::new(aapl(), Timestamp::from_millis(500), px(dec!(100)));
    match engine.process_tick(&stale) {
        Err(err) => println!("  Replaying an old tick: {}\n", err),
        Ok(_) => unreachable!(),
    }
}

/// A full session against a seeded random walk, with the analytics suite on top.
fn scenario_4_random_walk_session() {
    println!("Scenario 4: Random Walk Session\n");

    let symbol = Symbol::from("ACME");
    let mut feed = RandomWalkFeed::new(symbol.clone(), px(dec!(100)), Bps::new(20), Bps::new(5), 7)
        .with_interval_ms(60_000)
        .starting_at(Timestamp::now());

    let mut engine = Engine::new(EngineConfig {
        initial_cash: Cash::new(dec!(100000)),
        fees: FeeConfig::retail(),
        ..EngineConfig::default()
    });

    let mut prices = PriceTable::new();
    let mut series = Vec::new();
    let mut rejections = 0;

    // one trading day of minute bars
    for minute in 0..390 {
        if minute % 30 == 5 {
            engine.place_market_order(symbol.clone(), Side::Buy, dec!(25)).unwrap();
        }
        if minute % 45 == 20 {
            engine.place_market_order(symbol.clone(), Side::Sell, dec!(40)).unwrap();
        }

        let tick = feed.next_tick().unwrap();
        let outcomes = engine.process_tick(&tick).unwrap();
        rejections += outcomes.iter().filter(|o| !o.disposition.is_fill()).count();

        prices.apply(&tick);
        series.push(ValuePoint::new(
            tick.timestamp,
            engine.ledger().total_value(prices.prices()),
        ));
    }

    println!("  Processed {} ticks, {} events, {} rejection(s)", series.len(), engine.events().len(), rejections);
    println!("  Final cash: ${}", engine.ledger().cash());
    for (sym, position) in engine.ledger().positions() {
        println!("  Open position: {} {} @ ${}", position.quantity, sym, position.avg_price);
    }

    // freeze end-of-session marks for the report
    let marks = prices.snapshot();
    let breakdown = pnl_breakdown(engine.ledger(), &marks);
    println!("\n  Realized PnL:   ${}", breakdown.realized);
    println!("  Unrealized PnL: ${}", breakdown.unrealized);
    println!("  Total PnL:      ${}", breakdown.total);

    let stats = TradeHistory::new(engine.ledger()).summarize();
    println!("\n  Trades: {} ({} buys, {} sells)", stats.total_trades, stats.buys, stats.sells);
    println!("  Gross volume: ${}, commission paid: ${}", stats.gross_volume, stats.total_commission);

    let report = performance_report(&series, dec!(0.02));
    println!("\n  Total return:      {}%", fmt_metric(report.total_return));
    println!("  Annualized return: {}%", fmt_metric(report.annualized_return));
    println!("  Sharpe ratio:      {}", fmt_metric(report.sharpe_ratio));
    println!("  Win rate:          {}", fmt_metric(report.win_rate));
    println!("  Max drawdown:      {}%", fmt_metric(report.max_drawdown));
    if let Some(window) = report.drawdown_window {
        println!(
            "  Drawdown window:   {}ms to {}ms",
            window.start.as_millis(),
            window.end.as_millis()
        );
    }
}

fn fmt_metric(value: Option<Decimal>) -> String {
    match value {
        Some(v) => v.round_dp(4).to_string(),
        None => "N/A".to_string(),
    }
}

//! Tick processing: stop triggers and order settlement.

use super::core::Engine;
use super::results::{Disposition, EngineError, OrderOutcome};
use crate::events::{
    EventPayload, OrderFilledEvent, OrderRejectedEvent, RejectReason, StopTriggeredEvent,
};
use crate::market::Tick;
use crate::order::OrderType;
use crate::types::{Cash, OrderId, Price, Side, Symbol};
use rust_decimal::Decimal;
use tracing::debug;

impl Engine {
    /// Apply one tick: advance engine time, then run every candidate order
    /// against the quote.
    ///
    /// Candidates are the orders pending for the tick's symbol at the moment
    /// the tick arrives, in placement order. Ticks must carry non-decreasing
    /// timestamps; an older tick is refused before any state changes.
    pub fn process_tick(&mut self, tick: &Tick) -> Result<Vec<OrderOutcome>, EngineError> {
        if tick.timestamp < self.current_time {
            return Err(EngineError::TickOutOfOrder {
                tick: tick.timestamp,
                current: self.current_time,
            });
        }
        self.current_time = tick.timestamp;

        let candidates: Vec<OrderId> = self
            .open_orders
            .iter()
            .copied()
            .filter(|id| {
                self.orders
                    .get(id)
                    .map(|o| o.symbol == tick.symbol)
                    .unwrap_or(false)
            })
            .collect();

        debug!(
            "tick {} last {} at {}: {} candidate(s)",
            tick.symbol,
            tick.last,
            tick.timestamp.as_millis(),
            candidates.len()
        );

        let mut outcomes = Vec::new();
        for order_id in candidates {
            if let Some(outcome) = self.settle_order(order_id, tick) {
                outcomes.push(outcome);
            }
        }

        // filled and rejected orders leave the working set
        let orders = &self.orders;
        self.open_orders
            .retain(|id| orders.get(id).map(|o| o.is_open()).unwrap_or(false));

        Ok(outcomes)
    }

    /// Run one candidate against the tick. Returns the outcome when the order
    /// reaches a terminal state, None when it stays pending.
    fn settle_order(&mut self, order_id: OrderId, tick: &Tick) -> Option<OrderOutcome> {
        let mut triggered = None;
        let (order_type, side, quantity, limit_price, symbol) = {
            let order = self.orders.get_mut(&order_id)?;

            if order.should_trigger(tick.last) {
                // the stop becomes a market order and settles in this same
                // pass. at most one rewrite per order per tick
                let trigger = order.stop_price?;
                order.convert_to_market();
                triggered = Some(StopTriggeredEvent {
                    order_id,
                    symbol: order.symbol.clone(),
                    side: order.side,
                    trigger_price: trigger,
                    last_price: tick.last,
                });
            }

            (
                order.order_type,
                order.side,
                order.quantity,
                order.limit_price,
                order.symbol.clone(),
            )
        };

        if let Some(event) = triggered {
            self.emit_event(EventPayload::StopTriggered(event));
        }

        let price = match order_type {
            OrderType::Market => Some(match side {
                Side::Buy => tick.ask(),
                Side::Sell => tick.bid(),
            }),
            OrderType::Limit => {
                let limit = limit_price?;
                match side {
                    // marketable limits settle at the limit or better
                    Side::Buy if limit >= tick.bid() => Some(limit.min(tick.ask())),
                    Side::Sell if limit <= tick.ask() => Some(limit.max(tick.bid())),
                    _ => None,
                }
            }
            // a stop that did not trigger stays parked
            OrderType::Stop => None,
        };
        let price = price?;

        Some(self.settle_at(order_id, symbol, side, quantity, price, order_type))
    }

    /// Push one execution through the ledger and record the result. A refusal
    /// by the ledger rejects the order; rejection is an outcome, not an error.
    fn settle_at(
        &mut self,
        order_id: OrderId,
        symbol: Symbol,
        side: Side,
        quantity: Decimal,
        price: Price,
        order_type: OrderType,
    ) -> OrderOutcome {
        let notional = Cash::new(quantity * price.value());
        let commission = self.config.fees.commission_for(notional);

        let executed = match side {
            Side::Buy => self
                .ledger
                .buy(self.current_time, &symbol, quantity, price, commission),
            Side::Sell => self
                .ledger
                .sell(self.current_time, &symbol, quantity, price, commission),
        };

        if executed {
            if let Some(order) = self.orders.get_mut(&order_id) {
                order.fill(price);
            }
            self.emit_event(EventPayload::OrderFilled(OrderFilledEvent {
                order_id,
                symbol: symbol.clone(),
                side,
                quantity,
                price,
                commission,
                cash_after: self.ledger.cash(),
            }));
            OrderOutcome {
                order_id,
                symbol,
                side,
                order_type,
                disposition: Disposition::Filled { price, quantity },
            }
        } else {
            let reason = match side {
                Side::Buy => RejectReason::InsufficientCash,
                Side::Sell => RejectReason::InsufficientPosition,
            };
            if let Some(order) = self.orders.get_mut(&order_id) {
                order.reject();
            }
            self.emit_event(EventPayload::OrderRejected(OrderRejectedEvent {
                order_id,
                symbol: symbol.clone(),
                side,
                quantity,
                reason,
            }));
            OrderOutcome {
                order_id,
                symbol,
                side,
                order_type,
                disposition: Disposition::Rejected { reason },
            }
        }
    }
}

//! Order intake and cancellation.

use super::core::Engine;
use super::results::EngineError;
use crate::events::{EventPayload, OrderCancelledEvent, OrderPlacedEvent};
use crate::order::{Order, OrderSpec};
use crate::types::{OrderId, Price, Side, Symbol};
use rust_decimal::Decimal;

impl Engine {
    /// Generate a new order ID.
    fn next_order_id(&mut self) -> OrderId {
        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        id
    }

    /// Validate and register an order. The order rests as pending until a tick
    /// for its symbol settles it; nothing executes at placement time.
    pub fn place_order(&mut self, spec: OrderSpec) -> Result<OrderId, EngineError> {
        spec.validate()?;

        let order_id = self.next_order_id();
        let order = Order::from_spec(order_id, spec, self.current_time);

        self.emit_event(EventPayload::OrderPlaced(OrderPlacedEvent {
            order_id,
            symbol: order.symbol.clone(),
            order_type: order.order_type,
            side: order.side,
            quantity: order.quantity,
            limit_price: order.limit_price,
            stop_price: order.stop_price,
        }));

        self.open_orders.push(order_id);
        self.orders.insert(order_id, order);

        Ok(order_id)
    }

    /// Place a market order.
    pub fn place_market_order(
        &mut self,
        symbol: Symbol,
        side: Side,
        quantity: Decimal,
    ) -> Result<OrderId, EngineError> {
        self.place_order(OrderSpec::market(symbol, side, quantity))
    }

    /// Place a limit order.
    pub fn place_limit_order(
        &mut self,
        symbol: Symbol,
        side: Side,
        quantity: Decimal,
        limit_price: Price,
    ) -> Result<OrderId, EngineError> {
        self.place_order(OrderSpec::limit(symbol, side, quantity, limit_price))
    }

    /// Place a stop order.
    pub fn place_stop_order(
        &mut self,
        symbol: Symbol,
        side: Side,
        quantity: Decimal,
        stop_price: Price,
    ) -> Result<OrderId, EngineError> {
        self.place_order(OrderSpec::stop(symbol, side, quantity, stop_price))
    }

    /// Cancel a pending order. Orders already filled, rejected, or cancelled
    /// are terminal and cannot be cancelled again.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<(), EngineError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(EngineError::OrderNotFound(order_id))?;

        if !order.is_open() {
            return Err(EngineError::InvalidState {
                order_id,
                status: order.status,
            });
        }

        order.cancel();
        let symbol = order.symbol.clone();
        self.open_orders.retain(|id| *id != order_id);

        self.emit_event(EventPayload::OrderCancelled(OrderCancelledEvent {
            order_id,
            symbol,
        }));

        Ok(())
    }
}

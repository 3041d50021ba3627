// 11.0: every order transition produces an event. used for audit trails,
// state reconstruction, and demo output. the EventPayload enum lists all
// event types; the engine keeps a bounded buffer of these.

use crate::order::OrderType;
use crate::types::{Cash, OrderId, Price, Side, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // order lifecycle events
    OrderPlaced(OrderPlacedEvent),
    StopTriggered(StopTriggeredEvent),
    OrderFilled(OrderFilledEvent),
    OrderRejected(OrderRejectedEvent),
    OrderCancelled(OrderCancelledEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Decimal,
    pub limit_price: Option<Price>,
    pub stop_price: Option<Price>,
}

/// A stop rewrote itself to market; the fill or rejection follows in the same tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTriggeredEvent {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub trigger_price: Price,
    pub last_price: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFilledEvent {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Price,
    pub commission: Cash,
    pub cash_after: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRejectedEvent {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Decimal,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelledEvent {
    pub order_id: OrderId,
    pub symbol: Symbol,
}

/// Why the ledger refused a fill. A rejection is a terminal order outcome,
/// not an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    InsufficientCash,
    InsufficientPosition,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::InsufficientCash => write!(f, "insufficient cash"),
            RejectReason::InsufficientPosition => write!(f, "insufficient position"),
        }
    }
}

//! Order lifecycle: request validation, the order record, and its state machine.
//!
//! Every order starts pending. Filled, rejected, and cancelled are all terminal:
//! once an order leaves pending it never changes again. The one in-place mutation
//! a pending order can undergo is a triggered stop rewriting itself to market.

use crate::types::{OrderId, Price, Side, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the order interacts with the quote when it is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Executes immediately at the current quote.
    Market,
    /// Executes only at the limit price or better.
    Limit,
    /// Parked until the last trade price reaches the trigger, then becomes market.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Filled,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

/// What a caller submits. The engine assigns the id and timestamp on acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Decimal,
    pub limit_price: Option<Price>,
    pub stop_price: Option<Price>,
}

impl OrderSpec {
    pub fn market(symbol: Symbol, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol,
            order_type: OrderType::Market,
            side,
            quantity,
            limit_price: None,
            stop_price: None,
        }
    }

    pub fn limit(symbol: Symbol, side: Side, quantity: Decimal, limit_price: Price) -> Self {
        Self {
            symbol,
            order_type: OrderType::Limit,
            side,
            quantity,
            limit_price: Some(limit_price),
            stop_price: None,
        }
    }

    pub fn stop(symbol: Symbol, side: Side, quantity: Decimal, stop_price: Price) -> Self {
        Self {
            symbol,
            order_type: OrderType::Stop,
            side,
            quantity,
            limit_price: None,
            stop_price: Some(stop_price),
        }
    }

    /// Check the request before any engine state changes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity);
        }
        match self.order_type {
            OrderType::Limit if self.limit_price.is_none() => {
                Err(ValidationError::MissingLimitPrice)
            }
            OrderType::Stop if self.stop_price.is_none() => Err(ValidationError::MissingStopPrice),
            _ => Ok(()),
        }
    }
}

/// An accepted order. Owned by the engine, readable by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Decimal,
    pub limit_price: Option<Price>,
    pub stop_price: Option<Price>,
    pub submitted_at: Timestamp,
    pub status: OrderStatus,
    pub filled_quantity: Decimal,
    pub filled_price: Option<Price>,
}

impl Order {
    pub fn from_spec(id: OrderId, spec: OrderSpec, submitted_at: Timestamp) -> Self {
        Self {
            id,
            symbol: spec.symbol,
            order_type: spec.order_type,
            side: spec.side,
            quantity: spec.quantity,
            limit_price: spec.limit_price,
            stop_price: spec.stop_price,
            submitted_at,
            status: OrderStatus::Pending,
            filled_quantity: Decimal::ZERO,
            filled_price: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Check if a pending stop should fire at the given last trade price.
    /// A buy stop arms at or above its trigger, a sell stop at or below.
    pub fn should_trigger(&self, last: Price) -> bool {
        if self.order_type != OrderType::Stop {
            return false;
        }
        let Some(trigger) = self.stop_price else {
            return false;
        };
        match self.side {
            Side::Buy => last.value() >= trigger.value(),
            Side::Sell => last.value() <= trigger.value(),
        }
    }

    /// Rewrite a triggered stop into a market order. Same id, same quantity;
    /// the trigger price stays on the record for the audit trail.
    pub fn convert_to_market(&mut self) {
        debug_assert_eq!(self.order_type, OrderType::Stop);
        debug_assert!(self.is_open());
        self.order_type = OrderType::Market;
    }

    pub fn fill(&mut self, price: Price) {
        debug_assert!(self.is_open());
        self.status = OrderStatus::Filled;
        self.filled_quantity = self.quantity;
        self.filled_price = Some(price);
    }

    pub fn reject(&mut self) {
        debug_assert!(self.is_open());
        self.status = OrderStatus::Rejected;
    }

    pub fn cancel(&mut self) {
        debug_assert!(self.is_open());
        self.status = OrderStatus::Cancelled;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Limit order requires a limit price")]
    MissingLimitPrice,

    #[error("Stop order requires a stop price")]
    MissingStopPrice,

    #[error("Order quantity must be positive")]
    NonPositiveQuantity,
}

// 6.0.2: result types and errors for engine operations.

use crate::events::RejectReason;
use crate::order::{OrderStatus, OrderType, ValidationError};
use crate::types::{OrderId, Price, Side, Symbol, Timestamp};
use rust_decimal::Decimal;

/// How a candidate order left the working set during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    /// Order type at settlement. A triggered stop settles, and reports, as market.
    pub order_type: OrderType,
    pub disposition: Disposition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Filled { price: Price, quantity: Decimal },
    Rejected { reason: RejectReason },
}

impl Disposition {
    pub fn is_fill(&self) -> bool {
        matches!(self, Disposition::Filled { .. })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid order: {0}")]
    Validation(#[from] ValidationError),

    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    #[error("Order {order_id} is {status:?}, not pending")]
    InvalidState { order_id: OrderId, status: OrderStatus },

    #[error("Tick timestamp {tick:?} precedes engine time {current:?}")]
    TickOutOfOrder { tick: Timestamp, current: Timestamp },
}

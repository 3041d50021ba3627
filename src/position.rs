// 3.0: open holdings. one position per symbol, quantity always positive.
// 3.1 has the cost basis math: buys fold commission into the average, sells never touch it.

use crate::types::{Cash, Price, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub avg_price: Price,
    pub opened_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Position {
    /// Open a fresh position from the total acquisition cost (notional plus commission).
    pub fn open(symbol: Symbol, quantity: Decimal, total_cost: Cash, timestamp: Timestamp) -> Self {
        debug_assert!(quantity > Decimal::ZERO, "position quantity must be positive");
        Self {
            symbol,
            quantity,
            avg_price: Price::new_unchecked(total_cost.value() / quantity),
            opened_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn market_value(&self, price: Price) -> Cash {
        Cash::new(self.quantity * price.value())
    }

    pub fn cost_basis(&self) -> Cash {
        Cash::new(self.quantity * self.avg_price.value())
    }

    // 3.1: paper gains/losses against the current price
    pub fn unrealized_pnl(&self, price: Price) -> Cash {
        calculate_unrealized_pnl(self.quantity, self.avg_price, price)
    }
}

// 3.2: the pnl formula. quantity * (current - average entry)
pub fn calculate_unrealized_pnl(quantity: Decimal, avg_price: Price, current: Price) -> Cash {
    Cash::new(quantity * (current.value() - avg_price.value()))
}

// 3.3: adds to an existing position. the new average is total cost over total
// quantity, where cost already carries the commission of the new lot.
pub fn increase_position(
    position: &Position,
    delta_quantity: Decimal,
    total_cost: Cash,
    timestamp: Timestamp,
) -> Position {
    debug_assert!(delta_quantity > Decimal::ZERO, "increase must be positive");

    let new_quantity = position.quantity + delta_quantity;
    let weighted_sum = position.quantity * position.avg_price.value() + total_cost.value();

    Position {
        symbol: position.symbol.clone(),
        quantity: new_quantity,
        avg_price: Price::new_unchecked(weighted_sum / new_quantity),
        opened_at: position.opened_at,
        updated_at: timestamp,
    }
}

// 3.4: removes quantity. average entry is left alone; a position reduced to
// exactly zero disappears.
pub fn reduce_position(
    position: &Position,
    delta_quantity: Decimal,
    timestamp: Timestamp,
) -> Option<Position> {
    debug_assert!(delta_quantity > Decimal::ZERO, "reduction must be positive");
    debug_assert!(delta_quantity <= position.quantity, "cannot reduce below zero");

    let remaining = position.quantity - delta_quantity;
    if remaining.is_zero() {
        return None;
    }

    Some(Position {
        symbol: position.symbol.clone(),
        quantity: remaining,
        avg_price: position.avg_price,
        opened_at: position.opened_at,
        updated_at: timestamp,
    })
}

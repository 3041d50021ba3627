//! Cash, positions, and the transaction log.
//!
//! The ledger is the single source of truth for what the account owns. Both
//! mutators are atomic: a buy or sell either applies completely (cash moves,
//! position updates, transaction appended) or leaves every field untouched
//! and reports false. Cash can never go below zero.

use crate::position::{increase_position, reduce_position, Position};
use crate::types::{Cash, Price, Side, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One settled trade, recorded at execution time. `cash_flow` is the exact
/// signed cash delta: -(quantity * price + commission) for buys,
/// quantity * price - commission for sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: Timestamp,
    pub side: Side,
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub price: Price,
    pub commission: Cash,
    pub cash_flow: Cash,
}

impl Transaction {
    /// Notional traded, before commission.
    pub fn gross_amount(&self) -> Cash {
        Cash::new(self.quantity * self.price.value())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    cash: Cash,
    positions: HashMap<Symbol, Position>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(initial_cash: Cash) -> Self {
        debug_assert!(!initial_cash.is_negative());
        Self {
            cash: initial_cash,
            positions: HashMap::new(),
            transactions: Vec::new(),
        }
    }

    pub fn cash(&self) -> Cash {
        self.cash
    }

    pub fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn positions(&self) -> &HashMap<Symbol, Position> {
        &self.positions
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Acquire quantity at price, paying commission on top. Refuses (and
    /// changes nothing) when the total cost exceeds available cash.
    pub fn buy(
        &mut self,
        timestamp: Timestamp,
        symbol: &Symbol,
        quantity: Decimal,
        price: Price,
        commission: Cash,
    ) -> bool {
        debug_assert!(quantity > Decimal::ZERO);
        debug_assert!(!commission.is_negative());

        let cost = Cash::new(quantity * price.value()).add(commission);
        if cost.value() > self.cash.value() {
            debug!(
                "buy refused: {} {} @ {} costs {}, cash {}",
                quantity, symbol, price, cost, self.cash
            );
            return false;
        }

        let position = match self.positions.get(symbol) {
            Some(existing) => increase_position(existing, quantity, cost, timestamp),
            None => Position::open(symbol.clone(), quantity, cost, timestamp),
        };
        self.positions.insert(symbol.clone(), position);

        self.cash = self.cash.sub(cost);
        self.transactions.push(Transaction {
            timestamp,
            side: Side::Buy,
            symbol: symbol.clone(),
            quantity,
            price,
            commission,
            cash_flow: cost.negate(),
        });
        true
    }

    /// Release quantity at price, commission deducted from the proceeds.
    /// Refuses when the position is missing or too small, or when a commission
    /// larger than the proceeds would push cash below zero.
    pub fn sell(
        &mut self,
        timestamp: Timestamp,
        symbol: &Symbol,
        quantity: Decimal,
        price: Price,
        commission: Cash,
    ) -> bool {
        debug_assert!(quantity > Decimal::ZERO);
        debug_assert!(!commission.is_negative());

        let Some(position) = self.positions.get(symbol) else {
            debug!("sell refused: no position in {}", symbol);
            return false;
        };
        if quantity > position.quantity {
            debug!(
                "sell refused: {} {} requested, {} held",
                quantity, symbol, position.quantity
            );
            return false;
        }

        let proceeds = Cash::new(quantity * price.value()).sub(commission);
        if self.cash.add(proceeds).is_negative() {
            debug!(
                "sell refused: net proceeds {} would take cash {} below zero",
                proceeds, self.cash
            );
            return false;
        }

        match reduce_position(position, quantity, timestamp) {
            Some(remaining) => {
                self.positions.insert(symbol.clone(), remaining);
            }
            None => {
                self.positions.remove(symbol);
            }
        }

        self.cash = self.cash.add(proceeds);
        self.transactions.push(Transaction {
            timestamp,
            side: Side::Sell,
            symbol: symbol.clone(),
            quantity,
            price,
            commission,
            cash_flow: proceeds,
        });
        true
    }

    /// Mark every open position against the supplied prices. A symbol with no
    /// supplied price is valued at its average entry price.
    pub fn position_value(&self, prices: &HashMap<Symbol, Price>) -> Cash {
        self.positions
            .values()
            .map(|position| {
                let price = prices
                    .get(&position.symbol)
                    .copied()
                    .unwrap_or(position.avg_price);
                position.market_value(price)
            })
            .sum()
    }

    /// Cash plus marked position value.
    pub fn total_value(&self, prices: &HashMap<Symbol, Price>) -> Cash {
        self.cash.add(self.position_value(prices))
    }
}

//! Read-only views over the ledger's trade log.
//!
//! The log itself lives in the ledger; this wrapper adds the counting and
//! summing a caller usually wants without ever exposing a mutable handle.

use crate::ledger::{Ledger, Transaction};
use crate::types::{Cash, Side, Symbol};
use serde::{Deserialize, Serialize};

pub struct TradeHistory<'a> {
    ledger: &'a Ledger,
}

impl<'a> TradeHistory<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Every settled trade, in execution order.
    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn transactions_for(&self, symbol: &Symbol) -> Vec<&Transaction> {
        self.ledger
            .transactions()
            .iter()
            .filter(|t| &t.symbol == symbol)
            .collect()
    }

    pub fn total_trades(&self) -> usize {
        self.ledger.transactions().len()
    }

    pub fn summarize(&self) -> TradeStats {
        let transactions = self.ledger.transactions();
        let buys = transactions.iter().filter(|t| t.side == Side::Buy).count();
        TradeStats {
            total_trades: transactions.len(),
            buys,
            sells: transactions.len() - buys,
            gross_volume: transactions.iter().map(|t| t.gross_amount()).sum(),
            total_commission: transactions.iter().map(|t| t.commission).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStats {
    pub total_trades: usize,
    pub buys: usize,
    pub sells: usize,
    /// Notional traded across both sides, before commission.
    pub gross_volume: Cash,
    pub total_commission: Cash,
}

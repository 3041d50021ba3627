// 8.0: pnl derivation. realized comes from the transaction log, unrealized
// from marking open positions against supplied prices. pure reads throughout.

use crate::ledger::Ledger;
use crate::types::{Cash, Price, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// 8.1: banked pnl. net sale proceeds minus gross purchase cost, commissions
// on both legs included. this is exactly the sum of the log's signed cash flows.
pub fn realized_pnl(ledger: &Ledger) -> Cash {
    ledger.transactions().iter().map(|t| t.cash_flow).sum()
}

// 8.2: paper pnl over open positions. a symbol with no supplied price
// contributes zero; valuing at entry means no paper profit yet.
pub fn unrealized_pnl(ledger: &Ledger, prices: &HashMap<Symbol, Price>) -> Cash {
    ledger
        .positions()
        .values()
        .map(|position| match prices.get(&position.symbol) {
            Some(price) => position.unrealized_pnl(*price),
            None => Cash::zero(),
        })
        .sum()
}

pub fn total_pnl(ledger: &Ledger, prices: &HashMap<Symbol, Price>) -> Cash {
    realized_pnl(ledger).add(unrealized_pnl(ledger, prices))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnlBreakdown {
    pub realized: Cash,
    pub unrealized: Cash,
    pub total: Cash,
}

pub fn pnl_breakdown(ledger: &Ledger, prices: &HashMap<Symbol, Price>) -> PnlBreakdown {
    let realized = realized_pnl(ledger);
    let unrealized = unrealized_pnl(ledger, prices);
    PnlBreakdown {
        realized,
        unrealized,
        total: realized.add(unrealized),
    }
}

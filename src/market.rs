//! Market data: ticks and the last-known-price table.
//!
//! A tick is one observation from a feed: the last trade price plus optional
//! bid/ask quotes. Consumers that need a quote when the feed supplies none
//! fall back to the last trade price.

use crate::types::{Price, Symbol, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: Symbol,
    pub timestamp: Timestamp,
    pub last: Price,
    pub bid: Option<Price>,
    pub ask: Option<Price>,
}

impl Tick {
    pub fn new(symbol: Symbol, timestamp: Timestamp, last: Price) -> Self {
        Self {
            symbol,
            timestamp,
            last,
            bid: None,
            ask: None,
        }
    }

    pub fn with_bid(mut self, bid: Price) -> Self {
        self.bid = Some(bid);
        self
    }

    pub fn with_ask(mut self, ask: Price) -> Self {
        self.ask = Some(ask);
        self
    }

    /// Best bid, defaulting to the last trade price when the feed has none.
    pub fn bid(&self) -> Price {
        self.bid.unwrap_or(self.last)
    }

    /// Best ask, defaulting to the last trade price when the feed has none.
    pub fn ask(&self) -> Price {
        self.ask.unwrap_or(self.last)
    }
}

/// Last-known price per symbol, fed by ticks. Owned by the driver, not the
/// ledger: valuation always happens against an explicit snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceTable {
    prices: HashMap<Symbol, Price>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    pub fn apply(&mut self, tick: &Tick) {
        self.prices.insert(tick.symbol.clone(), tick.last);
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Price> {
        self.prices.get(symbol).copied()
    }

    pub fn prices(&self) -> &HashMap<Symbol, Price> {
        &self.prices
    }

    pub fn snapshot(&self) -> HashMap<Symbol, Price> {
        self.prices.clone()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn px(v: Decimal) -> Price {
        Price::new_unchecked(v)
    }

    #[test]
    fn quotes_default_to_last() {
        let tick = Tick::new(Symbol::from("AAPL"), Timestamp::from_millis(0), px(dec!(150)));
        assert_eq!(tick.bid(), px(dec!(150)));
        assert_eq!(tick.ask(), px(dec!(150)));
    }

    #[test]
    fn explicit_quotes_win() {
        let tick = Tick::new(Symbol::from("AAPL"), Timestamp::from_millis(0), px(dec!(150)))
            .with_bid(px(dec!(149.99)))
            .with_ask(px(dec!(150.01)));
        assert_eq!(tick.bid(), px(dec!(149.99)));
        assert_eq!(tick.ask(), px(dec!(150.01)));
        assert_eq!(tick.last, px(dec!(150)));
    }

    #[test]
    fn price_table_tracks_latest() {
        let mut table = PriceTable::new();
        assert!(table.is_empty());

        table.apply(&Tick::new(Symbol::from("AAPL"), Timestamp::from_millis(0), px(dec!(150))));
        table.apply(&Tick::new(Symbol::from("AAPL"), Timestamp::from_millis(1), px(dec!(151))));
        table.apply(&Tick::new(Symbol::from("TSLA"), Timestamp::from_millis(2), px(dec!(700))));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&Symbol::from("AAPL")), Some(px(dec!(151))));
        assert_eq!(table.get(&Symbol::from("MSFT")), None);

        let snapshot = table.snapshot();
        table.apply(&Tick::new(Symbol::from("AAPL"), Timestamp::from_millis(3), px(dec!(152))));
        assert_eq!(snapshot.get(&Symbol::from("AAPL")), Some(&px(dec!(151))));
    }
}

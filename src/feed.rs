//! Tick sources for driving the engine: a scripted replay feed for tests and
//! demos, and a seeded random-walk generator for longer sessions.

use crate::market::Tick;
use crate::types::{Bps, Price, Symbol, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Anything that can hand the engine a stream of ticks.
pub trait TickSource {
    fn next_tick(&mut self) -> Option<Tick>;
}

/// Replays a fixed sequence of ticks, then runs dry.
#[derive(Debug)]
pub struct ScriptedFeed {
    ticks: std::vec::IntoIter<Tick>,
}

impl ScriptedFeed {
    pub fn new(ticks: Vec<Tick>) -> Self {
        Self {
            ticks: ticks.into_iter(),
        }
    }
}

impl TickSource for ScriptedFeed {
    fn next_tick(&mut self) -> Option<Tick> {
        self.ticks.next()
    }
}

/// Random walk around a starting price. Each tick moves the last price by a
/// uniform draw within the volatility band and quotes a symmetric bid/ask
/// spread around it. Prices are rounded to cents and floored at 0.01.
///
/// Deterministic for a given seed.
#[derive(Debug)]
pub struct RandomWalkFeed {
    symbol: Symbol,
    last: Decimal,
    volatility: Bps,
    spread: Bps,
    interval_ms: i64,
    clock: Timestamp,
    rng: StdRng,
}

impl RandomWalkFeed {
    pub fn new(symbol: Symbol, start: Price, volatility: Bps, spread: Bps, seed: u64) -> Self {
        Self {
            symbol,
            last: start.value(),
            volatility,
            spread,
            interval_ms: 1_000,
            clock: Timestamp::from_millis(0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: i64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn starting_at(mut self, timestamp: Timestamp) -> Self {
        self.clock = timestamp;
        self
    }
}

impl TickSource for RandomWalkFeed {
    fn next_tick(&mut self) -> Option<Tick> {
        let band = self.volatility.value();
        let delta_bps = self.rng.gen_range(-band..=band);
        let drift = self.last * Decimal::new(delta_bps as i64, 4);

        let mut next = (self.last + drift).round_dp(2);
        if next < dec!(0.01) {
            next = dec!(0.01);
        }
        self.last = next;

        let half_spread = next * self.spread.as_fraction();
        let bid = (next - half_spread).round_dp(2).max(dec!(0.01));
        let ask = (next + half_spread).round_dp(2);

        let tick = Tick::new(
            self.symbol.clone(),
            self.clock,
            Price::new_unchecked(next),
        )
        .with_bid(Price::new_unchecked(bid))
        .with_ask(Price::new_unchecked(ask));

        self.clock = Timestamp::from_millis(self.clock.as_millis() + self.interval_ms);
        Some(tick)
    }
}

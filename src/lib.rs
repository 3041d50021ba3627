// paper-core: paper trading execution engine.
// ledger-first architecture: every fill settles through one cash ledger.
// all computation is exact decimal, deterministic, with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Symbol, OrderId, Side, Price, Cash, Timestamp
//   2.x  order.rs: order requests, validation, lifecycle state machine
//   3.x  position.rs: position struct, cost basis, increase/reduce
//   4.x  ledger.rs: cash, positions, transaction log, atomic buy/sell
//   5.x  market.rs: tick quotes and the last-price table
//   6.x  engine/: core engine: order intake, tick settlement, results
//   7.x  config.rs: commission schedule
//   8.x  pnl.rs: realized/unrealized PnL over the ledger
//   9.x  metrics.rs: returns, Sharpe, drawdown
//   10.x history.rs: read-only trade history views
//   11.x events.rs: state transition events for audit
//   12.x feed.rs: scripted and random-walk tick sources

// core trading modules
pub mod engine;
pub mod events;
pub mod ledger;
pub mod market;
pub mod order;
pub mod position;
pub mod types;

// analytics modules
pub mod history;
pub mod metrics;
pub mod pnl;

// integration modules
pub mod config;
pub mod feed;

// re exports for convenience
pub use engine::*;
pub use events::*;
pub use ledger::*;
pub use market::*;
pub use order::*;
pub use position::*;
pub use types::*;
pub use config::{ConfigError, FeeConfig};
pub use feed::{RandomWalkFeed, ScriptedFeed, TickSource};
pub use history::{TradeHistory, TradeStats};
pub use metrics::{performance_report, DrawdownWindow, PerformanceReport, ValuePoint};
pub use pnl::{pnl_breakdown, realized_pnl, total_pnl, unrealized_pnl, PnlBreakdown};

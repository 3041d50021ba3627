// 6.0: execution engine. coordinates order intake, tick-driven settlement,
// and the audit event log. deterministic, single-writer, no external I/O.

mod config;
mod core;
mod orders;
mod ticks;
mod results;

pub use config::EngineConfig;
pub use core::Engine;
pub use results::{Disposition, EngineError, OrderOutcome};

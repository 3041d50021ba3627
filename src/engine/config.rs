//! Engine configuration options.

use crate::config::FeeConfig;
use crate::types::Cash;
use rust_decimal_macros::dec;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cash the ledger starts with.
    pub initial_cash: Cash,
    /// Commission schedule applied on every execution.
    pub fees: FeeConfig,
    /// Maximum number of events to retain in memory.
    pub max_events: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_cash: Cash::new(dec!(100000)),
            fees: FeeConfig::default(),
            max_events: 100_000,
        }
    }
}

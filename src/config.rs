// 7.0 config.rs: commission schedule for simulated executions.
// defaults to free trading so ledger arithmetic stays exact in demos.

use crate::types::Cash;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/** 7.1: commission settings. bps on notional plus a flat charge. 100 bps = 1% */
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    // Commission in basis points of traded notional
    pub commission_bps: u32,
    // Flat charge added to every execution
    pub flat_commission: Cash,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            commission_bps: 0,
            flat_commission: Cash::zero(),
        }
    }
}

impl FeeConfig {
    /// Commission-free trading.
    pub fn free() -> Self {
        Self::default()
    }

    /// Retail-broker style schedule: 0.1% of notional plus a dollar per order.
    pub fn retail() -> Self {
        Self {
            commission_bps: 10,
            flat_commission: Cash::new(Decimal::ONE),
        }
    }

    /// Commission charged on a trade of the given notional value.
    pub fn commission_for(&self, notional: Cash) -> Cash {
        let rate = Decimal::new(self.commission_bps as i64, 4);
        notional.abs().mul(rate).add(self.flat_commission)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flat_commission.is_negative() {
            return Err(ConfigError::InvalidFees {
                reason: "flat commission cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidFees { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn free_schedule_charges_nothing() {
        let fees = FeeConfig::free();
        assert_eq!(fees.commission_for(Cash::new(dec!(1500))).value(), dec!(0));
    }

    #[test]
    fn retail_schedule() {
        let fees = FeeConfig::retail();
        // 0.1% of 1500 + 1 flat
        assert_eq!(fees.commission_for(Cash::new(dec!(1500))).value(), dec!(2.5));
    }

    #[test]
    fn negative_flat_commission_invalid() {
        let fees = FeeConfig {
            commission_bps: 0,
            flat_commission: Cash::new(dec!(-1)),
        };
        assert!(matches!(fees.validate(), Err(ConfigError::InvalidFees { .. })));
    }
}

//! Treasury parameters

use bulwark_common::BulwarkError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreasuryConfig {
    /// Self-insurance reserve the treasury tries to hold
    pub benchmark: u128,
    /// Extra capacity the backstop is trusted to cover
    pub backstop_credit: u128,
    /// Cap on total locked exposure; `None` means unlimited
    pub total_cap: Option<u128>,
    /// Also restore the benchmark when a settlement draws on the backstop
    pub replenish_on_shortfall: bool,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            benchmark: 0,
            backstop_credit: 0,
            total_cap: None,
            replenish_on_shortfall: false,
        }
    }
}

impl TreasuryConfig {
    pub fn validate(&self) -> Result<(), BulwarkError> {
        if self.total_cap == Some(0) {
            return Err(BulwarkError::InvalidConfig("total_cap of 0 admits nothing".into()));
        }
        Ok(())
    }
}

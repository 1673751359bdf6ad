//! Backstop pool parameters

use bulwark_common::{AccountId, BulwarkError, DAY, RATE_SCALE};
use serde::{Deserialize, Serialize};

/// Shortest epoch the pool accepts
pub const MIN_EPOCH_DURATION: u64 = 7 * DAY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackstopConfig {
    /// Seconds between profit fixes
    pub epoch_duration: u64,
    /// Seconds after an epoch starts during which provide/withdraw are open
    pub window: u64,
    /// Risk→settlement rate of the first epoch (scaled by `RATE_SCALE`)
    pub initial_rate: u128,
    /// Closed epochs retained, current one included
    pub history_len: usize,
    /// Account that swaps risk tokens for settlement tokens on payouts
    pub converter: Option<AccountId>,
}

impl Default for BackstopConfig {
    fn default() -> Self {
        Self {
            epoch_duration: MIN_EPOCH_DURATION,
            window: 5 * DAY,
            initial_rate: RATE_SCALE,
            history_len: 16,
            converter: None,
        }
    }
}

impl BackstopConfig {
    pub fn validate(&self) -> Result<(), BulwarkError> {
        if self.epoch_duration < MIN_EPOCH_DURATION {
            return Err(BulwarkError::InvalidConfig(format!(
                "epoch_duration {}s below minimum {}s",
                self.epoch_duration, MIN_EPOCH_DURATION
            )));
        }
        if self.window == 0 || self.window >= self.epoch_duration {
            return Err(BulwarkError::InvalidConfig(format!(
                "window {}s must be in (0, {})",
                self.window, self.epoch_duration
            )));
        }
        if self.initial_rate == 0 {
            return Err(BulwarkError::InvalidRate);
        }
        if self.history_len == 0 {
            return Err(BulwarkError::InvalidConfig("history_len must be at least 1".into()));
        }
        Ok(())
    }
}

//! Admission caps on locked exposure

use std::collections::BTreeMap;

use bulwark_common::{BulwarkError, StrategyId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitController {
    /// Per-strategy caps; a strategy without an entry is not limited
    caps: BTreeMap<StrategyId, u128>,
    total_cap: Option<u128>,
}

impl LimitController {
    pub fn new(total_cap: Option<u128>) -> Self {
        Self {
            caps: BTreeMap::new(),
            total_cap,
        }
    }

    /// Admit or reject totals that a new lock would produce
    pub fn check_limit(
        &self,
        strategy: StrategyId,
        proposed_locked_by_strategy: u128,
        proposed_total_locked: u128,
    ) -> Result<(), BulwarkError> {
        if let Some(cap) = self.caps.get(&strategy) {
            if proposed_locked_by_strategy > *cap {
                log::debug!(
                    "{} would lock {} over cap {}",
                    strategy,
                    proposed_locked_by_strategy,
                    cap
                );
                return Err(BulwarkError::StrategyLimitExceeded);
            }
        }
        if let Some(cap) = self.total_cap {
            if proposed_total_locked > cap {
                log::debug!("total would lock {} over cap {}", proposed_total_locked, cap);
                return Err(BulwarkError::TotalLimitExceeded);
            }
        }
        Ok(())
    }

    pub fn cap(&self, strategy: StrategyId) -> Option<u128> {
        self.caps.get(&strategy).copied()
    }

    pub fn total_cap(&self) -> Option<u128> {
        self.total_cap
    }

    pub(crate) fn set_cap(&mut self, strategy: StrategyId, cap: Option<u128>) {
        match cap {
            Some(cap) => {
                self.caps.insert(strategy, cap);
            }
            None => {
                self.caps.remove(&strategy);
            }
        }
    }

    pub(crate) fn set_total_cap(&mut self, cap: Option<u128>) {
        self.total_cap = cap;
    }
}

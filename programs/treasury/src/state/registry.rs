//! Accepted strategy modules

use std::sync::Arc;

use bulwark_common::{BulwarkError, StrategyId};

use crate::strategy::Strategy;

#[derive(Clone)]
pub struct StrategyEntry {
    pub id: StrategyId,
    pub module: Arc<dyn Strategy>,
    /// Shortest lifetime a position may request (seconds)
    pub min_period: u64,
    /// Longest lifetime a position may request (seconds)
    pub max_period: u64,
    pub accepted_at: u64,
    /// Retired strategies still settle their positions but admit no new ones
    pub active: bool,
}

impl core::fmt::Debug for StrategyEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrategyEntry")
            .field("id", &self.id)
            .field("name", &self.module.name())
            .field("min_period", &self.min_period)
            .field("max_period", &self.max_period)
            .field("active", &self.active)
            .finish()
    }
}

impl StrategyEntry {
    pub fn check_period(&self, period: u64) -> Result<(), BulwarkError> {
        if period < self.min_period || period > self.max_period {
            return Err(BulwarkError::PeriodOutOfBounds {
                period,
                min: self.min_period,
                max: self.max_period,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct StrategyRegistry {
    entries: Vec<StrategyEntry>,
}

impl StrategyRegistry {
    pub fn register(
        &mut self,
        id: StrategyId,
        module: Arc<dyn Strategy>,
        min_period: u64,
        max_period: u64,
        now: u64,
    ) -> Result<(), BulwarkError> {
        if min_period == 0 || min_period > max_period {
            return Err(BulwarkError::InvalidConfig(format!(
                "period bounds [{min_period}, {max_period}] for {id}"
            )));
        }
        if self.entries.iter().any(|e| e.id == id) {
            return Err(BulwarkError::InvalidConfig(format!("{id} already registered")));
        }
        self.entries.push(StrategyEntry {
            id,
            module,
            min_period,
            max_period,
            accepted_at: now,
            active: true,
        });
        Ok(())
    }

    /// Any registered entry, retired or not
    pub fn find(&self, id: StrategyId) -> Option<&StrategyEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entry that may admit new positions
    pub fn find_active(&self, id: StrategyId) -> Result<&StrategyEntry, BulwarkError> {
        self.find(id)
            .filter(|e| e.active)
            .ok_or(BulwarkError::InvalidStrategy)
    }

    pub fn retire(&mut self, id: StrategyId) -> Result<(), BulwarkError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id && e.active)
            .ok_or(BulwarkError::InvalidStrategy)?;
        entry.active = false;
        Ok(())
    }

    pub fn update_periods(&mut self, id: StrategyId, min_period: u64, max_period: u64) -> Result<(), BulwarkError> {
        if min_period == 0 || min_period > max_period {
            return Err(BulwarkError::InvalidConfig(format!(
                "period bounds [{min_period}, {max_period}] for {id}"
            )));
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(BulwarkError::InvalidStrategy)?;
        entry.min_period = min_period;
        entry.max_period = max_period;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

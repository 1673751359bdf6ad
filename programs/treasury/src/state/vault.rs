//! Locked-exposure bookkeeping for the treasury account

use std::collections::BTreeMap;

use bulwark_common::{BulwarkError, OrOverflow, StrategyId};
use model_safety::math::{add_u128, sub_u128};

/// Totals that back the treasury's available balance.
///
/// Token balances live in the ledger; the vault only records what part of
/// them is spoken for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vault {
    /// Sum of negative exposure over Locked positions
    pub total_locked: u128,
    /// Sum of positive exposure (premium) over Locked positions
    pub reserved_premium: u128,
    /// Capacity beyond the own balance that the backstop is trusted to cover
    pub backstop_credit: u128,
    locked_by_strategy: BTreeMap<StrategyId, u128>,
}

impl Vault {
    pub fn new(backstop_credit: u128) -> Self {
        Self {
            backstop_credit,
            ..Self::default()
        }
    }

    /// `balance + backstop_credit - total_locked - reserved_premium`, floored at 0
    pub fn available(&self, balance: u128) -> u128 {
        sub_u128(
            add_u128(balance, self.backstop_credit),
            add_u128(self.total_locked, self.reserved_premium),
        )
    }

    /// Obligations that the own balance must cover before any surplus exists
    pub fn obligations(&self) -> u128 {
        add_u128(self.total_locked, self.reserved_premium)
    }

    pub fn locked_by(&self, strategy: StrategyId) -> u128 {
        self.locked_by_strategy.get(&strategy).copied().unwrap_or(0)
    }

    pub fn locked_by_strategy(&self) -> impl Iterator<Item = (StrategyId, u128)> + '_ {
        self.locked_by_strategy.iter().map(|(k, v)| (*k, *v))
    }

    /// Totals after locking `negative` for `strategy`, without applying them
    pub fn proposed(&self, strategy: StrategyId, negative: u128) -> Result<(u128, u128), BulwarkError> {
        let by_strategy = self.locked_by(strategy).checked_add(negative).or_overflow()?;
        let total = self.total_locked.checked_add(negative).or_overflow()?;
        Ok((by_strategy, total))
    }

    pub fn lock(&mut self, strategy: StrategyId, negative: u128, positive: u128) -> Result<(), BulwarkError> {
        let (by_strategy, total) = self.proposed(strategy, negative)?;
        let premium = self.reserved_premium.checked_add(positive).or_overflow()?;
        self.total_locked = total;
        self.reserved_premium = premium;
        self.locked_by_strategy.insert(strategy, by_strategy);
        Ok(())
    }

    /// Remove a position's exposure. Amounts are those it was locked with.
    pub fn release(&mut self, strategy: StrategyId, negative: u128, positive: u128) {
        self.total_locked = sub_u128(self.total_locked, negative);
        self.reserved_premium = sub_u128(self.reserved_premium, positive);
        let left = sub_u128(self.locked_by(strategy), negative);
        if left == 0 {
            self.locked_by_strategy.remove(&strategy);
        } else {
            self.locked_by_strategy.insert(strategy, left);
        }
    }
}

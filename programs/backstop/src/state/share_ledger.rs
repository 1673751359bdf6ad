//! Depositor positions and per-epoch exit shares
//!
//! Positions live in an arena indexed by `DepositorId - 1` and are never
//! removed. Exit shares are kept in one flattened table keyed by
//! `(epoch, depositor)` so an epoch's rows can be summed or evicted without
//! touching other epochs.

use std::collections::BTreeMap;

use bulwark_common::{AccountId, BulwarkError, DepositorId, EpochId, OrOverflow};
use model_safety::distribution::accrued;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositorPosition {
    pub id: DepositorId,
    pub owner: AccountId,
    pub share_amount: u128,
    pub last_claimed_point: u128,
    /// Profit settled into the position whenever its share count changed
    pub buffered_profit: u128,
    pub entry_epoch: EpochId,
}

#[derive(Debug, Default)]
pub struct ShareLedger {
    positions: Vec<DepositorPosition>,
    out_shares: BTreeMap<(EpochId, DepositorId), u128>,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a position that starts earning from `point`
    pub fn open(&mut self, owner: AccountId, epoch: EpochId, point: u128) -> DepositorId {
        let id = DepositorId(self.positions.len() as u64 + 1);
        self.positions.push(DepositorPosition {
            id,
            owner,
            share_amount: 0,
            last_claimed_point: point,
            buffered_profit: 0,
            entry_epoch: epoch,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, id: DepositorId) -> Result<&DepositorPosition, BulwarkError> {
        if id.is_new() {
            return Err(BulwarkError::UnknownDepositor);
        }
        self.positions
            .get((id.0 - 1) as usize)
            .ok_or(BulwarkError::UnknownDepositor)
    }

    fn get_mut(&mut self, id: DepositorId) -> Result<&mut DepositorPosition, BulwarkError> {
        if id.is_new() {
            return Err(BulwarkError::UnknownDepositor);
        }
        self.positions
            .get_mut((id.0 - 1) as usize)
            .ok_or(BulwarkError::UnknownDepositor)
    }

    /// Position `id` if it is owned by `caller`
    pub fn owned_by(&self, id: DepositorId, caller: &AccountId) -> Result<&DepositorPosition, BulwarkError> {
        let position = self.get(id)?;
        if &position.owner != caller {
            return Err(BulwarkError::NotOwner);
        }
        Ok(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DepositorPosition> {
        self.positions.iter()
    }

    /// Profit the position could claim at `point`
    pub fn pending_profit(&self, id: DepositorId, point: u128) -> Result<u128, BulwarkError> {
        let p = self.get(id)?;
        let pending = accrued(point, p.last_claimed_point, p.share_amount).or_overflow()?;
        p.buffered_profit.checked_add(pending).or_overflow()
    }

    /// Move pending profit into the buffer and advance the claim point
    pub fn settle_profit(&mut self, id: DepositorId, point: u128) -> Result<(), BulwarkError> {
        let p = self.get_mut(id)?;
        let pending = accrued(point, p.last_claimed_point, p.share_amount).or_overflow()?;
        p.buffered_profit = p.buffered_profit.checked_add(pending).or_overflow()?;
        p.last_claimed_point = point;
        Ok(())
    }

    /// Empty the buffer, returning what it held
    pub fn take_profit(&mut self, id: DepositorId) -> Result<u128, BulwarkError> {
        let p = self.get_mut(id)?;
        Ok(core::mem::take(&mut p.buffered_profit))
    }

    pub fn mint(&mut self, id: DepositorId, shares: u128) -> Result<(), BulwarkError> {
        let p = self.get_mut(id)?;
        p.share_amount = p.share_amount.checked_add(shares).or_overflow()?;
        Ok(())
    }

    pub fn burn(&mut self, id: DepositorId, shares: u128) -> Result<(), BulwarkError> {
        let p = self.get_mut(id)?;
        if shares > p.share_amount {
            return Err(BulwarkError::InsufficientShare {
                requested: shares,
                held: p.share_amount,
            });
        }
        p.share_amount -= shares;
        Ok(())
    }

    pub fn record_exit(&mut self, epoch: EpochId, id: DepositorId, shares: u128) -> Result<(), BulwarkError> {
        let row = self.out_shares.entry((epoch, id)).or_insert(0);
        *row = row.checked_add(shares).or_overflow()?;
        Ok(())
    }

    pub fn out_share(&self, epoch: EpochId, id: DepositorId) -> u128 {
        self.out_shares.get(&(epoch, id)).copied().unwrap_or(0)
    }

    pub fn out_share_total(&self, epoch: EpochId) -> u128 {
        self.out_shares
            .range((epoch, DepositorId(0))..=(epoch, DepositorId(u64::MAX)))
            .fold(0u128, |acc, (_, v)| acc.saturating_add(*v))
    }

    /// Drop every exit row of `epoch`; returns how many were removed
    pub fn evict_epoch(&mut self, epoch: EpochId) -> usize {
        let keys: Vec<_> = self
            .out_shares
            .range((epoch, DepositorId(0))..=(epoch, DepositorId(u64::MAX)))
            .map(|(k, _)| *k)
            .collect();
        for k in &keys {
            self.out_shares.remove(k);
        }
        keys.len()
    }

    pub fn total_shares(&self) -> u128 {
        self.positions
            .iter()
            .fold(0u128, |acc, p| acc.saturating_add(p.share_amount))
    }
}

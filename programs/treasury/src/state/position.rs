//! Locked positions

use bulwark_common::{AccountId, BulwarkError, PositionId, StrategyId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionState {
    Locked,
    /// Terminal
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedPosition {
    pub id: PositionId,
    pub strategy: StrategyId,
    pub holder: AccountId,
    pub state: PositionState,
    pub negative_exposure: u128,
    pub positive_exposure: u128,
    pub expiration: u64,
    pub created_at: u64,
    pub amount: u128,
    /// Strategy parameter resolved at creation
    pub aux: u128,
}

impl LockedPosition {
    pub fn is_locked(&self) -> bool {
        self.state == PositionState::Locked
    }
}

/// Arena of positions; `PositionId(n)` lives at index `n - 1`
#[derive(Debug, Default)]
pub struct PositionTable {
    positions: Vec<LockedPosition>,
}

impl PositionTable {
    pub fn next_id(&self) -> PositionId {
        PositionId(self.positions.len() as u64 + 1)
    }

    pub fn insert(&mut self, mut position: LockedPosition) -> PositionId {
        let id = self.next_id();
        position.id = id;
        self.positions.push(position);
        id
    }

    pub fn get(&self, id: PositionId) -> Result<&LockedPosition, BulwarkError> {
        if id.0 == 0 {
            return Err(BulwarkError::UnknownPosition);
        }
        self.positions
            .get((id.0 - 1) as usize)
            .ok_or(BulwarkError::UnknownPosition)
    }

    pub fn set_state(&mut self, id: PositionId, state: PositionState) -> Result<(), BulwarkError> {
        if id.0 == 0 {
            return Err(BulwarkError::UnknownPosition);
        }
        let position = self
            .positions
            .get_mut((id.0 - 1) as usize)
            .ok_or(BulwarkError::UnknownPosition)?;
        position.state = state;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LockedPosition> {
        self.positions.iter()
    }

    pub fn locked(&self) -> impl Iterator<Item = &LockedPosition> {
        self.positions.iter().filter(|p| p.is_locked())
    }
}

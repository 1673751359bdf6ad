//! Observable state changes

use serde::Serialize;

use crate::types::{AccountId, DepositorId, EpochId, PositionId, StrategyId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Locked {
        id: PositionId,
        strategy: StrategyId,
        holder: AccountId,
        negative_exposure: u128,
        positive_exposure: u128,
        expiration: u64,
    },
    Unlocked {
        id: PositionId,
        strategy: StrategyId,
        negative_exposure: u128,
        positive_exposure: u128,
    },
    Paid {
        id: PositionId,
        recipient: AccountId,
        amount: u128,
        /// Portion drawn from the backstop
        from_backstop: u128,
    },
    Replenished {
        amount: u128,
    },
    SurplusWithdrawn {
        to: AccountId,
        amount: u128,
    },
    Provided {
        depositor: DepositorId,
        owner: AccountId,
        epoch: EpochId,
        amount: u128,
        shares: u128,
    },
    Withdrawn {
        depositor: DepositorId,
        epoch: EpochId,
        shares: u128,
        risk_out: u128,
        profit: u128,
    },
    Claimed {
        depositor: DepositorId,
        profit: u128,
    },
    PaidOut {
        to: AccountId,
        amount: u128,
        from_profit: u128,
        risk_converted: u128,
    },
    EpochClosed {
        epoch: EpochId,
        profit: u128,
        cumulative_point: u128,
        next_rate: u128,
    },
    RateScheduled {
        rate: u128,
    },
}

/// Append-only event buffer drained by the owner
#[derive(Debug, Default)]
pub struct Journal {
    events: Vec<Event>,
}

impl Journal {
    pub fn push(&mut self, event: Event) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_drains() {
        let mut journal = Journal::default();
        journal.push(Event::Replenished { amount: 5 });
        journal.push(Event::RateScheduled { rate: 7 });
        assert_eq!(journal.len(), 2);
        let events = journal.take();
        assert_eq!(events[0], Event::Replenished { amount: 5 });
        assert!(journal.is_empty());
    }
}

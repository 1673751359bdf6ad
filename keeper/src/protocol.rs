//! In-process protocol instance and the per-tick maintenance actions

use std::sync::Arc;

use anyhow::{Context, Result};
use bulwark_backstop::BackstopPool;
use bulwark_common::{AccountId, BulwarkError, EpochId, Event, StrategyId, Token, TokenLedger};
use bulwark_treasury::{CappedCallSpread, ManualPrice, Treasury};

use crate::config::KeeperConfig;
use crate::priority_queue::ExpiryQueue;

pub struct Protocol {
    pub ledger: TokenLedger,
    pub treasury: Treasury,
    pub backstop: BackstopPool,
    pub feeds: Vec<(StrategyId, Arc<ManualPrice>)>,
}

impl Protocol {
    /// Wire a treasury to a fresh backstop and accept the configured strategies
    pub fn from_config(config: &KeeperConfig, now: u64) -> Result<Self> {
        let mut ledger = TokenLedger::new();

        let backstop_config = config.backstop_config()?;
        if let Some(converter) = backstop_config.converter {
            ledger.mint(
                Token::Settlement,
                &converter,
                u128::from(config.seed.converter_settlement),
            )?;
        }
        let (backstop, _backstop_admin, payout) =
            BackstopPool::new(backstop_config, AccountId::new_unique(), now)
                .context("Failed to open backstop")?;

        let (mut treasury, treasury_admin) =
            Treasury::new(config.treasury_config()?, AccountId::new_unique(), payout)
                .context("Failed to open treasury")?;
        ledger.mint(
            Token::Settlement,
            treasury.account(),
            u128::from(config.seed.treasury_settlement),
        )?;

        let mut feeds = Vec::with_capacity(config.strategies.len());
        for s in &config.strategies {
            let id = StrategyId(s.id);
            let feed = Arc::new(ManualPrice::new(s.reference_price));
            let module = CappedCallSpread::new(s.name.clone(), s.spread, feed.clone())
                .context(format!("Invalid strategy {}", s.name))?;
            treasury.accept_strategy(
                &treasury_admin,
                id,
                Arc::new(module),
                s.min_period_secs,
                s.max_period_secs,
                now,
            )?;
            if let Some(limit) = s.limit {
                treasury.set_strategy_limit(&treasury_admin, id, Some(u128::from(limit)))?;
            }
            feeds.push((id, feed));
        }

        log::info!(
            "protocol ready: treasury {}, backstop {}, {} strategies",
            treasury.account(),
            backstop.account(),
            feeds.len()
        );
        Ok(Self {
            ledger,
            treasury,
            backstop,
            feeds,
        })
    }

    /// Queue every position that is currently Locked
    pub fn seed_queue(&self, queue: &mut ExpiryQueue) {
        for p in self.treasury.positions().locked() {
            queue.push(p.id, p.expiration);
        }
    }
}

/// What one tick did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub unlocked: usize,
    pub unlock_failures: usize,
    pub epoch_opened: Option<EpochId>,
    pub replenished: u128,
}

/// Keep the expiry queue in step with the treasury journal
pub fn track_events(queue: &mut ExpiryQueue, events: &[Event]) {
    for event in events {
        match event {
            Event::Locked { id, expiration, .. } => queue.push(*id, *expiration),
            Event::Unlocked { id, .. } => {
                queue.remove(id);
            }
            _ => {}
        }
    }
}

/// Run the maintenance actions in order: sweep, epoch rollover, replenish.
///
/// A failing action is logged and the remaining ones still run. Positions
/// whose unlock failed stay queued for the next tick.
pub fn run_tick(protocol: &mut Protocol, queue: &mut ExpiryQueue, max_unlocks: usize, now: u64) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    let events = protocol.treasury.take_events();
    track_events(queue, &events);

    let mut retry = Vec::new();
    for (id, expiration) in queue.pop_due(now, max_unlocks) {
        match protocol.treasury.unlock(id, now) {
            Ok(()) => outcome.unlocked += 1,
            Err(BulwarkError::AlreadySettled) => {
                log::debug!("sweep: {} already settled", id);
            }
            Err(BulwarkError::UnknownPosition) => {
                log::warn!("sweep: {} is not a treasury position, dropping it", id);
            }
            Err(e) => {
                log::warn!("sweep: unlock {} (expired {}) failed, retrying next tick: {}", id, expiration, e);
                outcome.unlock_failures += 1;
                retry.push((id, expiration));
            }
        }
    }
    for (id, expiration) in retry {
        queue.push(id, expiration);
    }
    // drop our own Unlocked events; the positions are already out of the queue
    protocol.treasury.take_events();
    if outcome.unlocked > 0 {
        log::info!("sweep: unlocked {} expired positions", outcome.unlocked);
    }

    if protocol.backstop.epoch_elapsed(now) {
        match protocol.backstop.fix_profit(&protocol.ledger, now) {
            Ok(epoch) => outcome.epoch_opened = Some(epoch),
            Err(e) => log::warn!("fix_profit failed: {}", e),
        }
        protocol.backstop.take_events();
    }

    if protocol.treasury.total_balance(&protocol.ledger) < protocol.treasury.benchmark() {
        match protocol
            .treasury
            .replenish(&mut protocol.ledger, &mut protocol.backstop, now)
        {
            Ok(amount) => outcome.replenished = amount,
            Err(e) => log::warn!("replenish failed: {}", e),
        }
        protocol.treasury.take_events();
        protocol.backstop.take_events();
    }

    outcome
}

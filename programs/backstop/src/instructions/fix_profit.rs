//! Epoch rollover and profit distribution

use crate::state::{BackstopPool, Epoch};
use bulwark_common::*;
use model_safety::distribution::{distributed_amount, point_increment};

/// Process fix profit
///
/// Distributes the pool's unreserved settlement tokens over all shares by
/// raising the cumulative point, closes the current epoch and opens the
/// next one at `now`. With no shares outstanding the distribution is
/// skipped and the profit carries over. Rounding dust stays unreserved.
///
/// # Returns
/// Id of the newly opened epoch
pub fn process_fix_profit(
    pool: &mut BackstopPool,
    ledger: &TokenLedger,
    now: u64,
) -> Result<EpochId, BulwarkError> {
    log::debug!("fix_profit at {}", now);
    let _entered = pool.lock.enter("fix_profit")?;

    if !pool.epoch_elapsed(now) {
        return Err(BulwarkError::EpochNotElapsed);
    }

    let profit = pool.available_profit(ledger);
    let increment = point_increment(profit, pool.total_shares).or_overflow()?;
    let distributed = distributed_amount(increment, pool.total_shares).or_overflow()?;
    let point = pool.cumulative_point().checked_add(increment).or_overflow()?;
    let reserved = pool.profit_reserved.checked_add(distributed).or_overflow()?;
    let next_id = EpochId(pool.current_epoch().id.0.checked_add(1).or_overflow()?);
    if pool.total_shares == 0 && profit > 0 {
        log::info!("fix_profit: no shares outstanding, {} profit carried over", profit);
    }

    let closing = pool.current_epoch_mut();
    closing.cumulative_point = point;
    closing.closed_at = Some(now);
    let closed_id = closing.id;
    let closed_rate = closing.conversion_rate;
    pool.profit_reserved = reserved;

    let rate = pool.next_rate.take().unwrap_or(closed_rate);
    pool.epochs.push_back(Epoch::open(next_id, now, rate, point));
    while pool.epochs.len() > pool.config.history_len {
        if let Some(evicted) = pool.epochs.pop_front() {
            let rows = pool.shares.evict_epoch(evicted.id);
            log::debug!("evicted epoch {} with {} exit rows", evicted.id.0, rows);
        }
    }

    log::info!(
        "fix_profit: closed epoch {} distributing {} of {} (point {}), opened epoch {} at rate {}",
        closed_id.0,
        distributed,
        profit,
        point,
        next_id.0,
        rate
    );
    pool.journal.push(Event::EpochClosed {
        epoch: closed_id,
        profit: distributed,
        cumulative_point: point,
        next_rate: rate,
    });
    Ok(next_id)
}

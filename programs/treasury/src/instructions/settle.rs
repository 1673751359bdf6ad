//! Settle and unlock positions

use std::sync::Arc;

use crate::state::{LockedPosition, PositionState, Treasury};
use bulwark_common::*;
use model_safety::math::sub_u128;

/// Process settle
///
/// Pays the strategy's realized payoff to `recipient` and releases the
/// position's exposure. Bookkeeping is updated before tokens move. When the
/// treasury balance is short, the difference is drawn from `cover`; if that
/// fails, or the final transfer to `recipient` fails, the position and
/// totals are restored and nothing reaches the recipient.
///
/// # Returns
/// Settlement tokens paid to `recipient`
pub fn process_settle(
    treasury: &mut Treasury,
    ledger: &mut TokenLedger,
    cover: &mut dyn ShortfallCover,
    id: PositionId,
    caller: &AccountId,
    recipient: &AccountId,
    now: u64,
) -> Result<u128, BulwarkError> {
    log::debug!("settle: {} by {} at {}", id, caller, now);
    let _entered = treasury.lock.enter("settle")?;

    let position = treasury.positions.get(id)?.clone();
    if &position.holder != caller {
        return Err(BulwarkError::NotHolder);
    }
    if !position.is_locked() {
        return Err(BulwarkError::AlreadySettled);
    }
    let module = treasury
        .strategies
        .find(position.strategy)
        .map(|e| Arc::clone(&e.module))
        .ok_or(BulwarkError::InvalidStrategy)?;
    let payoff = module.realized_payoff(&position, now)?;
    if payoff > position.negative_exposure {
        log::warn!(
            "settle: {} reported payoff {} above locked {}",
            module.name(),
            payoff,
            position.negative_exposure
        );
        return Err(BulwarkError::PayoffExceedsLocked {
            payoff,
            locked: position.negative_exposure,
        });
    }

    release(treasury, &position)?;

    let account = treasury.account;
    let shortfall = sub_u128(payoff, treasury.total_balance(ledger));
    if shortfall > 0 {
        if let Err(e) = cover.pay_out(&treasury.payout, ledger, &account, shortfall, now) {
            log::warn!("settle: backstop could not cover {} for {}: {}", shortfall, id, e);
            restore(treasury, &position)?;
            return Err(e);
        }
    }
    if let Err(e) = ledger.transfer(Token::Settlement, &account, recipient, payoff) {
        // escalated funds stay in the treasury balance
        log::warn!("settle: paying {} for {} failed: {}", payoff, id, e);
        restore(treasury, &position)?;
        return Err(e);
    }

    log::info!("settle: {} paid {} ({} from backstop)", id, payoff, shortfall);
    treasury.journal.push(Event::Unlocked {
        id,
        strategy: position.strategy,
        negative_exposure: position.negative_exposure,
        positive_exposure: position.positive_exposure,
    });
    if payoff > 0 {
        treasury.journal.push(Event::Paid {
            id,
            recipient: *recipient,
            amount: payoff,
            from_backstop: shortfall,
        });
    }

    if shortfall > 0 && treasury.replenish_on_shortfall {
        top_up(treasury, ledger, cover, now);
    }
    Ok(payoff)
}

/// Process unlock
///
/// Releases an expired position without paying anything. Anyone may call.
pub fn process_unlock(treasury: &mut Treasury, id: PositionId, now: u64) -> Result<(), BulwarkError> {
    log::debug!("unlock: {} at {}", id, now);
    let _entered = treasury.lock.enter("unlock")?;

    let position = treasury.positions.get(id)?.clone();
    if !position.is_locked() {
        return Err(BulwarkError::AlreadySettled);
    }
    if now <= position.expiration {
        return Err(BulwarkError::NotExpired);
    }

    release(treasury, &position)?;

    log::info!("unlock: {} released {}", id, position.negative_exposure);
    treasury.journal.push(Event::Unlocked {
        id,
        strategy: position.strategy,
        negative_exposure: position.negative_exposure,
        positive_exposure: position.positive_exposure,
    });
    Ok(())
}

fn release(treasury: &mut Treasury, position: &LockedPosition) -> Result<(), BulwarkError> {
    treasury.positions.set_state(position.id, PositionState::Unlocked)?;
    treasury.vault.release(
        position.strategy,
        position.negative_exposure,
        position.positive_exposure,
    );
    Ok(())
}

fn restore(treasury: &mut Treasury, position: &LockedPosition) -> Result<(), BulwarkError> {
    treasury.vault.lock(
        position.strategy,
        position.negative_exposure,
        position.positive_exposure,
    )?;
    treasury.positions.set_state(position.id, PositionState::Locked)
}

/// Best-effort restore of the benchmark after a settlement emptied the balance
fn top_up(treasury: &mut Treasury, ledger: &mut TokenLedger, cover: &mut dyn ShortfallCover, now: u64) {
    let deficit = sub_u128(treasury.benchmark, treasury.total_balance(ledger));
    if deficit == 0 {
        return;
    }
    let account = treasury.account;
    match cover.pay_out(&treasury.payout, ledger, &account, deficit, now) {
        Ok(()) => {
            log::info!("settle: benchmark restored with {}", deficit);
            treasury.journal.push(Event::Replenished { amount: deficit });
        }
        Err(e) => log::warn!("settle: benchmark top-up of {} failed: {}", deficit, e),
    }
}

//! Stake risk tokens for shares

use crate::state::BackstopPool;
use bulwark_common::*;
use model_safety::math::mul_div_floor;

/// Process provide
///
/// Moves `amount` risk tokens from `caller` into the pool and mints shares
/// into `depositor`, or into a new position when `depositor` is
/// [`DepositorId::NEW`].
///
/// # Returns
/// The id of the credited position
pub fn process_provide(
    pool: &mut BackstopPool,
    ledger: &mut TokenLedger,
    caller: &AccountId,
    depositor: DepositorId,
    amount: u128,
    now: u64,
) -> Result<DepositorId, BulwarkError> {
    log::debug!("provide: {} risk from {} into {}", amount, caller, depositor);
    let _entered = pool.lock.enter("provide")?;

    if amount == 0 {
        return Err(BulwarkError::AmountZero);
    }
    if !pool.is_window_open(now) {
        return Err(BulwarkError::WindowClosed);
    }
    if !depositor.is_new() {
        pool.shares.owned_by(depositor, caller)?;
    }

    let pool_risk = pool.risk_balance(ledger);
    let shares = if pool.total_shares == 0 {
        amount
    } else if pool_risk == 0 {
        // outstanding shares are worthless; new risk would back them
        log::warn!("provide: {} shares outstanding with no risk left", pool.total_shares);
        return Err(BulwarkError::InsufficientLiquidity {
            needed: amount,
            available: 0,
        });
    } else {
        mul_div_floor(amount, pool.total_shares, pool_risk).or_overflow()?
    };
    if shares == 0 {
        return Err(BulwarkError::AmountZero);
    }
    let total_shares = pool.total_shares.checked_add(shares).or_overflow()?;
    ledger.ensure(Token::Risk, caller, amount)?;

    let epoch = pool.current_epoch().id;
    let point = pool.cumulative_point();
    let id = if depositor.is_new() {
        pool.shares.open(*caller, epoch, point)
    } else {
        depositor
    };
    pool.shares.settle_profit(id, point)?;
    pool.shares.mint(id, shares)?;
    pool.total_shares = total_shares;

    let account = pool.account;
    ledger.transfer(Token::Risk, caller, &account, amount)?;

    log::info!("provide: {} minted {} shares for {} risk", id, shares, amount);
    pool.journal.push(Event::Provided {
        depositor: id,
        owner: *caller,
        epoch,
        amount,
        shares,
    });
    Ok(id)
}

//! Collect accrued profit

use crate::state::BackstopPool;
use bulwark_common::*;

/// Process claim
///
/// Pays `buffered + (point - last_claimed_point) * shares / POINT_SCALE`
/// settlement tokens to the owner. The claim point advances even when the
/// profit is zero. Cost does not depend on the number of depositors.
pub fn process_claim(
    pool: &mut BackstopPool,
    ledger: &mut TokenLedger,
    caller: &AccountId,
    depositor: DepositorId,
    _now: u64,
) -> Result<u128, BulwarkError> {
    log::debug!("claim: {} by {}", depositor, caller);
    let _entered = pool.lock.enter("claim")?;

    pool.shares.owned_by(depositor, caller)?;
    let point = pool.cumulative_point();
    let profit = pool.shares.pending_profit(depositor, point)?;
    let account = pool.account;
    ledger.ensure(Token::Settlement, &account, profit)?;

    pool.shares.settle_profit(depositor, point)?;
    pool.shares.take_profit(depositor)?;
    pool.profit_reserved = pool.profit_reserved.saturating_sub(profit);

    ledger.transfer(Token::Settlement, &account, caller, profit)?;

    pool.journal.push(Event::Claimed { depositor, profit });
    Ok(profit)
}

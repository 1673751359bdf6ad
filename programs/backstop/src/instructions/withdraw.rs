//! Redeem shares for risk tokens plus accrued profit

use crate::state::BackstopPool;
use bulwark_common::*;
use model_safety::math::{mul_div_ceil, mul_div_floor};

/// Process withdraw
///
/// Burns `shares` from `depositor` and pays the owner
/// `floor(shares * pool_risk / total_shares)` risk tokens together with the
/// position's accrued profit in settlement tokens.
///
/// # Returns
/// Risk tokens paid out
pub fn process_withdraw(
    pool: &mut BackstopPool,
    ledger: &mut TokenLedger,
    caller: &AccountId,
    depositor: DepositorId,
    shares: u128,
    now: u64,
) -> Result<u128, BulwarkError> {
    log::debug!("withdraw: {} shares from {} by {}", shares, depositor, caller);
    let _entered = pool.lock.enter("withdraw")?;

    check_exit(pool, caller, depositor, shares, now)?;
    let risk_out = mul_div_floor(shares, pool.risk_balance(ledger), pool.total_shares).or_overflow()?;
    exit(pool, ledger, caller, depositor, shares, risk_out)
}

/// Process withdraw by token amount
///
/// Pays exactly `risk_amount` risk tokens, burning
/// `ceil(risk_amount * total_shares / pool_risk)` shares.
///
/// # Returns
/// Shares burned
pub fn process_withdraw_amount(
    pool: &mut BackstopPool,
    ledger: &mut TokenLedger,
    caller: &AccountId,
    depositor: DepositorId,
    risk_amount: u128,
    now: u64,
) -> Result<u128, BulwarkError> {
    log::debug!("withdraw_amount: {} risk from {} by {}", risk_amount, depositor, caller);
    let _entered = pool.lock.enter("withdraw")?;

    if !pool.is_window_open(now) {
        return Err(BulwarkError::WindowClosed);
    }
    if risk_amount == 0 {
        return Err(BulwarkError::AmountZero);
    }
    let pool_risk = pool.risk_balance(ledger);
    if risk_amount > pool_risk || pool.total_shares == 0 {
        return Err(BulwarkError::InsufficientLiquidity {
            needed: risk_amount,
            available: pool_risk,
        });
    }
    let shares = mul_div_ceil(risk_amount, pool.total_shares, pool_risk).or_overflow()?;
    check_exit(pool, caller, depositor, shares, now)?;
    exit(pool, ledger, caller, depositor, shares, risk_amount)?;
    Ok(shares)
}

fn check_exit(
    pool: &BackstopPool,
    caller: &AccountId,
    depositor: DepositorId,
    shares: u128,
    now: u64,
) -> Result<(), BulwarkError> {
    if !pool.is_window_open(now) {
        return Err(BulwarkError::WindowClosed);
    }
    let position = pool.shares.owned_by(depositor, caller)?;
    if shares == 0 {
        return Err(BulwarkError::AmountZero);
    }
    if shares > position.share_amount {
        return Err(BulwarkError::InsufficientShare {
            requested: shares,
            held: position.share_amount,
        });
    }
    Ok(())
}

fn exit(
    pool: &mut BackstopPool,
    ledger: &mut TokenLedger,
    caller: &AccountId,
    depositor: DepositorId,
    shares: u128,
    risk_out: u128,
) -> Result<u128, BulwarkError> {
    let point = pool.cumulative_point();
    let profit = pool.shares.pending_profit(depositor, point)?;
    let account = pool.account;
    ledger.ensure(Token::Risk, &account, risk_out)?;
    ledger.ensure(Token::Settlement, &account, profit)?;

    let epoch = pool.current_epoch().id;
    pool.shares.settle_profit(depositor, point)?;
    pool.shares.take_profit(depositor)?;
    pool.shares.burn(depositor, shares)?;
    pool.shares.record_exit(epoch, depositor, shares)?;
    pool.total_shares -= shares;
    pool.profit_reserved = pool.profit_reserved.saturating_sub(profit);
    {
        let current = pool.current_epoch_mut();
        current.total_share_out = current.total_share_out.saturating_add(shares);
        current.risk_token_out = current.risk_token_out.saturating_add(risk_out);
        current.profit_token_out = current.profit_token_out.saturating_add(profit);
    }

    ledger.transfer(Token::Risk, &account, caller, risk_out)?;
    ledger.transfer(Token::Settlement, &account, caller, profit)?;

    log::info!(
        "withdraw: {} burned {} shares for {} risk and {} profit",
        depositor,
        shares,
        risk_out,
        profit
    );
    pool.journal.push(Event::Withdrawn {
        depositor,
        epoch,
        shares,
        risk_out,
        profit,
    });
    Ok(risk_out)
}

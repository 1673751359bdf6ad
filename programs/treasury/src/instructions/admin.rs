//! Administrative operations and reserve management

use std::sync::Arc;

use crate::state::Treasury;
use crate::strategy::Strategy;
use bulwark_common::*;
use model_safety::math::{max_u128, sub_u128};

pub fn process_accept_strategy(
    treasury: &mut Treasury,
    cap: &AdminCap,
    id: StrategyId,
    module: Arc<dyn Strategy>,
    min_period: u64,
    max_period: u64,
    now: u64,
) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    let name = module.name().to_string();
    treasury.strategies.register(id, module, min_period, max_period, now)?;
    log::info!("accepted {} ({}) for periods [{}, {}]", id, name, min_period, max_period);
    Ok(())
}

pub fn process_retire_strategy(treasury: &mut Treasury, cap: &AdminCap, id: StrategyId) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    treasury.strategies.retire(id)?;
    log::info!("retired {}", id);
    Ok(())
}

/// Replace the period bounds new positions on `id` must fall within.
/// Open positions keep their expiration.
pub fn process_set_strategy_periods(
    treasury: &mut Treasury,
    cap: &AdminCap,
    id: StrategyId,
    min_period: u64,
    max_period: u64,
) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    treasury.strategies.update_periods(id, min_period, max_period)?;
    log::info!("{} periods set to [{}, {}]", id, min_period, max_period);
    Ok(())
}

pub fn process_set_strategy_limit(
    treasury: &mut Treasury,
    cap: &AdminCap,
    id: StrategyId,
    limit: Option<u128>,
) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    if treasury.strategies.find(id).is_none() {
        return Err(BulwarkError::InvalidStrategy);
    }
    treasury.limits.set_cap(id, limit);
    log::info!("{} limit set to {:?}", id, limit);
    Ok(())
}

pub fn process_set_total_limit(treasury: &mut Treasury, cap: &AdminCap, limit: Option<u128>) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    treasury.limits.set_total_cap(limit);
    log::info!("total limit set to {:?}", limit);
    Ok(())
}

pub fn process_set_benchmark(treasury: &mut Treasury, cap: &AdminCap, amount: u128) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    treasury.benchmark = amount;
    log::info!("benchmark set to {}", amount);
    Ok(())
}

pub fn process_set_backstop_credit(treasury: &mut Treasury, cap: &AdminCap, amount: u128) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    treasury.vault.backstop_credit = amount;
    log::info!("backstop credit set to {}", amount);
    Ok(())
}

/// Process replenish
///
/// Draws `benchmark - balance` from the backstop when the treasury holds less
/// than its benchmark. Anyone may call.
///
/// # Returns
/// Amount drawn (0 when already at or above benchmark)
pub fn process_replenish(
    treasury: &mut Treasury,
    ledger: &mut TokenLedger,
    cover: &mut dyn ShortfallCover,
    now: u64,
) -> Result<u128, BulwarkError> {
    let _entered = treasury.lock.enter("replenish")?;

    let deficit = sub_u128(treasury.benchmark, treasury.total_balance(ledger));
    if deficit == 0 {
        return Ok(0);
    }
    let account = treasury.account;
    cover.pay_out(&treasury.payout, ledger, &account, deficit, now)?;

    log::info!("replenish: drew {} from backstop", deficit);
    treasury.journal.push(Event::Replenished { amount: deficit });
    Ok(deficit)
}

/// Process withdraw surplus
///
/// Moves settlement tokens out while the remaining balance still covers both
/// the benchmark and every locked obligation without backstop credit.
pub fn process_withdraw_surplus(
    treasury: &mut Treasury,
    cap: &AdminCap,
    ledger: &mut TokenLedger,
    to: &AccountId,
    amount: u128,
) -> Result<(), BulwarkError> {
    treasury.issuer.check_admin(cap)?;
    let _entered = treasury.lock.enter("withdraw_surplus")?;

    if amount == 0 {
        return Err(BulwarkError::AmountZero);
    }
    let floor = max_u128(treasury.benchmark, treasury.vault.obligations());
    let surplus = sub_u128(treasury.total_balance(ledger), floor);
    if amount > surplus {
        return Err(BulwarkError::InsufficientLiquidity {
            needed: amount,
            available: surplus,
        });
    }
    let account = treasury.account;
    ledger.transfer(Token::Settlement, &account, to, amount)?;

    log::info!("withdraw_surplus: {} to {}", amount, to);
    treasury.journal.push(Event::SurplusWithdrawn { to: *to, amount });
    Ok(())
}

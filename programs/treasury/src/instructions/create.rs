//! Admit a new position

use std::sync::Arc;

use crate::state::{LockedPosition, PositionState, Treasury};
use crate::strategy::QuoteRequest;
use bulwark_common::*;

/// Process create
///
/// Prices the request with the strategy, admits the worst-case exposure
/// against the caps and the available balance, collects the premium from
/// `holder` and records a Locked position.
///
/// # Arguments
/// * `strategy` - Accepted, active strategy
/// * `holder` - Account paying the premium and owning the position
/// * `amount` - Position size in strategy units
/// * `period` - Requested lifetime in seconds
/// * `aux` - Strategy-defined parameter
///
/// # Returns
/// Id of the new position
#[allow(clippy::too_many_arguments)]
pub fn process_create(
    treasury: &mut Treasury,
    ledger: &mut TokenLedger,
    strategy: StrategyId,
    holder: &AccountId,
    amount: u128,
    period: u64,
    aux: u128,
    now: u64,
) -> Result<PositionId, BulwarkError> {
    log::debug!("create: {} x{} for {}s by {}", strategy, amount, period, holder);
    let _entered = treasury.lock.enter("create")?;

    if amount == 0 {
        return Err(BulwarkError::AmountZero);
    }
    let entry = treasury.strategies.find_active(strategy)?;
    entry.check_period(period)?;
    let module = Arc::clone(&entry.module);

    let quote = module.quote(&QuoteRequest {
        holder: *holder,
        amount,
        period,
        aux,
        now,
    })?;
    if quote.expiration <= now {
        return Err(BulwarkError::Strategy(format!(
            "{} quoted expiration {} not after {}",
            module.name(),
            quote.expiration,
            now
        )));
    }
    let negative = quote.negative_exposure;
    let positive = quote.positive_exposure;

    let (by_strategy, total) = treasury.vault.proposed(strategy, negative)?;
    treasury.limits.check_limit(strategy, by_strategy, total)?;
    let available = treasury.available(ledger);
    if available < negative {
        log::warn!("create: {} needs {} but only {} available", strategy, negative, available);
        return Err(BulwarkError::InsufficientLiquidity {
            needed: negative,
            available,
        });
    }
    ledger.ensure(Token::Settlement, holder, positive)?;

    treasury.vault.lock(strategy, negative, positive)?;
    let id = treasury.positions.insert(LockedPosition {
        id: treasury.positions.next_id(),
        strategy,
        holder: *holder,
        state: PositionState::Locked,
        negative_exposure: negative,
        positive_exposure: positive,
        expiration: quote.expiration,
        created_at: now,
        amount,
        aux: quote.aux,
    });
    let account = treasury.account;
    ledger.transfer(Token::Settlement, holder, &account, positive)?;

    log::info!(
        "create: {} locked {} (premium {}) until {}",
        id,
        negative,
        positive,
        quote.expiration
    );
    treasury.journal.push(Event::Locked {
        id,
        strategy,
        holder: *holder,
        negative_exposure: negative,
        positive_exposure: positive,
        expiration: quote.expiration,
    });
    Ok(id)
}

//! Shortfall coverage for the treasury

use crate::state::BackstopPool;
use bulwark_common::*;
use model_safety::math::{min_u128, mul_div_ceil};

/// Process pay out
///
/// Delivers `amount` settlement tokens to `to`. Unreserved profit is used
/// first; the remainder is bought from the converter with risk tokens at the
/// current epoch's rate. Either the whole amount is delivered or nothing
/// moves.
///
/// # Arguments
/// * `cap` - Payout capability minted with this pool
/// * `to` - Recipient of the settlement tokens
/// * `amount` - Settlement tokens requested
pub fn process_pay_out(
    pool: &mut BackstopPool,
    cap: &PayoutCap,
    ledger: &mut TokenLedger,
    to: &AccountId,
    amount: u128,
    now: u64,
) -> Result<(), BulwarkError> {
    log::debug!("pay_out: {} to {} at {}", amount, to, now);
    pool.issuer.check_payout(cap)?;
    let _entered = pool.lock.enter("pay_out")?;

    if amount == 0 {
        return Ok(());
    }

    let account = pool.account;
    let from_profit = min_u128(pool.available_profit(ledger), amount);
    let remainder = amount - from_profit;

    let mut risk_converted = 0u128;
    let mut converter = None;
    if remainder > 0 {
        let Some(conv) = pool.config.converter else {
            log::warn!("pay_out: {} short by {} with no converter", amount, remainder);
            return Err(BulwarkError::BackstopInsufficient { requested: amount });
        };
        let rate = pool.current_epoch().conversion_rate;
        risk_converted = mul_div_ceil(remainder, RATE_SCALE, rate).or_overflow()?;
        let pool_risk = pool.risk_balance(ledger);
        let converter_settlement = ledger.balance(Token::Settlement, &conv);
        if risk_converted > pool_risk || remainder > converter_settlement {
            log::warn!(
                "pay_out: {} short by {}: needs {} risk (pool {}), converter holds {}",
                amount,
                remainder,
                risk_converted,
                pool_risk,
                converter_settlement
            );
            return Err(BulwarkError::BackstopInsufficient { requested: amount });
        }
        converter = Some(conv);
    }

    ledger.transfer(Token::Settlement, &account, to, from_profit)?;
    if let Some(conv) = converter {
        ledger.transfer(Token::Risk, &account, &conv, risk_converted)?;
        ledger.transfer(Token::Settlement, &conv, to, remainder)?;
    }

    log::info!(
        "pay_out: {} to {} ({} from profit, {} risk converted)",
        amount,
        to,
        from_profit,
        risk_converted
    );
    pool.journal.push(Event::PaidOut {
        to: *to,
        amount,
        from_profit,
        risk_converted,
    });
    Ok(())
}

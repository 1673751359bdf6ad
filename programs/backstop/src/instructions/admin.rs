//! Administrative operations

use crate::state::BackstopPool;
use bulwark_common::*;

/// Schedule the conversion rate of the next epoch.
///
/// The current epoch keeps its rate; the new one applies from the next
/// `fix_profit`.
pub fn process_set_next_rate(pool: &mut BackstopPool, cap: &AdminCap, rate: u128) -> Result<(), BulwarkError> {
    pool.issuer.check_admin(cap)?;
    if rate == 0 {
        return Err(BulwarkError::InvalidRate);
    }
    pool.next_rate = Some(rate);
    log::info!("next epoch rate scheduled: {}", rate);
    pool.journal.push(Event::RateScheduled { rate });
    Ok(())
}

pub fn process_set_converter(
    pool: &mut BackstopPool,
    cap: &AdminCap,
    converter: Option<AccountId>,
) -> Result<(), BulwarkError> {
    pool.issuer.check_admin(cap)?;
    if converter == Some(pool.account) {
        return Err(BulwarkError::InvalidConfig("converter cannot be the pool account".into()));
    }
    pool.config.converter = converter;
    log::info!("converter set to {:?}", converter);
    Ok(())
}

//! The seam between the treasury and whatever covers its shortfalls

use crate::capability::PayoutCap;
use crate::error::BulwarkError;
use crate::ledger::TokenLedger;
use crate::types::AccountId;

/// Secondary liquidity the treasury escalates to when its own balance is short
pub trait ShortfallCover {
    /// Deliver exactly `amount` settlement tokens to `to`, or fail with no
    /// transfer at all.
    fn pay_out(
        &mut self,
        cap: &PayoutCap,
        ledger: &mut TokenLedger,
        to: &AccountId,
        amount: u128,
        now: u64,
    ) -> Result<(), BulwarkError>;

    /// Settlement tokens that could be delivered right now
    fn coverage(&self, ledger: &TokenLedger) -> u128;
}

/// No secondary pool; every request beyond zero fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCover;

impl ShortfallCover for NoCover {
    fn pay_out(
        &mut self,
        _cap: &PayoutCap,
        _ledger: &mut TokenLedger,
        _to: &AccountId,
        amount: u128,
        _now: u64,
    ) -> Result<(), BulwarkError> {
        if amount == 0 {
            return Ok(());
        }
        Err(BulwarkError::BackstopInsufficient { requested: amount })
    }

    fn coverage(&self, _ledger: &TokenLedger) -> u128 {
        0
    }
}

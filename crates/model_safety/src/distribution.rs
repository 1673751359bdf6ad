//! Cumulative-point profit distribution
//!
//! A single monotone accumulator (`point`, scaled by `POINT_SCALE`) records
//! profit per share. A depositor's entitlement is
//! `(point - last_claimed_point) * shares / POINT_SCALE`, so neither claims
//! nor epoch rollover iterate over depositors.

use crate::math::*;

/// Fixed-point scale of the cumulative point (1e18)
pub const POINT_SCALE: u128 = 1_000_000_000_000_000_000;

/// Point increment for distributing `profit` over `total_shares`.
///
/// Returns `Some(0)` when there are no shares: the distribution is skipped,
/// not failed. `None` only on overflow.
pub fn point_increment(profit: u128, total_shares: u128) -> Option<u128> {
    if total_shares == 0 {
        return Some(0);
    }
    mul_div_floor(profit, POINT_SCALE, total_shares)
}

/// Amount to reserve for an increment across `total_shares`.
///
/// Rounded up: claims are floored per depositor and per settlement, and
/// their sum over any number of epochs must stay within the reserve. Never
/// exceeds the profit the increment was derived from; the difference is
/// dust that stays undistributed.
pub fn distributed_amount(increment: u128, total_shares: u128) -> Option<u128> {
    mul_div_ceil(increment, total_shares, POINT_SCALE)
}

/// Profit accrued by `shares` between `last_point` and `point`
pub fn accrued(point: u128, last_point: u128, shares: u128) -> Option<u128> {
    mul_div_floor(sub_u128(point, last_point), shares, POINT_SCALE)
}

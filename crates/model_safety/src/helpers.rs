//! Invariant checking helpers

use crate::distribution::accrued;
use crate::math::*;
use crate::state::*;

/// L1: total_locked equals the sum of negative exposure over locked entries
pub fn locked_sum_ok(s: &Treasury) -> bool {
    let sum = s
        .locks
        .iter()
        .filter(|l| l.locked)
        .fold(0u128, |acc, l| add_u128(acc, l.negative));
    sum == s.total_locked
}

/// L2: per-strategy locked amounts match their locked entries
pub fn strategy_sums_ok(s: &Treasury) -> bool {
    (0..MAX_STRATEGIES).all(|k| {
        let sum = s
            .locks
            .iter()
            .filter(|l| l.locked && l.strategy == k)
            .fold(0u128, |acc, l| add_u128(acc, l.negative));
        sum == s.locked_by_strategy[k]
    })
}

/// L3: reserved premium equals the sum of positive exposure over locked entries
pub fn premium_sum_ok(s: &Treasury) -> bool {
    let sum = s
        .locks
        .iter()
        .filter(|l| l.locked)
        .fold(0u128, |acc, l| add_u128(acc, l.positive));
    sum == s.reserved_premium
}

/// Balance that can back new locks
pub fn available(s: &Treasury) -> u128 {
    sub_u128(
        add_u128(s.balance, s.backstop_credit),
        add_u128(s.total_locked, s.reserved_premium),
    )
}

/// L4: obligations never exceed balance plus backstop credit
pub fn solvent(s: &Treasury) -> bool {
    add_u128(s.total_locked, s.reserved_premium) <= add_u128(s.balance, s.backstop_credit)
}

/// Accrued profit (buffered + pending) of one depositor
pub fn owed_to(p: &Pool, d: &Depositor) -> u128 {
    let pending = accrued(p.point, d.last_point, d.shares).unwrap_or(u128::MAX);
    add_u128(d.buffered, pending)
}

/// P1: total shares equal the sum of depositor shares
pub fn shares_conserved(p: &Pool) -> bool {
    let sum = p.depositors.iter().fold(0u128, |acc, d| add_u128(acc, d.shares));
    sum == p.total_shares
}

/// P2: everything depositors could claim is covered by the reserve
pub fn claims_covered(p: &Pool) -> bool {
    let owed = p.depositors.iter().fold(0u128, |acc, d| add_u128(acc, owed_to(p, d)));
    owed <= p.profit_reserved && p.profit_reserved <= p.profit_balance
}

/// P3: the cumulative point never moves backwards
pub fn point_monotone(before: &Pool, after: &Pool) -> bool {
    after.point >= before.point
}

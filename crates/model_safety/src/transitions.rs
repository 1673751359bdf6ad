//! State transition functions - all total, no panics
//!
//! Inadmissible requests return the input state unchanged, which is how the
//! programs' "reject before mutating" rule shows up in the model.

use crate::distribution::*;
use crate::helpers::{available, owed_to};
use crate::math::*;
use crate::state::*;

/// Admit a position: lock `negative`, collect and reserve `positive`
pub fn lock(mut s: Treasury, strategy: usize, negative: u128, positive: u128) -> Treasury {
    if strategy >= MAX_STRATEGIES || s.locks.is_full() {
        return s;
    }
    let proposed = add_u128(s.locked_by_strategy[strategy], negative);
    if proposed > s.strategy_caps[strategy] {
        return s;
    }
    if available(&s) < negative {
        return s;
    }

    s.balance = add_u128(s.balance, positive);
    s.total_locked = add_u128(s.total_locked, negative);
    s.reserved_premium = add_u128(s.reserved_premium, positive);
    s.locked_by_strategy[strategy] = proposed;
    s.locks.push(Lock {
        strategy,
        negative,
        positive,
        locked: true,
    });
    s
}

/// Release a lock exactly once; unknown or released entries are a no-op
pub fn unlock(mut s: Treasury, idx: usize) -> Treasury {
    if idx >= s.locks.len() || !s.locks[idx].locked {
        return s;
    }
    let (strategy, negative, positive) = {
        let l = &mut s.locks[idx];
        l.locked = false;
        (l.strategy, l.negative, l.positive)
    };
    s.total_locked = sub_u128(s.total_locked, negative);
    s.reserved_premium = sub_u128(s.reserved_premium, positive);
    s.locked_by_strategy[strategy] = sub_u128(s.locked_by_strategy[strategy], negative);
    s
}

/// Settle with a payoff; shortfall drawn from `cover`.
///
/// Aborts (returns `s` unchanged) when the payoff exceeds the locked amount
/// or balance plus cover cannot pay it.
pub fn settle(s: Treasury, idx: usize, payoff: u128, cover: u128) -> Treasury {
    if idx >= s.locks.len() || !s.locks[idx].locked {
        return s;
    }
    if payoff > s.locks[idx].negative {
        return s;
    }
    let shortfall = sub_u128(payoff, s.balance);
    if shortfall > cover {
        return s;
    }
    let mut s = unlock(s, idx);
    s.balance = sub_u128(add_u128(s.balance, shortfall), payoff);
    s
}

/// Add a depositor holding `shares`
pub fn join(mut p: Pool, shares: u128) -> Pool {
    if p.depositors.is_full() {
        return p;
    }
    p.depositors.push(Depositor {
        shares,
        last_point: p.point,
        buffered: 0,
    });
    p.total_shares = add_u128(p.total_shares, shares);
    p
}

/// Change a depositor's shares, buffering what they accrued so far
fn rebase(mut p: Pool, uid: usize, shares: u128) -> Pool {
    let owed = owed_to(&p, &p.depositors[uid]);
    let d = &mut p.depositors[uid];
    p.total_shares = add_u128(sub_u128(p.total_shares, d.shares), shares);
    d.buffered = owed;
    d.last_point = p.point;
    d.shares = shares;
    p
}

pub fn mint(p: Pool, uid: usize, shares: u128) -> Pool {
    if uid >= p.depositors.len() {
        return p;
    }
    let next = add_u128(p.depositors[uid].shares, shares);
    rebase(p, uid, next)
}

pub fn burn(p: Pool, uid: usize, shares: u128) -> Pool {
    if uid >= p.depositors.len() || p.depositors[uid].shares < shares {
        return p;
    }
    let next = sub_u128(p.depositors[uid].shares, shares);
    rebase(p, uid, next)
}

/// Settlement tokens arrive at the pool
pub fn inject(mut p: Pool, amount: u128) -> Pool {
    p.profit_balance = add_u128(p.profit_balance, amount);
    p
}

/// Epoch rollover: distribute unowed profit over current shares
pub fn fix_profit(mut p: Pool) -> Pool {
    let profit = sub_u128(p.profit_balance, p.profit_reserved);
    let inc = match point_increment(profit, p.total_shares) {
        Some(inc) => inc,
        None => return p,
    };
    let handed_out = match distributed_amount(inc, p.total_shares) {
        Some(v) => v,
        None => return p,
    };
    p.point = add_u128(p.point, inc);
    p.profit_reserved = add_u128(p.profit_reserved, handed_out);
    p
}

pub fn accrue(p: Pool, amount: u128) -> Pool {
    fix_profit(inject(p, amount))
}

/// Pay a depositor everything owed; returns the amount paid
pub fn claim(mut p: Pool, uid: usize) -> (Pool, u128) {
    if uid >= p.depositors.len() {
        return (p, 0);
    }
    let owed = owed_to(&p, &p.depositors[uid]);
    let paid = min_u128(owed, p.profit_reserved);
    p.profit_reserved = sub_u128(p.profit_reserved, paid);
    p.profit_balance = sub_u128(p.profit_balance, paid);
    let point = p.point;
    let d = &mut p.depositors[uid];
    d.last_point = point;
    d.buffered = 0;
    (p, paid)
}

/// Shortfall payout from unowed profit only; aborts when not coverable
pub fn pay_out(mut p: Pool, amount: u128) -> Pool {
    let free = sub_u128(p.profit_balance, p.profit_reserved);
    if amount > free {
        return p;
    }
    p.profit_balance = sub_u128(p.profit_balance, amount);
    p
}

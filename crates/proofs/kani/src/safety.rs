//! Kani safety proofs for the locking and distribution invariants

use kani::any;
use model_safety::{helpers::*, transitions::*};
use crate::{adversary::*, generators::*, sanitizer::*};

/// L1/L2/L3: lock bookkeeping survives adversarial sequences
#[kani::proof]
#[kani::unwind(8)]
fn l123_lock_sums_hold_across_sequences() {
    let mut s = any_treasury_consistent().sanitize();
    kani::assume(locked_sum_ok(&s) && strategy_sums_ok(&s) && premium_sum_ok(&s));

    let steps = (any::<u8>() % MAX_STEPS) + 1;
    for _ in 0..steps {
        s = treasury_step(s);
        kani::assert(locked_sum_ok(&s), "L1: total_locked must equal locked negatives");
        kani::assert(strategy_sums_ok(&s), "L2: per-strategy sums must match");
        kani::assert(premium_sum_ok(&s), "L3: reserved premium must match");
    }
}

/// L5: a second unlock of the same entry changes nothing
#[kani::proof]
fn l5_unlock_idempotent() {
    let s = any_treasury_consistent().sanitize();
    let idx = (any::<u8>() as usize) % 2;
    let once = unlock(s, idx);
    let twice = unlock(once.clone(), idx);
    kani::assert(once == twice, "L5: unlock must be exactly-once");
}

/// L6: an uncoverable settlement leaves the state untouched
#[kani::proof]
fn l6_settle_abort_is_atomic() {
    let s = any_treasury_consistent().sanitize();
    let payoff: u128 = (any::<u8>() as u128) % 200;
    let cover: u128 = (any::<u8>() as u128) % 50;
    kani::assume(payoff > s.balance.saturating_add(cover));
    let before = s.clone();
    let after = settle(s, 0, payoff, cover);
    kani::assert(before == after, "L6: failed settlement must not mutate");
}

/// P1/P2/P3: share conservation, covered claims, monotone point
#[kani::proof]
#[kani::unwind(8)]
fn p123_distribution_holds_across_sequences() {
    let mut p = any_pool_bounded().sanitize();
    kani::assume(shares_conserved(&p) && claims_covered(&p));

    let steps = (any::<u8>() % MAX_STEPS) + 1;
    for _ in 0..steps {
        let before = p.clone();
        p = pool_step(p);
        kani::assert(shares_conserved(&p), "P1: shares must be conserved");
        kani::assert(claims_covered(&p), "P2: claims must be covered by the reserve");
        kani::assert(point_monotone(&before, &p), "P3: point must not decrease");
    }
}

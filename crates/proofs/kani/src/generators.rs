//! Generators for arbitrary state (for Kani)

#[cfg(kani)]
use kani::any;
#[cfg(kani)]
use model_safety::state::*;
#[cfg(kani)]
use arrayvec::ArrayVec;

// Small bounds keep SAT solving fast
#[cfg(kani)]
const MAX_VAL: u128 = 100;

#[cfg(kani)]
pub fn any_lock() -> Lock {
    let strategy_raw: u8 = any();
    let negative_raw: u8 = any();
    let positive_raw: u8 = any();

    Lock {
        strategy: (strategy_raw as usize) % MAX_STRATEGIES,
        negative: (negative_raw as u128) % MAX_VAL,
        positive: (positive_raw as u128) % (MAX_VAL / 4),
        locked: any(),
    }
}

/// Treasury whose totals are consistent with its locks
#[cfg(kani)]
pub fn any_treasury_consistent() -> Treasury {
    let mut locks: ArrayVec<Lock, MAX_LOCKS> = ArrayVec::new();
    let _ = locks.try_push(any_lock());
    let _ = locks.try_push(any_lock());

    let mut s = Treasury {
        balance: (any::<u8>() as u128) % (MAX_VAL * 3),
        backstop_credit: (any::<u8>() as u128) % MAX_VAL,
        ..Treasury::default()
    };
    for l in locks.iter().filter(|l| l.locked) {
        s.total_locked += l.negative;
        s.reserved_premium += l.positive;
        s.locked_by_strategy[l.strategy] += l.negative;
    }
    s.locks = locks;
    s
}

#[cfg(kani)]
pub fn any_pool_bounded() -> Pool {
    let mut p = Pool::default();
    for _ in 0..2 {
        let shares = (any::<u8>() as u128) % MAX_VAL;
        let _ = p.depositors.try_push(Depositor {
            shares,
            last_point: 0,
            buffered: 0,
        });
        p.total_shares += shares;
    }
    p.profit_balance = (any::<u8>() as u128) % (MAX_VAL * 2);
    p
}

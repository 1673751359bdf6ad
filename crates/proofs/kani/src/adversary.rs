//! Adversarial step generator

#[cfg(kani)]
use kani::any;
#[cfg(kani)]
use model_safety::{state::*, transitions::*};

#[derive(Clone, Copy)]
pub enum Step {
    Lock,
    Unlock,
    Settle,
    Inject,
    FixProfit,
    Claim,
    Mint,
    Burn,
}

#[cfg(kani)]
impl kani::Arbitrary for Step {
    fn any() -> Self {
        let choice: u8 = any();
        match choice % 8 {
            0 => Step::Lock,
            1 => Step::Unlock,
            2 => Step::Settle,
            3 => Step::Inject,
            4 => Step::FixProfit,
            5 => Step::Claim,
            6 => Step::Mint,
            _ => Step::Burn,
        }
    }
}

#[cfg(kani)]
pub fn treasury_step(s: Treasury) -> Treasury {
    let step: Step = any();
    let idx = (any::<u8>() as usize) % MAX_LOCKS;
    let amount = (any::<u8>() as u128) % 100;
    match step {
        Step::Lock => lock(s, (any::<u8>() as usize) % MAX_STRATEGIES, amount, amount / 4),
        Step::Unlock => unlock(s, idx),
        Step::Settle => settle(s, idx, amount, (any::<u8>() as u128) % 100),
        _ => s,
    }
}

#[cfg(kani)]
pub fn pool_step(p: Pool) -> Pool {
    let step: Step = any();
    let uid = (any::<u8>() as usize) % MAX_DEPOSITORS;
    let amount = (any::<u8>() as u128) % 100;
    match step {
        Step::Inject => inject(p, amount),
        Step::FixProfit => fix_profit(p),
        Step::Claim => claim(p, uid).0,
        Step::Mint => mint(p, uid, amount),
        Step::Burn => burn(p, uid, amount),
        _ => p,
    }
}

//! Bridge between treasury state and the verified `model_safety` types
//!
//! The model is bounded (`MAX_LOCKS` positions, `MAX_STRATEGIES`
//! strategies) so only small treasuries convert. Tests use the bridge to
//! check that production settlement agrees with the proven transitions.
//!
//! | Production | Model |
//! |------------|-------|
//! | ledger balance of the treasury account | `Treasury.balance` |
//! | `Vault.backstop_credit` | `Treasury.backstop_credit` |
//! | registry order of `StrategyId` | strategy index |
//! | `LimitController` cap (absent = `u128::MAX`) | `strategy_caps[k]` |
//! | `LockedPosition` | `Lock` (same order as position ids) |

use arrayvec::ArrayVec;
use bulwark_common::{StrategyId, TokenLedger};
use model_safety::{Lock, MAX_LOCKS, MAX_STRATEGIES};

use super::Treasury;

/// Model index of `strategy`, if it fits in the model
pub fn strategy_index(treasury: &Treasury, strategy: StrategyId) -> Option<usize> {
    treasury
        .strategies
        .iter()
        .position(|e| e.id == strategy)
        .filter(|k| *k < MAX_STRATEGIES)
}

/// Convert to a model treasury; `None` when the state exceeds the model's bounds
pub fn treasury_to_model(treasury: &Treasury, ledger: &TokenLedger) -> Option<model_safety::Treasury> {
    if treasury.strategies.len() > MAX_STRATEGIES || treasury.positions.len() > MAX_LOCKS {
        return None;
    }

    let mut locked_by_strategy = [0u128; MAX_STRATEGIES];
    let mut strategy_caps = [u128::MAX; MAX_STRATEGIES];
    for (k, entry) in treasury.strategies.iter().enumerate() {
        locked_by_strategy[k] = treasury.vault.locked_by(entry.id);
        if let Some(cap) = treasury.limits.cap(entry.id) {
            strategy_caps[k] = cap;
        }
    }

    let mut locks = ArrayVec::<Lock, MAX_LOCKS>::new();
    for p in treasury.positions.iter() {
        locks.push(Lock {
            strategy: strategy_index(treasury, p.strategy)?,
            negative: p.negative_exposure,
            positive: p.positive_exposure,
            locked: p.is_locked(),
        });
    }

    Some(model_safety::Treasury {
        balance: treasury.total_balance(ledger),
        backstop_credit: treasury.vault.backstop_credit,
        total_locked: treasury.vault.total_locked,
        reserved_premium: treasury.vault.reserved_premium,
        locked_by_strategy,
        strategy_caps,
        locks,
    })
}

/// Run the model's invariant checks over a convertible treasury
pub fn model_invariants_hold(treasury: &Treasury, ledger: &TokenLedger) -> Option<bool> {
    let m = treasury_to_model(treasury, ledger)?;
    Some(
        model_safety::locked_sum_ok(&m)
            && model_safety::strategy_sums_ok(&m)
            && model_safety::premium_sum_ok(&m),
    )
}

//! Randomized operation sequences against the combined system
//!
//! After every step, whether it succeeded or not:
//! - treasury totals equal the sums over Locked positions
//! - backstop shares and exit rows agree, the point never decreases
//! - every depositor's claimable profit is covered by the reserve
//! - no tokens are created or destroyed

use bulwark_integration_tests::*;
use model_safety::distribution::{accrued, point_increment};
use model_safety::math::mul_div_floor;
use proptest::prelude::{prop, prop_assert, prop_assert_eq, prop_oneof, proptest, Just, ProptestConfig, TestCaseError};
use proptest::strategy::Strategy as _;

const HOLDERS: usize = 3;
const DEPOSITORS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Create { holder: usize, amount: u128, period: u64 },
    Settle { slot: usize, payoff: u64 },
    Unlock { slot: usize },
    Advance { secs: u64 },
    Provide { who: usize, amount: u128 },
    Withdraw { who: usize, pct: u128 },
    Claim { who: usize },
    FixProfit,
    Surplus { amount: u128 },
    Replenish,
}

fn op_strategy() -> impl proptest::strategy::Strategy<Value = Op> {
    prop_oneof![
        (0..HOLDERS, 1u128..500, 1u64..10).prop_map(|(holder, amount, days)| Op::Create {
            holder,
            amount,
            period: days * DAY,
        }),
        (0usize..16, 0u64..600).prop_map(|(slot, payoff)| Op::Settle { slot, payoff }),
        (0usize..16).prop_map(|slot| Op::Unlock { slot }),
        (1u64..4 * DAY).prop_map(|secs| Op::Advance { secs }),
        (0..DEPOSITORS, 1u128..1_000).prop_map(|(who, amount)| Op::Provide { who, amount }),
        (0..DEPOSITORS, 1u128..=100).prop_map(|(who, pct)| Op::Withdraw { who, pct }),
        (0..DEPOSITORS).prop_map(|who| Op::Claim { who }),
        Just(Op::FixProfit),
        (1u128..300).prop_map(|amount| Op::Surplus { amount }),
        Just(Op::Replenish),
    ]
}

struct World {
    h: Harness,
    holders: Vec<AccountId>,
    depositors: Vec<(AccountId, DepositorId)>,
    positions: Vec<(PositionId, AccountId)>,
}

impl World {
    fn new() -> Self {
        let config = TreasuryConfig {
            benchmark: 500,
            backstop_credit: 1_000,
            total_cap: Some(3_000),
            replenish_on_shortfall: true,
        };
        let mut h = Harness::new(config, 2_000, 20);
        let holders = (0..HOLDERS).map(|_| h.account(10_000, 0)).collect();
        let depositors = (0..DEPOSITORS)
            .map(|_| (h.account(0, 5_000), DepositorId::NEW))
            .collect();
        Self {
            h,
            holders,
            depositors,
            positions: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Op) {
        let h = &mut self.h;
        match *op {
            Op::Create { holder, amount, period } => {
                let who = self.holders[holder];
                if let Ok(id) = h.create(SCRIPTED, &who, amount, period) {
                    self.positions.push((id, who));
                }
            }
            Op::Settle { slot, payoff } => {
                if let Some(&(id, who)) = self.positions.get(slot) {
                    h.scripted.set_payoff(payoff);
                    let _ = h.settle(id, &who);
                }
            }
            Op::Unlock { slot } => {
                if let Some(&(id, _)) = self.positions.get(slot) {
                    let _ = h.unlock(id);
                }
            }
            Op::Advance { secs } => h.advance(secs),
            Op::Provide { who, amount } => {
                let (account, id) = self.depositors[who];
                if let Ok(new_id) = h.provide(&account, id, amount) {
                    self.depositors[who].1 = new_id;
                }
            }
            Op::Withdraw { who, pct } => {
                let (account, id) = self.depositors[who];
                if let Ok(position) = h.backstop.depositor(id) {
                    let shares = position.share_amount * pct / 100;
                    let _ = h.withdraw(&account, id, shares);
                }
            }
            Op::Claim { who } => {
                let (account, id) = self.depositors[who];
                let _ = h.claim(&account, id);
            }
            Op::FixProfit => {
                let _ = h.fix_profit();
            }
            Op::Surplus { amount } => {
                let pool = *h.backstop.account();
                let _ = h
                    .treasury
                    .withdraw_surplus(&h.treasury_admin, &mut h.ledger, &pool, amount);
            }
            Op::Replenish => {
                let _ = h.treasury.replenish(&mut h.ledger, &mut h.backstop, h.now);
            }
        }
    }

    fn check(&self, settlement_supply: u128, risk_supply: u128) -> Result<(), TestCaseError> {
        let h = &self.h;
        h.treasury.check_invariants().map_err(TestCaseError::fail)?;
        h.backstop.check_invariants(&h.ledger).map_err(TestCaseError::fail)?;

        let locked: u128 = h
            .treasury
            .positions()
            .iter()
            .filter(|p| p.is_locked())
            .map(|p| p.negative_exposure)
            .sum();
        prop_assert_eq!(locked, h.treasury.total_locked());
        if let Some(ok) = model_invariants_hold(&h.treasury, &h.ledger) {
            prop_assert!(ok, "model rejects treasury state");
        }
        if let Some(cap) = h.treasury.limits().total_cap() {
            prop_assert!(h.treasury.total_locked() <= cap);
        }

        let owed: u128 = h
            .backstop
            .depositors()
            .map(|d| h.backstop.pending_profit(d.id).unwrap_or(0))
            .sum();
        prop_assert!(
            owed <= h.backstop.profit_reserved(),
            "owed {} > reserved {}",
            owed,
            h.backstop.profit_reserved()
        );
        let pool_settlement = h.ledger.balance(Token::Settlement, h.backstop.account());
        prop_assert!(h.backstop.profit_reserved() <= pool_settlement);

        prop_assert_eq!(h.ledger.total_supply(Token::Settlement), settlement_supply);
        prop_assert_eq!(h.ledger.total_supply(Token::Risk), risk_supply);
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariants_hold_under_random_operations(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut world = World::new();
        let settlement_supply = world.h.ledger.total_supply(Token::Settlement);
        let risk_supply = world.h.ledger.total_supply(Token::Risk);
        for op in &ops {
            world.apply(op);
            world.check(settlement_supply, risk_supply)?;
        }
    }

    /// Provide then withdraw everything in the same window returns the
    /// deposit less at most one unit, even after losses moved the share price
    #[test]
    fn prop_round_trip_within_one_unit(first in 1u128..10_000, loss in 0u128..5_000, amount in 1u128..10_000) {
        let config = TreasuryConfig { backstop_credit: 20_000, ..TreasuryConfig::default() };
        let mut h = Harness::new(config, 0, 0);
        let seed = h.account(0, first);
        h.provide(&seed, DepositorId::NEW, first).unwrap();

        let loss = loss.min(first - 1);
        if loss > 0 {
            let holder = h.account(0, 0);
            let id = h.create(SCRIPTED, &holder, loss, DAY).unwrap();
            h.scripted.set_payoff(loss as u64);
            h.settle(id, &holder).unwrap();
        }

        let who = h.account(0, amount);
        match h.provide(&who, DepositorId::NEW, amount) {
            Ok(id) => {
                let shares = h.backstop.depositor(id).unwrap().share_amount;
                let back = h.withdraw(&who, id, shares).unwrap();
                prop_assert!(back <= amount);
                prop_assert!(amount - back <= 1, "deposited {} got {}", amount, back);
            }
            Err(e) => prop_assert_eq!(e, BulwarkError::AmountZero),
        }
    }

    /// Claims split one epoch's profit in proportion to shares, rounded down
    #[test]
    fn prop_profit_split_pro_rata(a in 1u128..100_000, b in 1u128..100_000, profit in 0u128..1_000_000) {
        let mut h = Harness::new(TreasuryConfig::default(), 0, 0);
        let alice = h.account(0, a);
        let bob = h.account(0, b);
        let ida = h.provide(&alice, DepositorId::NEW, a).unwrap();
        let idb = h.provide(&bob, DepositorId::NEW, b).unwrap();

        let pool = *h.backstop.account();
        h.ledger.mint(Token::Settlement, &pool, profit).unwrap();
        h.advance(7 * DAY);
        h.fix_profit().unwrap();

        let ca = h.claim(&alice, ida).unwrap();
        let cb = h.claim(&bob, idb).unwrap();
        let total = a + b;
        prop_assert!(ca + cb <= profit);
        prop_assert!(ca.abs_diff(profit * a / total) <= 1);
        prop_assert!(cb.abs_diff(profit * b / total) <= 1);

        let point = point_increment(profit, total).unwrap();
        prop_assert_eq!(ca, accrued(point, 0, a).unwrap());
        prop_assert_eq!(cb, accrued(point, 0, b).unwrap());
    }

    /// Same split with 18-decimal token amounts, where share * point
    /// products exceed u128
    #[test]
    fn prop_profit_split_token_scale(
        a in 1u128..10_000_000,
        b in 1u128..10_000_000,
        profit in 0u128..10_000_000,
    ) {
        const E18: u128 = 1_000_000_000_000_000_000;
        let (a, b, profit) = (a * E18, b * E18, profit * E18);
        let mut h = Harness::new(TreasuryConfig::default(), 0, 0);
        let alice = h.account(0, a);
        let bob = h.account(0, b);
        let ida = h.provide(&alice, DepositorId::NEW, a).unwrap();
        let idb = h.provide(&bob, DepositorId::NEW, b).unwrap();

        let pool = *h.backstop.account();
        h.ledger.mint(Token::Settlement, &pool, profit).unwrap();
        h.advance(7 * DAY);
        h.fix_profit().unwrap();

        let ca = h.claim(&alice, ida).unwrap();
        let cb = h.claim(&bob, idb).unwrap();
        let total = a + b;
        prop_assert!(ca + cb <= profit);
        // point truncation loses at most one unit per POINT_SCALE of shares
        let slack = total / 1_000_000_000_000_000_000 + 1;
        prop_assert!(mul_div_floor(profit, a, total).unwrap() - ca <= slack);
        prop_assert!(mul_div_floor(profit, b, total).unwrap() - cb <= slack);
        h.assert_invariants();
    }
}

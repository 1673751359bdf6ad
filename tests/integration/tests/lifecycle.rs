//! End-to-end flows across treasury and backstop
//!
//! Scenarios:
//! - Premiums withdrawn as surplus become depositor profit
//! - Shortfall escalates through the converter at the epoch's rate
//! - A backstop that cannot cover aborts settlement with nothing moved
//! - A scheduled rate takes effect for the next epoch's payouts
//! - Depositors can only exit inside the window
//! - Call spread priced from the feed, settled in and out of the money

use bulwark_integration_tests::*;

/// Depositors 1000 and 500 share 150 of premium as 100 and 50
#[test]
fn test_premium_surplus_becomes_depositor_profit() {
    let config = TreasuryConfig { backstop_credit: 300, ..TreasuryConfig::default() };
    let mut h = Harness::new(config, 0, 50);
    let alice = h.account(0, 1_000);
    let bob = h.account(0, 500);
    let holder = h.account(150, 0);

    let a = h.provide(&alice, DepositorId::NEW, 1_000).unwrap();
    let b = h.provide(&bob, DepositorId::NEW, 500).unwrap();

    let id = h.create(SCRIPTED, &holder, 300, 2 * DAY).unwrap();
    assert_eq!(h.treasury_balance(), 150);
    assert_eq!(h.treasury.reserved_premium(), 150);

    // Premium stays reserved while the position is open
    let pool = *h.backstop.account();
    let err = h
        .treasury
        .withdraw_surplus(&h.treasury_admin, &mut h.ledger, &pool, 150)
        .unwrap_err();
    assert!(matches!(err, BulwarkError::InsufficientLiquidity { .. }));

    h.advance(2 * DAY + 1);
    h.unlock(id).unwrap();
    h.treasury
        .withdraw_surplus(&h.treasury_admin, &mut h.ledger, &pool, 150)
        .unwrap();
    assert_eq!(h.treasury_balance(), 0);

    h.advance(5 * DAY);
    h.fix_profit().unwrap();
    assert_eq!(h.backstop.profit_reserved(), 150);
    assert_eq!(h.claim(&alice, a).unwrap(), 100);
    assert_eq!(h.claim(&bob, b).unwrap(), 50);
    assert_eq!(h.settlement(&alice), 100);
    assert_eq!(h.settlement(&bob), 50);
    assert_eq!(h.backstop.profit_reserved(), 0);
    h.assert_invariants();
}

/// Lock 300 with premium 30 and no own funds; payoff 200 draws 170 from
/// the converter at 1:1
#[test]
fn test_shortfall_converts_pool_risk() {
    let config = TreasuryConfig { backstop_credit: 1_000, ..TreasuryConfig::default() };
    let mut h = Harness::new(config, 0, 10);
    let alice = h.account(0, 500);
    let holder = h.account(30, 0);
    let converter = h.converter;
    let a = h.provide(&alice, DepositorId::NEW, 500).unwrap();
    let converter_before = h.settlement(&converter);

    let id = h.create(SCRIPTED, &holder, 300, DAY).unwrap();
    h.scripted.set_payoff(200);
    assert_eq!(h.settle(id, &holder).unwrap(), 200);

    assert_eq!(h.settlement(&holder), 200);
    assert_eq!(h.treasury_balance(), 0);
    assert_eq!(h.backstop.risk_balance(&h.ledger), 330);
    assert_eq!(h.risk(&converter), 170);
    assert_eq!(h.settlement(&converter), converter_before - 170);

    let events = h.backstop.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::PaidOut { amount: 170, from_profit: 0, risk_converted: 170, .. }
    )));

    // Depositor absorbs the loss
    assert_eq!(h.withdraw(&alice, a, 500).unwrap(), 330);
    h.assert_invariants();
}

#[test]
fn test_uncovered_shortfall_aborts_settlement() {
    let backstop = BackstopConfig { converter: None, ..BackstopConfig::default() };
    let mut h = Harness::with_configs(
        TreasuryConfig { backstop_credit: 500, ..TreasuryConfig::default() },
        backstop,
        50,
        0,
    );
    let holder = h.account(0, 0);
    let id = h.create(SCRIPTED, &holder, 300, DAY).unwrap();
    h.scripted.set_payoff(300);

    let err = h.settle(id, &holder).unwrap_err();
    assert_eq!(err, BulwarkError::BackstopInsufficient { requested: 250 });
    assert!(h.treasury.position(id).unwrap().is_locked());
    assert_eq!(h.treasury.total_locked(), 300);
    assert_eq!(h.treasury_balance(), 50);
    assert_eq!(h.settlement(&holder), 0);
    h.assert_invariants();

    // Unreserved pool profit now covers it
    let pool = *h.backstop.account();
    h.ledger.mint(Token::Settlement, &pool, 250).unwrap();
    assert_eq!(h.settle(id, &holder).unwrap(), 300);
    assert_eq!(h.treasury.total_locked(), 0);
    assert_eq!(h.backstop.available_profit(&h.ledger), 0);
    h.assert_invariants();
}

/// At 2 settlement per risk token, a 200 shortfall costs 100 risk
#[test]
fn test_scheduled_rate_prices_next_epoch_payouts() {
    let config = TreasuryConfig { backstop_credit: 1_000, ..TreasuryConfig::default() };
    let mut h = Harness::new(config, 0, 0);
    let alice = h.account(0, 1_000);
    h.provide(&alice, DepositorId::NEW, 1_000).unwrap();

    h.backstop.set_next_rate(&h.backstop_admin, 2 * RATE_SCALE).unwrap();
    assert_eq!(h.backstop.current_epoch().conversion_rate, RATE_SCALE);

    h.advance(7 * DAY);
    let epoch = h.fix_profit().unwrap();
    assert_eq!(epoch, EpochId(2));
    assert_eq!(h.backstop.current_epoch().conversion_rate, 2 * RATE_SCALE);

    let holder = h.account(0, 0);
    let id = h.create(SCRIPTED, &holder, 200, DAY).unwrap();
    h.scripted.set_payoff(200);
    h.settle(id, &holder).unwrap();
    assert_eq!(h.backstop.risk_balance(&h.ledger), 900);
    let converter = h.converter;
    assert_eq!(h.risk(&converter), 100);
    h.assert_invariants();
}

#[test]
fn test_depositor_exit_window() {
    let mut h = Harness::new(TreasuryConfig::default(), 0, 0);
    let alice = h.account(0, 100);
    let a = h.provide(&alice, DepositorId::NEW, 100).unwrap();

    h.advance(5 * DAY);
    assert_eq!(h.withdraw(&alice, a, 100).unwrap_err(), BulwarkError::WindowClosed);
    assert_eq!(h.provide(&alice, a, 1).unwrap_err(), BulwarkError::WindowClosed);

    // Still closed until someone rolls the epoch
    h.advance(2 * DAY);
    assert_eq!(h.withdraw(&alice, a, 100).unwrap_err(), BulwarkError::WindowClosed);
    h.fix_profit().unwrap();
    assert_eq!(h.withdraw(&alice, a, 100).unwrap(), 100);
    assert_eq!(h.risk(&alice), 100);
    assert_eq!(h.backstop.total_shares(), 0);

    let exited = h.backstop.share_ledger().out_share(EpochId(2), a);
    assert_eq!(exited, 100);
    h.assert_invariants();
}

/// ETH at $2000, 10% wide spread: 1000 units lock 200_000 and cost 40_000
#[test]
fn test_call_spread_end_to_end() {
    let mut h = Harness::new(TreasuryConfig::default(), 1_000_000, 0);
    let holder = h.account(80_000, 0);

    let id = h.create(SPREAD, &holder, 1_000, 3 * DAY).unwrap();
    let position = h.treasury.position(id).unwrap().clone();
    assert_eq!(position.aux, 2_000 * u128::from(USD));
    assert_eq!(position.negative_exposure, 200_000);
    assert_eq!(position.positive_exposure, 40_000);
    assert_eq!(h.settlement(&holder), 40_000);

    h.feed.set(2_100 * USD);
    h.advance(DAY);
    assert_eq!(h.settle(id, &holder).unwrap(), 100_000);
    assert_eq!(h.settlement(&holder), 140_000);

    // Past the cap the payoff is the whole lock
    let capped = h.create(SPREAD, &holder, 100, 3 * DAY).unwrap();
    let locked = h.treasury.position(capped).unwrap().negative_exposure;
    h.feed.set(5_000 * USD);
    assert_eq!(h.settle(capped, &holder).unwrap(), locked);

    // Expired positions pay nothing and are released by anyone
    let late = h.create(SPREAD, &holder, 100, DAY).unwrap();
    h.advance(DAY + 1);
    assert_eq!(h.treasury.expired_locked(h.now), vec![(late, h.now - 1)]);
    h.unlock(late).unwrap();
    assert_eq!(h.treasury.total_locked(), 0);
    h.assert_invariants();
}

#[test]
fn test_events_trace_a_position() {
    let mut h = Harness::new(TreasuryConfig::default(), 1_000, 10);
    let holder = h.account(100, 0);
    let id = h.create(SCRIPTED, &holder, 100, DAY).unwrap();
    h.scripted.set_payoff(40);
    h.settle(id, &holder).unwrap();

    let events = h.treasury.take_events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], Event::Locked { id: i, negative_exposure: 100, positive_exposure: 10, .. } if i == id));
    assert!(matches!(events[1], Event::Unlocked { id: i, .. } if i == id));
    assert!(matches!(events[2], Event::Paid { amount: 40, from_backstop: 0, .. }));
    assert!(h.treasury.take_events().is_empty());
}

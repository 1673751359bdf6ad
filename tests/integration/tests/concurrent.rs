//! Concurrent callers sharing one system behind a mutex, the way the
//! keeper holds it

use std::sync::Arc;

use bulwark_integration_tests::*;
use tokio::sync::Mutex;

#[tokio::test]
async fn test_concurrent_holders_respect_total_cap() {
    let config = TreasuryConfig {
        total_cap: Some(1_000),
        ..TreasuryConfig::default()
    };
    let mut h = Harness::new(config, 10_000, 10);
    let holders: Vec<_> = (0..16).map(|_| h.account(100, 0)).collect();
    let world = Arc::new(Mutex::new(h));

    let mut tasks = Vec::new();
    for holder in holders {
        let world = Arc::clone(&world);
        tasks.push(tokio::spawn(async move {
            let mut h = world.lock().await;
            h.create(SCRIPTED, &holder, 100, DAY)
        }));
    }

    let mut created = 0;
    let mut refused = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(BulwarkError::TotalLimitExceeded) => refused += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(created, 10);
    assert_eq!(refused, 6);

    let h = world.lock().await;
    assert_eq!(h.treasury.total_locked(), 1_000);
    assert_eq!(h.treasury.reserved_premium(), 100);
    h.assert_invariants();
}

#[tokio::test]
async fn test_keeper_style_sweep_races_holders() {
    let mut h = Harness::new(TreasuryConfig::default(), 10_000, 0);
    let holders: Vec<_> = (0..8).map(|_| h.account(0, 0)).collect();
    let mut ids = Vec::new();
    for holder in &holders {
        ids.push(h.create(SCRIPTED, holder, 100, DAY).unwrap());
    }
    h.scripted.set_payoff(10);
    h.advance(DAY);
    let world = Arc::new(Mutex::new(h));

    // Holders settle at the last valid second while a sweeper unlocks
    // whatever has expired a second later
    let mut tasks = Vec::new();
    for (holder, id) in holders.iter().copied().zip(ids.iter().copied()) {
        let world = Arc::clone(&world);
        tasks.push(tokio::spawn(async move {
            let mut h = world.lock().await;
            h.settle(id, &holder).map(|_| ())
        }));
    }
    let sweeper = {
        let world = Arc::clone(&world);
        tokio::spawn(async move {
            let mut h = world.lock().await;
            h.advance(1);
            let expired = h.treasury.expired_locked(h.now);
            for (id, _) in &expired {
                h.unlock(*id).unwrap();
            }
            expired.len()
        })
    };

    let mut settled = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => settled += 1,
            Err(BulwarkError::AlreadySettled) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    let swept = sweeper.await.unwrap();
    assert_eq!(settled + swept, holders.len());

    let h = world.lock().await;
    assert_eq!(h.treasury.total_locked(), 0);
    assert_eq!(h.treasury.positions().locked().count(), 0);
    h.assert_invariants();
}

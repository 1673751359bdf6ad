//! Bulwark Keeper
//!
//! Off-chain maintenance service: unlocks expired positions, rolls backstop
//! epochs when they elapse, keeps the treasury at its benchmark and reports
//! health.

mod config;
mod health;
mod priority_queue;
mod protocol;

use anyhow::{Context, Result};
use config::KeeperConfig;
use health::HealthReport;
use priority_queue::ExpiryQueue;
use protocol::{run_tick, Protocol};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tokio::time;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Some(path) = init_path() {
        return KeeperConfig::write_default(&path);
    }

    log::info!("Starting Bulwark Keeper");

    let config = KeeperConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using default local config", e);
        KeeperConfig::default_local()
    });

    let protocol = Protocol::from_config(&config, unix_now()?).context("Failed to build protocol")?;
    let mut queue = ExpiryQueue::new();
    protocol.seed_queue(&mut queue);
    let protocol = Arc::new(Mutex::new(protocol));

    log::info!(
        "Keeper service started. Polling every {}s, up to {} unlocks per tick",
        config.poll_interval_secs,
        config.max_unlocks_per_tick
    );

    let mut interval = time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = match unix_now() {
                    Ok(now) => now,
                    Err(e) => {
                        log::error!("Clock error: {:#}", e);
                        continue;
                    }
                };
                tick(&protocol, &mut queue, config.max_unlocks_per_tick, now).await;
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
                return Ok(());
            }
        }
    }
}

async fn tick(protocol: &Arc<Mutex<Protocol>>, queue: &mut ExpiryQueue, max_unlocks: usize, now: u64) {
    let mut guard = protocol.lock().await;
    let outcome = run_tick(&mut guard, queue, max_unlocks, now);
    if outcome != Default::default() {
        log::info!("Tick at {}: {:?}", now, outcome);
    }

    let report = HealthReport::collect(&guard, now);
    drop(guard);

    log::info!("Health: {}", report.summary());
    if report.uncovered > 0 {
        log::warn!("Backstop cannot cover {} of locked exposure", report.uncovered);
    }
    match serde_json::to_string(&report) {
        Ok(json) => log::debug!("Health report: {}", json),
        Err(e) => log::error!("Failed to serialize health report: {}", e),
    }
    if !queue.is_empty() {
        log::debug!("Expiry queue size: {}", queue.len());
        if let Some((id, expiration)) = queue.peek() {
            log::debug!("Next expiry: {} at {}", id, expiration);
        }
    }
}

/// `bulwark-keeper init [path]` writes a default config and exits
fn init_path() -> Option<String> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("init") => Some(args.next().unwrap_or_else(|| "keeper-config.toml".to_string())),
        _ => None,
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock before Unix epoch")?
        .as_secs())
}

//! Health snapshot of the treasury and backstop

use bulwark_common::{EpochId, ShortfallCover, StrategyId};
use bulwark_treasury::PriceFeed;
use model_safety::math::{add_u128, mul_div_floor, sub_u128};
use serde::Serialize;

use crate::protocol::Protocol;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub now: u64,
    pub total_balance: u128,
    pub available: u128,
    pub total_locked: u128,
    pub reserved_premium: u128,
    /// Locked exposure over balance plus credit, in basis points
    pub utilisation_bps: u128,
    /// Settlement tokens the backstop could deliver now
    pub backstop_coverage: u128,
    /// Locked exposure not covered by the treasury's own balance
    pub shortfall_exposure: u128,
    /// Shortfall exposure the backstop could not cover
    pub uncovered: u128,
    pub open_positions: usize,
    pub epoch: EpochId,
    pub total_shares: u128,
    /// Current price of each strategy's feed; failed reads are left out
    pub reference_prices: Vec<(StrategyId, u128)>,
}

impl HealthReport {
    pub fn collect(protocol: &Protocol, now: u64) -> Self {
        let treasury = &protocol.treasury;
        let ledger = &protocol.ledger;

        let total_balance = treasury.total_balance(ledger);
        let total_locked = treasury.total_locked();
        let capacity = add_u128(total_balance, treasury.backstop_credit());
        let utilisation_bps = if capacity == 0 {
            0
        } else {
            mul_div_floor(total_locked, 10_000, capacity).unwrap_or(u128::MAX)
        };
        let backstop_coverage = protocol.backstop.coverage(ledger);
        let shortfall_exposure = sub_u128(total_locked, total_balance);

        Self {
            now,
            total_balance,
            available: treasury.available(ledger),
            total_locked,
            reserved_premium: treasury.reserved_premium(),
            utilisation_bps,
            backstop_coverage,
            shortfall_exposure,
            uncovered: sub_u128(shortfall_exposure, backstop_coverage),
            open_positions: treasury.positions().locked().count(),
            epoch: protocol.backstop.current_epoch().id,
            total_shares: protocol.backstop.total_shares(),
            reference_prices: protocol
                .feeds
                .iter()
                .filter_map(|(id, feed)| feed.price(now).ok().map(|price| (*id, price)))
                .collect(),
        }
    }

    /// One-line summary for the info log
    pub fn summary(&self) -> String {
        format!(
            "locked {} / balance {} ({} bps), available {}, coverage {}, uncovered {}, open {}",
            self.total_locked,
            self.total_balance,
            self.utilisation_bps,
            self.available,
            self.backstop_coverage,
            self.uncovered,
            self.open_positions
        )
    }
}

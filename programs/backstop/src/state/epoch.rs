//! Epoch table entries

use bulwark_common::EpochId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub id: EpochId,
    pub start: u64,
    /// Risk→settlement rate fixed for the whole epoch (scaled by `RATE_SCALE`)
    pub conversion_rate: u128,
    /// Profit per share accumulated since the pool opened (scaled by `POINT_SCALE`)
    pub cumulative_point: u128,
    pub total_share_out: u128,
    pub risk_token_out: u128,
    pub profit_token_out: u128,
    pub closed_at: Option<u64>,
}

impl Epoch {
    pub fn open(id: EpochId, start: u64, conversion_rate: u128, cumulative_point: u128) -> Self {
        Self {
            id,
            start,
            conversion_rate,
            cumulative_point,
            total_share_out: 0,
            risk_token_out: 0,
            profit_token_out: 0,
            closed_at: None,
        }
    }

    /// Entry/exit window is open while less than `window` seconds have passed
    pub fn window_open(&self, now: u64, window: u64) -> bool {
        now >= self.start && now - self.start < window
    }

    pub fn elapsed(&self, now: u64, epoch_duration: u64) -> bool {
        now >= self.start.saturating_add(epoch_duration)
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

//! Strategy modules price positions and compute their realized payoff

pub mod spread;

pub use spread::*;

use bulwark_common::{AccountId, BulwarkError};
use serde::{Deserialize, Serialize};

use crate::state::LockedPosition;

/// What a holder asks a strategy to price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub holder: AccountId,
    pub amount: u128,
    /// Requested lifetime in seconds
    pub period: u64,
    /// Strategy-defined parameter (a strike for spreads, 0 = at the money)
    pub aux: u128,
    pub now: u64,
}

/// Exposure bounds a strategy commits to for one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub expiration: u64,
    /// Worst case for the pool; locked until the position settles
    pub negative_exposure: u128,
    /// Best case for the pool; the premium the holder pays
    pub positive_exposure: u128,
    /// Parameter the position is stored with (e.g. the resolved strike)
    pub aux: u128,
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn quote(&self, req: &QuoteRequest) -> Result<Quote, BulwarkError>;

    /// Amount owed to the holder if settled at `now`; 0 when worthless or
    /// outside the exercise window
    fn realized_payoff(&self, position: &LockedPosition, now: u64) -> Result<u128, BulwarkError>;
}

/// Source of reference prices, scaled by [`PRICE_SCALE`]
pub trait PriceFeed: Send + Sync {
    fn price(&self, now: u64) -> Result<u128, BulwarkError>;
}

/// Fixed-point scale of feed prices (1e8)
pub const PRICE_SCALE: u128 = 100_000_000;

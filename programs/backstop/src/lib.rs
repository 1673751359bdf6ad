//! Backstop pool: secondary liquidity for treasury shortfalls
//!
//! Depositors stake the risk token during an epoch's entry/exit window and
//! share the pool's realized settlement-token profit pro rata through a
//! cumulative point. The treasury draws from the pool only through
//! [`bulwark_common::ShortfallCover`] with the pool's `PayoutCap`.

pub mod state;
pub mod instructions;

pub use state::*;
pub use instructions::*;

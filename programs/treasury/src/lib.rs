//! Treasury: collateral locking and settlement
//!
//! Positions are priced by pluggable [`strategy::Strategy`] modules, admitted
//! against per-strategy and total caps, and settled from the treasury
//! balance. Shortfalls escalate to a [`bulwark_common::ShortfallCover`].

pub mod strategy;
pub mod state;
pub mod instructions;

pub use strategy::*;
pub use state::*;
pub use instructions::*;

//! Pure Rust safety model for Kani verification
//! No I/O, no unwrap/panic, all functions total
//!
//! The treasury and backstop programs use `math` and `distribution` directly,
//! so the arithmetic that moves balances is the arithmetic that is proven.

pub mod state;
pub mod math;
pub mod distribution;
pub mod helpers;
pub mod transitions;

// Re-export commonly used types
pub use state::*;
pub use helpers::*;
pub use transitions::*;

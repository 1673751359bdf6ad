//! Shared types for the treasury and backstop programs

pub mod types;
pub mod error;
pub mod ledger;
pub mod capability;
pub mod guard;
pub mod event;
pub mod cover;

pub use types::*;
pub use error::*;
pub use ledger::*;
pub use capability::*;
pub use guard::*;
pub use event::*;
pub use cover::*;

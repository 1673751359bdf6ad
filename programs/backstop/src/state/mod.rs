pub mod config;
pub mod epoch;
pub mod share_ledger;
pub mod pool;

pub use config::*;
pub use epoch::*;
pub use share_ledger::*;
pub use pool::*;

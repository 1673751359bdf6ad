//! Backstop entry points

pub mod provide;
pub mod withdraw;
pub mod claim;
pub mod fix_profit;
pub mod pay_out;
pub mod admin;

pub use provide::*;
pub use withdraw::*;
pub use claim::*;
pub use fix_profit::*;
pub use pay_out::*;
pub use admin::*;

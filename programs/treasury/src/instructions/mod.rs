//! Treasury entry points

pub mod create;
pub mod settle;
pub mod admin;

pub use create::*;
pub use settle::*;
pub use admin::*;

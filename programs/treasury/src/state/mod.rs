pub mod config;
pub mod vault;
pub mod position;
pub mod registry;
pub mod limits;
pub mod treasury;
pub mod model_bridge;

pub use config::*;
pub use vault::*;
pub use position::*;
pub use registry::*;
pub use limits::*;
pub use treasury::*;
pub use model_bridge::*;

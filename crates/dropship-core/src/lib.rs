pub mod config;
pub mod types;

pub use config::{DeployMode, DropshipConfig};
pub use types::*;

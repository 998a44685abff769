pub mod atomic;
pub mod config;
pub mod paths;
pub mod types;

pub use atomic::write_atomic;
pub use config::{ConfigError, Settings};
pub use paths::MednovaPaths;
pub use types::*;

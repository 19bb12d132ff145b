//! Process configuration: TOML file format and loader.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader};
pub use types::{ConfigFile, LoggingConfig, VaultConfig};

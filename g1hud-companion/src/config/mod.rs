//! Configuration loading and parsing
//!
//! Loads the companion configuration from a TOML file, or from the
//! embedded default when no file is given.

pub mod loader;
pub mod types;

pub use loader::{load_config, log_config_summary, parse_config, ConfigError, EMBEDDED_CONFIG};
pub use types::{CompanionConfig, LinkKind, LinkSection};

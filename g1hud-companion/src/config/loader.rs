//! Configuration loader
//!
//! Reads the TOML file given on the command line, or falls back to the
//! embedded default. Parsed values are range-checked before use.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use super::types::{CompanionConfig, LinkKind};

/// Embedded default configuration (compiled into the binary)
pub const EMBEDDED_CONFIG: &str = include_str!("../../companion.toml");

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(g1hud_core::config::ConfigError),
    #[error("[link] address must be set for the bridge link")]
    MissingBridgeAddress,
    #[error("[feeds] refresh_s must be greater than zero")]
    ZeroRefresh,
}

/// Parse and validate a configuration document
pub fn parse_config(text: &str) -> Result<CompanionConfig, ConfigError> {
    let config: CompanionConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &CompanionConfig) -> Result<(), ConfigError> {
    config.hud().validate().map_err(ConfigError::Invalid)?;
    if config.link.kind == LinkKind::Bridge && config.link.address.trim().is_empty() {
        return Err(ConfigError::MissingBridgeAddress);
    }
    if config.feeds.refresh_s == 0 {
        return Err(ConfigError::ZeroRefresh);
    }
    Ok(())
}

/// Load the configuration from `path`, or the embedded default
///
/// Runs before logging is set up, so it reports through its result only.
pub fn load_config(path: Option<&Path>) -> Result<CompanionConfig, ConfigError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_config(&text)
        }
        None => parse_config(EMBEDDED_CONFIG),
    }
}

/// Log where the configuration came from and its main values
pub fn log_config_summary(path: Option<&Path>, config: &CompanionConfig) {
    match path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No configuration file given, using embedded defaults"),
    }
    debug!(
        "Config: tick={}ms auto_off={} (threshold {} ticks) lookahead={}min clock={:?}",
        config.scheduler.tick_ms,
        config.auto_off.enabled,
        config.auto_off.threshold_ticks,
        config.calendar.lookahead_minutes,
        config.clock.format,
    );
    debug!(
        "Link: {:?} ({}), data dir {}",
        config.link.kind,
        config.link.address,
        config.storage.data_dir.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use g1hud_core::config::{ClockFormat, HudConfig};

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = parse_config(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config, CompanionConfig::default());
        assert_eq!(config.hud(), HudConfig::default());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), CompanionConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [auto_off]
            enabled = true

            [clock]
            format = "12h"

            [link]
            kind = "bridge"
            address = "10.0.0.2:9000"
            "#,
        )
        .unwrap();

        assert!(config.auto_off.enabled);
        assert_eq!(config.auto_off.threshold_ticks, 10);
        assert_eq!(config.clock.format, ClockFormat::H12);
        assert_eq!(config.link.kind, LinkKind::Bridge);
        assert_eq!(config.link.address, "10.0.0.2:9000");
        assert_eq!(config.scheduler.tick_ms, 500);
    }

    #[test]
    fn test_rejects_zero_tick() {
        let err = parse_config("[scheduler]\ntick_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(g1hud_core::config::ConfigError::ZeroTickPeriod)
        ));
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let err = parse_config("[auto_off]\nthreshold_ticks = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(g1hud_core::config::ConfigError::ZeroThreshold)
        ));
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        assert!(matches!(
            parse_config("[scheduler]\ntick = 5\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_config("[clock]\nformat = \"36h\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bridge_needs_address() {
        let err = parse_config("[link]\nkind = \"bridge\"\naddress = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingBridgeAddress));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("companion.toml");
        fs::write(&path, "[feeds]\nrefresh_s = 30\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.feeds.refresh_s, 30);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/companion.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

//! Companion configuration file layout
//!
//! Every section and key is optional; missing values take the defaults of
//! the embedded companion.toml.

use std::path::PathBuf;

use g1hud_core::config::{
    AutoOffConfig, CalendarConfig, ClockConfig, HudConfig, DEFAULT_TICK_MS,
};
use serde::Deserialize;

/// Complete companion configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompanionConfig {
    pub scheduler: SchedulerSection,
    pub auto_off: AutoOffConfig,
    pub calendar: CalendarConfig,
    pub clock: ClockConfig,
    pub link: LinkSection,
    pub storage: StorageSection,
    pub feeds: FeedsSection,
    pub log: LogSection,
}

impl CompanionConfig {
    /// Settings for the scheduler core
    pub fn hud(&self) -> HudConfig {
        HudConfig {
            tick_ms: self.scheduler.tick_ms,
            auto_off: self.auto_off,
            calendar: self.calendar,
            clock: self.clock,
        }
    }

    /// Resolve a feed file name against the data directory
    pub fn feed_path(&self, name: &str) -> PathBuf {
        self.storage.data_dir.join(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSection {
    /// Frame period in milliseconds
    pub tick_ms: u32,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

/// Which link implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Log packets instead of sending them
    #[default]
    Console,
    /// TCP connection to a BLE bridge
    Bridge,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkSection {
    pub kind: LinkKind,
    /// Bridge address, host:port
    pub address: String,
    pub connect_timeout_ms: u64,
    /// Start connecting at startup
    pub auto_scan: bool,
    /// Console link answers text commands with acks
    pub simulate_acks: bool,
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            kind: LinkKind::Console,
            address: "127.0.0.1:7878".to_string(),
            connect_timeout_ms: 3000,
            auto_scan: true,
            simulate_acks: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub data_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("g1hud-data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedsSection {
    /// Now-playing snapshot file, relative to the data directory
    pub now_playing: String,
    /// Calendar snapshot file, relative to the data directory
    pub calendar: String,
    /// Reload period in seconds
    pub refresh_s: u64,
}

impl Default for FeedsSection {
    fn default() -> Self {
        Self {
            now_playing: "now_playing.toml".to_string(),
            calendar: "calendar.toml".to_string(),
            refresh_s: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

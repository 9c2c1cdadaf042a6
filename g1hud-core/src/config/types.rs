//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Default tick period (2 Hz)
pub const DEFAULT_TICK_MS: u32 = 500;

/// Default auto-off threshold in ticks (5 s at 2 Hz)
pub const DEFAULT_AUTO_OFF_TICKS: u32 = 10;

/// Default calendar lookahead
pub const DEFAULT_LOOKAHEAD_MINUTES: u32 = 24 * 60;

/// Longest accepted calendar lookahead (one week)
pub const MAX_LOOKAHEAD_MINUTES: u32 = 7 * 24 * 60;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period must be at least 1 ms
    ZeroTickPeriod,
    /// Auto-off threshold must be at least one tick
    ZeroThreshold,
    /// Lookahead outside 1..=MAX_LOOKAHEAD_MINUTES
    InvalidLookahead,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroTickPeriod => f.write_str("tick period must be greater than zero"),
            ConfigError::ZeroThreshold => f.write_str("auto-off threshold must be greater than zero"),
            ConfigError::InvalidLookahead => f.write_str("calendar lookahead out of range"),
        }
    }
}

/// How the clock line shows the time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockFormat {
    /// 14:05
    #[default]
    #[serde(rename = "24h")]
    H24,
    /// 2:05 PM
    #[serde(rename = "12h")]
    H12,
}

/// Auto-off policy settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct AutoOffConfig {
    /// Whether the display turns itself off
    pub enabled: bool,
    /// Ticks of continuous on-time before turning off
    pub threshold_ticks: u32,
}

impl Default for AutoOffConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_ticks: DEFAULT_AUTO_OFF_TICKS,
        }
    }
}

/// Calendar page settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct CalendarConfig {
    /// Events starting within this many minutes from now are shown
    pub lookahead_minutes: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            lookahead_minutes: DEFAULT_LOOKAHEAD_MINUTES,
        }
    }
}

/// Clock page settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct ClockConfig {
    pub format: ClockFormat,
}

/// Complete core configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct HudConfig {
    /// Scheduler period in milliseconds
    pub tick_ms: u32,
    pub auto_off: AutoOffConfig,
    pub calendar: CalendarConfig,
    pub clock: ClockConfig,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            auto_off: AutoOffConfig::default(),
            calendar: CalendarConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl HudConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.auto_off.threshold_ticks == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.calendar.lookahead_minutes == 0
            || self.calendar.lookahead_minutes > MAX_LOOKAHEAD_MINUTES
        {
            return Err(ConfigError::InvalidLookahead);
        }
        Ok(())
    }
}

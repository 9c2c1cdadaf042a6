//! Auto-off countdown
//!
//! While enabled and the display is on, the policy counts ticks. When the
//! count reaches the threshold it asks for the display to be turned off and
//! starts over from zero.

use crate::config::AutoOffConfig;

/// Policy states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutoOffState {
    /// Disabled, or the display is off
    Idle,
    /// Counting on-ticks
    Counting,
}

/// What the scheduler must do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutoOffAction {
    /// Leave the display as it is
    None,
    /// Switch the display off
    TurnOff,
}

/// Auto-off countdown
#[derive(Debug, Clone)]
pub struct AutoOffPolicy {
    enabled: bool,
    threshold: u32,
    ticks_on: u32,
    /// Display flag seen on the previous tick
    last_display_on: Option<bool>,
}

impl AutoOffPolicy {
    /// Create a policy; a zero threshold is treated as one tick
    pub fn new(enabled: bool, threshold: u32) -> Self {
        Self {
            enabled,
            threshold: threshold.max(1),
            ticks_on: 0,
            last_display_on: None,
        }
    }

    /// Create a policy from configuration
    pub fn from_config(config: &AutoOffConfig) -> Self {
        Self::new(config.enabled, config.threshold_ticks)
    }

    /// Advance one tick
    pub fn advance(&mut self, display_on: bool) -> AutoOffAction {
        if self.last_display_on != Some(display_on) {
            self.ticks_on = 0;
            self.last_display_on = Some(display_on);
        }

        if !self.enabled || !display_on {
            self.ticks_on = 0;
            return AutoOffAction::None;
        }

        self.ticks_on += 1;
        if self.ticks_on >= self.threshold {
            self.ticks_on = 0;
            self.last_display_on = Some(false);
            return AutoOffAction::TurnOff;
        }
        AutoOffAction::None
    }

    /// Restart the countdown, e.g. after the user switched the display
    pub fn reset(&mut self) {
        self.ticks_on = 0;
    }

    /// Enable or disable the policy
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.ticks_on = 0;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// On-ticks counted since the last reset
    pub fn ticks_on(&self) -> u32 {
        self.ticks_on
    }

    pub fn state(&self) -> AutoOffState {
        if self.enabled && self.last_display_on == Some(true) {
            AutoOffState::Counting
        } else {
            AutoOffState::Idle
        }
    }
}

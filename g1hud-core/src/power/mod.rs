//! Display power management
//!
//! Decides when the display switches itself off. The policy only ever
//! turns the display off; turning it on is a user action.

pub mod auto_off;

pub use auto_off::{AutoOffAction, AutoOffPolicy, AutoOffState};

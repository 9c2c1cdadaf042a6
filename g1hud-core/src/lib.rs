//! Platform-agnostic core logic for the heads-up display companion
//!
//! This crate contains all application logic that does not depend on a
//! specific runtime or radio:
//!
//! - Page selection and its persisted state
//! - Auto-off power policy
//! - Content providers, one per page
//! - Sequenced transport over a packet link
//! - Fixed-rate frame scheduler tying the above together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod content;
pub mod page;
pub mod power;
pub mod scheduler;
pub mod sources;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

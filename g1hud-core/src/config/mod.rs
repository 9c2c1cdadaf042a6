//! Configuration types
//!
//! Runtime-agnostic settings for the scheduler, the power policy and the
//! content providers. The companion fills these from its TOML file.

pub mod types;

pub use types::*;

//! Frame scheduler
//!
//! Runs once per tick: applies the power policy, renders the active page
//! and hands exactly one frame to the transport.

pub mod executor;
pub mod frame;

pub use executor::{FrameScheduler, ShutdownReport, TickReport};
pub use frame::{Frame, FrameKind, MAX_BODY_LEN, SENTINEL_BODY};

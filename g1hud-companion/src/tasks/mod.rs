//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! The feed reader is a plain thread publishing into the same signals.

pub mod feeds;
pub mod frame;
pub mod link_rx;
pub mod tick;

pub use feeds::spawn_feed_reader;
pub use frame::{frame_task, CompanionScheduler};
pub use link_rx::link_rx_task;
pub use tick::tick_task;

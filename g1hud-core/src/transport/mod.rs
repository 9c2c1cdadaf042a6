//! Transport to the glasses
//!
//! Turns frame bodies into protocol packets and pushes them through a
//! [`PacketLink`](g1hud_hal::PacketLink). Sending never fails outward:
//! problems end up in [`TransportStats`] and the connection status.

pub mod monitor;
pub mod sequenced;

pub use g1hud_hal::{ConnectionState, LinkError};
pub use monitor::{LinkHealth, LinkMonitor, MAX_UNACKED_SENDS};
pub use sequenced::{HudTransport, SendOutcome, SequencedTransport, TransportStats};

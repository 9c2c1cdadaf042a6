//! Glasses communication protocol
//!
//! This crate defines the packets exchanged between the companion (host) and
//! the heads-up display glasses (peripheral). The glasses render whatever
//! text they are given; page selection and power policy stay on the host.
//!
//! # Protocol Overview
//!
//! Every host command is one or more packets. Text is carried by the `0x4E`
//! text command, split into chunks that share one sequence number:
//! ```text
//! ┌──────┬─────┬───────┬───────┬────────┬──────┬──────────┬──────────────┐
//! │ 0x4E │ SEQ │ TOTAL │ INDEX │ STATUS │ PAGE │ MAX_PAGE │ TEXT 0–191B  │
//! └──────┴─────┴───────┴───────┴────────┴──────┴──────────┴──────────────┘
//! ```
//!
//! When packets cross a byte stream (e.g. a BLE bridge over TCP) they are
//! wrapped in [`frame::Frame`]s:
//! ```text
//! ┌───────┬────────┬─────────────┬──────────┐
//! │ START │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 0–250B      │ 1B       │
//! └───────┴────────┴─────────────┴──────────┘
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod packet;
pub mod sequence;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{CommandPackets, HostCommand, PeripheralEvent, ACK_FAILURE, ACK_SUCCESS};
pub use packet::{
    parse_text_packet, Packet, PacketError, ScreenStatus, TextHeader, TextPackets, CMD_BATTERY,
    CMD_EXIT, CMD_HEARTBEAT, CMD_TEXT, MAX_PACKET_SIZE, MAX_TEXT_CHUNK,
};
pub use sequence::{SequenceCounter, MAX_SEQUENCE};

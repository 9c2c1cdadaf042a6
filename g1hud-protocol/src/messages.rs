//! Message types for the glasses protocol
//!
//! Message types are divided into two categories:
//! - Host → Glasses: text frames, blank, exit
//! - Glasses → Host: acknowledgements, battery telemetry, heartbeat echo

use crate::packet::{
    Packet, PacketError, TextPackets, CMD_BATTERY, CMD_EXIT, CMD_HEARTBEAT, CMD_TEXT,
};

/// Ack status: command accepted
pub const ACK_SUCCESS: u8 = 0xC9;
/// Ack status: command rejected
pub const ACK_FAILURE: u8 = 0xCA;

/// Commands from the host to the glasses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Show a text body
    Text { seq: u8, text: &'a str },
    /// Clear the text area
    Blank { seq: u8 },
    /// Leave text mode and return to the glasses dashboard
    Exit,
}

impl<'a> HostCommand<'a> {
    /// Encode this command into packets
    pub fn packets(&self) -> Result<CommandPackets<'a>, PacketError> {
        match *self {
            HostCommand::Text { seq, text } => Ok(CommandPackets::Text(TextPackets::new(seq, text)?)),
            HostCommand::Blank { seq } => Ok(CommandPackets::Text(TextPackets::new(seq, "")?)),
            HostCommand::Exit => Ok(CommandPackets::single(&[CMD_EXIT])),
        }
    }
}

/// Packets of one host command
#[derive(Debug, Clone)]
pub enum CommandPackets<'a> {
    /// Possibly multi-packet text body
    Text(TextPackets<'a>),
    /// Single fixed packet
    Single(Option<Packet>),
}

impl CommandPackets<'_> {
    fn single(bytes: &[u8]) -> Self {
        CommandPackets::Single(Packet::from_slice(bytes).ok())
    }
}

impl Iterator for CommandPackets<'_> {
    type Item = Packet;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            CommandPackets::Text(packets) => packets.next(),
            CommandPackets::Single(packet) => packet.take(),
        }
    }
}

/// Events parsed from glasses-originated packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralEvent {
    /// Text command acknowledgement
    Ack { seq: u8, accepted: bool },
    /// Battery level in percent
    Battery { percent: u8 },
    /// Heartbeat echo
    Heartbeat { seq: u8 },
}

impl PeripheralEvent {
    /// Parse an event from a packet
    pub fn from_packet(packet: &[u8]) -> Result<Self, PacketError> {
        let (&command, rest) = packet.split_first().ok_or(PacketError::Truncated)?;
        match command {
            CMD_TEXT => match rest {
                [status, seq, ..] => Ok(PeripheralEvent::Ack {
                    seq: *seq,
                    accepted: *status == ACK_SUCCESS,
                }),
                _ => Err(PacketError::Truncated),
            },
            CMD_BATTERY => match rest {
                [percent, ..] => Ok(PeripheralEvent::Battery {
                    percent: (*percent).min(100),
                }),
                _ => Err(PacketError::Truncated),
            },
            CMD_HEARTBEAT => match rest {
                [seq, ..] => Ok(PeripheralEvent::Heartbeat { seq: *seq }),
                _ => Err(PacketError::Truncated),
            },
            other => Err(PacketError::UnknownCommand(other)),
        }
    }

    /// Encode this event into a packet (for testing or simulation)
    pub fn to_packet(&self) -> Packet {
        let mut packet = Packet::new();
        // At most 3 bytes, always fits
        let _ = match *self {
            PeripheralEvent::Ack { seq, accepted } => {
                let status = if accepted { ACK_SUCCESS } else { ACK_FAILURE };
                packet.extend_from_slice(&[CMD_TEXT, status, seq])
            }
            PeripheralEvent::Battery { percent } => packet.extend_from_slice(&[CMD_BATTERY, percent]),
            PeripheralEvent::Heartbeat { seq } => packet.extend_from_slice(&[CMD_HEARTBEAT, seq]),
        };
        packet
    }
}

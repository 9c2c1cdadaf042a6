//! Test doubles for the link, the transport and the data sources

use g1hud_hal::{ConnectionState, LinkError, PacketLink};
use g1hud_protocol::{parse_text_packet, PeripheralEvent, CMD_TEXT};

use crate::sources::{CalendarEvent, DataSources, NowPlaying, WallClock};
use crate::transport::{HudTransport, SendOutcome};

/// Link that keeps every written packet
#[derive(Debug, Default)]
pub struct RecordingLink {
    pub state: ConnectionState,
    pub packets: Vec<Vec<u8>>,
    pub fail_writes: Option<LinkError>,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected() -> Self {
        Self {
            state: ConnectionState::Connected,
            ..Self::default()
        }
    }

    /// Text packets as (seq, status, text)
    pub fn texts(&self) -> Vec<(u8, u8, String)> {
        self.packets
            .iter()
            .filter(|packet| packet.first() == Some(&CMD_TEXT))
            .map(|packet| {
                let (header, text) = parse_text_packet(packet).unwrap();
                (header.seq, header.status, String::from_utf8(text.to_vec()).unwrap())
            })
            .collect()
    }
}

impl PacketLink for RecordingLink {
    fn start_scan(&mut self) -> Result<(), LinkError> {
        self.state = ConnectionState::Connected;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn write_packet(&mut self, packet: &[u8]) -> Result<(), LinkError> {
        if let Some(err) = self.fail_writes {
            return Err(err);
        }
        if !self.state.is_connected() {
            return Err(LinkError::NotConnected);
        }
        self.packets.push(packet.to_vec());
        Ok(())
    }
}

/// Sources with fixed snapshots
#[derive(Debug, Default)]
pub struct FixedSources {
    pub clock: WallClock,
    pub now_playing: NowPlaying,
    pub calendar: Vec<CalendarEvent>,
    pub refreshes: u32,
}

impl DataSources for FixedSources {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn wall_clock(&self) -> WallClock {
        self.clock
    }

    fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    fn calendar(&self) -> &[CalendarEvent] {
        &self.calendar
    }
}

/// Transport that records each call
#[derive(Debug)]
pub struct FakeTransport {
    pub state: ConnectionState,
    /// (body, seq) per send
    pub sends: Vec<(String, u8)>,
    pub exits: u32,
    pub disconnects: u32,
    pub events: Vec<PeripheralEvent>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            state: ConnectionState::Connected,
            sends: Vec::new(),
            exits: 0,
            disconnects: 0,
            events: Vec::new(),
        }
    }
}

impl HudTransport for FakeTransport {
    fn send(&mut self, body: &str, seq: u8) -> SendOutcome {
        self.sends.push((body.to_string(), seq));
        if self.state.is_connected() {
            SendOutcome::Sent { packets: 1 }
        } else {
            SendOutcome::Skipped
        }
    }

    fn send_exit(&mut self) -> SendOutcome {
        self.exits += 1;
        SendOutcome::Sent { packets: 1 }
    }

    fn status(&self) -> ConnectionState {
        self.state
    }

    fn start_scan(&mut self) -> Result<(), LinkError> {
        self.state = ConnectionState::Connected;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        self.disconnects += 1;
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    fn handle_event(&mut self, event: PeripheralEvent) {
        self.events.push(event);
    }
}

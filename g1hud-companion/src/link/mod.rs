//! Packet links to the glasses

mod bridge;
mod console;

use std::time::Duration;

use g1hud_hal::{ConnectionState, LinkError, PacketLink, PacketSource};

use crate::config::{LinkKind, LinkSection};

pub use bridge::{bridge_link, BridgeLink, BridgeRx};
pub use console::{console_link, ConsoleLink, ConsoleRx};

/// Transmit half of whichever link the config selects
#[derive(Debug)]
pub enum AnyLink {
    Console(ConsoleLink),
    Bridge(BridgeLink),
}

/// Receive half matching [`AnyLink`]
#[derive(Debug)]
pub enum AnyLinkRx {
    Console(ConsoleRx),
    Bridge(BridgeRx),
}

/// Open the configured link
pub fn open_link(config: &LinkSection) -> (AnyLink, AnyLinkRx) {
    match config.kind {
        LinkKind::Console => {
            let (tx, rx) = console_link(config.simulate_acks);
            (AnyLink::Console(tx), AnyLinkRx::Console(rx))
        }
        LinkKind::Bridge => {
            let timeout = Duration::from_millis(config.connect_timeout_ms);
            let (tx, rx) = bridge_link(config.address.clone(), timeout);
            (AnyLink::Bridge(tx), AnyLinkRx::Bridge(rx))
        }
    }
}

impl PacketLink for AnyLink {
    fn start_scan(&mut self) -> Result<(), LinkError> {
        match self {
            AnyLink::Console(link) => link.start_scan(),
            AnyLink::Bridge(link) => link.start_scan(),
        }
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        match self {
            AnyLink::Console(link) => link.disconnect(),
            AnyLink::Bridge(link) => link.disconnect(),
        }
    }

    fn state(&self) -> ConnectionState {
        match self {
            AnyLink::Console(link) => link.state(),
            AnyLink::Bridge(link) => link.state(),
        }
    }

    fn write_packet(&mut self, packet: &[u8]) -> Result<(), LinkError> {
        match self {
            AnyLink::Console(link) => link.write_packet(packet),
            AnyLink::Bridge(link) => link.write_packet(packet),
        }
    }
}

impl PacketSource for AnyLinkRx {
    fn poll_packet(&mut self, buf: &mut [u8]) -> Result<Option<usize>, LinkError> {
        match self {
            AnyLinkRx::Console(rx) => rx.poll_packet(buf),
            AnyLinkRx::Bridge(rx) => rx.poll_packet(buf),
        }
    }
}

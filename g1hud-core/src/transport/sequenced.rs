//! Sequenced text transport

use g1hud_hal::{ConnectionState, LinkError, PacketLink};
use g1hud_protocol::{HostCommand, PeripheralEvent};

use super::monitor::LinkMonitor;

/// Result of one send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendOutcome {
    /// Written to the link
    Sent { packets: u8 },
    /// Link not connected; nothing written
    Skipped,
    /// Link refused a packet; the rest of the body was dropped
    Failed(LinkError),
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

/// Transport counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportStats {
    /// Commands fully written
    pub sent: u32,
    /// Commands dropped because the link was down
    pub skipped: u32,
    /// Commands cut short by a write error
    pub failed: u32,
    /// Packets written
    pub packets: u32,
}

/// Transport used by the scheduler
pub trait HudTransport {
    /// Send a frame body under `seq`; an empty body clears the display
    fn send(&mut self, body: &str, seq: u8) -> SendOutcome;

    /// Return the glasses to their dashboard
    fn send_exit(&mut self) -> SendOutcome;

    /// Connection status for display
    fn status(&self) -> ConnectionState;

    /// Begin connecting
    fn start_scan(&mut self) -> Result<(), LinkError>;

    /// Drop the connection
    fn disconnect(&mut self) -> Result<(), LinkError>;

    /// Feed back an event received from the glasses
    fn handle_event(&mut self, event: PeripheralEvent);
}

/// [`HudTransport`] over a packet link
#[derive(Debug)]
pub struct SequencedTransport<L: PacketLink> {
    link: L,
    stats: TransportStats,
    monitor: LinkMonitor,
}

impl<L: PacketLink> SequencedTransport<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            stats: TransportStats::default(),
            monitor: LinkMonitor::new(),
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }

    pub fn monitor(&self) -> &LinkMonitor {
        &self.monitor
    }

    fn write(&mut self, command: HostCommand<'_>) -> SendOutcome {
        if !self.link.state().is_connected() {
            self.stats.skipped = self.stats.skipped.saturating_add(1);
            return SendOutcome::Skipped;
        }

        let packets = match command.packets() {
            Ok(packets) => packets,
            Err(_) => {
                self.stats.failed = self.stats.failed.saturating_add(1);
                return SendOutcome::Failed(LinkError::PacketTooLarge);
            }
        };

        let mut written: u8 = 0;
        for packet in packets {
            if let Err(err) = self.link.write_packet(&packet) {
                self.stats.failed = self.stats.failed.saturating_add(1);
                self.stats.packets = self.stats.packets.saturating_add(written as u32);
                return SendOutcome::Failed(err);
            }
            written = written.saturating_add(1);
        }

        self.stats.sent = self.stats.sent.saturating_add(1);
        self.stats.packets = self.stats.packets.saturating_add(written as u32);
        SendOutcome::Sent { packets: written }
    }
}

impl<L: PacketLink> HudTransport for SequencedTransport<L> {
    fn send(&mut self, body: &str, seq: u8) -> SendOutcome {
        let command = if body.is_empty() {
            HostCommand::Blank { seq }
        } else {
            HostCommand::Text { seq, text: body }
        };
        let outcome = self.write(command);
        if outcome.is_sent() {
            self.monitor.send_recorded();
        }
        outcome
    }

    fn send_exit(&mut self) -> SendOutcome {
        self.write(HostCommand::Exit)
    }

    fn status(&self) -> ConnectionState {
        self.link.state()
    }

    fn start_scan(&mut self) -> Result<(), LinkError> {
        self.link.start_scan()
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        self.monitor.reset();
        self.link.disconnect()
    }

    fn handle_event(&mut self, event: PeripheralEvent) {
        self.monitor.event_received(event);
    }
}

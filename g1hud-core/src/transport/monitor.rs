//! Link health monitor
//!
//! Tracks acknowledgements and telemetry coming back from the glasses.

use g1hud_protocol::PeripheralEvent;

/// Sends without any sign of life before the link counts as unhealthy
/// (10 s at 2 Hz)
pub const MAX_UNACKED_SENDS: u16 = 20;

/// Link health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkHealth {
    /// Peer answered recently
    Ok,
    /// Too many sends without an answer
    Silent,
}

/// Acknowledgement and telemetry tracker
#[derive(Debug, Clone, Default)]
pub struct LinkMonitor {
    /// Sends since the last sign of life
    unacked_sends: u16,
    /// Sequence of the last accepted text command
    last_acked_seq: Option<u8>,
    /// Rejected text commands
    rejected: u32,
    /// Last battery report
    battery_percent: Option<u8>,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a send that expects an answer
    pub fn send_recorded(&mut self) {
        self.unacked_sends = self.unacked_sends.saturating_add(1);
    }

    /// Process an event from the glasses
    pub fn event_received(&mut self, event: PeripheralEvent) {
        self.unacked_sends = 0;
        match event {
            PeripheralEvent::Ack { seq, accepted: true } => self.last_acked_seq = Some(seq),
            PeripheralEvent::Ack { accepted: false, .. } => {
                self.rejected = self.rejected.saturating_add(1)
            }
            PeripheralEvent::Battery { percent } => self.battery_percent = Some(percent),
            PeripheralEvent::Heartbeat { .. } => {}
        }
    }

    /// Forget everything, e.g. after a disconnect
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn check(&self) -> LinkHealth {
        if self.unacked_sends >= MAX_UNACKED_SENDS {
            LinkHealth::Silent
        } else {
            LinkHealth::Ok
        }
    }

    pub fn unacked_sends(&self) -> u16 {
        self.unacked_sends
    }

    pub fn last_acked_seq(&self) -> Option<u8> {
        self.last_acked_seq
    }

    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    pub fn battery_percent(&self) -> Option<u8> {
        self.battery_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goes_silent_without_acks() {
        let mut monitor = LinkMonitor::new();
        for _ in 0..MAX_UNACKED_SENDS - 1 {
            monitor.send_recorded();
        }
        assert_eq!(monitor.check(), LinkHealth::Ok);

        monitor.send_recorded();
        assert_eq!(monitor.check(), LinkHealth::Silent);
    }

    #[test]
    fn test_any_event_restores_health() {
        let mut monitor = LinkMonitor::new();
        for _ in 0..MAX_UNACKED_SENDS {
            monitor.send_recorded();
        }
        monitor.event_received(PeripheralEvent::Heartbeat { seq: 3 });
        assert_eq!(monitor.check(), LinkHealth::Ok);
        assert_eq!(monitor.unacked_sends(), 0);
    }

    #[test]
    fn test_tracks_acks_and_battery() {
        let mut monitor = LinkMonitor::new();
        monitor.event_received(PeripheralEvent::Ack { seq: 12, accepted: true });
        monitor.event_received(PeripheralEvent::Ack { seq: 13, accepted: false });
        monitor.event_received(PeripheralEvent::Battery { percent: 64 });

        assert_eq!(monitor.last_acked_seq(), Some(12));
        assert_eq!(monitor.rejected(), 1);
        assert_eq!(monitor.battery_percent(), Some(64));

        monitor.reset();
        assert_eq!(monitor.battery_percent(), None);
    }
}

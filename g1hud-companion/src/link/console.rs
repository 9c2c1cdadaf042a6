//! Dry-run console link
//!
//! Logs every packet instead of transmitting it. Scanning connects at
//! once. With acks simulated, each complete text command is answered the
//! way the glasses would, so the whole receive path runs too.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use g1hud_hal::{ConnectionState, LinkError, PacketLink, PacketSource};
use g1hud_protocol::{parse_text_packet, Packet, PeripheralEvent, CMD_EXIT, CMD_TEXT};
use log::{debug, info, trace};

#[derive(Debug, Default)]
struct ConsoleShared {
    state: ConnectionState,
    inbound: VecDeque<Packet>,
}

/// Transmit half
#[derive(Debug)]
pub struct ConsoleLink {
    shared: Arc<Mutex<ConsoleShared>>,
    simulate_acks: bool,
}

/// Receive half
#[derive(Debug)]
pub struct ConsoleRx {
    shared: Arc<Mutex<ConsoleShared>>,
}

/// Create a connected pair of halves
pub fn console_link(simulate_acks: bool) -> (ConsoleLink, ConsoleRx) {
    let shared = Arc::new(Mutex::new(ConsoleShared::default()));
    (
        ConsoleLink {
            shared: Arc::clone(&shared),
            simulate_acks,
        },
        ConsoleRx { shared },
    )
}

impl ConsoleLink {
    fn with_shared<R>(&self, f: impl FnOnce(&mut ConsoleShared) -> R) -> Result<R, LinkError> {
        let mut shared = self.shared.lock().map_err(|_| LinkError::Io)?;
        Ok(f(&mut shared))
    }
}

impl PacketLink for ConsoleLink {
    fn start_scan(&mut self) -> Result<(), LinkError> {
        self.with_shared(|shared| shared.state = ConnectionState::Connected)?;
        info!("Console link connected");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        self.with_shared(|shared| {
            shared.state = ConnectionState::Disconnected;
            shared.inbound.clear();
        })?;
        info!("Console link disconnected");
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.shared
            .lock()
            .map(|shared| shared.state)
            .unwrap_or(ConnectionState::Error)
    }

    fn write_packet(&mut self, packet: &[u8]) -> Result<(), LinkError> {
        let simulate_acks = self.simulate_acks;
        self.with_shared(|shared| {
            if !shared.state.is_connected() {
                return Err(LinkError::NotConnected);
            }

            match packet.first() {
                Some(&CMD_TEXT) => {
                    let (header, text) = parse_text_packet(packet).map_err(|_| LinkError::Io)?;
                    debug!(
                        "TX text seq={} {}/{} status=0x{:02X} {:?}",
                        header.seq,
                        header.index + 1,
                        header.total,
                        header.status,
                        String::from_utf8_lossy(text)
                    );
                    if simulate_acks && header.index + 1 == header.total {
                        let ack = PeripheralEvent::Ack {
                            seq: header.seq,
                            accepted: true,
                        };
                        shared.inbound.push_back(ack.to_packet());
                    }
                }
                Some(&CMD_EXIT) => info!("TX exit"),
                _ => trace!("TX {:02X?}", packet),
            }
            Ok(())
        })?
    }
}

impl PacketSource for ConsoleRx {
    fn poll_packet(&mut self, buf: &mut [u8]) -> Result<Option<usize>, LinkError> {
        let mut shared = self.shared.lock().map_err(|_| LinkError::Io)?;
        let Some(packet) = shared.inbound.pop_front() else {
            return Ok(None);
        };
        let dest = buf.get_mut(..packet.len()).ok_or(LinkError::PacketTooLarge)?;
        dest.copy_from_slice(&packet);
        Ok(Some(packet.len()))
    }
}

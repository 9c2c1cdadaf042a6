//! Link receive task
//!
//! Polls the receive half of the link and forwards decoded events to the
//! frame task. Never awaited from inside a tick.

use embassy_futures::yield_now;
use embassy_time::{Duration, Timer};
use log::{debug, trace, warn};

use g1hud_hal::{LinkError, PacketSource};
use g1hud_protocol::{PeripheralEvent, MAX_PACKET_SIZE};

use crate::channels::{LinkEventChannel, LINK_EVENTS};
use crate::link::AnyLinkRx;

/// Poll interval when nothing is pending
const POLL_INTERVAL_MS: u64 = 20;

/// Link receive task
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: AnyLinkRx) {
    debug!("Link receive task started");
    pump(&mut rx, &LINK_EVENTS).await;
}

/// Forward everything `rx` yields into `events`, forever
async fn pump<R: PacketSource>(rx: &mut R, events: &LinkEventChannel) {
    let mut buf = [0u8; MAX_PACKET_SIZE];
    loop {
        match rx.poll_packet(&mut buf) {
            Ok(Some(len)) => {
                let packet = &buf[..len];
                match PeripheralEvent::from_packet(packet) {
                    Ok(event) => {
                        trace!("RX {:?}", event);
                        if events.try_send(event).is_err() {
                            warn!("Link event channel full, dropped {:?}", event);
                        }
                    }
                    Err(e) => warn!("Undecodable packet {:02X?}: {}", packet, e),
                }
                // Drain everything already buffered, letting other tasks in
                // between packets
                yield_now().await;
                continue;
            }
            Ok(None) => {}
            Err(LinkError::Closed) => debug!("Link closed"),
            Err(e) => warn!("Link receive error: {:?}", e),
        }
        Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

//! Tick task
//!
//! Drives the frame scheduler at the configured fixed rate.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use log::info;

/// Signal to notify the frame task of a tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Tick task - signals one tick per period
///
/// A tick the frame task has not consumed yet is overwritten, so a slow
/// tick is never followed by a burst of catch-up ticks.
#[embassy_executor::task]
pub async fn tick_task(tick_ms: u32) {
    info!("Tick task started ({} ms)", tick_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(tick_ms)));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(());
    }
}

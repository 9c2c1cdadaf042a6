//! Inter-task communication channels
//!
//! Static embassy-sync channels and signals shared between the companion's
//! tasks and the stdin console thread.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use g1hud_core::sources::{CalendarEvents, NowPlaying};
use g1hud_protocol::PeripheralEvent;

use crate::console::UserCommand;

/// Channel capacity for console commands
const USER_CHANNEL_SIZE: usize = 8;

/// Channel capacity for events from the glasses
const LINK_EVENT_CHANNEL_SIZE: usize = 16;

/// Commands typed on the console
pub static USER_COMMANDS: Channel<CriticalSectionRawMutex, UserCommand, USER_CHANNEL_SIZE> =
    Channel::new();

/// Queue of events decoded from the glasses
pub type LinkEventChannel = Channel<CriticalSectionRawMutex, PeripheralEvent, LINK_EVENT_CHANNEL_SIZE>;

/// Events decoded from the glasses
pub static LINK_EVENTS: LinkEventChannel = Channel::new();

/// Latest now-playing snapshot (updated by the feed reader)
pub static NOW_PLAYING: Signal<CriticalSectionRawMutex, NowPlaying> = Signal::new();

/// Latest calendar snapshot (updated by the feed reader)
pub static CALENDAR: Signal<CriticalSectionRawMutex, CalendarEvents> = Signal::new();

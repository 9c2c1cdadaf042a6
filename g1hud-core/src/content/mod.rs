//! Content providers
//!
//! Each page has one provider turning the current snapshots into a few
//! lines of text. Providers are pure: same snapshot, same lines.

pub mod calendar;
pub mod clock;
pub mod music;
pub mod rear_view;

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{ClockFormat, HudConfig};
use crate::page::Page;
use crate::sources::{CalendarEvent, NowPlaying, WallClock};

pub use calendar::CalendarProvider;
pub use clock::ClockProvider;
pub use music::MusicProvider;
pub use rear_view::RearViewProvider;

/// Longest line in bytes
pub const LINE_LEN: usize = 64;

/// Most lines per frame
pub const MAX_LINES: usize = 8;

/// One rendered line
pub type Line = String<LINE_LEN>;

/// Rendered page content
pub type Lines = Vec<Line, MAX_LINES>;

/// Inputs available to a provider during one tick
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub clock: WallClock,
    pub now_playing: &'a NowPlaying,
    pub calendar: &'a [CalendarEvent],
}

/// Renders one page
pub trait ContentProvider {
    /// Produce the lines for this page; may be empty
    fn render(&self, snapshot: &Snapshot<'_>) -> Lines;
}

/// Provider set, one per page
#[derive(Debug, Clone)]
pub struct PageProviders {
    pub clock: ClockProvider,
    pub music: MusicProvider,
    pub calendar: CalendarProvider,
    pub rear_view: RearViewProvider,
}

impl PageProviders {
    pub fn from_config(config: &HudConfig) -> Self {
        Self {
            clock: ClockProvider::new(config.clock.format),
            music: MusicProvider,
            calendar: CalendarProvider::new(config.calendar.lookahead_minutes, config.clock.format),
            rear_view: RearViewProvider,
        }
    }

    /// Provider for a page
    pub fn provider(&self, page: Page) -> &dyn ContentProvider {
        match page {
            Page::Default => &self.clock,
            Page::Music => &self.music,
            Page::Calendar => &self.calendar,
            Page::RearView => &self.rear_view,
        }
    }

    /// Render a page
    pub fn render(&self, page: Page, snapshot: &Snapshot<'_>) -> Lines {
        self.provider(page).render(snapshot)
    }
}

/// Build a line from text, cutting on a character boundary if too long
pub fn line(text: &str) -> Line {
    crate::sources::bounded(text)
}

/// Append a line; lines past [`MAX_LINES`] are dropped
pub(crate) fn push_line(lines: &mut Lines, text: &str) {
    let _ = lines.push(line(text));
}

/// Write a time of day in the configured format
pub(crate) fn write_time<W: Write>(out: &mut W, format: ClockFormat, hour: u8, minute: u8) -> core::fmt::Result {
    match format {
        ClockFormat::H24 => write!(out, "{:02}:{:02}", hour, minute),
        ClockFormat::H12 => {
            let suffix = if hour < 12 { "AM" } else { "PM" };
            let hour12 = match hour % 12 {
                0 => 12,
                h => h,
            };
            write!(out, "{}:{:02} {}", hour12, minute, suffix)
        }
    }
}

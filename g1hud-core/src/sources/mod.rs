//! Data sources feeding the content providers
//!
//! Acquisition happens elsewhere. The scheduler only sees immutable
//! snapshots, pulled once per tick through [`DataSources`].

use heapless::{String, Vec};

/// Longest stored music field
pub const MAX_FIELD_LEN: usize = 64;

/// Longest stored event title
pub const MAX_TITLE_LEN: usize = 48;

/// Most calendar events held in one snapshot
pub const MAX_EVENTS: usize = 16;

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    #[default]
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All days, week starting on Sunday
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Day from its index counted from Sunday, modulo 7
    pub const fn from_sunday_index(index: u8) -> Self {
        Self::ALL[(index % 7) as usize]
    }

    /// Three-letter name
    pub const fn short_name(self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

/// Local time-of-day snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    pub weekday: Weekday,
    /// Minutes since the Unix epoch, in local time
    pub local_minutes: i64,
}

impl WallClock {
    /// Build a snapshot from local minutes since the epoch
    ///
    /// 1970-01-01 was a Thursday.
    pub fn from_local_minutes(local_minutes: i64) -> Self {
        let minute_of_day = local_minutes.rem_euclid(24 * 60);
        let day = local_minutes.div_euclid(24 * 60);
        Self {
            hour: (minute_of_day / 60) as u8,
            minute: (minute_of_day % 60) as u8,
            weekday: Weekday::from_sunday_index((day + 4).rem_euclid(7) as u8),
            local_minutes,
        }
    }
}

/// Now-playing snapshot
///
/// Every text field is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NowPlaying {
    pub title: Option<String<MAX_FIELD_LEN>>,
    pub album: Option<String<MAX_FIELD_LEN>>,
    pub artist: Option<String<MAX_FIELD_LEN>>,
    /// Playback position in seconds
    pub current_time_s: u32,
    /// Track length in seconds
    pub duration_s: u32,
}

impl NowPlaying {
    /// Fraction of the track played, clamped to [0, 1]
    pub fn percentage_played(&self) -> f32 {
        if self.duration_s == 0 {
            return 0.0;
        }
        (self.current_time_s as f32 / self.duration_s as f32).clamp(0.0, 1.0)
    }
}

/// One calendar entry, times in local minutes since the epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String<MAX_TITLE_LEN>,
    pub start: i64,
    pub end: i64,
}

impl CalendarEvent {
    /// True if the event overlaps `[from, until)`
    pub fn overlaps(&self, from: i64, until: i64) -> bool {
        self.start < until && self.end > from
    }
}

/// Calendar snapshot
pub type CalendarEvents = Vec<CalendarEvent, MAX_EVENTS>;

/// Copy `text` into a bounded string, cutting on a character boundary
///
/// Control characters become spaces so feed text can never break a
/// display line in two.
pub fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars().map(printable) {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// `ch`, or a space if it is a control character
pub fn printable(ch: char) -> char {
    if ch.is_control() {
        ' '
    } else {
        ch
    }
}

/// Snapshot provider consumed by the scheduler
///
/// Implementations must not block: acquisition runs elsewhere and only
/// the latest published snapshot is handed out.
pub trait DataSources {
    /// Pick up newly published snapshots; called once at the start of a tick
    fn refresh(&mut self) {}

    /// Current local time
    fn wall_clock(&self) -> WallClock;

    /// Latest now-playing snapshot
    fn now_playing(&self) -> &NowPlaying;

    /// Latest calendar snapshot
    fn calendar(&self) -> &[CalendarEvent];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_from_epoch() {
        // 1970-01-01 00:00 was a Thursday
        let clock = WallClock::from_local_minutes(0);
        assert_eq!((clock.hour, clock.minute), (0, 0));
        assert_eq!(clock.weekday, Weekday::Thu);

        // Three days and 14:05 later
        let clock = WallClock::from_local_minutes(3 * 1440 + 14 * 60 + 5);
        assert_eq!((clock.hour, clock.minute), (14, 5));
        assert_eq!(clock.weekday, Weekday::Sun);
    }

    #[test]
    fn test_wall_clock_before_epoch() {
        let clock = WallClock::from_local_minutes(-1);
        assert_eq!((clock.hour, clock.minute), (23, 59));
        assert_eq!(clock.weekday, Weekday::Wed);
    }

    #[test]
    fn test_percentage_played_is_clamped() {
        let mut song = NowPlaying {
            current_time_s: 30,
            duration_s: 120,
            ..Default::default()
        };
        assert_eq!(song.percentage_played(), 0.25);

        song.current_time_s = 500;
        assert_eq!(song.percentage_played(), 1.0);

        song.duration_s = 0;
        assert_eq!(song.percentage_played(), 0.0);
    }

    #[test]
    fn test_event_overlap() {
        let event = CalendarEvent {
            title: bounded("Standup"),
            start: 100,
            end: 130,
        };
        assert!(event.overlaps(90, 101));
        assert!(event.overlaps(129, 200));
        assert!(!event.overlaps(130, 200));
        assert!(!event.overlaps(0, 100));
    }

    #[test]
    fn test_bounded_cuts_on_char_boundary() {
        let text: String<4> = bounded("ab€cd");
        assert_eq!(text.as_str(), "ab");
        let text: String<8> = bounded("ab€cd");
        assert_eq!(text.as_str(), "ab€cd");
    }

    #[test]
    fn test_bounded_replaces_control_chars() {
        let text: String<16> = bounded("A\nB\rC\tD");
        assert_eq!(text.as_str(), "A B C D");
    }
}

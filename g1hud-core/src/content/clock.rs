//! Default page: clock and weekday strip

use core::fmt::Write;

use super::{write_time, ContentProvider, Line, Lines, Snapshot};
use crate::config::ClockFormat;
use crate::sources::{WallClock, Weekday};

/// Clock line plus a weekday strip with today in brackets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockProvider {
    format: ClockFormat,
}

impl ClockProvider {
    pub const fn new(format: ClockFormat) -> Self {
        Self { format }
    }

    fn time_line(&self, clock: &WallClock) -> Line {
        let mut line = Line::new();
        // At most "12:59 PM"
        let _ = write_time(&mut line, self.format, clock.hour, clock.minute);
        line
    }

    /// "Sun Mon [Tue] Wed Thu Fri Sat"
    fn weekday_line(today: Weekday) -> Line {
        let mut line = Line::new();
        for (i, day) in Weekday::ALL.into_iter().enumerate() {
            if i > 0 {
                let _ = line.push(' ');
            }
            // 29 bytes at most
            let _ = if day == today {
                write!(line, "[{}]", day.short_name())
            } else {
                line.write_str(day.short_name())
            };
        }
        line
    }
}

impl ContentProvider for ClockProvider {
    fn render(&self, snapshot: &Snapshot<'_>) -> Lines {
        let mut lines = Lines::new();
        let _ = lines.push(self.time_line(&snapshot.clock));
        let _ = lines.push(Self::weekday_line(snapshot.clock.weekday));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::NowPlaying;

    fn render(provider: ClockProvider, clock: WallClock) -> Lines {
        let now_playing = NowPlaying::default();
        provider.render(&Snapshot {
            clock,
            now_playing: &now_playing,
            calendar: &[],
        })
    }

    #[test]
    fn test_clock_and_weekday() {
        let clock = WallClock {
            hour: 14,
            minute: 5,
            weekday: Weekday::Tue,
            local_minutes: 0,
        };
        let lines = render(ClockProvider::new(ClockFormat::H24), clock);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_str(), "14:05");
        assert_eq!(lines[1].as_str(), "Sun Mon [Tue] Wed Thu Fri Sat");
    }

    #[test]
    fn test_twelve_hour_clock() {
        let clock = WallClock {
            hour: 14,
            minute: 5,
            weekday: Weekday::Sat,
            local_minutes: 0,
        };
        let lines = render(ClockProvider::new(ClockFormat::H12), clock);
        assert_eq!(lines[0].as_str(), "2:05 PM");
        assert_eq!(lines[1].as_str(), "Sun Mon Tue Wed Thu Fri [Sat]");
    }

    #[test]
    fn test_always_non_empty() {
        for minutes in [0, 59, 1439, 100_000] {
            let lines = render(ClockProvider::default(), WallClock::from_local_minutes(minutes));
            assert!(!lines.is_empty());
        }
    }
}

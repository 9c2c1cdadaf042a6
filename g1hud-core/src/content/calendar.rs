//! Calendar page: upcoming events

use heapless::{String, Vec};

use super::{write_time, ContentProvider, Line, Lines, Snapshot, LINE_LEN, MAX_LINES};
use crate::config::ClockFormat;
use crate::sources::{printable, CalendarEvent, WallClock, MAX_EVENTS};

/// One line per event overlapping `[now, now + lookahead)`
///
/// Lines read `title HH:MM-HH:MM`, earliest start first. No events gives
/// no lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarProvider {
    lookahead_minutes: i64,
    format: ClockFormat,
}

impl CalendarProvider {
    pub fn new(lookahead_minutes: u32, format: ClockFormat) -> Self {
        Self {
            lookahead_minutes: lookahead_minutes as i64,
            format,
        }
    }

    /// Time span part of an event line
    fn span(&self, event: &CalendarEvent) -> String<24> {
        let start = WallClock::from_local_minutes(event.start);
        let end = WallClock::from_local_minutes(event.end);
        let mut span = String::new();
        // "12:00 PM-12:59 PM" is the longest span
        let _ = write_time(&mut span, self.format, start.hour, start.minute);
        let _ = span.push('-');
        let _ = write_time(&mut span, self.format, end.hour, end.minute);
        span
    }

    fn event_line(&self, event: &CalendarEvent) -> Line {
        let span = self.span(event);
        let mut line = Line::new();
        let room = LINE_LEN - span.len() - 1;
        for ch in event.title.chars().map(printable) {
            if line.len() + ch.len_utf8() > room {
                break;
            }
            let _ = line.push(ch);
        }
        let _ = line.push(' ');
        let _ = line.push_str(&span);
        line
    }
}

impl ContentProvider for CalendarProvider {
    fn render(&self, snapshot: &Snapshot<'_>) -> Lines {
        let now = snapshot.clock.local_minutes;
        let until = now.saturating_add(self.lookahead_minutes);

        let mut upcoming: Vec<&CalendarEvent, MAX_EVENTS> = snapshot
            .calendar
            .iter()
            .filter(|event| event.overlaps(now, until))
            .take(MAX_EVENTS)
            .collect();
        upcoming.sort_unstable_by_key(|event| (event.start, event.end));

        upcoming
            .iter()
            .take(MAX_LINES)
            .map(|event| self.event_line(event))
            .collect()
    }
}

//! Data feeds
//!
//! External collectors drop snapshot files in the data directory; the
//! feed reader thread reloads them on a fixed cadence and publishes the results.
//! The frame task picks them up at the start of its next tick.
//!
//! `now_playing.toml`:
//! ```toml
//! title = "Teardrop"
//! artist = "Massive Attack"
//! current_time_s = 65
//! duration_s = 330
//! ```
//!
//! `calendar.toml`, times in local time:
//! ```toml
//! [[event]]
//! title = "Standup"
//! start = "2026-10-16T09:00"
//! end = "2026-10-16T09:15"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use g1hud_core::sources::{
    bounded, CalendarEvent, CalendarEvents, DataSources, NowPlaying, WallClock, MAX_EVENTS,
};
use serde::Deserialize;
use thiserror::Error;

use crate::clock::{local_minutes, local_wall_clock};

/// Feed loading errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("event {title:?}: cannot parse time {value:?}")]
    BadTime { title: String, value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NowPlayingFile {
    title: Option<String>,
    album: Option<String>,
    artist: Option<String>,
    current_time_s: u32,
    duration_s: u32,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    title: String,
    start: String,
    end: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CalendarFile {
    event: Vec<EventEntry>,
}

/// Read a file; a missing file is `None`
fn read_optional(path: &Path) -> Result<Option<String>, FeedError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FeedError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_file<T: for<'de> Deserialize<'de>>(path: &Path, text: &str) -> Result<T, FeedError> {
    toml::from_str(text).map_err(|source| FeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `YYYY-MM-DDTHH:MM[:SS]`, also with a space separator
fn parse_local_time(title: &str, value: &str) -> Result<i64, FeedError> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .map(local_minutes)
        .ok_or_else(|| FeedError::BadTime {
            title: title.to_string(),
            value: value.to_string(),
        })
}

/// Load the now-playing snapshot; a missing file means nothing is playing
pub fn load_now_playing(path: &Path) -> Result<NowPlaying, FeedError> {
    let Some(text) = read_optional(path)? else {
        return Ok(NowPlaying::default());
    };
    let file: NowPlayingFile = parse_file(path, &text)?;
    Ok(NowPlaying {
        title: file.title.as_deref().map(bounded),
        album: file.album.as_deref().map(bounded),
        artist: file.artist.as_deref().map(bounded),
        current_time_s: file.current_time_s,
        duration_s: file.duration_s,
    })
}

/// Load the calendar snapshot
///
/// Events that ended before `now` are dropped. If more than
/// [`MAX_EVENTS`] remain, the earliest ones are kept.
pub fn load_calendar(path: &Path, now: i64) -> Result<CalendarEvents, FeedError> {
    let Some(text) = read_optional(path)? else {
        return Ok(CalendarEvents::new());
    };
    let file: CalendarFile = parse_file(path, &text)?;

    let mut events = Vec::with_capacity(file.event.len());
    for entry in &file.event {
        let start = parse_local_time(&entry.title, &entry.start)?;
        let end = parse_local_time(&entry.title, &entry.end)?;
        if end > now {
            events.push(CalendarEvent {
                title: bounded(&entry.title),
                start,
                end: end.max(start),
            });
        }
    }
    events.sort_by_key(|event| (event.start, event.end));
    events.truncate(MAX_EVENTS);
    Ok(events.into_iter().collect())
}

/// Feed file locations
#[derive(Debug, Clone)]
pub struct FeedPaths {
    pub now_playing: PathBuf,
    pub calendar: PathBuf,
}

/// Published snapshot signals
#[derive(Clone, Copy)]
pub struct FeedSignals {
    pub now_playing: &'static Signal<CriticalSectionRawMutex, NowPlaying>,
    pub calendar: &'static Signal<CriticalSectionRawMutex, CalendarEvents>,
}

/// [`DataSources`] backed by the published feeds and the local clock
pub struct FeedSources {
    signals: FeedSignals,
    now_playing: NowPlaying,
    calendar: CalendarEvents,
}

impl FeedSources {
    pub fn new(signals: FeedSignals) -> Self {
        Self {
            signals,
            now_playing: NowPlaying::default(),
            calendar: CalendarEvents::new(),
        }
    }
}

impl DataSources for FeedSources {
    fn refresh(&mut self) {
        if let Some(now_playing) = self.signals.now_playing.try_take() {
            self.now_playing = now_playing;
        }
        if let Some(calendar) = self.signals.calendar.try_take() {
            self.calendar = calendar;
        }
    }

    fn wall_clock(&self) -> WallClock {
        local_wall_clock()
    }

    fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    fn calendar(&self) -> &[CalendarEvent] {
        &self.calendar
    }
}

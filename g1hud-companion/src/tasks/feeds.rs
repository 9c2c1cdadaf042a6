//! Feed reader
//!
//! Reloads the now-playing and calendar snapshot files on a fixed cadence
//! and publishes them when they change. File reads run on their own thread,
//! never on the executor.

use std::io;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use g1hud_core::sources::{CalendarEvents, NowPlaying};

use crate::clock::local_wall_clock;
use crate::feeds::{load_calendar, load_now_playing, FeedError, FeedPaths, FeedSignals};

/// Last published value of one feed
struct FeedState<T> {
    name: &'static str,
    published: Option<T>,
    last_error: Option<String>,
}

impl<T: PartialEq + Clone> FeedState<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            published: None,
            last_error: None,
        }
    }

    /// Returns the value if it differs from the last one published
    fn update(&mut self, result: Result<T, FeedError>) -> Option<T> {
        match result {
            Ok(value) => {
                if self.last_error.take().is_some() {
                    info!("{} feed recovered", self.name);
                }
                if self.published.as_ref() == Some(&value) {
                    return None;
                }
                self.published = Some(value.clone());
                Some(value)
            }
            Err(e) => {
                let message = e.to_string();
                // Keep serving the last good snapshot; report each new error once
                if self.last_error.as_deref() != Some(message.as_str()) {
                    warn!("{} feed: {}", self.name, message);
                    self.last_error = Some(message);
                }
                None
            }
        }
    }
}

/// Both feeds and where they are published
struct FeedReader {
    paths: FeedPaths,
    signals: FeedSignals,
    now_playing: FeedState<NowPlaying>,
    calendar: FeedState<CalendarEvents>,
}

impl FeedReader {
    fn new(paths: FeedPaths, signals: FeedSignals) -> Self {
        Self {
            paths,
            signals,
            now_playing: FeedState::new("now playing"),
            calendar: FeedState::new("calendar"),
        }
    }

    /// Reload both files, publishing whatever changed
    fn poll(&mut self, now: i64) {
        if let Some(snapshot) = self.now_playing.update(load_now_playing(&self.paths.now_playing)) {
            debug!("Now playing: {:?}", snapshot.title);
            self.signals.now_playing.signal(snapshot);
        }

        if let Some(snapshot) = self.calendar.update(load_calendar(&self.paths.calendar, now)) {
            debug!("Calendar: {} upcoming events", snapshot.len());
            self.signals.calendar.signal(snapshot);
        }
    }
}

/// Start the feed reader thread
pub fn spawn_feed_reader(paths: FeedPaths, signals: FeedSignals, refresh_s: u64) -> io::Result<()> {
    info!(
        "Feed reader started ({}, {}, every {} s)",
        paths.now_playing.display(),
        paths.calendar.display(),
        refresh_s
    );

    let period = Duration::from_secs(refresh_s);
    let mut reader = FeedReader::new(paths, signals);
    thread::Builder::new().name("feeds".into()).spawn(move || loop {
        reader.poll(local_wall_clock().local_minutes);
        thread::sleep(period);
    })?;
    Ok(())
}

//! Music page: now playing

use core::fmt::Write;

use super::{push_line, ContentProvider, Line, Lines, Snapshot};
use crate::sources::NowPlaying;

/// Progress bar cells
pub const BAR_WIDTH: usize = 10;

/// Title, album, artist and playback position
///
/// Missing fields render as blank lines so the layout stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MusicProvider;

fn write_min_sec(out: &mut Line, seconds: u32) -> core::fmt::Result {
    write!(out, "{}:{:02}", seconds / 60, seconds % 60)
}

/// "1:05 [###-------] 3:30"
///
/// The bar is left out once the position runs past the duration. Blank
/// when the duration is unknown.
pub fn position_line(song: &NowPlaying) -> Line {
    let mut line = Line::new();
    if song.duration_s == 0 {
        return line;
    }

    // Longest case fits well within LINE_LEN
    let _ = write_min_sec(&mut line, song.current_time_s);
    if song.current_time_s <= song.duration_s {
        let filled = ((song.percentage_played() * BAR_WIDTH as f32) as usize).min(BAR_WIDTH);
        let _ = line.push_str(" [");
        for cell in 0..BAR_WIDTH {
            let _ = line.push(if cell < filled { '#' } else { '-' });
        }
        let _ = line.push(']');
    }
    let _ = line.push(' ');
    let _ = write_min_sec(&mut line, song.duration_s);
    line
}

impl ContentProvider for MusicProvider {
    fn render(&self, snapshot: &Snapshot<'_>) -> Lines {
        let song = snapshot.now_playing;
        let mut lines = Lines::new();
        for field in [&song.title, &song.album, &song.artist] {
            push_line(&mut lines, field.as_deref().unwrap_or(""));
        }
        let _ = lines.push(position_line(song));
        lines
    }
}

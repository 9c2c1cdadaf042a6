//! Frames
//!
//! A frame is built fresh every tick and dropped after sending. Its body is
//! the rendered lines, each followed by `\n`.

use heapless::String;

use crate::content::{Line, Lines, LINE_LEN, MAX_LINES};

/// Largest body: every line full, plus its separator
pub const MAX_BODY_LEN: usize = MAX_LINES * (LINE_LEN + 1);

/// Body sent when a provider had nothing to show
pub const SENTINEL_BODY: &str = "broken";

/// What a frame carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// Rendered page content
    Content,
    /// Provider produced no lines
    Sentinel,
    /// Display off: empty body
    Blank,
}

/// One outgoing frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Lines,
    body: String<MAX_BODY_LEN>,
    sequence: u8,
    kind: FrameKind,
}

impl Frame {
    /// Frame from rendered lines; no lines gives the sentinel body
    pub fn from_lines(lines: Lines, sequence: u8) -> Self {
        let mut body = String::new();
        let kind = if lines.is_empty() {
            let _ = body.push_str(SENTINEL_BODY);
            FrameKind::Sentinel
        } else {
            for line in &lines {
                // MAX_BODY_LEN covers MAX_LINES full lines
                let _ = body.push_str(line);
                let _ = body.push('\n');
            }
            FrameKind::Content
        };
        Self {
            lines,
            body,
            sequence,
            kind,
        }
    }

    /// Empty frame that clears the display
    pub fn blank(sequence: u8) -> Self {
        Self {
            lines: Lines::new(),
            body: String::new(),
            sequence,
            kind: FrameKind::Blank,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Text handed to the transport
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }
}

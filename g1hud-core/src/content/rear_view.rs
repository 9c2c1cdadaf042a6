//! Rear view page placeholder

use super::{push_line, ContentProvider, Lines, Snapshot};

/// Shown until a camera feed exists
pub const REAR_VIEW_PLACEHOLDER: &str = "Rear view not available yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RearViewProvider;

impl ContentProvider for RearViewProvider {
    fn render(&self, _snapshot: &Snapshot<'_>) -> Lines {
        let mut lines = Lines::new();
        push_line(&mut lines, REAR_VIEW_PLACEHOLDER);
        lines
    }
}

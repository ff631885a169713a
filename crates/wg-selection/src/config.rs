#![forbid(unsafe_code)]

//! Feature switches for the selection engine.

use serde::{Deserialize, Serialize};

/// Which selection gestures are honored.
///
/// A disabled gesture falls through to the next rule: Ctrl/Cmd-click with
/// multi-select off behaves like a plain or shift click, and drag calls are
/// ignored when drag-select is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Ctrl/Cmd-click toggles individual days.
    pub multi_select: bool,
    /// Shift-click extends from the anchor.
    pub range_select: bool,
    /// Press-and-drag selects a contiguous run.
    pub drag_select: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            multi_select: true,
            range_select: true,
            drag_select: true,
        }
    }
}

impl SelectionConfig {
    /// Plain single-day selection only.
    #[must_use]
    pub fn single_only() -> Self {
        Self {
            multi_select: false,
            range_select: false,
            drag_select: false,
        }
    }
}

#![forbid(unsafe_code)]

//! Global shortcut mapping for the calendar surface.
//!
//! [`ShortcutMapper`] turns key presses into [`ShortcutAction`]s the host
//! dispatches to its history and selection engines.
//!
//! | Keys                              | Action           |
//! |-----------------------------------|------------------|
//! | Ctrl/Cmd+Z                        | `Undo`           |
//! | Ctrl/Cmd+Shift+Z                  | `Redo`           |
//! | Ctrl/Cmd+Y (if enabled)           | `Redo`           |
//! | Escape (if enabled)               | `ClearSelection` |
//!
//! Only [`KeyEventKind::Press`] events map; repeats and releases return
//! `None` so holding Ctrl+Z does not unwind the whole history.
//!
//! ```
//! use wg_core::event::{KeyCode, KeyEvent, Modifiers};
//! use wg_core::keybinding::{ShortcutAction, ShortcutMapper};
//!
//! let mapper = ShortcutMapper::default();
//! let ev = KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::SUPER);
//! assert_eq!(mapper.map(&ev), Some(ShortcutAction::Undo));
//! ```

use serde::{Deserialize, Serialize};

use crate::event::{KeyCode, KeyEvent, KeyEventKind};

/// High-level command produced by a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Undo,
    Redo,
    ClearSelection,
}

/// Which optional bindings are active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutConfig {
    /// Bind Ctrl/Cmd+Y to redo in addition to Ctrl/Cmd+Shift+Z.
    pub redo_with_y: bool,
    /// Bind Escape to clearing the day selection.
    pub escape_clears_selection: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            redo_with_y: true,
            escape_clears_selection: true,
        }
    }
}

/// Maps key events to [`ShortcutAction`]s.
#[derive(Debug, Clone, Default)]
pub struct ShortcutMapper {
    config: ShortcutConfig,
}

impl ShortcutMapper {
    #[must_use]
    pub fn new(config: ShortcutConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ShortcutConfig {
        &self.config
    }

    /// Resolve a key event. Returns `None` for unbound keys.
    #[must_use]
    pub fn map(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let mods = event.modifiers;
        if mods.ctrl_or_cmd() {
            if event.is_char_ignore_case('z') {
                let action = if mods.shift() {
                    ShortcutAction::Redo
                } else {
                    ShortcutAction::Undo
                };
                tracing::trace!(target: "wg_core::keybinding", ?action, "shortcut matched");
                return Some(action);
            }
            if self.config.redo_with_y && event.is_char_ignore_case('y') && !mods.shift() {
                tracing::trace!(target: "wg_core::keybinding", action = ?ShortcutAction::Redo, "shortcut matched");
                return Some(ShortcutAction::Redo);
            }
            return None;
        }

        if self.config.escape_clears_selection
            && event.code == KeyCode::Escape
            && mods.is_empty()
        {
            return Some(ShortcutAction::ClearSelection);
        }

        None
    }
}

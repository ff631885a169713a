#![forbid(unsafe_code)]

//! WorkGraph core types.
//!
//! Shared vocabulary for the calendar engines:
//!
//! - [`DateKey`]: validated `YYYY-MM-DD` calendar day with chronological
//!   ordering and range walking.
//! - [`event`]: pointer/key modifiers and key events forwarded by the host.
//! - [`keybinding`]: undo/redo/clear shortcut mapping.
//! - [`logging`]: optional subscriber setup.

pub mod date_key;
pub mod event;
pub mod keybinding;
pub mod logging;

pub use date_key::{DateKey, DateKeyError, DateRange};
pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use keybinding::{ShortcutAction, ShortcutConfig, ShortcutMapper};

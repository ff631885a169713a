#![forbid(unsafe_code)]

//! Calendar day selection for WorkGraph timesheets.
//!
//! The host forwards pointer events from day cells:
//!
//! | UI event                   | Engine call                      |
//! |----------------------------|----------------------------------|
//! | click (with modifiers)     | [`SelectionEngine::select_day`]  |
//! | pointer down on a cell     | [`SelectionEngine::begin_drag`]  |
//! | pointer enters a cell      | [`SelectionEngine::continue_drag`] |
//! | pointer up                 | [`SelectionEngine::end_drag`]    |
//!
//! and subscribes with [`SelectionEngine::on_change`] to drive highlighting.
//!
//! ```
//! use wg_core::{DateKey, Modifiers};
//! use wg_selection::{SelectionEngine, SelectionMode};
//!
//! let mut engine = SelectionEngine::default();
//! engine.select_day("2025-01-30".parse().unwrap(), Modifiers::NONE);
//! engine.select_day("2025-02-02".parse().unwrap(), Modifiers::SHIFT);
//! assert_eq!(engine.len(), 4);
//! assert_eq!(engine.mode(), SelectionMode::Range);
//! ```

pub mod config;
pub mod engine;
pub mod selection;

pub use config::SelectionConfig;
pub use engine::SelectionEngine;
pub use selection::{Selection, SelectionMode};

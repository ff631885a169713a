#![forbid(unsafe_code)]

//! WorkGraph runtime.
//!
//! # Key Components
//!
//! - [`HistoryEngine`] - bounded snapshot undo/redo with a re-entrancy guard
//! - [`HistoryStack`] - the underlying list and cursor
//! - [`EngineConfig`] - TOML/JSON configuration for selection, history, and
//!   shortcuts
//!
//! # How it fits in the system
//! `wg-core` supplies date keys and input types, `wg-selection` turns day
//! clicks into selections, and this crate records the host's edits so they
//! can be undone. The host owns the event loop: it calls
//! [`HistoryEngine::settle`] once per turn.

pub mod config;
pub mod undo;

pub use config::{ConfigError, EngineConfig};
pub use undo::{
    GuardRelease, GuardState, HistoryConfig, HistoryEngine, HistoryEntry, HistoryStack,
    ListenerId,
};

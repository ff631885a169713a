#![forbid(unsafe_code)]

//! WorkGraph public facade crate.
//!
//! Re-exports the calendar engines and offers a prelude for host code:
//!
//! ```
//! use workgraph::prelude::*;
//!
//! let config = EngineConfig::default();
//! let mut selection = SelectionEngine::new(config.selection);
//! let history = HistoryEngine::new(Vec::<DateKey>::new(), &config.history);
//!
//! let day: DateKey = "2025-03-03".parse()?;
//! selection.select_day(day, Modifiers::NONE);
//! history.push_described(selection.sorted_keys(), "select monday");
//! assert!(history.can_undo());
//! # Ok::<(), workgraph::Error>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use wg_core::{
    DateKey, DateKeyError, DateRange, KeyCode, KeyEvent, KeyEventKind, Modifiers, ShortcutAction,
    ShortcutConfig, ShortcutMapper,
};

#[cfg(feature = "tracing-json")]
pub use wg_core::logging::init_json;

// --- Selection re-exports --------------------------------------------------

pub use wg_selection::{Selection, SelectionConfig, SelectionEngine, SelectionMode};

// --- Runtime re-exports ----------------------------------------------------

pub use wg_runtime::{
    ConfigError, EngineConfig, GuardRelease, GuardState, HistoryConfig, HistoryEngine,
    HistoryEntry, HistoryStack, ListenerId,
};

#[cfg(feature = "hamt")]
pub use wg_runtime::undo::history::persistent;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for WorkGraph hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A day identifier failed to parse.
    #[error(transparent)]
    DateKey(#[from] DateKeyError),
    /// Engine configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard result type for WorkGraph APIs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parse a list of `YYYY-MM-DD` strings, failing on the first bad one.
pub fn parse_date_keys<'a, I>(keys: I) -> Result<Vec<DateKey>>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|k| DateKey::parse(k).map_err(Error::from))
        .collect()
}

/// Common imports for host code.
pub mod prelude {
    pub use crate::{
        DateKey, EngineConfig, Error, HistoryConfig, HistoryEngine, KeyCode, KeyEvent, Modifiers,
        Result, Selection, SelectionConfig, SelectionEngine, SelectionMode, ShortcutAction,
        ShortcutMapper,
    };
}

#![forbid(unsafe_code)]

//! Bounded linear history of state snapshots.
//!
//! [`HistoryStack`] keeps an ordered list of [`HistoryEntry`] values and a
//! cursor pointing at the current one. Snapshots are stored behind [`Arc`]
//! so handing an entry back to the host never deep-copies the state.
//!
//! # Invariants
//!
//! 1. The list is never empty and `current_index < len`.
//! 2. Pushing while the cursor is not at the tail discards everything after
//!    the cursor before appending (the redo branch is pruned).
//! 3. `len <= max_history`; overflow evicts the oldest entry and shifts the
//!    cursor down with it.
//! 4. The entry at the cursor is the state the host currently shows.
//!
//! ```text
//! push(s3)             [s0, s1, s2, s3]   cursor=3
//! undo() x2            [s0, s1, s2, s3]   cursor=1
//! push(s4)             [s0, s1, s4]       cursor=2   (s2, s3 pruned)
//! push(s5), max=3      [s1, s4, s5]       cursor=2   (s0 evicted)
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::engine::GuardRelease;

/// Default cap on retained entries.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Configuration for history depth and guard behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept, including the current one.
    pub max_history: usize,
    /// When the re-entrancy guard armed by undo/redo is released.
    pub guard_release: GuardRelease,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            guard_release: GuardRelease::default(),
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with the given depth limit.
    #[must_use]
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_guard_release(mut self, release: GuardRelease) -> Self {
        self.guard_release = release;
        self
    }

    /// Create an unlimited configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }
}

/// One immutable snapshot in the history list.
pub struct HistoryEntry<T> {
    state: Arc<T>,
    timestamp: Instant,
    description: Option<String>,
}

impl<T> HistoryEntry<T> {
    fn new(state: Arc<T>, description: Option<String>) -> Self {
        Self {
            state,
            timestamp: Instant::now(),
            description,
        }
    }

    /// The stored snapshot.
    #[must_use]
    pub fn state(&self) -> &Arc<T> {
        &self.state
    }

    /// When the entry was recorded.
    #[must_use]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Label of the edit that produced this state.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl<T> Clone for HistoryEntry<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            timestamp: self.timestamp,
            description: self.description.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HistoryEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("state", &self.state)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered snapshot list with a cursor.
pub struct HistoryStack<T> {
    entries: VecDeque<HistoryEntry<T>>,
    current: usize,
    initial: Arc<T>,
    max_history: usize,
}

impl<T> fmt::Debug for HistoryStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStack")
            .field("len", &self.entries.len())
            .field("current", &self.current)
            .field("max_history", &self.max_history)
            .finish()
    }
}

impl<T> HistoryStack<T> {
    /// Seed the history with `initial` at index 0.
    ///
    /// A `max_history` of zero is treated as one.
    #[must_use]
    pub fn new(initial: T, max_history: usize) -> Self {
        Self::from_arc(Arc::new(initial), max_history)
    }

    /// Seed the history with a pre-wrapped snapshot.
    #[must_use]
    pub fn from_arc(initial: Arc<T>, max_history: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(HistoryEntry::new(Arc::clone(&initial), None));
        Self {
            entries,
            current: 0,
            initial,
            max_history: max_history.max(1),
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record a new current state. Returns the number of evicted entries.
    pub fn push(&mut self, state: T, description: Option<String>) -> usize {
        self.push_arc(Arc::new(state), description)
    }

    /// Record a pre-wrapped snapshot. Returns the number of evicted entries.
    pub fn push_arc(&mut self, state: Arc<T>, description: Option<String>) -> usize {
        self.entries.truncate(self.current + 1);
        self.entries.push_back(HistoryEntry::new(state, description));
        self.current = self.entries.len() - 1;
        self.enforce_depth()
    }

    /// Step back one entry. `None` at the head, with nothing changed.
    pub fn undo(&mut self) -> Option<&HistoryEntry<T>> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        self.entries.get(self.current)
    }

    /// Step forward one entry. `None` at the tail, with nothing changed.
    pub fn redo(&mut self) -> Option<&HistoryEntry<T>> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        self.entries.get(self.current)
    }

    /// Reset to a single entry holding `new_initial`, or the original
    /// initial state when `None`.
    pub fn clear(&mut self, new_initial: Option<T>) {
        let state = new_initial.map_or_else(|| Arc::clone(&self.initial), Arc::new);
        self.entries.clear();
        self.entries.push_back(HistoryEntry::new(state, None));
        self.current = 0;
    }

    /// Change the depth limit, evicting as needed.
    ///
    /// Older entries go first; if the cursor sits at the head, the
    /// newest redo entries are dropped instead so the current state
    /// survives.
    pub fn set_max_history(&mut self, max_history: usize) {
        self.max_history = max_history.max(1);
        self.enforce_depth();
        while self.entries.len() > self.max_history {
            self.entries.pop_back();
        }
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// The entry at the cursor.
    #[must_use]
    pub fn current(&self) -> &HistoryEntry<T> {
        &self.entries[self.current]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    #[must_use]
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Description of the edit that `undo` would revert.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        if self.can_undo() {
            self.current().description()
        } else {
            None
        }
    }

    /// Description of the edit that `redo` would reapply.
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.current + 1)
            .and_then(HistoryEntry::description)
    }

    /// All entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.iter()
    }

    // ====================================================================
    // Internal
    // ====================================================================

    /// Evict from the front while over the limit, keeping the cursor valid.
    fn enforce_depth(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.max_history && self.current > 0 {
            self.entries.pop_front();
            self.current -= 1;
            evicted += 1;
        }
        evicted
    }
}

/// Persistent collection types for snapshot-friendly state.
///
/// Cloning these shares structure, so pushing a fresh snapshot after a
/// one-day edit costs O(log n) rather than a full copy of the period.
#[cfg(feature = "hamt")]
pub mod persistent {
    pub use im::{HashMap, HashSet, OrdMap, OrdSet, Vector};
}

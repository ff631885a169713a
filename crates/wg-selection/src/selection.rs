#![forbid(unsafe_code)]

//! Immutable selection snapshots.
//!
//! The engine never mutates a published [`Selection`]; every change builds a
//! new set behind a fresh `Arc`. Hosts can therefore hold on to the value
//! they were handed and compare it against the next one by pointer
//! ([`Selection::ptr_eq`]) or by value.

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;
use std::sync::Arc;

use wg_core::DateKey;

/// How the current selection was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// Plain click, or cleared.
    #[default]
    Single,
    /// Ctrl/Cmd toggling.
    Multi,
    /// Shift-extension or programmatic range.
    Range,
    /// Press-and-drag.
    Drag,
}

impl SelectionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
            Self::Range => "range",
            Self::Drag => "drag",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of selected days, iterated chronologically.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Selection(Arc<BTreeSet<DateKey>>);

impl Selection {
    pub(crate) fn from_set(set: BTreeSet<DateKey>) -> Self {
        Self(Arc::new(set))
    }

    #[must_use]
    pub fn contains(&self, key: DateKey) -> bool {
        self.0.contains(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Earliest selected day.
    #[must_use]
    pub fn first(&self) -> Option<DateKey> {
        self.0.first().copied()
    }

    /// Latest selected day.
    #[must_use]
    pub fn last(&self) -> Option<DateKey> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> std::iter::Copied<btree_set::Iter<'_, DateKey>> {
        self.0.iter().copied()
    }

    /// Selected days in chronological order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<DateKey> {
        self.iter().collect()
    }

    #[must_use]
    pub fn as_set(&self) -> &BTreeSet<DateKey> {
        &self.0
    }

    /// True if both handles refer to the same published snapshot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter().map(ToString::to_string)).finish()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = DateKey;
    type IntoIter = std::iter::Copied<btree_set::Iter<'a, DateKey>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#![forbid(unsafe_code)]

//! Pointer-driven multi-day selection.
//!
//! [`SelectionEngine`] turns day-cell interactions into a [`Selection`] plus
//! a [`SelectionMode`], and reports every change to a registered listener.
//!
//! # State Machine
//!
//! ```text
//!              select_day / select_range / add / remove / clear
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!       ┌─────────┐   begin_drag(k)   ┌──────────────────┐  │
//!       │  Idle   │──────────────────▶│ Dragging{origin} │──┘
//!       └─────────┘◀──────────────────└──────────────────┘
//!            ▲          end_drag()          │  ▲
//!            │                              │  │ continue_drag(k):
//!            │                              └──┘ selection := origin..=k
//! ```
//!
//! # Click rules
//!
//! Exactly one rule applies per [`select_day`](SelectionEngine::select_day):
//!
//! 1. Ctrl/Cmd with multi-select enabled: toggle the day, it becomes the
//!    anchor, mode `Multi`.
//! 2. Shift with range-select enabled and an anchor present: select
//!    anchor..=day, anchor unchanged, mode `Range`.
//! 3. Otherwise: select only the day, it becomes the anchor, mode `Single`.
//!
//! # Invariants
//!
//! 1. The published [`Selection`] is replaced, never mutated, on change.
//! 2. The listener fires exactly once per change and never when the set is
//!    unchanged.
//! 3. The anchor moves only on plain click, Ctrl/Cmd toggle, drag start,
//!    and `clear`.
//! 4. A drag origin exists iff the engine is dragging.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, trace};
use wg_core::{DateKey, Modifiers};

use crate::config::SelectionConfig;
use crate::selection::{Selection, SelectionMode};

type ChangeListener = Box<dyn FnMut(&Selection)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { origin: DateKey },
}

/// Tracks the selected calendar days for one calendar view.
pub struct SelectionEngine {
    config: SelectionConfig,
    selection: Selection,
    mode: SelectionMode,
    anchor: Option<DateKey>,
    drag: DragState,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("config", &self.config)
            .field("selection", &self.selection)
            .field("mode", &self.mode)
            .field("anchor", &self.anchor)
            .field("drag", &self.drag)
            .field("has_listener", &self.on_change.is_some())
            .finish()
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

impl SelectionEngine {
    #[must_use]
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            selection: Selection::default(),
            mode: SelectionMode::Single,
            anchor: None,
            drag: DragState::Idle,
            on_change: None,
        }
    }

    /// Register the selection-changed callback, replacing any previous one.
    pub fn on_change(&mut self, listener: impl FnMut(&Selection) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Remove the selection-changed callback.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    // ====================================================================
    // Click selection
    // ====================================================================

    /// Apply a click on `key` with the held modifiers.
    ///
    /// Returns `true` if the selected set changed.
    pub fn select_day(&mut self, key: DateKey, modifiers: Modifiers) -> bool {
        if modifiers.ctrl_or_cmd() && self.config.multi_select {
            let mut next = self.selection.as_set().clone();
            if !next.remove(&key) {
                next.insert(key);
            }
            self.mode = SelectionMode::Multi;
            self.anchor = Some(key);
            debug!(target: "wg_selection", day = %key, "toggle day");
            return self.publish(next);
        }

        if modifiers.shift()
            && self.config.range_select
            && let Some(anchor) = self.anchor
        {
            self.mode = SelectionMode::Range;
            debug!(target: "wg_selection", from = %anchor, to = %key, "extend range from anchor");
            return self.publish(DateKey::range(anchor, key).collect());
        }

        self.mode = SelectionMode::Single;
        self.anchor = Some(key);
        debug!(target: "wg_selection", day = %key, "select single day");
        self.publish(BTreeSet::from([key]))
    }

    /// Select every day between `start` and `end` inclusive.
    ///
    /// Argument order does not matter. The anchor is left alone.
    pub fn select_range(&mut self, start: DateKey, end: DateKey) -> bool {
        self.mode = SelectionMode::Range;
        debug!(target: "wg_selection", %start, %end, "select range");
        self.publish(DateKey::range(start, end).collect())
    }

    /// Add days to the selection without touching anchor or mode.
    pub fn add_dates<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = DateKey>,
    {
        let mut next = self.selection.as_set().clone();
        next.extend(keys);
        self.publish(next)
    }

    /// Remove days from the selection without touching anchor or mode.
    pub fn remove_dates<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = DateKey>,
    {
        let mut next = self.selection.as_set().clone();
        for key in keys {
            next.remove(&key);
        }
        self.publish(next)
    }

    /// Empty the selection, forget the anchor, and reset the mode.
    ///
    /// Also abandons an in-progress drag.
    pub fn clear(&mut self) -> bool {
        self.anchor = None;
        self.mode = SelectionMode::Single;
        self.drag = DragState::Idle;
        debug!(target: "wg_selection", "clear selection");
        self.publish(BTreeSet::new())
    }

    // ====================================================================
    // Drag selection
    // ====================================================================

    /// Start a drag on `key`. Ignored when drag-select is disabled.
    pub fn begin_drag(&mut self, key: DateKey) -> bool {
        if !self.config.drag_select {
            trace!(target: "wg_selection", day = %key, "drag disabled, ignoring begin_drag");
            return false;
        }
        self.drag = DragState::Dragging { origin: key };
        self.anchor = Some(key);
        self.mode = SelectionMode::Drag;
        debug!(target: "wg_selection", origin = %key, "drag started");
        self.publish(BTreeSet::from([key]))
    }

    /// Extend the drag to `key`. Ignored unless dragging.
    ///
    /// Each call recomputes the full origin..=key run, so the selection
    /// always tracks the latest pointer position.
    pub fn continue_drag(&mut self, key: DateKey) -> bool {
        let DragState::Dragging { origin } = self.drag else {
            return false;
        };
        self.mode = SelectionMode::Drag;
        trace!(target: "wg_selection", %origin, to = %key, "drag moved");
        self.publish(DateKey::range(origin, key).collect())
    }

    /// Finish the drag. Selection and mode stay as last computed.
    pub fn end_drag(&mut self) {
        if let DragState::Dragging { origin } = self.drag {
            debug!(target: "wg_selection", %origin, selected = self.selection.len(), "drag ended");
        }
        self.drag = DragState::Idle;
    }

    // ====================================================================
    // Query
    // ====================================================================

    #[must_use]
    pub fn is_selected(&self, key: DateKey) -> bool {
        self.selection.contains(key)
    }

    /// The current published selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    #[must_use]
    pub fn anchor(&self) -> Option<DateKey> {
        self.anchor
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Origin of the active drag, if any.
    #[must_use]
    pub fn drag_origin(&self) -> Option<DateKey> {
        match self.drag {
            DragState::Dragging { origin } => Some(origin),
            DragState::Idle => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selection.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Selected days, earliest first.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<DateKey> {
        self.selection.to_vec()
    }

    #[must_use]
    pub fn first(&self) -> Option<DateKey> {
        self.selection.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<DateKey> {
        self.selection.last()
    }

    #[must_use]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Swap the enabled gestures. Disabling drag ends an active drag.
    pub fn set_config(&mut self, config: SelectionConfig) {
        if !config.drag_select {
            self.end_drag();
        }
        self.config = config;
    }

    // ====================================================================
    // Internal
    // ====================================================================

    fn publish(&mut self, next: BTreeSet<DateKey>) -> bool {
        if next == *self.selection.as_set() {
            return false;
        }
        self.selection = Selection::from_set(next);
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.selection);
        }
        true
    }
}

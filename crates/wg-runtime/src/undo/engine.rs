#![forbid(unsafe_code)]

//! Shared undo/redo engine with a re-entrancy guard.
//!
//! [`HistoryEngine`] wraps a [`HistoryStack`] in a cheaply clonable,
//! single-threaded handle. Hosts subscribe to be told which state to render
//! after `undo`/`redo`, and call `push` after committing an edit.
//!
//! # Re-entrancy guard
//!
//! Rendering a restored state usually runs the same code path that records
//! edits. If that path called `push`, every undo would open a new branch and
//! the history would never shrink. The engine therefore tracks a
//! [`GuardState`]:
//!
//! ```text
//!            undo()/redo() moved the cursor
//!   ┌──────┐ ─────────────────────────────▶ ┌─────────────────┐
//!   │ Idle │                                │ ApplyingHistory │──┐ push(): suppressed
//!   └──────┘ ◀───────────────────────────── └─────────────────┘◀─┘
//!              settle()            (NextTurn)
//!              listeners returned  (AfterDispatch)
//! ```
//!
//! Listeners run with no internal borrow held, so they may call any engine
//! method, including `push`, `undo`, and queries.
//!
//! With the default [`GuardRelease::NextTurn`], the guard stays armed until
//! the host's event loop calls [`HistoryEngine::settle`] at the start of
//! its next turn. This covers hosts that react to the notification with
//! deferred work. [`GuardRelease::AfterDispatch`] releases the guard as soon
//! as every listener has returned.
//!
//! # Batches
//!
//! A multi-step gesture (drag-copy across a week, bulk fill) can be recorded
//! as one entry: [`begin_batch`](HistoryEngine::begin_batch) suppresses
//! individual pushes until [`end_batch`](HistoryEngine::end_batch) records
//! the final state under the batch's description. An undo or redo while a
//! batch is open abandons the batch.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use web_time::Instant;

use super::history::{HistoryConfig, HistoryEntry, HistoryStack};

/// Whether an undo/redo application is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GuardState {
    /// Pushes are recorded.
    #[default]
    Idle,
    /// A restored state is being applied; pushes are dropped.
    ApplyingHistory,
}

/// When an armed guard returns to [`GuardState::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardRelease {
    /// On the next [`HistoryEngine::settle`] call.
    #[default]
    NextTurn,
    /// As soon as all listeners for the notification have returned.
    AfterDispatch,
}

/// Handle returned by [`HistoryEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Rc<dyn Fn(&HistoryEntry<T>)>;

#[derive(Debug, Clone, Copy)]
enum Step {
    Undo,
    Redo,
}

#[derive(Debug)]
struct Batch {
    description: String,
    started: Instant,
}

struct Inner<T> {
    stack: HistoryStack<T>,
    guard: GuardState,
    release: GuardRelease,
    dispatch_depth: usize,
    batch: Option<Batch>,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_listener: u64,
}

impl<T> Inner<T> {
    fn abandon_batch(&mut self, reason: &'static str) {
        if let Some(batch) = self.batch.take() {
            warn!(
                target: "wg_runtime::undo",
                batch = %batch.description,
                open_for = ?batch.started.elapsed(),
                reason,
                "abandoning open batch"
            );
        }
    }
}

/// Bounded linear undo/redo over host snapshots.
///
/// Cloning the engine yields another handle to the same history.
pub struct HistoryEngine<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for HistoryEngine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for HistoryEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("HistoryEngine")
                .field("stack", &inner.stack)
                .field("guard", &inner.guard)
                .field("release", &inner.release)
                .field("batch", &inner.batch)
                .field("listeners", &inner.listeners.len())
                .finish(),
            Err(_) => f.write_str("HistoryEngine { <borrowed> }"),
        }
    }
}

impl<T: 'static> HistoryEngine<T> {
    /// Seed the history with `initial` as entry 0.
    #[must_use]
    pub fn new(initial: T, config: &HistoryConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                stack: HistoryStack::new(initial, config.max_history),
                guard: GuardState::Idle,
                release: config.guard_release,
                dispatch_depth: 0,
                batch: None,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    /// Seed with the default configuration.
    #[must_use]
    pub fn with_defaults(initial: T) -> Self {
        Self::new(initial, &HistoryConfig::default())
    }

    // ====================================================================
    // Subscription
    // ====================================================================

    /// Register a callback invoked with the restored entry after every
    /// effective undo or redo.
    pub fn subscribe(&self, listener: impl Fn(&HistoryEntry<T>) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record `state` as the new current entry.
    ///
    /// Returns `false` if the push was suppressed by the guard or an open
    /// batch.
    pub fn push(&self, state: T) -> bool {
        self.record(state, None)
    }

    /// Record `state` with a human-readable description of the edit.
    pub fn push_described(&self, state: T, description: impl Into<String>) -> bool {
        self.record(state, Some(description.into()))
    }

    /// Step back one entry and notify listeners with it.
    ///
    /// Returns `None`, without notifying, at the head of the history.
    pub fn undo(&self) -> Option<HistoryEntry<T>> {
        self.step(Step::Undo)
    }

    /// Step forward one entry and notify listeners with it.
    ///
    /// Returns `None`, without notifying, at the tail of the history.
    pub fn redo(&self) -> Option<HistoryEntry<T>> {
        self.step(Step::Redo)
    }

    /// Reset to a single entry: `new_initial`, or the original seed.
    ///
    /// Outside a notification this also releases an armed guard.
    pub fn clear(&self, new_initial: Option<T>) {
        let mut inner = self.inner.borrow_mut();
        inner.abandon_batch("clear");
        inner.stack.clear(new_initial);
        if inner.dispatch_depth == 0 {
            inner.guard = GuardState::Idle;
        }
        debug!(target: "wg_runtime::undo", "history cleared");
    }

    /// End the current scheduling turn, releasing an armed guard.
    ///
    /// Returns `true` if the guard was armed and is now idle. Calls made
    /// from inside a notification are ignored.
    pub fn settle(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.dispatch_depth > 0 || inner.guard == GuardState::Idle {
            return false;
        }
        inner.guard = GuardState::Idle;
        trace!(target: "wg_runtime::undo", "guard released");
        true
    }

    // ====================================================================
    // Batches
    // ====================================================================

    /// Open a batch. Returns `false` if one is already open or a history
    /// application is in flight.
    pub fn begin_batch(&self, description: impl Into<String>) -> bool {
        let description = description.into();
        let mut inner = self.inner.borrow_mut();
        if inner.guard == GuardState::ApplyingHistory {
            debug!(target: "wg_runtime::undo", batch = %description, "batch refused: applying history");
            return false;
        }
        if let Some(open) = &inner.batch {
            warn!(
                target: "wg_runtime::undo",
                open = %open.description,
                requested = %description,
                "begin_batch while already batching, ignoring"
            );
            return false;
        }
        debug!(target: "wg_runtime::undo", batch = %description, "batch started");
        inner.batch = Some(Batch {
            description,
            started: Instant::now(),
        });
        true
    }

    /// Close the open batch, recording `state` as one entry.
    ///
    /// Returns `false` if no batch was open.
    pub fn end_batch(&self, state: T) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(batch) = inner.batch.take() else {
            return false;
        };
        let evicted = inner.stack.push(state, Some(batch.description.clone()));
        debug!(
            target: "wg_runtime::undo",
            batch = %batch.description,
            size = inner.stack.len(),
            evicted,
            "batch recorded"
        );
        true
    }

    /// Drop the open batch without recording anything.
    pub fn cancel_batch(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        let cancelled = inner.batch.take().is_some();
        if cancelled {
            debug!(target: "wg_runtime::undo", "batch cancelled");
        }
        cancelled
    }

    #[must_use]
    pub fn is_batching(&self) -> bool {
        self.inner.borrow().batch.is_some()
    }

    // ====================================================================
    // Query
    // ====================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.inner.borrow().stack.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.inner.borrow().stack.can_redo()
    }

    /// Number of retained entries, including the current one.
    #[must_use]
    pub fn history_size(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.inner.borrow().stack.current_index()
    }

    /// Description attached to the current entry.
    #[must_use]
    pub fn current_description(&self) -> Option<String> {
        self.inner
            .borrow()
            .stack
            .current()
            .description()
            .map(str::to_owned)
    }

    /// Description of the edit `undo` would revert.
    #[must_use]
    pub fn undo_description(&self) -> Option<String> {
        self.inner.borrow().stack.undo_description().map(str::to_owned)
    }

    /// Description of the edit `redo` would reapply.
    #[must_use]
    pub fn redo_description(&self) -> Option<String> {
        self.inner.borrow().stack.redo_description().map(str::to_owned)
    }

    /// The state the host should currently show.
    #[must_use]
    pub fn current_state(&self) -> Arc<T> {
        Arc::clone(self.inner.borrow().stack.current().state())
    }

    #[must_use]
    pub fn current_entry(&self) -> HistoryEntry<T> {
        self.inner.borrow().stack.current().clone()
    }

    #[must_use]
    pub fn guard_state(&self) -> GuardState {
        self.inner.borrow().guard
    }

    #[must_use]
    pub fn max_history(&self) -> usize {
        self.inner.borrow().stack.max_history()
    }

    /// Change the depth limit, evicting oldest entries as needed.
    pub fn set_max_history(&self, max_history: usize) {
        self.inner.borrow_mut().stack.set_max_history(max_history);
    }

    // ====================================================================
    // Internal
    // ====================================================================

    fn record(&self, state: T, description: Option<String>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.guard == GuardState::ApplyingHistory {
            debug!(
                target: "wg_runtime::undo",
                description = description.as_deref(),
                "push suppressed: applying history"
            );
            return false;
        }
        if let Some(batch) = &inner.batch {
            trace!(
                target: "wg_runtime::undo",
                batch = %batch.description,
                "push suppressed: batch in progress"
            );
            return false;
        }
        let evicted = inner.stack.push(state, description);
        debug!(
            target: "wg_runtime::undo",
            index = inner.stack.current_index(),
            size = inner.stack.len(),
            evicted,
            "history entry pushed"
        );
        true
    }

    fn step(&self, step: Step) -> Option<HistoryEntry<T>> {
        let (entry, listeners) = {
            let mut inner = self.inner.borrow_mut();
            inner.abandon_batch("history step");
            let moved = match step {
                Step::Undo => inner.stack.undo(),
                Step::Redo => inner.stack.redo(),
            };
            let Some(entry) = moved.cloned() else {
                trace!(target: "wg_runtime::undo", ?step, "at history boundary, ignoring");
                return None;
            };
            inner.guard = GuardState::ApplyingHistory;
            inner.dispatch_depth += 1;
            debug!(
                target: "wg_runtime::undo",
                ?step,
                index = inner.stack.current_index(),
                size = inner.stack.len(),
                "history step"
            );
            let listeners: Vec<Listener<T>> =
                inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (entry, listeners)
        };

        for listener in &listeners {
            listener(&entry);
        }

        let mut inner = self.inner.borrow_mut();
        inner.dispatch_depth -= 1;
        if inner.dispatch_depth == 0 && inner.release == GuardRelease::AfterDispatch {
            inner.guard = GuardState::Idle;
        }
        drop(inner);
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn engine(max: usize) -> HistoryEngine<&'static str> {
        HistoryEngine::new("s0", &HistoryConfig::new(max))
    }

    fn current(e: &HistoryEngine<&'static str>) -> &'static str {
        *e.current_state()
    }

    #[test]
    fn clear_after_undo_accepts_next_edit() {
        let e = HistoryEngine::new(0, &HistoryConfig::default());
        e.push(1);
        e.settle();
        e.undo();
        assert_eq!(e.guard_state(), GuardState::ApplyingHistory);

        e.clear(Some(100));
        assert_eq!(e.guard_state(), GuardState::Idle);
        assert!(e.push(101));
        assert_eq!(e.history_size(), 2);
        assert_eq!(*e.current_state(), 101);
    }

    #[test]
    fn clear_inside_listener_keeps_guard_armed() {
        let e = HistoryEngine::new(0, &HistoryConfig::default());
        let handle = e.clone();
        let recorded = Rc::new(Cell::new(true));
        let r = Rc::clone(&recorded);
        e.subscribe(move |_| {
            handle.clear(Some(7));
            r.set(handle.push(8));
        });
        e.push(1);
        e.settle();
        e.undo();

        assert!(!recorded.get());
        assert_eq!(e.history_size(), 1);
        assert_eq!(*e.current_state(), 7);
    }

    #[test]
    fn undo_redo_prune_sequence() {
        let e = engine(10);
        e.push("s1");
        e.push("s2");
        e.settle();

        assert_eq!(**e.undo().unwrap().state(), "s1");
        e.settle();
        assert_eq!(**e.undo().unwrap().state(), "s0");
        e.settle();
        assert_eq!(**e.redo().unwrap().state(), "s1");
        e.settle();

        assert!(e.push("s3"));
        assert!(e.redo().is_none());
        assert_eq!(current(&e), "s3");
        assert_eq!(e.history_size(), 3);
    }

    #[test]
    fn boundary_steps_do_not_notify() {
        let e = engine(10);
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        e.subscribe(move |_| c.set(c.get() + 1));

        assert!(e.undo().is_none());
        assert!(e.redo().is_none());
        assert_eq!(calls.get(), 0);
        assert_eq!(e.current_index(), 0);
        assert_eq!(e.guard_state(), GuardState::Idle);

        e.push("s1");
        assert!(e.redo().is_none());
        assert_eq!(calls.get(), 0);
        assert_eq!(current(&e), "s1");
    }

    #[test]
    fn listener_push_is_suppressed() {
        let e = engine(10);
        e.push("s1");
        e.push("s2");

        let handle = e.clone();
        let recorded = Rc::new(Cell::new(true));
        let r = Rc::clone(&recorded);
        e.subscribe(move |entry| r.set(handle.push(**entry.state())));

        e.undo();
        assert!(!recorded.get());
        assert_eq!(e.history_size(), 3);
        assert!(e.can_redo());
    }

    #[test]
    fn guard_spans_turn_until_settle() {
        let e = engine(10);
        e.push("s1");
        e.undo();
        assert_eq!(e.guard_state(), GuardState::ApplyingHistory);

        // Deferred reaction from the same turn is still suppressed.
        assert!(!e.push("late"));
        assert!(e.settle());
        assert_eq!(e.guard_state(), GuardState::Idle);
        assert!(!e.settle());

        assert!(e.push("s2"));
        assert_eq!(current(&e), "s2");
    }

    #[test]
    fn after_dispatch_release_frees_guard_immediately() {
        let e = HistoryEngine::new(
            0,
            &HistoryConfig::new(10).with_guard_release(GuardRelease::AfterDispatch),
        );
        e.push(1);
        let handle = e.clone();
        let inside = Rc::new(Cell::new(true));
        let i = Rc::clone(&inside);
        e.subscribe(move |_| i.set(handle.push(99)));

        e.undo();
        assert!(!inside.get());
        assert_eq!(e.guard_state(), GuardState::Idle);
        assert!(e.push(2));
        assert_eq!(*e.current_state(), 2);
    }

    #[test]
    fn settle_inside_listener_is_ignored() {
        let e = engine(10);
        e.push("s1");
        let handle = e.clone();
        let settled = Rc::new(Cell::new(true));
        let s = Rc::clone(&settled);
        e.subscribe(move |_| s.set(handle.settle()));

        e.undo();
        assert!(!settled.get());
        assert_eq!(e.guard_state(), GuardState::ApplyingHistory);
    }

    #[test]
    fn listeners_can_query_engine() {
        let e = engine(10);
        e.push_described("s1", "fill");
        let handle = e.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        e.subscribe(move |entry| {
            sink.borrow_mut()
                .push((**entry.state(), handle.can_undo(), handle.can_redo()));
        });

        e.undo();
        e.redo();
        assert_eq!(*seen.borrow(), vec![("s0", false, true), ("s1", true, false)]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let e = engine(10);
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let id = e.subscribe(move |_| c.set(c.get() + 1));
        e.push("s1");
        e.undo();
        assert_eq!(calls.get(), 1);

        assert!(e.unsubscribe(id));
        assert!(!e.unsubscribe(id));
        e.redo();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn max_history_bounds_size() {
        let e = engine(3);
        for s in ["a", "b", "c", "d", "e"] {
            e.push(s);
        }
        assert_eq!(e.history_size(), 3);
        assert_eq!(e.current_index(), 2);
        assert!(e.can_undo());
        assert!(!e.can_redo());

        e.undo();
        e.undo();
        assert_eq!(current(&e), "c");
        assert!(!e.can_undo());
    }

    #[test]
    fn clear_resets_to_seed_or_replacement() {
        let e = engine(10);
        e.push("s1");
        e.push("s2");
        e.clear(None);
        assert_eq!(e.history_size(), 1);
        assert_eq!(current(&e), "s0");

        e.push("s3");
        e.clear(Some("fresh"));
        assert_eq!(current(&e), "fresh");
        assert!(!e.can_undo());
    }

    #[test]
    fn descriptions() {
        let e = engine(10);
        assert_eq!(e.current_description(), None);
        e.push_described("s1", "fill monday");
        e.push_described("s2", "copy to week");
        assert_eq!(e.current_description().as_deref(), Some("copy to week"));
        assert_eq!(e.undo_description().as_deref(), Some("copy to week"));

        e.undo();
        assert_eq!(e.current_description().as_deref(), Some("fill monday"));
        assert_eq!(e.redo_description().as_deref(), Some("copy to week"));
    }

    #[test]
    fn batch_collapses_pushes() {
        let e = engine(10);
        assert!(e.begin_batch("drag copy"));
        assert!(!e.begin_batch("nested"));
        assert!(!e.push("step1"));
        assert!(!e.push("step2"));
        assert!(e.end_batch("final"));
        assert!(!e.end_batch("again"));

        assert_eq!(e.history_size(), 2);
        assert_eq!(current(&e), "final");
        assert_eq!(e.current_description().as_deref(), Some("drag copy"));
    }

    #[test]
    fn undo_abandons_open_batch() {
        let e = engine(10);
        e.push("s1");
        e.begin_batch("bulk fill");
        e.undo();
        assert!(!e.is_batching());
        assert!(!e.end_batch("ignored"));
        assert_eq!(current(&e), "s0");
    }

    #[test]
    fn batch_refused_while_applying() {
        let e = engine(10);
        e.push("s1");
        e.undo();
        assert!(!e.begin_batch("too soon"));
        e.settle();
        assert!(e.begin_batch("ok"));
        assert!(e.cancel_batch());
        assert!(!e.cancel_batch());
        assert_eq!(e.history_size(), 2);
    }

    #[test]
    fn nested_undo_from_listener_keeps_guard_until_outermost() {
        let e = HistoryEngine::new(
            0,
            &HistoryConfig::new(10).with_guard_release(GuardRelease::AfterDispatch),
        );
        e.push(1);
        e.push(2);
        let handle = e.clone();
        let once = Rc::new(Cell::new(false));
        let o = Rc::clone(&once);
        let guard_seen = Rc::new(Cell::new(GuardState::Idle));
        let g = Rc::clone(&guard_seen);
        e.subscribe(move |_| {
            if !o.replace(true) {
                handle.undo();
                g.set(handle.guard_state());
            }
        });

        e.undo();
        assert_eq!(*e.current_state(), 0);
        assert_eq!(guard_seen.get(), GuardState::ApplyingHistory);
        assert_eq!(e.guard_state(), GuardState::Idle);
    }

    #[test]
    fn debug_reports_shape() {
        let e = engine(4);
        let s = format!("{e:?}");
        assert!(s.contains("HistoryEngine"));
        assert!(s.contains("max_history: 4"));
    }
}

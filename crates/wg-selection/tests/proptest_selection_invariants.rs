#![forbid(unsafe_code)]

//! Property tests for [`SelectionEngine`] invariants.
//!
//! Validates:
//! - Range selection is symmetric in its arguments.
//! - Ctrl-toggle applied twice is the identity.
//! - A drag gesture equals the programmatic range over its endpoints.
//! - Random click/drag sequences keep the listener in lockstep with the
//!   published selection and never leave a stale drag origin.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use wg_core::{DateKey, Modifiers};
use wg_selection::{Selection, SelectionEngine};

// ============================================================================
// Strategy helpers
// ============================================================================

/// Days in a 90-day window around a year boundary so operations overlap.
fn day() -> impl Strategy<Value = DateKey> {
    (0i64..90).prop_map(|offset| {
        let base: DateKey = "2024-12-15".parse().unwrap();
        DateKey::from_date(base.date() + chrono::Duration::days(offset)).unwrap()
    })
}

fn modifiers() -> impl Strategy<Value = Modifiers> {
    prop_oneof![
        3 => Just(Modifiers::NONE),
        2 => Just(Modifiers::CTRL),
        1 => Just(Modifiers::SUPER),
        2 => Just(Modifiers::SHIFT),
        1 => Just(Modifiers::CTRL | Modifiers::SHIFT),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Click(DateKey, Modifiers),
    BeginDrag(DateKey),
    ContinueDrag(DateKey),
    EndDrag,
    Range(DateKey, DateKey),
    Add(Vec<DateKey>),
    Remove(Vec<DateKey>),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (day(), modifiers()).prop_map(|(d, m)| Op::Click(d, m)),
        1 => day().prop_map(Op::BeginDrag),
        3 => day().prop_map(Op::ContinueDrag),
        1 => Just(Op::EndDrag),
        1 => (day(), day()).prop_map(|(a, b)| Op::Range(a, b)),
        1 => prop::collection::vec(day(), 0..5).prop_map(Op::Add),
        1 => prop::collection::vec(day(), 0..5).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn apply(engine: &mut SelectionEngine, op: &Op) -> bool {
    match op {
        Op::Click(d, m) => engine.select_day(*d, *m),
        Op::BeginDrag(d) => engine.begin_drag(*d),
        Op::ContinueDrag(d) => engine.continue_drag(*d),
        Op::EndDrag => {
            engine.end_drag();
            false
        }
        Op::Range(a, b) => engine.select_range(*a, *b),
        Op::Add(keys) => engine.add_dates(keys.iter().copied()),
        Op::Remove(keys) => engine.remove_dates(keys.iter().copied()),
        Op::Clear => engine.clear(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn range_is_symmetric(a in day(), b in day()) {
        let mut forward = SelectionEngine::default();
        let mut backward = SelectionEngine::default();
        forward.select_range(a, b);
        backward.select_range(b, a);

        prop_assert_eq!(forward.selection(), backward.selection());
        let expected: Vec<_> = DateKey::range(a, b).collect();
        prop_assert_eq!(forward.sorted_keys(), expected);
    }

    #[test]
    fn double_toggle_is_identity(seed in day(), span in day(), target in day()) {
        let mut engine = SelectionEngine::default();
        engine.select_range(seed, span);
        prop_assume!(!engine.is_selected(target));
        let before = engine.selection().clone();

        engine.select_day(target, Modifiers::CTRL);
        prop_assert!(engine.is_selected(target));
        engine.select_day(target, Modifiers::CTRL);
        prop_assert_eq!(engine.selection(), &before);
    }

    #[test]
    fn drag_matches_range(origin in day(), path in prop::collection::vec(day(), 1..8)) {
        let mut engine = SelectionEngine::default();
        engine.begin_drag(origin);
        for d in &path {
            engine.continue_drag(*d);
        }
        engine.end_drag();

        let mut reference = SelectionEngine::default();
        reference.select_range(origin, *path.last().unwrap());
        prop_assert_eq!(engine.selection(), reference.selection());
    }

    #[test]
    fn listener_tracks_every_change(ops in prop::collection::vec(op(), 1..60)) {
        let seen: Rc<RefCell<Vec<Selection>>> = Rc::new(RefCell::new(Vec::new()));
        let mut engine = SelectionEngine::default();
        let sink = Rc::clone(&seen);
        engine.on_change(move |sel| sink.borrow_mut().push(sel.clone()));

        let mut changes = 0usize;
        for op in &ops {
            let before = engine.selection().clone();
            let changed = apply(&mut engine, op);
            prop_assert_eq!(changed, before != *engine.selection());
            if changed {
                changes += 1;
                prop_assert!(!before.ptr_eq(engine.selection()));
            } else {
                prop_assert!(before.ptr_eq(engine.selection()));
            }
            prop_assert_eq!(engine.is_dragging(), engine.drag_origin().is_some());
        }

        let seen = seen.borrow();
        prop_assert_eq!(seen.len(), changes);
        if let Some(last) = seen.last() {
            prop_assert!(last.ptr_eq(engine.selection()));
        }
    }

    #[test]
    fn click_keeps_selection_non_empty_unless_last_day_toggled_off(
        ops in prop::collection::vec((day(), modifiers()), 1..40)
    ) {
        let mut engine = SelectionEngine::default();
        for (d, m) in ops {
            let was_only = engine.len() == 1 && engine.is_selected(d);
            engine.select_day(d, m);
            if engine.is_empty() {
                prop_assert!(m.ctrl_or_cmd() && was_only);
            }
        }
    }
}

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wg_core::{DateKey, Modifiers};
use wg_selection::SelectionEngine;

#[derive(Debug, Arbitrary)]
enum Op {
    Click { day: u8, mods: u8 },
    BeginDrag(u8),
    ContinueDrag(u8),
    EndDrag,
    Range(u8, u8),
    Clear,
}

fn key(offset: u8) -> Option<DateKey> {
    let base = DateKey::from_ymd(2024, 12, 1).ok()?;
    DateKey::range(base, DateKey::from_ymd(2025, 12, 31).ok()?).nth(usize::from(offset))
}

fuzz_target!(|ops: Vec<Op>| {
    let mut engine = SelectionEngine::default();
    for op in ops.into_iter().take(256) {
        match op {
            Op::Click { day, mods } => {
                if let Some(k) = key(day) {
                    engine.select_day(k, Modifiers::from_bits_truncate(mods));
                }
            }
            Op::BeginDrag(d) => {
                if let Some(k) = key(d) {
                    engine.begin_drag(k);
                }
            }
            Op::ContinueDrag(d) => {
                if let Some(k) = key(d) {
                    engine.continue_drag(k);
                }
            }
            Op::EndDrag => engine.end_drag(),
            Op::Range(a, b) => {
                if let (Some(a), Some(b)) = (key(a), key(b)) {
                    engine.select_range(a, b);
                }
            }
            Op::Clear => {
                engine.clear();
            }
        }

        assert_eq!(engine.is_dragging(), engine.drag_origin().is_some());
        if let (Some(first), Some(last)) = (engine.first(), engine.last()) {
            assert!(first <= last);
        }
    }
});

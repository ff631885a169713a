#![no_main]

use libfuzzer_sys::fuzz_target;
use wg_core::DateKey;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 64 {
        return;
    }

    // parse must never panic.
    let Ok(key) = DateKey::parse(text) else {
        return;
    };

    // Accepted input is already canonical.
    assert_eq!(key.to_string(), text);

    // Neighbours stay ordered and one day apart.
    if let Some(next) = key.succ() {
        assert!(next > key);
        assert_eq!(key.days_until(next), 1);
        assert_eq!(DateKey::range(next, key).count(), 2);
    }
});

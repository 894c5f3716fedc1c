#![no_main]

use libfuzzer_sys::fuzz_target;
use termtext::width::{ascii_width, visible_width_units};
use termtext::{strip_ansi_cow, visible_width};

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }
    let _ = visible_width_units(data, false);

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let width = visible_width(text, false);
    if text.is_empty() {
        assert_eq!(width, 0);
    }
    if let Some(aw) = ascii_width(text) {
        assert_eq!(width, aw, "ASCII fast path must match the full walk");
    }

    // Escapes never take up columns.
    assert_eq!(width, visible_width(&strip_ansi_cow(text), false));

    // Ambiguous characters only ever get wider.
    assert!(visible_width(text, true) >= width);

    let utf16: Vec<u16> = text.encode_utf16().collect();
    assert_eq!(termtext::visible_width_utf16(&utf16, false), width);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use termtext::{WrapOptions, strip_ansi_cow, visible_width, wrap_ansi, wrap_ansi_with};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Cap length to keep fuzzing fast.
    if text.len() > 2048 {
        return;
    }

    // A lone wide glyph cannot fit in one column; only require no panic.
    let _ = wrap_ansi(text, 1, true);

    for width in [2, 10, 40, 80] {
        // Hard wrap: every line fits.
        let wrapped = wrap_ansi(text, width, true);
        for line in wrapped.split('\n') {
            let w = visible_width(line, false);
            assert!(w <= width, "line exceeds width {width}: width={w} {line:?}");
        }

        // Soft wrap and the untrimmed variants must never panic.
        let _ = wrap_ansi(text, width, false);
        let _ = wrap_ansi_with(text, &WrapOptions::new(width).trim(false));
        let _ = wrap_ansi_with(text, &WrapOptions::new(width).word_wrap(false));
    }

    // Width zero hands the input back.
    assert_eq!(wrap_ansi(text, 0, false), text);

    // Without whitespace, hard wrap only inserts line breaks.
    if !text.contains([' ', '\t', '\r', '\n']) {
        let wrapped = wrap_ansi(text, 7, true);
        assert_eq!(
            strip_ansi_cow(&wrapped).replace('\n', ""),
            strip_ansi_cow(text)
        );
    }
});

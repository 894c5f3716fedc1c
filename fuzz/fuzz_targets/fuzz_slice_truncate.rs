#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use termtext::{TruncatePosition, slice_ansi, truncate_ansi, visible_width};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a str,
    start: u8,
    len: u8,
    open_end: bool,
    width: u8,
    position: u8,
}

fuzz_target!(|input: Input<'_>| {
    if input.text.len() > 2048 {
        return;
    }
    let text = input.text;
    let start = usize::from(input.start);
    let end = (!input.open_end).then(|| start + usize::from(input.len));

    let sliced = slice_ansi(text, start, end);
    let total = visible_width(text, false);
    let expected = end.unwrap_or(total).min(total).saturating_sub(start);
    assert!(
        visible_width(&sliced, false) <= expected,
        "slice {start}..{end:?} too wide: {sliced:?}"
    );

    let position = match input.position % 3 {
        0 => TruncatePosition::Start,
        1 => TruncatePosition::Middle,
        _ => TruncatePosition::End,
    };
    let width = usize::from(input.width);
    let truncated = truncate_ansi(text, width, "\u{2026}", position);
    assert!(visible_width(&truncated, false) <= width);
});

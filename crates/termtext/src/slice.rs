//! Column slicing that keeps styling intact.
//!
//! Columns are counted in visible cells, so `slice_ansi(s, 2, Some(5))`
//! returns what a terminal would draw in columns 2, 3 and 4.
//!
//! # Example
//! ```
//! use termtext::slice::slice_ansi;
//!
//! assert_eq!(slice_ansi("\x1b[31mhello\x1b[39m", 0, Some(3)), "\x1b[31mhel\x1b[39m");
//! assert_eq!(slice_ansi("\x1b[1mbold\x1b[22m", 2, None), "\x1b[1mld\x1b[22m");
//! ```

use std::ops::{Bound, RangeBounds};

use crate::encoding::{TextUnit, into_string};
use crate::escape::sequences;
use crate::style::StyleState;
use crate::walk::{CodepointSpan, SpanKind, SpanWalker};
use crate::width::visible_width_units;

/// Visible columns `[start, end)` of `text`; `end = None` means to the end.
#[must_use]
pub fn slice_ansi(text: &str, start: usize, end: Option<usize>) -> String {
    into_string(slice_ansi_units(text.as_bytes(), start, end))
}

/// [`slice_ansi`] taking any column range.
#[must_use]
pub fn slice_ansi_range(text: &str, range: impl RangeBounds<usize>) -> String {
    let start = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&n) => Some(n.saturating_add(1)),
        Bound::Excluded(&n) => Some(n),
        Bound::Unbounded => None,
    };
    slice_ansi(text, start, end)
}

/// [`slice_ansi`] with negative indices counted back from the visible width.
#[must_use]
pub fn slice_ansi_signed(text: &str, start: isize, end: Option<isize>) -> String {
    if start >= 0 && end.is_none_or(|end| end >= 0) {
        return slice_ansi(text, start.unsigned_abs(), end.map(isize::unsigned_abs));
    }
    let total = visible_width_units(text.as_bytes(), false);
    let resolve = |index: isize| {
        if index < 0 {
            total.saturating_sub(index.unsigned_abs())
        } else {
            index.unsigned_abs()
        }
    };
    slice_ansi(text, resolve(start), end.map(resolve))
}

/// UTF-16 variant of [`slice_ansi`].
#[must_use]
pub fn slice_ansi_utf16(units: &[u16], start: usize, end: Option<usize>) -> Vec<u16> {
    slice_ansi_units(units, start, end)
}

/// Generic entry point over any [`TextUnit`] buffer.
#[must_use]
pub fn slice_ansi_units<U: TextUnit>(units: &[U], start: usize, end: Option<usize>) -> Vec<U> {
    let end = end.unwrap_or(usize::MAX);
    let mut out = Vec::new();
    if start >= end || units.is_empty() {
        return out;
    }

    let mut style = StyleState::new();
    let mut col = 0usize;
    let mut started = false;
    for span in SpanWalker::new(units, false) {
        let piece = &units[span.start..span.end];
        if span.kind == SpanKind::Escape {
            if !started {
                style.observe(piece);
            } else if col < end || style.closes_only(piece) {
                out.extend_from_slice(piece);
                style.observe(piece);
            }
            continue;
        }

        if col >= end {
            break;
        }
        let next_col = col + span.width;
        let inside = if span.width == 0 {
            col >= start
        } else {
            col >= start && next_col <= end
        };
        let overlap = next_col.min(end).saturating_sub(col.max(start));

        if inside || overlap > 0 {
            if !started {
                started = true;
                style.write_open(&mut out);
            }
            if inside {
                out.extend_from_slice(piece);
                observe_inner(&mut style, units, &span, None);
            } else {
                // A wide cluster cut by the boundary becomes blank cells.
                U::push_spaces(&mut out, overlap);
                observe_inner(&mut style, units, &span, Some(&mut out));
            }
        } else {
            observe_inner(&mut style, units, &span, None);
        }
        col = next_col;
    }

    if started {
        style.write_close(&mut out);
    }
    tracing::trace!(
        input_len = units.len(),
        start,
        end = (end != usize::MAX).then_some(end),
        output_len = out.len(),
        "sliced styled text"
    );
    out
}

/// Feed the escapes embedded in a cluster to `style`, copying them to `out`
/// when given.
pub(crate) fn observe_inner<U: TextUnit>(
    style: &mut StyleState<U>,
    units: &[U],
    span: &CodepointSpan,
    mut out: Option<&mut Vec<U>>,
) {
    if !span.has_inner_escapes {
        return;
    }
    for (at, stop) in sequences(units, span.start, span.end) {
        let seq = &units[at..stop];
        style.observe(seq);
        if let Some(out) = out.as_deref_mut() {
            out.extend_from_slice(seq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    // ====================================================================
    // Plain text
    // ====================================================================

    #[test]
    fn plain_ranges() {
        assert_eq!(slice_ansi("hello world", 0, Some(5)), "hello");
        assert_eq!(slice_ansi("hello world", 6, None), "world");
        assert_eq!(slice_ansi("hello", 2, Some(2)), "");
        assert_eq!(slice_ansi("hello", 4, Some(2)), "");
        assert_eq!(slice_ansi("hello", 10, None), "");
        assert_eq!(slice_ansi("", 0, Some(3)), "");
    }

    #[test]
    fn range_and_signed_forms() {
        assert_eq!(slice_ansi_range("abcdef", 1..3), "bc");
        assert_eq!(slice_ansi_range("abcdef", 1..=3), "bcd");
        assert_eq!(slice_ansi_range("abcdef", ..2), "ab");
        assert_eq!(slice_ansi_range("abcdef", 4..), "ef");
        assert_eq!(slice_ansi_signed("abcdef", -2, None), "ef");
        assert_eq!(slice_ansi_signed("abcdef", 1, Some(-1)), "bcde");
        assert_eq!(slice_ansi_signed("abcdef", -10, Some(2)), "ab");
    }

    // ====================================================================
    // Style carry
    // ====================================================================

    #[test]
    fn style_before_start_is_reopened() {
        assert_eq!(
            slice_ansi("\x1b[31mhello\x1b[39m", 2, Some(4)),
            "\x1b[31mll\x1b[39m"
        );
    }

    #[test]
    fn combined_sgr_is_normalized() {
        assert_eq!(
            slice_ansi("\x1b[1;31mX", 0, Some(1)),
            "\x1b[1m\x1b[31mX\x1b[39m\x1b[22m"
        );
    }

    #[test]
    fn closers_after_end_are_kept_openers_are_not() {
        assert_eq!(slice_ansi("\x1b[31mred\x1b[0mnormal", 0, Some(3)), "\x1b[31mred\x1b[0m");
        assert_eq!(slice_ansi("\x1b[31mred\x1b[0mnormal", 3, Some(9)), "normal");
        assert_eq!(slice_ansi("a\x1b[31mb\x1b[39m", 0, Some(1)), "a");
    }

    #[test]
    fn escapes_inside_range_are_verbatim() {
        assert_eq!(
            slice_ansi("\x1b[31mA\x1b[32mB", 0, Some(2)),
            "\x1b[31mA\x1b[32mB\x1b[39m"
        );
        assert_eq!(
            slice_ansi("\x1b[1mbold \x1b[31mred\x1b[39m text\x1b[22m", 5, Some(8)),
            "\x1b[1m\x1b[31mred\x1b[39m\x1b[22m"
        );
    }

    #[test]
    fn non_style_escapes_before_start_are_dropped() {
        assert_eq!(slice_ansi("\x1b]0;title\x07text", 0, None), "text");
        assert_eq!(slice_ansi("\x1b[2Jab", 1, None), "b");
    }

    #[test]
    fn hyperlink_is_reopened_and_closed() {
        let text = "\x1b]8;;https://x.dev\x07link\x1b]8;;\x07 tail";
        assert_eq!(
            slice_ansi(text, 1, Some(3)),
            "\x1b]8;;https://x.dev\x07in\x1b]8;;\x07"
        );
        assert_eq!(slice_ansi(text, 0, Some(4)), "\x1b]8;;https://x.dev\x07link\x1b]8;;\x07");
    }

    // ====================================================================
    // Wide clusters
    // ====================================================================

    #[test]
    fn wide_clusters_inside_range() {
        assert_eq!(
            slice_ansi("\x1b[31m\u{4f60}\u{597d}\x1b[39m\u{4e16}\u{754c}", 2, Some(6)),
            "\x1b[31m\u{597d}\x1b[39m\u{4e16}"
        );
    }

    #[test]
    fn straddling_cluster_is_padded() {
        assert_eq!(slice_ansi("\u{4f60}\u{597d}", 1, Some(3)), "  ");
        assert_eq!(slice_ansi("a\u{4f60}b", 0, Some(2)), "a ");
        assert_eq!(slice_ansi("\x1b[1m\u{1F600}x\x1b[22m", 1, None), "\x1b[1m x\x1b[22m");
    }

    #[test]
    fn slice_width_matches_range() {
        let text = "\x1b[32m\u{4f60}a\u{597d}b\x1b[39m";
        for start in 0..6 {
            for end in start..7 {
                let sliced = slice_ansi(text, start, Some(end));
                let expected = end.min(6) - start.min(6);
                assert_eq!(
                    crate::width::visible_width(&sliced, false),
                    expected,
                    "{start}..{end}: {sliced:?}"
                );
            }
        }
    }

    #[test]
    fn utf16_variant() {
        assert_eq!(
            slice_ansi_utf16(&utf16("\x1b[31mhello\x1b[39m"), 1, Some(3)),
            utf16("\x1b[31mel\x1b[39m")
        );
    }
}

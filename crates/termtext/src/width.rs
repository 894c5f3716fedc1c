//! Visible column width of ANSI-styled text.
//!
//! # Example
//! ```
//! use termtext::width::visible_width;
//!
//! assert_eq!(visible_width("\x1b[31mhi\x1b[0m", false), 2);
//! assert_eq!(visible_width("caf\u{e9}", false), 4);
//! assert_eq!(visible_width("\u{4f60}\u{597d}", false), 4);
//! ```

use crate::config::WidthPolicy;
use crate::encoding::TextUnit;
use crate::walk::SpanWalker;

/// Returns `Some(width)` if text is printable ASCII only, `None` otherwise.
///
/// For printable ASCII (0x20-0x7E) the width equals the byte length. ESC is a
/// control byte, so styled text always takes the full path.
#[inline]
#[must_use]
pub fn ascii_width(text: &str) -> Option<usize> {
    text.bytes()
        .all(|b| (0x20..=0x7E).contains(&b))
        .then_some(text.len())
}

/// Columns `text` occupies on a terminal, ignoring escape sequences.
#[must_use]
pub fn visible_width(text: &str, ambiguous_as_wide: bool) -> usize {
    if let Some(width) = ascii_width(text) {
        return width;
    }
    visible_width_units(text.as_bytes(), ambiguous_as_wide)
}

/// UTF-16 variant of [`visible_width`].
#[must_use]
pub fn visible_width_utf16(units: &[u16], ambiguous_as_wide: bool) -> usize {
    visible_width_units(units, ambiguous_as_wide)
}

/// [`visible_width`] with the ambiguous-width policy taken from the
/// environment (see [`WidthPolicy::global`]).
#[must_use]
pub fn visible_width_detected(text: &str) -> usize {
    visible_width(text, WidthPolicy::global().ambiguous_is_wide)
}

/// Generic entry point over any [`TextUnit`] buffer.
#[must_use]
pub fn visible_width_units<U: TextUnit>(units: &[U], ambiguous_as_wide: bool) -> usize {
    SpanWalker::new(units, ambiguous_as_wide)
        .map(|span| span.width)
        .sum()
}

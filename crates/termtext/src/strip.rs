//! Escape-sequence removal.
//!
//! # Example
//! ```
//! use termtext::strip::{strip_ansi, strip_ansi_cow};
//!
//! assert_eq!(strip_ansi("\x1b[1;31mRed\x1b[0m").as_deref(), Some("Red"));
//! assert_eq!(strip_ansi("plain"), None);
//! assert_eq!(strip_ansi_cow("\x1b]0;title\x07text"), "text");
//! ```

use std::borrow::Cow;

use crate::encoding::{TextUnit, into_string};
use crate::escape::consume;

/// Remove every escape sequence from `text`.
///
/// Returns `None` when `text` holds no escape at all, so the caller can keep
/// using the original. Otherwise returns the rebuilt string, even if empty.
#[must_use]
pub fn strip_ansi(text: &str) -> Option<String> {
    strip_ansi_units(text.as_bytes()).map(into_string)
}

/// Like [`strip_ansi`], borrowing when there is nothing to remove.
#[must_use]
pub fn strip_ansi_cow(text: &str) -> Cow<'_, str> {
    match strip_ansi(text) {
        Some(stripped) => Cow::Owned(stripped),
        None => Cow::Borrowed(text),
    }
}

/// UTF-16 variant of [`strip_ansi`].
#[must_use]
pub fn strip_ansi_utf16(units: &[u16]) -> Option<Vec<u16>> {
    strip_ansi_units(units)
}

/// Generic entry point over any [`TextUnit`] buffer.
#[must_use]
pub fn strip_ansi_units<U: TextUnit>(units: &[U]) -> Option<Vec<U>> {
    let mut next = U::find_escape(units, 0)?;
    let mut out = Vec::with_capacity(units.len());
    let mut copied_to = 0;
    let mut removed = 0usize;
    loop {
        out.extend_from_slice(&units[copied_to..next]);
        copied_to = consume(units, next, units.len());
        removed += 1;
        match U::find_escape(units, copied_to) {
            Some(found) => next = found,
            None => break,
        }
    }
    out.extend_from_slice(&units[copied_to..]);
    tracing::trace!(
        input_len = units.len(),
        output_len = out.len(),
        runs_removed = removed,
        "stripped escape sequences"
    );
    Some(out)
}

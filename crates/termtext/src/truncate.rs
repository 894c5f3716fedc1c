//! Truncation to a column budget with an ellipsis.
//!
//! # Example
//! ```
//! use termtext::truncate::{TruncatePosition, truncate_ansi};
//!
//! let text = "\x1b[1mhello world\x1b[22m";
//! assert_eq!(truncate_ansi(text, 8, "…", TruncatePosition::End), "\x1b[1mhello w\x1b[22m…");
//! assert_eq!(truncate_ansi(text, 8, "…", TruncatePosition::Start), "…\x1b[1mo world\x1b[22m");
//! assert_eq!(truncate_ansi("fits", 8, "…", TruncatePosition::End), "fits");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::encoding::{TextUnit, encode, into_string};
use crate::error::ParseTruncatePositionError;
use crate::escape::sequences;
use crate::slice::observe_inner;
use crate::style::StyleState;
use crate::walk::{SpanKind, SpanWalker};
use crate::width::visible_width_units;

/// Where the ellipsis goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncatePosition {
    /// Drop the head: `…world`.
    Start,
    /// Drop the middle: `hel…rld`.
    Middle,
    /// Drop the tail: `hello…`.
    #[default]
    End,
}

impl TruncatePosition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl fmt::Display for TruncatePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TruncatePosition {
    type Err = ParseTruncatePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(ParseTruncatePositionError::Empty),
            "start" => Ok(Self::Start),
            "middle" => Ok(Self::Middle),
            "end" => Ok(Self::End),
            _ => Err(ParseTruncatePositionError::Unknown {
                value: s.to_owned(),
            }),
        }
    }
}

/// Shorten `text` to at most `width` visible columns.
///
/// Borrows when `text` already fits. If the ellipsis alone is wider than
/// `width`, the text is truncated without it.
#[must_use]
pub fn truncate_ansi<'a>(
    text: &'a str,
    width: usize,
    ellipsis: &str,
    position: TruncatePosition,
) -> Cow<'a, str> {
    match truncate_ansi_units(text.as_bytes(), width, ellipsis, position) {
        Cow::Borrowed(_) => Cow::Borrowed(text),
        Cow::Owned(bytes) => Cow::Owned(into_string(bytes)),
    }
}

/// UTF-16 variant of [`truncate_ansi`].
#[must_use]
pub fn truncate_ansi_utf16<'a>(
    units: &'a [u16],
    width: usize,
    ellipsis: &str,
    position: TruncatePosition,
) -> Cow<'a, [u16]> {
    truncate_ansi_units(units, width, ellipsis, position)
}

/// Generic entry point over any [`TextUnit`] buffer.
#[must_use]
pub fn truncate_ansi_units<'a, U: TextUnit>(
    units: &'a [U],
    width: usize,
    ellipsis: &str,
    position: TruncatePosition,
) -> Cow<'a, [U]> {
    let total = visible_width_units(units, false);
    if total <= width {
        return Cow::Borrowed(units);
    }

    let ellipsis_width = visible_width_units(ellipsis.as_bytes(), false);
    let (ellipsis, keep): (Vec<U>, usize) = if ellipsis_width > width {
        (Vec::new(), width)
    } else {
        (encode(ellipsis), width - ellipsis_width)
    };

    let mut out = Vec::with_capacity(units.len().min(keep * 4 + ellipsis.len() + 16));
    match position {
        TruncatePosition::End => {
            take_head(units, keep, &mut out).write_close(&mut out);
            out.extend_from_slice(&ellipsis);
        }
        TruncatePosition::Start => {
            out.extend_from_slice(&ellipsis);
            take_tail(units, total, keep, &mut out);
        }
        TruncatePosition::Middle => {
            let tail = keep / 2;
            take_head(units, keep - tail, &mut out).write_close(&mut out);
            out.extend_from_slice(&ellipsis);
            take_tail(units, total, tail, &mut out);
        }
    }
    tracing::trace!(
        input_width = total,
        width,
        position = position.as_str(),
        output_len = out.len(),
        "truncated styled text"
    );
    Cow::Owned(out)
}

/// Copy whole clusters from the front while they fit in `budget`.
///
/// Escapes are held back until the cluster after them is kept, so nothing
/// past the cut reaches `out` or the returned style.
fn take_head<U: TextUnit>(units: &[U], budget: usize, out: &mut Vec<U>) -> StyleState<U> {
    let mut style = StyleState::new();
    let mut pending = None;
    let mut col = 0usize;
    for span in SpanWalker::new(units, false) {
        match span.kind {
            SpanKind::Escape => {
                pending.get_or_insert(span.start);
            }
            SpanKind::Cluster => {
                if col + span.width > budget {
                    break;
                }
                if let Some(from) = pending.take() {
                    for (at, stop) in sequences(units, from, span.start) {
                        style.observe(&units[at..stop]);
                    }
                    out.extend_from_slice(&units[from..span.start]);
                }
                out.extend_from_slice(&units[span.start..span.end]);
                observe_inner(&mut style, units, &span, None);
                col += span.width;
            }
        }
    }
    style
}

/// Copy the clusters that start at or after column `total - budget`, opening
/// the style left by the dropped head first.
fn take_tail<U: TextUnit>(units: &[U], total: usize, budget: usize, out: &mut Vec<U>) {
    if budget == 0 {
        return;
    }
    let threshold = total - budget.min(total);
    let mut style = StyleState::new();
    let mut col = 0usize;
    for span in SpanWalker::new(units, false) {
        match span.kind {
            SpanKind::Escape => {
                style.observe(&units[span.start..span.end]);
            }
            SpanKind::Cluster if col >= threshold => {
                style.write_open(out);
                out.extend_from_slice(&units[span.start..]);
                return;
            }
            SpanKind::Cluster => {
                observe_inner(&mut style, units, &span, None);
                col += span.width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::visible_width;

    fn trunc(text: &str, width: usize, position: TruncatePosition) -> String {
        truncate_ansi(text, width, "\u{2026}", position).into_owned()
    }

    #[test]
    fn fitting_text_is_borrowed() {
        assert!(matches!(
            truncate_ansi("\x1b[1mabc\x1b[22m", 3, "\u{2026}", TruncatePosition::End),
            Cow::Borrowed(_)
        ));
        let units: Vec<u16> = "abc".encode_utf16().collect();
        assert!(matches!(
            truncate_ansi_utf16(&units, 5, "...", TruncatePosition::Middle),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn end_position() {
        assert_eq!(trunc("hello world", 6, TruncatePosition::End), "hello\u{2026}");
        assert_eq!(
            trunc("\x1b[31mhello\x1b[39m world", 4, TruncatePosition::End),
            "\x1b[31mhel\x1b[39m\u{2026}"
        );
    }

    #[test]
    fn escapes_after_the_cut_are_dropped() {
        assert_eq!(
            trunc("ab\x1b[31mcdef\x1b[39m", 3, TruncatePosition::End),
            "ab\u{2026}"
        );
        assert_eq!(
            trunc("\x1b[1mab\x1b[22m\x1b[4mcd\x1b[24m", 3, TruncatePosition::End),
            "\x1b[1mab\x1b[22m\u{2026}"
        );
    }

    #[test]
    fn start_position_reopens_head_style() {
        assert_eq!(
            trunc("\x1b[32mhello\x1b[39m world", 6, TruncatePosition::Start),
            "\u{2026}world"
        );
        assert_eq!(
            trunc("\x1b[32mhello world\x1b[39m", 6, TruncatePosition::Start),
            "\u{2026}\x1b[32mworld\x1b[39m"
        );
    }

    #[test]
    fn middle_position_splits_budget() {
        assert_eq!(trunc("abcdefghij", 6, TruncatePosition::Middle), "abc\u{2026}ij");
        assert_eq!(trunc("abcdefghij", 5, TruncatePosition::Middle), "ab\u{2026}ij");
        assert_eq!(
            trunc("\x1b[1mabcdefghij\x1b[22m", 5, TruncatePosition::Middle),
            "\x1b[1mab\x1b[22m\u{2026}\x1b[1mij\x1b[22m"
        );
    }

    #[test]
    fn wide_clusters_are_never_split() {
        assert_eq!(
            trunc("\u{4f60}\u{597d}\u{4e16}\u{754c}", 4, TruncatePosition::End),
            "\u{4f60}\u{2026}"
        );
        assert_eq!(
            trunc("\u{4f60}\u{597d}\u{4e16}\u{754c}", 4, TruncatePosition::Start),
            "\u{2026}\u{754c}"
        );
    }

    #[test]
    fn ellipsis_wider_than_width_is_dropped() {
        assert_eq!(
            truncate_ansi("hello", 2, "...", TruncatePosition::End),
            "he"
        );
        assert_eq!(
            truncate_ansi("hello", 0, "\u{2026}", TruncatePosition::End),
            ""
        );
    }

    #[test]
    fn result_fits_budget() {
        let text = "\x1b[1;31m\u{1F600} mixed \u{4f60}\u{597d} text\x1b[0m";
        for width in 1..12 {
            for position in [
                TruncatePosition::Start,
                TruncatePosition::Middle,
                TruncatePosition::End,
            ] {
                let out = truncate_ansi(text, width, "\u{2026}", position);
                assert!(
                    visible_width(&out, false) <= width,
                    "{position} {width}: {out:?}"
                );
            }
        }
    }

    #[test]
    fn position_parsing() {
        assert_eq!("START".parse(), Ok(TruncatePosition::Start));
        assert_eq!(" middle".parse(), Ok(TruncatePosition::Middle));
        assert_eq!("end".parse(), Ok(TruncatePosition::End));
        assert_eq!(
            "".parse::<TruncatePosition>(),
            Err(ParseTruncatePositionError::Empty)
        );
        assert_eq!(
            "center".parse::<TruncatePosition>(),
            Err(ParseTruncatePositionError::Unknown {
                value: "center".to_string()
            })
        );
        assert_eq!(TruncatePosition::default(), TruncatePosition::End);
        assert_eq!(TruncatePosition::Middle.to_string(), "middle");
    }
}

//! Codepoint classification backed by `unicode-width` and
//! `unicode-segmentation`.
//!
//! Nothing here owns a Unicode table. The three queries the rest of the crate
//! needs (per-scalar column width, emoji presentation, and extended grapheme
//! boundaries) are thin adapters over the external crates.

use unicode_segmentation::GraphemeCursor;
use unicode_width::UnicodeWidthChar;

/// Emoji presentation selector (VS16).
pub const VS16: char = '\u{FE0F}';

/// Column width of a single scalar: 0, 1 or 2.
///
/// C0 and C1 controls and DEL are zero width. With `ambiguous_as_wide`, East
/// Asian Ambiguous characters count as 2.
#[inline]
#[must_use]
pub fn codepoint_width(c: char, ambiguous_as_wide: bool) -> u8 {
    match c as u32 {
        0x00..=0x1F | 0x7F..=0x9F => 0,
        0x20..=0x7E => 1,
        _ => {
            let width = if ambiguous_as_wide {
                c.width_cjk()
            } else {
                c.width()
            };
            width.map_or(0, |w| w.min(2) as u8)
        }
    }
}

/// Whether `c` renders as an emoji by default.
///
/// Regional indicators always do. Elsewhere, a scalar in the symbol and
/// pictograph blocks that `unicode-width` already reports as wide has
/// `Emoji_Presentation`.
#[inline]
#[must_use]
pub fn is_emoji_presentation(c: char) -> bool {
    match c as u32 {
        0x1F1E6..=0x1F1FF => true,
        0x2300..=0x2BFF | 0x1F000..=0x1FAFF => c.width() == Some(2),
        _ => false,
    }
}

/// Width of a grapheme cluster from its base scalar.
///
/// A zero-width base yields 0 whatever follows it. Otherwise emoji
/// presentation, or a VS16 anywhere in the cluster, makes it 2 columns.
#[inline]
#[must_use]
pub fn cluster_width(base: char, has_vs16: bool, ambiguous_as_wide: bool) -> usize {
    let width = codepoint_width(base, ambiguous_as_wide);
    if width == 0 {
        0
    } else if has_vs16 || is_emoji_presentation(base) {
        2
    } else {
        usize::from(width)
    }
}

/// Incremental extended-grapheme-cluster boundary detection.
///
/// Holds the scalars of the cluster being built, so callers can feed scalars
/// one at a time and skip over escape sequences in between without losing
/// break context.
#[derive(Debug, Default, Clone)]
pub struct BreakState {
    cluster: String,
}

impl BreakState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cluster with `base`.
    pub fn begin(&mut self, base: char) {
        self.cluster.clear();
        self.cluster.push(base);
    }

    /// Whether there is a grapheme boundary before `next`.
    ///
    /// When there is none, `next` joins the current cluster. When there is,
    /// the state is left unchanged and the caller is expected to
    /// [`begin`](Self::begin) the next cluster.
    pub fn grapheme_break(&mut self, next: char) -> bool {
        let boundary = self.cluster.len();
        if boundary == 0 {
            self.cluster.push(next);
            return true;
        }
        // A lone ASCII scalar only ever joins with CR LF.
        if boundary == 1 && next.is_ascii() {
            if self.cluster.as_bytes()[0] == b'\r' && next == '\n' {
                self.cluster.push(next);
                return false;
            }
            return true;
        }
        self.cluster.push(next);
        let mut cursor = GraphemeCursor::new(boundary, self.cluster.len(), true);
        let is_break = cursor.is_boundary(&self.cluster, 0).unwrap_or(true);
        if is_break {
            self.cluster.truncate(boundary);
        }
        is_break
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters(s: &str) -> usize {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return 0;
        };
        let mut state = BreakState::new();
        state.begin(first);
        let mut count = 1;
        for c in chars {
            if state.grapheme_break(c) {
                state.begin(c);
                count += 1;
            }
        }
        count
    }

    #[test]
    fn control_widths() {
        assert_eq!(codepoint_width('\0', false), 0);
        assert_eq!(codepoint_width('\t', false), 0);
        assert_eq!(codepoint_width('\u{7f}', false), 0);
        assert_eq!(codepoint_width('\u{85}', false), 0);
    }

    #[test]
    fn narrow_wide_and_combining() {
        assert_eq!(codepoint_width('a', false), 1);
        assert_eq!(codepoint_width('\u{e9}', false), 1);
        assert_eq!(codepoint_width('\u{4f60}', false), 2);
        assert_eq!(codepoint_width('\u{301}', false), 0);
        assert_eq!(codepoint_width('\u{200d}', false), 0);
    }

    #[test]
    fn ambiguous_width_follows_flag() {
        assert_eq!(codepoint_width('\u{b1}', false), 1);
        assert_eq!(codepoint_width('\u{b1}', true), 2);
    }

    #[test]
    fn emoji_presentation() {
        assert!(is_emoji_presentation('\u{1F600}'));
        assert!(is_emoji_presentation('\u{231A}'));
        assert!(is_emoji_presentation('\u{1F1FA}'));
        assert!(!is_emoji_presentation('\u{263A}'));
        assert!(!is_emoji_presentation('a'));
        assert!(!is_emoji_presentation('\u{4f60}'));
    }

    #[test]
    fn cluster_widths() {
        assert_eq!(cluster_width('a', false, false), 1);
        assert_eq!(cluster_width('\u{263A}', true, false), 2);
        assert_eq!(cluster_width('1', true, false), 2);
        assert_eq!(cluster_width('\u{1F1FA}', false, false), 2);
        assert_eq!(cluster_width('\u{301}', true, false), 0);
    }

    #[test]
    fn grapheme_breaks() {
        assert_eq!(clusters("abc"), 3);
        assert_eq!(clusters("e\u{301}"), 1);
        assert_eq!(clusters("\r\n"), 1);
        assert_eq!(clusters("\n\r"), 2);
        assert_eq!(clusters("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}"), 1);
        assert_eq!(clusters("\u{1F1FA}\u{1F1F8}\u{1F1EB}\u{1F1F7}"), 2);
        assert_eq!(clusters("1\u{FE0F}\u{20E3}x"), 2);
        assert_eq!(clusters("\u{4f60}\u{597d}"), 2);
    }

    #[test]
    fn break_leaves_state_for_begin() {
        let mut state = BreakState::new();
        state.begin('a');
        assert!(state.grapheme_break('b'));
        assert!(!state.grapheme_break('\u{301}'));
        state.begin('x');
        assert!(state.grapheme_break('y'));
    }
}

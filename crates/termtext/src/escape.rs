//! Escape-sequence scanning and consumption.
//!
//! [`find_escape`] locates the next introducer; [`consume`] and
//! [`consume_one`] walk a small state machine over decoded scalars to find
//! where the sequence ends. The machine accepts the same families a terminal
//! does (two-byte ESC sequences, CSI, OSC, and the ST-terminated DCS, SOS, PM
//! and APC strings) and never fails: an unterminated sequence runs to the end
//! of the buffer.
//!
//! Working on scalars rather than raw units keeps UTF-8 continuation bytes
//! such as the `0x9C` in `U+091C` from being read as a String Terminator.

use crate::encoding::TextUnit;

/// Position inside an escape sequence.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Between sequences. Initial and terminal.
    #[default]
    Start,
    /// After ESC, waiting for the byte that names the family.
    GotEsc,
    /// After `ESC` plus an intermediate; the next scalar finishes it.
    IgnoreNextChar,
    /// Inside CSI parameters, waiting for a final byte.
    InCsi,
    /// Inside an OSC payload.
    InOsc,
    /// ESC seen inside an OSC payload.
    InOscGotEsc,
    /// Inside a DCS, SOS, PM or APC string.
    NeedSt,
    /// ESC seen inside an ST-terminated string.
    NeedStGotEsc,
}

impl ScanState {
    /// State after consuming `c`.
    ///
    /// Returns `None` only from [`ScanState::Start`] when `c` is not an
    /// introducer, meaning no sequence begins here.
    #[inline]
    #[must_use]
    pub const fn advance(self, c: char) -> Option<Self> {
        let next = match self {
            Self::Start => return start(c),
            Self::GotEsc => got_esc(c),
            Self::IgnoreNextChar => Self::Start,
            Self::InCsi => in_csi(c),
            Self::InOsc => in_osc(c),
            Self::InOscGotEsc => {
                if c == '\\' {
                    Self::Start
                } else {
                    Self::InOsc
                }
            }
            Self::NeedSt => need_st(c),
            Self::NeedStGotEsc => {
                if c == '\\' {
                    Self::Start
                } else {
                    Self::NeedSt
                }
            }
        };
        Some(next)
    }
}

#[inline(always)]
const fn start(c: char) -> Option<ScanState> {
    match c {
        '\u{1b}' => Some(ScanState::GotEsc),
        '\u{9b}' => Some(ScanState::InCsi),
        '\u{9d}' => Some(ScanState::InOsc),
        '\u{90}' | '\u{98}' | '\u{9e}' | '\u{9f}' => Some(ScanState::NeedSt),
        _ => None,
    }
}

#[inline(always)]
const fn got_esc(c: char) -> ScanState {
    match c {
        '[' => ScanState::InCsi,
        ' ' | '#' | '%' | '(' | ')' | '*' | '+' | '.' | '/' => ScanState::IgnoreNextChar,
        ']' => ScanState::InOsc,
        'P' | 'X' | '^' | '_' => ScanState::NeedSt,
        _ => ScanState::Start,
    }
}

#[inline(always)]
const fn in_csi(c: char) -> ScanState {
    match c {
        '\u{40}'..='\u{7e}' => ScanState::Start,
        _ => ScanState::InCsi,
    }
}

#[inline(always)]
const fn in_osc(c: char) -> ScanState {
    match c {
        '\u{1b}' => ScanState::InOscGotEsc,
        '\u{9c}' | '\u{07}' => ScanState::Start,
        _ => ScanState::InOsc,
    }
}

// Like `in_osc`, except BEL is payload here.
#[inline(always)]
const fn need_st(c: char) -> ScanState {
    match c {
        '\u{1b}' => ScanState::NeedStGotEsc,
        '\u{9c}' => ScanState::Start,
        _ => ScanState::NeedSt,
    }
}

/// Offset of the first introducer at or after `start`, if any.
#[inline]
#[must_use]
pub fn find_escape<U: TextUnit>(units: &[U], start: usize) -> Option<usize> {
    U::find_escape(units, start)
}

/// Consume exactly one escape sequence beginning at `start`.
///
/// Returns the offset just past the sequence, or `end` when the sequence is
/// unterminated. When `start` is not an introducer, returns `start`.
#[must_use]
pub fn consume_one<U: TextUnit>(units: &[U], start: usize, end: usize) -> usize {
    let window = &units[..end.min(units.len())];
    let mut state = ScanState::Start;
    let mut pos = start;
    while pos < window.len() {
        let (c, len) = U::decode(window, pos);
        match state.advance(c) {
            None => return pos,
            Some(ScanState::Start) => return pos + len,
            Some(next) => state = next,
        }
        pos += len;
    }
    window.len().max(start)
}

/// Consume the escape sequence at `start` and any that immediately follow it.
///
/// Returns the first offset that is not part of an escape sequence.
#[must_use]
pub fn consume<U: TextUnit>(units: &[U], start: usize, end: usize) -> usize {
    let window = &units[..end.min(units.len())];
    let mut pos = start;
    while pos < window.len() && U::is_introducer_at(window, pos) {
        pos = consume_one(window, pos, window.len());
    }
    pos
}

/// Iterate the `(start, end)` ranges of the escape sequences in
/// `units[start..end]`.
pub(crate) fn sequences<U: TextUnit>(
    units: &[U],
    start: usize,
    end: usize,
) -> impl Iterator<Item = (usize, usize)> + '_ {
    let window = &units[..end.min(units.len())];
    let mut pos = start;
    std::iter::from_fn(move || {
        let at = U::find_escape(window, pos)?;
        let stop = consume_one(window, at, window.len());
        pos = stop;
        Some((at, stop))
    })
}

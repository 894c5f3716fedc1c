//! Code-unit abstraction shared by the UTF-8 and UTF-16 entry points.
//!
//! Every algorithm in this crate is written once against [`TextUnit`] and
//! instantiated for `u8` (UTF-8) and `u16` (UTF-16). Decoding is lenient: an
//! invalid byte or an unpaired surrogate decodes to U+FFFD and advances by a
//! single unit, so no input is ever rejected.

use std::char::REPLACEMENT_CHARACTER;
use std::fmt::Debug;

/// A code unit of an encoded text buffer.
pub trait TextUnit: Copy + Eq + Debug + 'static {
    /// Decode the scalar starting at `at`.
    ///
    /// Returns the scalar and the number of units it spans. `at` must be in
    /// bounds.
    fn decode(units: &[Self], at: usize) -> (char, usize);

    /// Whether an escape-sequence introducer begins at `at`.
    fn is_introducer_at(units: &[Self], at: usize) -> bool;

    /// Offset of the first introducer at or after `start`.
    fn find_escape(units: &[Self], start: usize) -> Option<usize>;

    /// Append the encoding of `s`.
    fn push_str(out: &mut Vec<Self>, s: &str);

    /// Append `count` ASCII spaces.
    fn push_spaces(out: &mut Vec<Self>, count: usize);
}

impl TextUnit for u8 {
    #[inline]
    fn decode(units: &[u8], at: usize) -> (char, usize) {
        let lead = units[at];
        if lead.is_ascii() {
            return (char::from(lead), 1);
        }
        let len = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return (REPLACEMENT_CHARACTER, 1),
        };
        let Some(bytes) = units.get(at..at + len) else {
            return (REPLACEMENT_CHARACTER, 1);
        };
        match std::str::from_utf8(bytes).ok().and_then(|s| s.chars().next()) {
            Some(c) => (c, len),
            None => (REPLACEMENT_CHARACTER, 1),
        }
    }

    #[inline]
    fn is_introducer_at(units: &[u8], at: usize) -> bool {
        match units.get(at) {
            Some(0x1B) => true,
            Some(0xC2) => units
                .get(at + 1)
                .is_some_and(|&b| termtext_simd::is_c1_introducer_byte(b)),
            _ => false,
        }
    }

    #[inline]
    fn find_escape(units: &[u8], start: usize) -> Option<usize> {
        termtext_simd::find_introducer_utf8(units, start)
    }

    fn push_str(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(s.as_bytes());
    }

    fn push_spaces(out: &mut Vec<u8>, count: usize) {
        out.resize(out.len() + count, b' ');
    }
}

impl TextUnit for u16 {
    #[inline]
    fn decode(units: &[u16], at: usize) -> (char, usize) {
        match char::decode_utf16(units[at..].iter().copied()).next() {
            Some(Ok(c)) => (c, c.len_utf16()),
            _ => (REPLACEMENT_CHARACTER, 1),
        }
    }

    #[inline]
    fn is_introducer_at(units: &[u16], at: usize) -> bool {
        units
            .get(at)
            .is_some_and(|&u| termtext_simd::is_introducer(u32::from(u)))
    }

    #[inline]
    fn find_escape(units: &[u16], start: usize) -> Option<usize> {
        termtext_simd::find_introducer_utf16(units, start)
    }

    fn push_str(out: &mut Vec<u16>, s: &str) {
        out.extend(s.encode_utf16());
    }

    fn push_spaces(out: &mut Vec<u16>, count: usize) {
        out.resize(out.len() + count, u16::from(b' '));
    }
}

/// Iterate the scalars of `units`, lenient like [`TextUnit::decode`].
pub(crate) fn chars<U: TextUnit>(units: &[U]) -> impl Iterator<Item = char> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= units.len() {
            return None;
        }
        let (c, len) = U::decode(units, pos);
        pos += len;
        Some(c)
    })
}

/// Turn a byte buffer produced from `&str` pieces back into a `String`.
///
/// Every operation cuts UTF-8 input only at scalar boundaries, so the lossy
/// branch is unreachable for buffers built from a `&str`.
pub(crate) fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

/// Encode `s` into a unit buffer.
pub(crate) fn encode<U: TextUnit>(s: &str) -> Vec<U> {
    let mut out = Vec::with_capacity(s.len());
    U::push_str(&mut out, s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_decodes_multibyte() {
        let s = "a\u{e9}\u{4f60}\u{1F600}";
        let bytes = s.as_bytes();
        assert_eq!(u8::decode(bytes, 0), ('a', 1));
        assert_eq!(u8::decode(bytes, 1), ('\u{e9}', 2));
        assert_eq!(u8::decode(bytes, 3), ('\u{4f60}', 3));
        assert_eq!(u8::decode(bytes, 6), ('\u{1F600}', 4));
    }

    #[test]
    fn utf8_invalid_bytes_decode_one_at_a_time() {
        assert_eq!(u8::decode(&[0xFF, b'a'], 0), (REPLACEMENT_CHARACTER, 1));
        assert_eq!(u8::decode(&[0x80], 0), (REPLACEMENT_CHARACTER, 1));
        // Truncated sequence at the end of the buffer.
        assert_eq!(u8::decode(&[0xE4, 0xBD], 0), (REPLACEMENT_CHARACTER, 1));
        // Lead byte followed by a non-continuation byte.
        assert_eq!(u8::decode(&[0xC3, b'x'], 0), (REPLACEMENT_CHARACTER, 1));
        // Overlong encoding of '/'.
        assert_eq!(u8::decode(&[0xC0, 0xAF], 0), (REPLACEMENT_CHARACTER, 1));
    }

    #[test]
    fn utf16_decodes_pairs_and_lone_surrogates() {
        let units: Vec<u16> = "x\u{1F600}".encode_utf16().collect();
        assert_eq!(u16::decode(&units, 0), ('x', 1));
        assert_eq!(u16::decode(&units, 1), ('\u{1F600}', 2));
        assert_eq!(u16::decode(&[0xD83D], 0), (REPLACEMENT_CHARACTER, 1));
        assert_eq!(u16::decode(&[0xDE00, 0x61], 0), (REPLACEMENT_CHARACTER, 1));
    }

    #[test]
    fn introducer_detection_per_encoding() {
        assert!(u8::is_introducer_at(b"\x1b[", 0));
        assert!(u8::is_introducer_at("\u{9b}".as_bytes(), 0));
        assert!(!u8::is_introducer_at("\u{9b}".as_bytes(), 1));
        assert!(u16::is_introducer_at(&[0x9D], 0));
        assert!(!u16::is_introducer_at(&[0x9C], 0));
        assert!(!u16::is_introducer_at(&[], 0));
    }

    #[test]
    fn chars_iterates_leniently() {
        let collected: String = chars(&[b'a', 0xFF, b'b']).collect();
        assert_eq!(collected, "a\u{FFFD}b");
    }

    #[test]
    fn push_helpers() {
        let mut out: Vec<u16> = Vec::new();
        u16::push_str(&mut out, "\u{1F600}");
        u16::push_spaces(&mut out, 2);
        assert_eq!(out, vec![0xD83D, 0xDE00, 0x20, 0x20]);
        assert_eq!(into_string(encode::<u8>("ok")), "ok");
    }
}

//! Active-style tracking for escape sequences.
//!
//! [`StyleState`] watches the escape sequences an operation passes over and
//! remembers which SGR attributes and which OSC 8 hyperlink are active, so a
//! cut in the middle of styled text can close everything before the cut and
//! re-open it after. Only SGR (`CSI ... m`) and OSC 8 are tracked; any other
//! sequence is ignored.
//!
//! Each SGR attribute is kept as the parameter text that opened it plus the
//! code that closes it:
//!
//! | Opened by | Closed by |
//! |---|---|
//! | 1, 2 | 22 |
//! | 3 | 23 |
//! | 4, 21 | 24 |
//! | 5, 6 | 25 |
//! | 7 | 27 |
//! | 8 | 28 |
//! | 9 | 29 |
//! | 30–38, 90–97 | 39 |
//! | 40–48, 100–107 | 49 |
//! | 53 | 55 |
//! | 58 | 59 |
//!
//! Anything else can only be undone by a full reset (`0`).
//!
//! A hyperlink is closed with the same introducer and terminator that
//! opened it, so `ESC ] 8 ;; url ST` is closed by `ESC ] 8 ;; ST`.

use smallvec::SmallVec;

use crate::encoding::{TextUnit, chars};

/// Full SGR reset.
pub const SGR_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, PartialEq, Eq)]
struct SgrAttr {
    /// Parameter text, e.g. `1` or `38;2;255;0;0`.
    open: String,
    /// `None` when only a full reset turns it off.
    close: Option<u16>,
}

/// What observing one sequence did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleChange {
    /// Something was switched on.
    pub opened: bool,
    /// Something that was on got switched off.
    pub closed: bool,
}

impl StyleChange {
    /// Only switches things off.
    #[must_use]
    pub const fn is_pure_close(self) -> bool {
        self.closed && !self.opened
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hyperlink<U> {
    /// Raw sequence that opened the link.
    open: Vec<U>,
    /// Matching empty-URI sequence.
    close: String,
}

/// Active SGR attributes and hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleState<U: TextUnit> {
    attrs: SmallVec<[SgrAttr; 4]>,
    link: Option<Hyperlink<U>>,
}

impl<U: TextUnit> Default for StyleState<U> {
    fn default() -> Self {
        Self {
            attrs: SmallVec::new(),
            link: None,
        }
    }
}

enum Control<'s> {
    Sgr(&'s str),
    /// `close` is set when the sequence opens a link.
    Hyperlink { close: Option<String> },
    Other,
}

impl<U: TextUnit> StyleState<U> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any attribute or hyperlink is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.attrs.is_empty() || self.link.is_some()
    }

    /// Update the state with one complete escape sequence.
    pub fn observe(&mut self, seq: &[U]) -> StyleChange {
        let text: String = chars(seq).collect();
        match parse_control(&text) {
            Control::Sgr(params) => self.apply_sgr(params),
            Control::Hyperlink { close: Some(close) } => {
                self.link = Some(Hyperlink {
                    open: seq.to_vec(),
                    close,
                });
                StyleChange {
                    opened: true,
                    closed: false,
                }
            }
            Control::Hyperlink { close: None } => StyleChange {
                opened: false,
                closed: self.link.take().is_some(),
            },
            Control::Other => StyleChange::default(),
        }
    }

    /// Whether `seq` would only switch off something that is active now.
    #[must_use]
    pub fn closes_only(&self, seq: &[U]) -> bool {
        self.clone().observe(seq).is_pure_close()
    }

    /// Append sequences that re-establish the active style from scratch.
    pub fn write_open(&self, out: &mut Vec<U>) {
        for attr in &self.attrs {
            U::push_str(out, "\x1b[");
            U::push_str(out, &attr.open);
            U::push_str(out, "m");
        }
        if let Some(link) = &self.link {
            out.extend_from_slice(&link.open);
        }
    }

    /// Append sequences that switch the active style off.
    ///
    /// Attributes are closed innermost first. If any attribute has no
    /// dedicated closer, a single full reset replaces the SGR closers.
    pub fn write_close(&self, out: &mut Vec<U>) {
        if let Some(link) = &self.link {
            U::push_str(out, &link.close);
        }
        if self.attrs.iter().any(|attr| attr.close.is_none()) {
            U::push_str(out, SGR_RESET);
            return;
        }
        let mut written: SmallVec<[u16; 4]> = SmallVec::new();
        for attr in self.attrs.iter().rev() {
            if let Some(code) = attr.close
                && !written.contains(&code)
            {
                written.push(code);
                U::push_str(out, &format!("\x1b[{code}m"));
            }
        }
    }

    fn apply_sgr(&mut self, params: &str) -> StyleChange {
        let mut change = StyleChange::default();
        let mut tokens = params.split(';');
        while let Some(token) = tokens.next() {
            let code_text = token.split(':').next().unwrap_or_default();
            let code = if code_text.is_empty() {
                0
            } else {
                match code_text.parse::<u16>() {
                    Ok(code) => code,
                    Err(_) => continue,
                }
            };
            match code {
                0 => {
                    change.closed |= !self.attrs.is_empty();
                    self.attrs.clear();
                }
                38 | 48 | 58 if !token.contains(':') => {
                    // `38;5;n` and `38;2;r;g;b` carry their operands as
                    // separate parameters.
                    let operands = match tokens.clone().next() {
                        Some("5") => 2,
                        Some("2") => 4,
                        _ => 0,
                    };
                    let mut open = token.to_owned();
                    for operand in tokens.by_ref().take(operands) {
                        open.push(';');
                        open.push_str(operand);
                    }
                    change.opened = true;
                    self.open(open, close_code(code));
                }
                code if is_closer(code) => {
                    let before = self.attrs.len();
                    self.attrs.retain(|attr| attr.close != Some(code));
                    change.closed |= self.attrs.len() != before;
                }
                code => {
                    change.opened = true;
                    self.open(token.to_owned(), close_code(code));
                }
            }
        }
        change
    }

    fn open(&mut self, open: String, close: Option<u16>) {
        if matches!(close, Some(39 | 49 | 59)) {
            // One color per slot.
            self.attrs.retain(|attr| attr.close != close);
        } else {
            self.attrs.retain(|attr| attr.open != open);
        }
        self.attrs.push(SgrAttr { open, close });
    }
}

const fn close_code(code: u16) -> Option<u16> {
    match code {
        1 | 2 => Some(22),
        3 => Some(23),
        4 | 21 => Some(24),
        5 | 6 => Some(25),
        7 => Some(27),
        8 => Some(28),
        9 => Some(29),
        30..=38 | 90..=97 => Some(39),
        40..=48 | 100..=107 => Some(49),
        53 => Some(55),
        58 => Some(59),
        _ => None,
    }
}

const fn is_closer(code: u16) -> bool {
    matches!(code, 22..=25 | 27..=29 | 39 | 49 | 55 | 59)
}

fn parse_control(text: &str) -> Control<'_> {
    if let Some(body) = text
        .strip_prefix("\x1b[")
        .or_else(|| text.strip_prefix('\u{9b}'))
    {
        return match body.strip_suffix('m') {
            // Private markers and intermediates make it something other than SGR.
            Some(params) if params.bytes().all(|b| b.is_ascii_digit() || b == b';' || b == b':') => {
                Control::Sgr(params)
            }
            _ => Control::Other,
        };
    }
    let osc = if let Some(body) = text.strip_prefix("\x1b]") {
        Some(("\x1b]", body))
    } else {
        text.strip_prefix('\u{9d}').map(|body| ("\u{9d}", body))
    };
    if let Some((introducer, body)) = osc {
        let terminated = ["\u{07}", "\x1b\\", "\u{9c}"]
            .into_iter()
            .find_map(|st| body.strip_suffix(st).map(|payload| (payload, st)));
        if let Some((payload, terminator)) = terminated
            && let Some(rest) = payload.strip_prefix("8;")
            && let Some((_params, uri)) = rest.split_once(';')
        {
            return Control::Hyperlink {
                close: (!uri.is_empty()).then(|| format!("{introducer}8;;{terminator}")),
            };
        }
    }
    Control::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(seqs: &[&str]) -> StyleState<u8> {
        let mut state = StyleState::new();
        for seq in seqs {
            state.observe(seq.as_bytes());
        }
        state
    }

    fn opened(state: &StyleState<u8>) -> String {
        let mut out = Vec::new();
        state.write_open(&mut out);
        String::from_utf8(out).unwrap()
    }

    fn closed(state: &StyleState<u8>) -> String {
        let mut out = Vec::new();
        state.write_close(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn splits_combined_parameters() {
        let s = state(&["\x1b[1;31m"]);
        assert_eq!(opened(&s), "\x1b[1m\x1b[31m");
        assert_eq!(closed(&s), "\x1b[39m\x1b[22m");
    }

    #[test]
    fn extended_colors_stay_whole() {
        let s = state(&["\x1b[38;2;255;0;0;48;5;21;1m"]);
        assert_eq!(opened(&s), "\x1b[38;2;255;0;0m\x1b[48;5;21m\x1b[1m");
        assert_eq!(closed(&s), "\x1b[22m\x1b[49m\x1b[39m");
        let colon = state(&["\x1b[38:2::1:2:3m"]);
        assert_eq!(opened(&colon), "\x1b[38:2::1:2:3m");
    }

    #[test]
    fn reset_and_empty_params_clear() {
        assert!(!state(&["\x1b[1m", "\x1b[0m"]).is_active());
        assert!(!state(&["\x1b[1m", "\x1b[m"]).is_active());
        assert!(!state(&["\x1b[31m", "\x1b[39m"]).is_active());
    }

    #[test]
    fn new_color_replaces_old() {
        let s = state(&["\x1b[31m", "\x1b[32m"]);
        assert_eq!(opened(&s), "\x1b[32m");
    }

    #[test]
    fn bold_and_dim_share_a_closer() {
        let s = state(&["\x1b[1m", "\x1b[2m"]);
        assert_eq!(opened(&s), "\x1b[1m\x1b[2m");
        assert_eq!(closed(&s), "\x1b[22m");
    }

    #[test]
    fn unknown_attribute_closes_with_reset() {
        let s = state(&["\x1b[20m", "\x1b[31m"]);
        assert_eq!(closed(&s), "\x1b[0m");
    }

    #[test]
    fn private_csi_m_is_ignored() {
        let s = state(&["\x1b[31m", "\x1b[>4;2m", "\x1b[?0m"]);
        assert_eq!(opened(&s), "\x1b[31m");
    }

    #[test]
    fn hyperlinks() {
        let link = "\x1b]8;id=1;https://example.com\x1b\\";
        let s = state(&["\x1b[4m", link]);
        assert_eq!(opened(&s), format!("\x1b[4m{link}"));
        assert_eq!(closed(&s), "\x1b]8;;\x1b\\\x1b[24m");
        assert!(state(&[link, "\x1b]8;;\x07"]).attrs.is_empty());
        assert!(!state(&[link, "\x1b]8;;\x07"]).is_active());
    }

    #[test]
    fn hyperlink_close_mirrors_opener() {
        let bel = state(&["\x1b]8;;https://example.com\x07"]);
        assert_eq!(closed(&bel), "\x1b]8;;\x07");
        let c1 = state(&["\u{9d}8;;https://example.com\u{9c}"]);
        assert_eq!(closed(&c1), "\u{9d}8;;\u{9c}");
        let mixed = state(&["\x1b]8;;https://example.com\u{9c}"]);
        assert_eq!(closed(&mixed), "\x1b]8;;\u{9c}");
    }

    #[test]
    fn unterminated_hyperlink_is_ignored() {
        assert!(!state(&["\x1b]8;;https://example.com"]).is_active());
    }

    #[test]
    fn closes_only_requires_an_effect() {
        let s = state(&["\x1b[31m"]);
        assert!(s.closes_only(b"\x1b[39m"));
        assert!(s.closes_only(b"\x1b[0m"));
        assert!(!s.closes_only(b"\x1b[49m"));
        assert!(!s.closes_only(b"\x1b[0;1m"));
        assert!(!s.closes_only(b"\x1b[2J"));
    }

    #[test]
    fn utf16_state_round_trips_c1() {
        let seq: Vec<u16> = "\u{9b}1m".encode_utf16().collect();
        let mut s: StyleState<u16> = StyleState::new();
        assert_eq!(
            s.observe(&seq),
            StyleChange {
                opened: true,
                closed: false
            }
        );
        let mut out = Vec::new();
        s.write_open(&mut out);
        assert_eq!(String::from_utf16(&out).unwrap(), "\x1b[1m");
    }
}

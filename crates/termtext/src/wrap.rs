#![forbid(unsafe_code)]

//! Width-aware wrapping of ANSI-styled text.
//!
//! Lines are broken at whitespace where possible, escape sequences are never
//! split or counted, and a row that ends with styling still active is closed
//! before the newline and re-opened on the next row.
//!
//! # Example
//! ```
//! use termtext::wrap::{WrapOptions, wrap_ansi, wrap_ansi_with};
//!
//! assert_eq!(
//!     wrap_ansi("\x1b[32mhello world\x1b[0m", 5, false),
//!     "\x1b[32mhello\x1b[39m\n\x1b[32mworld\x1b[0m"
//! );
//!
//! // Character wrap for long words
//! let wrapped = wrap_ansi_with("Supercalifragilistic", &WrapOptions::new(10).hard(true));
//! assert_eq!(wrapped, "Supercalif\nragilistic");
//! ```

use crate::encoding::{TextUnit, into_string};
use crate::slice::observe_inner;
use crate::style::StyleState;
use crate::walk::{CodepointSpan, SpanWalker};

/// Options for wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapOptions {
    /// Maximum row width in cells. 0 disables wrapping.
    pub width: usize,
    /// Break words that do not fit on a row of their own.
    pub hard: bool,
    /// Prefer breaking at whitespace. When off, rows break at the exact
    /// column.
    pub word_wrap: bool,
    /// Drop leading whitespace of each input line and trailing whitespace of
    /// each row.
    pub trim: bool,
    /// Count East Asian Ambiguous characters as 2 cells.
    pub ambiguous_is_wide: bool,
}

impl WrapOptions {
    /// Create new wrap options with the given width.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            hard: false,
            word_wrap: true,
            trim: true,
            ambiguous_is_wide: false,
        }
    }

    #[must_use]
    pub fn hard(mut self, hard: bool) -> Self {
        self.hard = hard;
        self
    }

    #[must_use]
    pub fn word_wrap(mut self, word_wrap: bool) -> Self {
        self.word_wrap = word_wrap;
        self
    }

    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    #[must_use]
    pub fn ambiguous_is_wide(mut self, wide: bool) -> Self {
        self.ambiguous_is_wide = wide;
        self
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(80)
    }
}

/// Wrap `text` to `width` cells with the default options.
#[must_use]
pub fn wrap_ansi(text: &str, width: usize, hard: bool) -> String {
    wrap_ansi_with(text, &WrapOptions::new(width).hard(hard))
}

/// Wrap with full options.
#[must_use]
pub fn wrap_ansi_with(text: &str, options: &WrapOptions) -> String {
    if options.width == 0 {
        return text.to_owned();
    }
    into_string(wrap_ansi_units(text.as_bytes(), options))
}

/// UTF-16 variant of [`wrap_ansi_with`].
#[must_use]
pub fn wrap_ansi_utf16(units: &[u16], options: &WrapOptions) -> Vec<u16> {
    wrap_ansi_units(units, options)
}

/// Generic entry point over any [`TextUnit`] buffer.
#[must_use]
pub fn wrap_ansi_units<U: TextUnit>(units: &[U], options: &WrapOptions) -> Vec<U> {
    if options.width == 0 {
        return units.to_vec();
    }
    let tokens: Vec<Token> = SpanWalker::new(units, options.ambiguous_is_wide)
        .map(|span| Token::classify(units, span))
        .collect();
    let rows = layout(&tokens, options);
    let out = emit(units, &tokens, &rows);
    tracing::trace!(
        input_len = units.len(),
        width = options.width,
        hard = options.hard,
        rows = rows.len(),
        "wrapped styled text"
    );
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Escape,
    Space,
    Glyph,
    Newline,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    span: CodepointSpan,
    kind: TokenKind,
}

impl Token {
    fn classify<U: TextUnit>(units: &[U], span: CodepointSpan) -> Self {
        let kind = if span.is_escape() {
            TokenKind::Escape
        } else if span.is_newline(units) {
            TokenKind::Newline
        } else if span.is_whitespace() {
            TokenKind::Space
        } else {
            TokenKind::Glyph
        };
        Self { span, kind }
    }

    fn width(&self) -> usize {
        self.span.width
    }
}

/// An entry of a row: a whole token, or only the escapes embedded in a
/// whitespace or newline cluster the layout dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    Whole(usize),
    EscapesOf(usize),
}

/// The escapes a dropped token still has to contribute, if any.
fn escapes_of(index: usize, token: &Token) -> Option<Piece> {
    token
        .span
        .has_inner_escapes
        .then_some(Piece::EscapesOf(index))
}

/// One output row under construction, as pieces of the token list.
#[derive(Debug, Default)]
struct Row {
    pieces: Vec<Piece>,
    width: usize,
    has_glyph: bool,
    last_is_glyph: bool,
    /// Position in `pieces` of the last whitespace run that follows a glyph.
    break_at: Option<usize>,
    /// Whitespace overflowed; the next glyph starts a new row.
    full: bool,
}

impl Row {
    fn push_glyph(&mut self, index: usize, token: &Token) {
        self.pieces.push(Piece::Whole(index));
        self.width += token.width();
        self.has_glyph = true;
        self.last_is_glyph = true;
    }

    fn push_space(&mut self, index: usize, token: &Token) {
        if self.last_is_glyph {
            self.break_at = Some(self.pieces.len());
        }
        self.pieces.push(Piece::Whole(index));
        self.width += token.width();
        self.last_is_glyph = false;
    }

    /// Cut the row at `at`, returning the carried-over part without its
    /// leading whitespace.
    fn split_off(&mut self, at: usize, tokens: &[Token]) -> Row {
        let tail = self.pieces.split_off(at);
        self.width = self
            .pieces
            .iter()
            .map(|piece| match *piece {
                Piece::Whole(i) => tokens[i].width(),
                Piece::EscapesOf(_) => 0,
            })
            .sum();
        self.break_at = None;

        let mut carried = Row::default();
        for piece in tail {
            let Piece::Whole(index) = piece else {
                carried.pieces.push(piece);
                continue;
            };
            let token = &tokens[index];
            match token.kind {
                TokenKind::Space => carried.pieces.extend(escapes_of(index, token)),
                TokenKind::Glyph => carried.push_glyph(index, token),
                _ => carried.pieces.push(piece),
            }
        }
        carried
    }

    fn trim_end(&mut self, tokens: &[Token]) {
        let keep_to = self
            .pieces
            .iter()
            .rposition(|piece| {
                matches!(*piece, Piece::Whole(i) if tokens[i].kind == TokenKind::Glyph)
            })
            .map_or(0, |pos| pos + 1);
        let tail = self.pieces.split_off(keep_to);
        for piece in tail {
            match piece {
                Piece::Whole(i) if tokens[i].kind == TokenKind::Space => {
                    self.pieces.extend(escapes_of(i, &tokens[i]));
                }
                _ => self.pieces.push(piece),
            }
        }
    }
}

fn layout(tokens: &[Token], options: &WrapOptions) -> Vec<Row> {
    let limit = options.width;
    let mut rows = Vec::new();
    let mut row = Row::default();
    // Escapes met after the row filled up; they open the next row.
    let mut pending = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Newline => {
                row.pieces.append(&mut pending);
                row.pieces.extend(escapes_of(index, token));
                rows.push(std::mem::take(&mut row));
            }
            TokenKind::Escape if row.full => pending.push(Piece::Whole(index)),
            TokenKind::Escape => row.pieces.push(Piece::Whole(index)),
            TokenKind::Space => {
                if row.full {
                    pending.extend(escapes_of(index, token));
                } else if options.trim && !row.has_glyph {
                    row.pieces.extend(escapes_of(index, token));
                } else if row.width + token.width() > limit {
                    row.full = true;
                    pending.extend(escapes_of(index, token));
                } else {
                    row.push_space(index, token);
                }
            }
            TokenKind::Glyph => {
                if row.full {
                    rows.push(std::mem::take(&mut row));
                    row.pieces = std::mem::take(&mut pending);
                } else if row.width > 0 && row.width + token.width() > limit {
                    if options.word_wrap
                        && let Some(at) = row.break_at
                    {
                        let carried = row.split_off(at, tokens);
                        rows.push(std::mem::replace(&mut row, carried));
                    }
                    if row.width > 0
                        && row.width + token.width() > limit
                        && (options.hard || !options.word_wrap)
                    {
                        rows.push(std::mem::take(&mut row));
                    }
                }
                row.push_glyph(index, token);
            }
        }
    }
    row.pieces.append(&mut pending);
    rows.push(row);

    if options.trim {
        for row in &mut rows {
            row.trim_end(tokens);
        }
    }
    rows
}

fn emit<U: TextUnit>(units: &[U], tokens: &[Token], rows: &[Row]) -> Vec<U> {
    let mut out = Vec::with_capacity(units.len() + rows.len());
    let mut style = StyleState::new();
    for (n, row) in rows.iter().enumerate() {
        if n > 0 {
            U::push_str(&mut out, "\n");
            style.write_open(&mut out);
        }
        for piece in &row.pieces {
            match *piece {
                Piece::Whole(index) => {
                    let span = &tokens[index].span;
                    let piece = &units[span.start..span.end];
                    out.extend_from_slice(piece);
                    if span.is_escape() {
                        style.observe(piece);
                    } else {
                        observe_inner(&mut style, units, span, None);
                    }
                }
                Piece::EscapesOf(index) => {
                    observe_inner(&mut style, units, &tokens[index].span, Some(&mut out));
                }
            }
        }
        if n + 1 < rows.len() {
            style.write_close(&mut out);
        }
    }
    out
}

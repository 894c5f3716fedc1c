//! Span walking: split a buffer into escape sequences and grapheme clusters.
//!
//! Every operation in the crate is a fold over the [`CodepointSpan`]s that
//! [`SpanWalker`] yields. An escape sequence between two scalars of the same
//! cluster does not split the cluster: the cluster span stretches over it and
//! sets [`CodepointSpan::has_inner_escapes`].

use crate::classify::{BreakState, VS16, cluster_width};
use crate::encoding::TextUnit;
use crate::escape::{consume, consume_one};

/// What a span holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// One complete escape sequence.
    Escape,
    /// One extended grapheme cluster.
    Cluster,
}

/// A contiguous run of units that is either one escape or one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointSpan {
    /// First unit of the span.
    pub start: usize,
    /// One past the last unit of the span.
    pub end: usize,
    /// Columns the span occupies. Always 0 for escapes.
    pub width: usize,
    pub kind: SpanKind,
    /// First scalar of the span.
    pub base: char,
    /// Escape sequences sit between the scalars of this cluster.
    pub has_inner_escapes: bool,
}

impl CodepointSpan {
    #[inline]
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.kind == SpanKind::Escape
    }

    /// Whether this cluster is a line break (`\n` or `\r\n`).
    #[must_use]
    pub fn is_newline<U: TextUnit>(&self, units: &[U]) -> bool {
        match self.base {
            '\n' => self.kind == SpanKind::Cluster,
            '\r' => self.end - self.start > 1 && U::decode(units, self.end - 1).0 == '\n',
            _ => false,
        }
    }

    /// Whether this cluster is a space or a tab.
    #[inline]
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.kind == SpanKind::Cluster && matches!(self.base, ' ' | '\t')
    }
}

/// Iterator over the spans of a buffer.
#[derive(Debug, Clone)]
pub struct SpanWalker<'a, U: TextUnit> {
    units: &'a [U],
    pos: usize,
    ambiguous_as_wide: bool,
    breaks: BreakState,
}

impl<'a, U: TextUnit> SpanWalker<'a, U> {
    #[must_use]
    pub fn new(units: &'a [U], ambiguous_as_wide: bool) -> Self {
        Self {
            units,
            pos: 0,
            ambiguous_as_wide,
            breaks: BreakState::new(),
        }
    }

    fn next_cluster(&mut self, start: usize) -> CodepointSpan {
        let units = self.units;
        let (base, len) = U::decode(units, start);
        self.breaks.begin(base);

        let mut end = start + len;
        let mut has_vs16 = false;
        let mut has_inner_escapes = false;
        loop {
            // Look past any escapes for the scalar that might extend us.
            let after = consume(units, end, units.len());
            if after >= units.len() {
                break;
            }
            let (next, next_len) = U::decode(units, after);
            if self.breaks.grapheme_break(next) {
                break;
            }
            has_inner_escapes |= after != end;
            has_vs16 |= next == VS16;
            end = after + next_len;
        }

        CodepointSpan {
            start,
            end,
            width: cluster_width(base, has_vs16, self.ambiguous_as_wide),
            kind: SpanKind::Cluster,
            base,
            has_inner_escapes,
        }
    }
}

impl<U: TextUnit> Iterator for SpanWalker<'_, U> {
    type Item = CodepointSpan;

    fn next(&mut self) -> Option<CodepointSpan> {
        let start = self.pos;
        if start >= self.units.len() {
            return None;
        }
        let span = if U::is_introducer_at(self.units, start) {
            CodepointSpan {
                start,
                end: consume_one(self.units, start, self.units.len()),
                width: 0,
                kind: SpanKind::Escape,
                base: U::decode(self.units, start).0,
                has_inner_escapes: false,
            }
        } else {
            self.next_cluster(start)
        };
        self.pos = span.end;
        Some(span)
    }
}

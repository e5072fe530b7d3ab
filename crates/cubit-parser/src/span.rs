use std::{fmt::Debug, iter};

use either::Either;

#[derive(Default, Clone, Copy, PartialEq)]
pub struct Span<'src> {
    pub start: Location<'src>,
    pub end: Location<'src>,
}

impl<'src> Span<'src> {
    pub const fn dummy() -> Self {
        Self {
            start: Location::new("", ""),
            end: Location::new("", ""),
        }
    }

    pub fn path(&self) -> &'src str {
        self.start.path
    }

    /// Returns a span covering both `self` and `other`.
    pub fn to(self, other: Span<'src>) -> Self {
        self.start.until(other.end)
    }

    /// Renders the source line(s) covered by this span, each followed by a line of carets
    /// which underlines the covered columns.
    pub fn excerpt(&self) -> String {
        let lines: Vec<_> = self.start.source.split('\n').collect();
        let width = |line: usize| {
            lines
                .get(line)
                .map_or(0, |text| text.trim_end_matches('\r').chars().count())
        };

        let first = self.start.line;
        let last = self.end.line.max(first);
        let rows = match first == last {
            true => Either::Left(iter::once((first, self.start.column, self.end.column))),
            false => Either::Right((first..=last).map(|line| {
                let start = if line == first { self.start.column } else { 0 };
                let end = if line == last {
                    self.end.column
                } else {
                    width(line)
                };
                (line, start, end)
            })),
        };

        rows.map(|(line, start, end)| {
            // tabs count as one column, so they are rendered as one space to keep the carets aligned
            let text = lines
                .get(line)
                .map_or("", |text| text.trim_end_matches('\r'))
                .replace('\t', " ");
            format!(
                "{text}\n{}{}",
                " ".repeat(start),
                "^".repeat(end.saturating_sub(start).max(1)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Debug for Span<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column,
        )
    }
}

/// A position inside of a source file.
///
/// `line` and `column` are both 0-based. Locations compare by their coordinates only, the
/// `path` and `source` they point into are not considered.
#[derive(Default, Debug, Clone, Copy)]
pub struct Location<'src> {
    pub path: &'src str,
    pub source: &'src str,
    pub line: usize,
    pub column: usize,
    pub char_idx: usize,
    pub byte_idx: usize,
}

impl PartialEq for Location<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line
            && self.column == other.column
            && self.char_idx == other.char_idx
            && self.byte_idx == other.byte_idx
    }
}

impl<'src> Location<'src> {
    pub const fn new(path: &'src str, source: &'src str) -> Self {
        Self {
            path,
            source,
            line: 0,
            column: 0,
            char_idx: 0,
            byte_idx: 0,
        }
    }

    pub fn advance(&mut self, newline: bool, byte_idx_offset: usize) {
        self.char_idx += 1;
        self.byte_idx += byte_idx_offset;
        if newline {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    pub fn until(self, end: Location<'src>) -> Span<'src> {
        Span { start: self, end }
    }
}

/// Builds a single-line [`Span`] from a character range, used by tests.
#[macro_export]
macro_rules! span {
    ($start:literal .. $end:literal) => {
        $crate::Location {
            line: 0,
            column: $start,
            char_idx: $start,
            byte_idx: $start,
            ..$crate::Location::default()
        }
        .until($crate::Location {
            line: 0,
            column: $end,
            char_idx: $end,
            byte_idx: $end,
            ..$crate::Location::default()
        })
    };
}

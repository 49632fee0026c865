//! Line spans attributed to one commentary string.

use crate::token::Position;

/// Where a string literal starts and ends in the source (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub start: Position,
    pub end: Position,
}

/// An inclusive `[start_line, end_line]` range covered by one string
/// literal judged to be commentary, with the literal's raw text.
///
/// `start_column` is the character column where the literal begins on
/// `start_line`; continuation lines always start at column 0.
/// `end_column` is the column just past the closing quote on `end_line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub raw_text: String,
}

/// A triple-quoted string found by the token heuristic.
pub type StandaloneStringSpan = StringSpan;

/// A docstring confirmed by the syntax tree.
pub type DocstringSpan = StringSpan;

impl StringSpan {
    /// The end column is measured from the raw text, which must be the
    /// literal exactly as written.
    pub fn new(
        start_line: usize,
        end_line: usize,
        start_column: usize,
        raw_text: impl Into<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        let last = raw_text.rsplit('\n').next().unwrap_or("");
        let width = last.trim_end_matches('\r').chars().count();
        let end_column = if raw_text.contains('\n') {
            width
        } else {
            start_column + width
        };

        Self {
            start_line,
            end_line: end_line.max(start_line),
            start_column,
            end_column,
            raw_text,
        }
    }

    /// All line numbers covered by the span.
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start_line..=self.end_line
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines().contains(&line)
    }

    pub fn extent(&self) -> Extent {
        Extent {
            start: Position::new(self.start_line, self.start_column),
            end: Position::new(self.end_line, self.end_column),
        }
    }

    /// Pair every covered line with its slice of the raw text.
    ///
    /// Lines past the end of the raw text (which only happens when the text
    /// was trimmed) map to an empty string.
    pub fn line_contents(&self) -> Vec<(usize, String)> {
        let mut pieces = self.raw_text.split('\n');
        self.lines()
            .map(|line| {
                let piece = pieces.next().unwrap_or("");
                (line, piece.trim_end_matches('\r').to_string())
            })
            .collect()
    }

    /// Character column where commentary starts on the given line.
    pub fn column_on(&self, line: usize) -> usize {
        if line == self.start_line {
            self.start_column
        } else {
            0
        }
    }

    /// Move a span that starts on line 1 right by `width` columns.
    pub(crate) fn shift_first_line(&mut self, width: usize) {
        if self.start_line == 1 {
            self.start_column += width;
            if self.end_line == 1 {
                self.end_column += width;
            }
        }
    }
}

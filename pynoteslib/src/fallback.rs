//! Line-oriented fallback classifier.
//!
//! Used only when the tokenizer rejects the file. It works on physical
//! lines with two crude checks:
//!
//! - a `#` starts a comment only when the number of quote characters before
//!   it on the same line is even
//! - a line starting with triple quotes opens a standalone string when the
//!   previous non-blank line does not end in an operator, bracket or comma
//!
//! Escaped quotes and strings spanning lines fool the parity check. The
//! output has the same shape as the token path so callers cannot tell the
//! two apart except through [`crate::ClassifierPath`].

use crate::classify::{Commentary, CommentaryKind, CommentaryMap};
use crate::span::Extent;
use crate::token::Position;

const TRIPLE_QUOTES: [&str; 2] = ["\"\"\"", "'''"];

/// Trailing characters that make the next line a continuation of an expression.
const CONTINUATION_ENDINGS: &[char] = &[
    '=', '(', '[', '{', ',', '+', '-', '*', '/', '%', '|', '&', '^', '<', '>', '\\',
];

/// Whether a `#` at byte offset `pos` sits outside any string, judged by
/// quote parity.
pub fn quote_parity_is_even(line: &str, pos: usize) -> bool {
    let before = line.get(..pos).unwrap_or(line);
    before.chars().filter(|c| *c == '"' || *c == '\'').count() % 2 == 0
}

/// Byte offset of the first `#` that passes the parity check.
pub fn find_comment_start(line: &str) -> Option<usize> {
    line.match_indices('#')
        .map(|(pos, _)| pos)
        .find(|pos| quote_parity_is_even(line, *pos))
}

fn char_column(line: &str, byte_pos: usize) -> usize {
    line.get(..byte_pos).unwrap_or(line).chars().count()
}

/// Strip a trailing comment (if any) and trailing whitespace.
fn code_part(line: &str) -> &str {
    match find_comment_start(line) {
        Some(pos) => line[..pos].trim_end(),
        None => line.trim_end(),
    }
}

fn is_standalone_line(lines: &[&str], index: usize) -> bool {
    let previous = lines[..index]
        .iter()
        .rev()
        .map(|l| code_part(l))
        .find(|l| !l.is_empty());

    match previous {
        None => true,
        Some(prev) => !prev.ends_with(CONTINUATION_ENDINGS),
    }
}

/// Triple-quote delimiter left open at the end of a code line, if any.
fn open_delimiter(code: &str) -> Option<&'static str> {
    TRIPLE_QUOTES
        .into_iter()
        .find(|delim| code.matches(delim).count() % 2 == 1)
}

/// Line index and character column just past the delimiter closing a
/// string opened on line `start`; an unclosed string runs to the last line.
fn closing_quote(lines: &[&str], start: usize, body_at: usize, delim: &str) -> (usize, usize) {
    let line = lines[start];
    if let Some(pos) = line[body_at..].find(delim) {
        return (start, char_column(line, body_at + pos + delim.len()));
    }

    let closing = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find_map(|(index, l)| {
            l.find(delim)
                .map(|pos| (index, char_column(l, pos + delim.len())))
        });

    closing.unwrap_or_else(|| {
        let last = lines.len() - 1;
        (last, lines[last].chars().count())
    })
}

/// Classify commentary line by line.
///
/// # Example
///
/// ```rust
/// use pynoteslib::classify_lines;
///
/// let map = classify_lines("x = 1  # note\n");
/// assert_eq!(map.get(1).map(|c| c.content.as_str()), Some("# note"));
/// ```
pub fn classify_lines(content: &str) -> CommentaryMap {
    let lines: Vec<&str> = content.lines().collect();
    let mut map = CommentaryMap::new();
    let mut open_string: Option<&'static str> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let line_no = i + 1;

        // inside a multi-line string that belongs to code
        if let Some(delim) = open_string {
            if line.contains(delim) {
                open_string = None;
            }
            i += 1;
            continue;
        }

        let trimmed = line.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        let opening = TRIPLE_QUOTES
            .into_iter()
            .find(|delim| trimmed.starts_with(delim));

        if let Some(delim) = opening {
            if is_standalone_line(&lines, i) {
                let open_at = line.len() - trimmed.len();
                let column = char_column(line, open_at);
                let (end, end_column) = closing_quote(&lines, i, open_at + delim.len(), delim);
                let extent = Extent {
                    start: Position::new(line_no, column),
                    end: Position::new(end + 1, end_column),
                };

                for (offset, current) in lines[i..=end].iter().enumerate() {
                    let (content, column) = if offset == 0 {
                        (trimmed.trim_end(), column)
                    } else {
                        (current.trim_end(), 0)
                    };
                    map.insert(
                        i + offset + 1,
                        Commentary::new(content, CommentaryKind::StandaloneString, column)
                            .within(extent),
                    );
                }
                log::debug!("fallback: standalone string at lines {}-{}", line_no, end + 1);
                i = end + 1;
                continue;
            }
        }

        if let Some(pos) = find_comment_start(line) {
            let comment = line[pos..].trim_end();
            map.insert(
                line_no,
                Commentary::new(comment, CommentaryKind::Comment, char_column(line, pos)),
            );
        }

        open_string = open_delimiter(code_part(line));
        i += 1;
    }

    map
}

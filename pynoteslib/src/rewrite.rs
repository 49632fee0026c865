//! Line rewriter: remove commentary while keeping every line in place.
//!
//! The output always has exactly as many physical lines as the input, so
//! line numbers reported elsewhere (tracebacks, review comments) stay valid.
//!
//! - Lines without commentary are copied verbatim.
//! - Lines that are entirely commentary become empty lines.
//! - Code followed by an inline `#` comment keeps the code, right-trimmed.
//! - A string literal shares its fate across all of its lines. It is
//!   blanked only when nothing but whitespace precedes its opening quotes
//!   and nothing but whitespace or a comment follows its closing quotes.
//!   Otherwise (a one-line `def f(): """doc"""`, or `"""doc"""; x = 1`)
//!   every line of it is kept as written.
//!
//! Each line keeps its own terminator. A leading byte order mark survives
//! even when the first line is blanked.

use crate::classify::{analyze_source, Commentary, CommentaryMap};
use crate::fallback::quote_parity_is_even;
use crate::span::Extent;
use crate::stats::total_lines;

const BOM: char = '\u{feff}';

/// Result of rewriting one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The new file content
    pub content: String,
    /// Lines whose content changed
    pub removed: usize,
    /// Total line count (EOF convention, see [`crate::Statistics`])
    pub total: usize,
}

/// One physical line split from its terminator.
struct Line<'a> {
    text: &'a str,
    terminator: &'a str,
}

fn split_lines(content: &str) -> Vec<Line<'_>> {
    content
        .split_inclusive('\n')
        .map(|piece| {
            let body_len = piece
                .strip_suffix("\r\n")
                .or_else(|| piece.strip_suffix('\n'))
                .map_or(piece.len(), str::len);
            let (text, terminator) = piece.split_at(body_len);
            Line { text, terminator }
        })
        .collect()
}

fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == BOM)
}

/// What is left of a line whose whole content is commentary.
fn blanked(line: &str) -> &str {
    if line.starts_with(BOM) {
        &line[..BOM.len_utf8()]
    } else {
        ""
    }
}

fn text_of<'a>(lines: &[Line<'a>], line: usize) -> &'a str {
    line.checked_sub(1)
        .and_then(|index| lines.get(index))
        .map_or("", |l| l.text)
}

/// Whether a string literal can be removed without touching code that
/// shares a line with it.
fn literal_is_removable(lines: &[Line<'_>], extent: Extent) -> bool {
    let first = text_of(lines, extent.start.line);
    if !is_blank(&first[..byte_offset(first, extent.start.column)]) {
        return false;
    }

    let last = text_of(lines, extent.end.line);
    let tail = last[byte_offset(last, extent.end.column)..].trim();
    tail.is_empty() || tail.starts_with('#')
}

fn rewrite_line<'a>(
    lines: &[Line<'a>],
    line: &'a str,
    entry: &Commentary,
    verify_quotes: bool,
) -> &'a str {
    let cut = byte_offset(line, entry.column);
    let code = &line[..cut];

    if entry.kind.is_string() {
        let removable = match entry.extent {
            Some(extent) => literal_is_removable(lines, extent),
            None => is_blank(code),
        };
        return if removable { blanked(line) } else { line };
    }

    if is_blank(code) {
        blanked(line)
    } else if verify_quotes && !quote_parity_is_even(line, cut) {
        line
    } else {
        code.trim_end()
    }
}

/// Rewrite `content`, removing the commentary recorded in `commentary`.
///
/// With `verify_quotes` set, an inline comment is only cut when the quote
/// parity check confirms its `#` is outside a string; use it when the
/// columns come from the line heuristic rather than the tokenizer.
pub fn rewrite(content: &str, commentary: &CommentaryMap, verify_quotes: bool) -> Rewrite {
    let lines = split_lines(content);
    let mut output = String::with_capacity(content.len());
    let mut removed = 0;

    for (index, line) in lines.iter().enumerate() {
        let new_line = match commentary.get(index + 1) {
            Some(entry) => rewrite_line(&lines, line.text, entry, verify_quotes),
            None => line.text,
        };
        if new_line != line.text {
            removed += 1;
        }

        // an unterminated last line that empties out would vanish
        let terminator = if line.terminator.is_empty() && new_line.is_empty() {
            index
                .checked_sub(1)
                .and_then(|previous| lines.get(previous))
                .map_or("\n", |previous| previous.terminator)
        } else {
            line.terminator
        };

        output.push_str(new_line);
        output.push_str(terminator);
    }

    Rewrite {
        content: output,
        removed,
        total: total_lines(content),
    }
}

/// Classify and strip commentary from a source text in one step.
///
/// # Example
///
/// ```rust
/// use pynoteslib::strip_source;
///
/// let result = strip_source("# header\nx = 1  # note\n");
/// assert_eq!(result.content, "\nx = 1\n");
/// assert_eq!(result.removed, 2);
/// ```
pub fn strip_source(content: &str) -> Rewrite {
    let analysis = analyze_source(content);
    rewrite(
        content,
        &analysis.commentary,
        !analysis.path.used_tokens(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::CommentaryKind;
    use crate::scanner::tokenize;

    fn assert_still_python(source: &str, result: &Rewrite) {
        assert!(tokenize(&result.content).is_ok());
        assert_eq!(result.content.lines().count(), source.lines().count());
    }

    #[test]
    fn inline_comment_is_cut() {
        let result = strip_source("x = 1  # note\n");

        assert_eq!(result.content, "x = 1\n");
        assert_eq!(result.removed, 1);
    }

    #[test]
    fn docstrings_become_blank_lines() {
        let source = "\"\"\"\nModule doc.\n\"\"\"\nimport os\n";
        let result = strip_source(source);

        assert_eq!(result.content, "\n\n\nimport os\n");
        assert_eq!(result.removed, 3);
        assert_eq!(result.total, 5);
    }

    #[test]
    fn assigned_strings_are_preserved() {
        let source = "query = \"\"\"\nSELECT 1  # not a comment\n\"\"\"\n";
        let result = strip_source(source);

        assert_eq!(result.content, source);
        assert_eq!(result.removed, 0);
    }

    #[test]
    fn hash_in_string_is_preserved() {
        let source = "url = \"http://x/#frag\"  # real\n";

        assert_eq!(strip_source(source).content, "url = \"http://x/#frag\"\n");
    }

    #[test]
    fn line_count_is_preserved() {
        let source = "#!/usr/bin/env python3\n\"\"\"Doc.\"\"\"\n\nclass A:\n    '''Doc.'''\n    x = 1  # c\n\n# end";
        let result = strip_source(source);

        assert_eq!(result.content.lines().count(), source.lines().count());
        assert!(result.content.ends_with("\n\n"));
    }

    #[test]
    fn strip_is_idempotent() {
        let source = "\"\"\"Doc.\"\"\"\ndef f(a):  # c\n    \"\"\"\n    More.\n    \"\"\"\n    return a  # r\n";
        let once = strip_source(source);
        let twice = strip_source(&once.content);

        assert_eq!(once.content, twice.content);
        assert_eq!(twice.removed, 0);
    }

    #[test]
    fn one_line_definition_keeps_its_docstring() {
        let source = "def f(): \"\"\"doc\"\"\"\n";

        assert_eq!(strip_source(source).content, source);
    }

    #[test]
    fn docstring_opened_after_code_keeps_every_line() {
        let source = "def f(): \"\"\"doc\n    more\"\"\"\nx = 1\n";
        let result = strip_source(source);

        assert_eq!(result.content, source);
        assert_eq!(result.removed, 0);
        assert_still_python(source, &result);
    }

    #[test]
    fn code_after_closing_quotes_keeps_the_string() {
        let source = "\"\"\"doc\n\"\"\"; x = 1\nprint(x)\n";
        let result = strip_source(source);

        assert_eq!(result.content, source);
        assert!(result.content.contains("x = 1"));
        assert_still_python(source, &result);
    }

    #[test]
    fn standalone_string_closed_before_code_is_kept() {
        let source = "x = 1\n\"\"\"\nnote\n\"\"\"; y = 2\n";
        let result = strip_source(source);

        assert_eq!(result.content, source);
        assert_still_python(source, &result);
    }

    #[test]
    fn comment_after_closing_quotes_goes_with_the_string() {
        let source = "\"\"\"doc\n\"\"\"  # end\nx = 1\n";
        let result = strip_source(source);

        assert_eq!(result.content, "\n\nx = 1\n");
        assert_eq!(result.removed, 2);
        assert_still_python(source, &result);
    }

    #[test]
    fn byte_order_mark_does_not_shift_cut() {
        let result = strip_source("\u{feff}x = 1# c\n");

        assert_eq!(result.content, "\u{feff}x = 1\n");
    }

    #[test]
    fn byte_order_mark_survives_blanked_first_line() {
        assert_eq!(
            strip_source("\u{feff}# header\nx = 1\n").content,
            "\u{feff}\nx = 1\n"
        );
        assert_eq!(
            strip_source("\u{feff}\"\"\"Doc.\"\"\"\nx = 1\n").content,
            "\u{feff}\nx = 1\n"
        );
    }

    #[test]
    fn crlf_is_preserved() {
        let result = strip_source("x = 1  # c\r\ny = 2\r\n");

        assert_eq!(result.content, "x = 1\r\ny = 2\r\n");
    }

    #[test]
    fn mixed_line_endings_are_kept_per_line() {
        let result = strip_source("x = 1  # c\r\ny = 2\n# z\r\n");

        assert_eq!(result.content, "x = 1\r\ny = 2\n\r\n");
        assert_eq!(result.removed, 2);
    }

    #[test]
    fn missing_final_newline_stays_missing() {
        assert_eq!(strip_source("x = 1  # c").content, "x = 1");
        assert_eq!(strip_source("y = 2").content, "y = 2");
    }

    #[test]
    fn empty_source_stays_empty() {
        let result = strip_source("");

        assert_eq!(result.content, "");
        assert_eq!(result.removed, 0);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn verify_quotes_keeps_suspicious_lines() {
        let line = "s = \"it's\"  # c";
        let mut map = CommentaryMap::new();
        map.insert(1, Commentary::new("# c", CommentaryKind::Comment, 12));

        assert_eq!(rewrite(line, &map, true).content, line);
        assert_eq!(rewrite(line, &map, false).content, "s = \"it's\"");
    }

    #[test]
    fn fallback_path_still_strips() {
        // the unterminated string forces the line heuristic
        let source = "# header\nx = 1  # note\ny = 'open\n";
        let result = strip_source(source);

        assert_eq!(result.content, "\nx = 1\ny = 'open\n");
    }
}

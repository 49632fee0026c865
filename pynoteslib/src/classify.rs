//! Commentary classification: merge comments, standalone strings and
//! docstrings into one line → content map.
//!
//! Rules, applied in this order with later writers overwriting earlier ones:
//!
//! 1. **Comments** (`#` to end of line, including inline comments after code)
//! 2. **Standalone strings** from the token heuristic
//! 3. **Docstrings** confirmed by the syntax tree, which always win
//!
//! A line holding both the end of a standalone string and a trailing
//! comment is therefore attributed to the string.
//!
//! When the tokenizer fails the whole file goes through the line-oriented
//! fallback; when the parser fails docstrings are simply not refined. Both
//! events are logged and recorded in [`ClassifierPath`].

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::docstring::locate_docstrings;
use crate::fallback::classify_lines;
use crate::scanner::tokenize;
use crate::span::{DocstringSpan, Extent};
use crate::standalone::find_standalone_strings;
use crate::stats::Statistics;
use crate::token::{Token, TokenKind};

/// What produced a commentary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryKind {
    Comment,
    StandaloneString,
    Docstring,
}

impl CommentaryKind {
    /// Whether the entry is part of a string literal (as opposed to a `#` comment).
    pub fn is_string(self) -> bool {
        matches!(self, Self::StandaloneString | Self::Docstring)
    }
}

/// Commentary recorded for one physical line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commentary {
    /// The commentary text on this line (marker included for comments)
    pub content: String,
    pub kind: CommentaryKind,
    /// Character column where commentary starts; anything before it is code
    pub column: usize,
    /// Whole literal this line belongs to, for string entries
    #[serde(skip)]
    pub extent: Option<Extent>,
}

impl Commentary {
    pub fn new(content: impl Into<String>, kind: CommentaryKind, column: usize) -> Self {
        Self {
            content: content.into(),
            kind,
            column,
            extent: None,
        }
    }

    /// Builder: attach the extent of the enclosing string literal
    pub fn within(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }
}

/// Mapping from 1-based line number to the commentary on that line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentaryMap {
    entries: BTreeMap<usize, Commentary>,
}

impl CommentaryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record commentary for a line, replacing any earlier entry.
    pub fn insert(&mut self, line: usize, commentary: Commentary) {
        self.entries.insert(line, commentary);
    }

    pub fn get(&self, line: usize) -> Option<&Commentary> {
        self.entries.get(&line)
    }

    pub fn contains(&self, line: usize) -> bool {
        self.entries.contains_key(&line)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Commentary)> {
        self.entries.iter().map(|(line, c)| (*line, c))
    }

    /// Character count of all distinct commentary strings.
    ///
    /// Byte-identical contents on different lines are counted once.
    pub fn letter_count(&self) -> usize {
        let distinct: HashSet<&str> = self.entries.values().map(|c| c.content.as_str()).collect();
        distinct.iter().map(|s| s.chars().count()).sum()
    }
}

/// Which classification path produced an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierPath {
    /// Tokenizer heuristic refined by syntax-tree docstrings
    TokensWithSyntaxTree,
    /// Tokenizer heuristic only (the parser rejected the file)
    Tokens,
    /// Line heuristic refined by syntax-tree docstrings
    LinesWithSyntaxTree,
    /// Line heuristic only (both tokenizer and parser rejected the file)
    Lines,
}

impl ClassifierPath {
    fn new(tokenized: bool, parsed: bool) -> Self {
        match (tokenized, parsed) {
            (true, true) => Self::TokensWithSyntaxTree,
            (true, false) => Self::Tokens,
            (false, true) => Self::LinesWithSyntaxTree,
            (false, false) => Self::Lines,
        }
    }

    /// Whether the token stream was available.
    pub fn used_tokens(self) -> bool {
        matches!(self, Self::TokensWithSyntaxTree | Self::Tokens)
    }
}

impl fmt::Display for ClassifierPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TokensWithSyntaxTree => "tokens+syntax-tree",
            Self::Tokens => "tokens",
            Self::LinesWithSyntaxTree => "lines+syntax-tree",
            Self::Lines => "lines",
        };
        f.write_str(name)
    }
}

/// Full classification result for one source text.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub commentary: CommentaryMap,
    pub stats: Statistics,
    pub path: ClassifierPath,
}

/// Build the commentary map from a token stream (comments and standalone strings).
pub fn classify_tokens(tokens: &[Token]) -> CommentaryMap {
    let mut map = CommentaryMap::new();

    for token in tokens.iter().filter(|t| t.kind == TokenKind::Comment) {
        map.insert(
            token.start.line,
            Commentary::new(
                token.text.clone(),
                CommentaryKind::Comment,
                token.start.column,
            ),
        );
    }

    for span in find_standalone_strings(tokens) {
        for (line, content) in span.line_contents() {
            map.insert(
                line,
                Commentary::new(
                    content,
                    CommentaryKind::StandaloneString,
                    span.column_on(line),
                )
                .within(span.extent()),
            );
        }
    }

    map
}

/// Overlay authoritative docstring spans on a commentary map.
pub fn apply_docstrings(map: &mut CommentaryMap, spans: &[DocstringSpan]) {
    for span in spans {
        for (line, content) in span.line_contents() {
            map.insert(
                line,
                Commentary::new(content, CommentaryKind::Docstring, span.column_on(line))
                    .within(span.extent()),
            );
        }
    }
}

/// Classify every line of a Python source text.
///
/// Never fails: a tokenizer error switches to the line heuristic and a
/// parser error skips the docstring refinement.
///
/// # Example
///
/// ```rust
/// use pynoteslib::{analyze_source, ClassifierPath};
///
/// let source = "\"\"\"Module doc.\"\"\"\nx = 1  # note\n";
/// let analysis = analyze_source(source);
///
/// assert_eq!(analysis.path, ClassifierPath::TokensWithSyntaxTree);
/// assert_eq!(analysis.commentary.len(), 2);
/// assert_eq!(analysis.commentary.get(2).unwrap().content, "# note");
/// ```
pub fn analyze_source(content: &str) -> Analysis {
    let (mut commentary, tokenized) = match tokenize(content) {
        Ok(tokens) => (classify_tokens(&tokens), true),
        Err(e) => {
            log::warn!("tokenizer rejected source ({e}); using line heuristic");
            (classify_lines(content), false)
        }
    };

    let parsed = match locate_docstrings(content) {
        Ok(spans) => {
            apply_docstrings(&mut commentary, &spans);
            true
        }
        Err(e) => {
            log::warn!("docstring refinement skipped: {e}");
            false
        }
    };

    let path = ClassifierPath::new(tokenized, parsed);
    log::debug!(
        "classified {} commentary lines via {path}",
        commentary.len()
    );

    let stats = Statistics::compute(&commentary, content);
    Analysis {
        commentary,
        stats,
        path,
    }
}

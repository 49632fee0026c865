//! Token data model shared by the scanner and the classifiers.

use std::fmt;

/// Kinds of tokens produced by the scanner.
///
/// Layout tokens (`Newline`, `Nl`, `Indent`, `Dedent`) carry structure but
/// no meaning of their own; see [`TokenKind::is_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `# ...` up to (not including) the line terminator
    Comment,
    /// Any string literal, including prefix and quotes
    String,
    /// Identifiers and keywords
    Name,
    Number,
    /// Operators and delimiters
    Op,
    /// End of a logical line
    Newline,
    /// Line break that does not end a logical line (blank lines, inside brackets)
    Nl,
    Indent,
    Dedent,
    EndMarker,
}

impl TokenKind {
    /// Whether the token only shapes the layout of the file.
    pub fn is_layout(self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Nl | TokenKind::Indent | TokenKind::Dedent
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Comment => "COMMENT",
            TokenKind::String => "STRING",
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::Op => "OP",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndMarker => "ENDMARKER",
        };
        f.write_str(name)
    }
}

/// A position in the source: 1-based line, 0-based column in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single lexical unit with its source span.
///
/// `end` is exclusive: it points just past the last character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
    pub end: Position,
}

impl Token {
    /// Whether this is an operator token with exactly the given text.
    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Op && self.text == text
    }

    /// Whether this is a name token with exactly the given text.
    pub fn is_name(&self, text: &str) -> bool {
        self.kind == TokenKind::Name && self.text == text
    }

    /// For string tokens: whether the literal uses triple quotes.
    ///
    /// Prefix letters (`r`, `u`, `b`, `f`, ...) are skipped before checking.
    pub fn is_triple_quoted(&self) -> bool {
        if self.kind != TokenKind::String {
            return false;
        }
        let body = self.text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        (body.starts_with("\"\"\"") || body.starts_with("'''")) && body.chars().count() >= 6
    }

    /// The prefix letters of a string token, lowercased (`""` for plain strings).
    pub fn string_prefix(&self) -> String {
        self.text
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
}

//! Python tokenizer.
//!
//! This module turns raw source text into an ordered sequence of [`Token`]s
//! with exact 1-based line / 0-based character column positions. It follows
//! the layout rules of the language's own tokenizer:
//!
//! - **NEWLINE** ends a logical line, **NL** marks every other line break
//!   (blank lines, comment-only lines, breaks inside brackets)
//! - **INDENT** / **DEDENT** are emitted at the start of logical lines only,
//!   never inside brackets or after a backslash continuation
//! - **STRING** covers the full literal including prefix and quotes, so a
//!   triple-quoted string spans several lines in a single token
//! - **COMMENT** runs from `#` to the end of the physical line
//!
//! Anything not well-formed at the token level (unterminated string,
//! dedent to an unknown column, stray characters, unbalanced brackets) is
//! reported as a [`LexicalError`] so the caller can fall back to a line
//! heuristic.

use crate::error::LexicalError;
use crate::token::{Position, Token, TokenKind};

/// Width a tab advances the indentation column to (next multiple of).
const TAB_SIZE: usize = 8;

/// String prefixes accepted in front of a quote (compared lowercased).
const STRING_PREFIXES: &[&str] = &["r", "u", "b", "f", "br", "rb", "fr", "rf"];

const THREE_CHAR_OPS: &[&str] = &["**=", "//=", ">>=", "<<=", "..."];

const TWO_CHAR_OPS: &[&str] = &[
    "**", "//", ">>", "<<", "<=", ">=", "==", "!=", "->", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "@=", ":=",
];

const ONE_CHAR_OPS: &str = "+-*/%@&|^~<>()[]{},:;.=!";

/// A single-pass tokenizer over a character buffer.
///
/// The scanner keeps the indentation stack and bracket depth needed to
/// decide between NEWLINE and NL and to emit INDENT/DEDENT.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    indents: Vec<usize>,
    depth: usize,
    at_line_start: bool,
    /// Whether the current logical line has produced a non-comment token
    pending_statement: bool,
    tokens: Vec<Token>,
}

impl Scanner {
    /// Create a scanner over the given source.
    ///
    /// A leading byte-order mark is skipped but still occupies column 0 of
    /// line 1, so columns keep matching the raw text.
    pub fn new(source: &str) -> Self {
        let mut chars: Vec<char> = source.chars().collect();
        let has_bom = chars.first() == Some(&'\u{feff}');
        if has_bom {
            chars.remove(0);
        }

        Self {
            chars,
            pos: 0,
            line: 1,
            column: usize::from(has_bom),
            indents: vec![0],
            depth: 0,
            at_line_start: true,
            pending_statement: false,
            tokens: Vec::new(),
        }
    }

    /// Consume the scanner and produce the full token sequence, ending with
    /// an ENDMARKER token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexicalError> {
        while self.pos < self.chars.len() {
            if self.at_line_start {
                self.at_line_start = false;
                if self.depth == 0 {
                    self.visit_line_start()?;
                    continue;
                }
            }
            self.visit_token()?;
        }

        self.finish()
    }

    /// Measure indentation and emit INDENT/DEDENT for a new logical line.
    ///
    /// Blank and comment-only lines leave the indentation stack untouched.
    fn visit_line_start(&mut self) -> Result<(), LexicalError> {
        let start_idx = self.pos;
        let start = self.position();
        let mut width = 0;

        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / TAB_SIZE + 1) * TAB_SIZE,
                '\x0c' => width = 0,
                '\r' => {}
                _ => break,
            }
            self.bump();
        }

        match self.peek() {
            None | Some('\n') | Some('#') => return Ok(()),
            _ => {}
        }

        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.emit(TokenKind::Indent, start_idx, start);
        } else {
            while width < self.indents.last().copied().unwrap_or(0) {
                self.indents.pop();
                let here = self.position();
                self.emit_empty(TokenKind::Dedent, here);
            }
            if width != self.indents.last().copied().unwrap_or(0) {
                return Err(LexicalError::InconsistentDedent { line: self.line });
            }
        }

        Ok(())
    }

    fn visit_token(&mut self) -> Result<(), LexicalError> {
        let Some(c) = self.peek() else {
            return Ok(());
        };

        match c {
            ' ' | '\t' | '\x0c' | '\r' => {
                self.bump();
            }
            '\n' => {
                let kind = if self.depth == 0 && self.pending_statement {
                    TokenKind::Newline
                } else {
                    TokenKind::Nl
                };
                self.visit_line_break(kind);
            }
            '#' => self.visit_comment(),
            '\\' => self.visit_continuation()?,
            '"' | '\'' => {
                let start_idx = self.pos;
                let start = self.position();
                self.visit_string(start_idx, start)?;
            }
            '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => self.visit_number(),
            c if c.is_ascii_digit() => self.visit_number(),
            c if is_identifier_start(c) => self.visit_name()?,
            _ => self.visit_operator()?,
        }

        Ok(())
    }

    fn visit_line_break(&mut self, kind: TokenKind) {
        let start_idx = self.pos;
        let start = self.position();
        self.bump();

        let text: String = self.chars[start_idx..self.pos].iter().collect();
        self.tokens.push(Token {
            kind,
            text,
            start,
            end: Position::new(start.line, start.column + 1),
        });

        if self.depth == 0 {
            self.at_line_start = true;
            self.pending_statement = false;
        }
    }

    fn visit_comment(&mut self) {
        let start_idx = self.pos;
        let start = self.position();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }

        let text: String = self.chars[start_idx..self.pos].iter().collect();
        let text = text.trim_end_matches('\r').to_string();
        let end = Position::new(start.line, start.column + text.chars().count());
        self.tokens.push(Token {
            kind: TokenKind::Comment,
            text,
            start,
            end,
        });
    }

    fn visit_continuation(&mut self) -> Result<(), LexicalError> {
        let line = self.line;
        self.bump();
        if self.peek() == Some('\r') {
            self.bump();
        }
        match self.peek() {
            Some('\n') => {
                self.bump();
                Ok(())
            }
            _ => Err(LexicalError::UnexpectedCharacter { line, found: '\\' }),
        }
    }

    fn visit_name(&mut self) -> Result<(), LexicalError> {
        let start_idx = self.pos;
        let start = self.position();
        self.collect_while(is_identifier_continue);

        let is_prefix = {
            let word: String = self.chars[start_idx..self.pos]
                .iter()
                .map(|c| c.to_ascii_lowercase())
                .collect();
            STRING_PREFIXES.contains(&word.as_str())
        };
        if is_prefix && matches!(self.peek(), Some('"') | Some('\'')) {
            return self.visit_string(start_idx, start);
        }

        self.emit(TokenKind::Name, start_idx, start);
        Ok(())
    }

    /// Scan a string literal whose quote is at the current position.
    ///
    /// `start_idx` / `start` point at the prefix, if any.
    fn visit_string(&mut self, start_idx: usize, start: Position) -> Result<(), LexicalError> {
        let unterminated = LexicalError::UnterminatedString { line: start.line };
        let Some(quote) = self.peek() else {
            return Err(unterminated);
        };
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.advance(if triple { 3 } else { 1 });

        loop {
            match self.peek() {
                None => return Err(unterminated),
                Some('\\') => {
                    self.bump();
                    if self.peek() == Some('\r') && self.peek_at(1) == Some('\n') {
                        self.bump();
                    }
                    if self.peek().is_some() {
                        self.bump();
                    }
                }
                Some('\n') if !triple => return Err(unterminated),
                Some(c) if c == quote => {
                    if !triple {
                        self.bump();
                        break;
                    }
                    if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                        self.advance(3);
                        break;
                    }
                    self.bump();
                }
                Some(_) => self.bump(),
            }
        }

        self.emit(TokenKind::String, start_idx, start);
        Ok(())
    }

    fn visit_number(&mut self) {
        let start_idx = self.pos;
        let start = self.position();
        let is_hex = matches!(
            (self.peek(), self.peek_at(1)),
            (Some('0'), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        );

        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E') && !is_hex;
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }

        self.emit(TokenKind::Number, start_idx, start);
    }

    fn visit_operator(&mut self) -> Result<(), LexicalError> {
        let start_idx = self.pos;
        let start = self.position();

        let width = if self.matches_any(THREE_CHAR_OPS, 3) {
            3
        } else if self.matches_any(TWO_CHAR_OPS, 2) {
            2
        } else {
            match self.peek() {
                Some(c) if ONE_CHAR_OPS.contains(c) => 1,
                Some(found) => {
                    return Err(LexicalError::UnexpectedCharacter {
                        line: self.line,
                        found,
                    })
                }
                None => return Ok(()),
            }
        };

        if width == 1 {
            match self.peek() {
                Some('(' | '[' | '{') => self.depth += 1,
                Some(found @ (')' | ']' | '}')) => {
                    if self.depth == 0 {
                        return Err(LexicalError::UnbalancedBracket {
                            line: self.line,
                            found,
                        });
                    }
                    self.depth -= 1;
                }
                _ => {}
            }
        }

        self.advance(width);
        self.emit(TokenKind::Op, start_idx, start);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Token>, LexicalError> {
        if self.depth > 0 {
            return Err(LexicalError::UnclosedBracket { line: self.line });
        }

        let here = self.position();
        if self.pending_statement {
            self.emit_empty(TokenKind::Newline, here);
        }
        for _ in 1..self.indents.len() {
            self.emit_empty(TokenKind::Dedent, here);
        }
        self.emit_empty(TokenKind::EndMarker, here);

        Ok(self.tokens)
    }

    fn emit(&mut self, kind: TokenKind, start_idx: usize, start: Position) {
        let text: String = self.chars[start_idx..self.pos].iter().collect();
        if !matches!(kind, TokenKind::Indent) {
            self.pending_statement = true;
        }
        self.tokens.push(Token {
            kind,
            text,
            start,
            end: self.position(),
        });
    }

    fn emit_empty(&mut self, kind: TokenKind, at: Position) {
        self.tokens.push(Token {
            kind,
            text: String::new(),
            start: at,
            end: at,
        });
    }

    fn matches_any(&self, ops: &[&str], width: usize) -> bool {
        if self.pos + width > self.chars.len() {
            return false;
        }
        let candidate: String = self.chars[self.pos..self.pos + width].iter().collect();
        ops.contains(&candidate.as_str())
    }

    fn collect_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            self.bump();
        }
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Tokenize Python source text.
///
/// # Example
///
/// ```rust
/// use pynoteslib::{tokenize, TokenKind};
///
/// let tokens = tokenize("x = 1  # note\n").unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Name,
///         TokenKind::Op,
///         TokenKind::Number,
///         TokenKind::Comment,
///         TokenKind::Newline,
///         TokenKind::EndMarker,
///     ]
/// );
/// assert_eq!(tokens[3].text, "# note");
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    Scanner::new(source).tokenize()
}

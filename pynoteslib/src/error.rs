//! Error types for pynoteslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the tokenizer when source text is not well-formed at
/// the token level.
///
/// These never reach the caller of [`crate::analyze`] or [`crate::strip`]:
/// the classifier logs them and switches to the line-oriented fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    /// A string literal reached end of line (or end of file) without its closing quote
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    /// A dedent landed on a column that matches no enclosing block
    #[error("line {line}: unindent does not match any outer indentation level")]
    InconsistentDedent { line: usize },

    /// A character that cannot start any token
    #[error("line {line}: unexpected character {found:?}")]
    UnexpectedCharacter { line: usize, found: char },

    /// A closing bracket with no matching opener
    #[error("line {line}: unmatched closing bracket {found:?}")]
    UnbalancedBracket { line: usize, found: char },

    /// End of file reached inside a bracketed expression
    #[error("line {line}: end of file inside a bracketed statement")]
    UnclosedBracket { line: usize },
}

impl LexicalError {
    /// The 1-based line the error was detected on.
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::InconsistentDedent { line }
            | Self::UnexpectedCharacter { line, .. }
            | Self::UnbalancedBracket { line, .. }
            | Self::UnclosedBracket { line } => *line,
        }
    }
}

/// Errors that can occur while analyzing or stripping Python files
#[derive(Error, Debug)]
pub enum PynotesError {
    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Not a Python file
    #[error("not a Python file: {0}")]
    NotPythonFile(PathBuf),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File content is not valid UTF-8 text
    #[error("file '{path}' is not valid UTF-8 text: {source}")]
    Decode {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    /// Tokenization failed
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    /// The syntax tree could not be built
    #[error("syntax error: {0}")]
    Parse(String),

    /// The backup copy could not be written; the file was left untouched
    #[error("failed to back up '{path}' to '{backup}': {source}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the rewritten file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_error_line() {
        let err = LexicalError::UnexpectedCharacter {
            line: 4,
            found: '$',
        };
        assert_eq!(err.line(), 4);
        assert_eq!(err.to_string(), "line 4: unexpected character '$'");
    }

    #[test]
    fn test_lexical_error_converts() {
        let err: PynotesError = LexicalError::UnclosedBracket { line: 2 }.into();
        assert!(matches!(err, PynotesError::Lexical(_)));
        assert_eq!(
            err.to_string(),
            "line 2: end of file inside a bracketed statement"
        );
    }
}

//! # pynoteslib
//!
//! A Python commentary classifier: measures how much of a file is comments
//! and docstrings, or strips them while keeping every line number intact.
//!
//! ## Overview
//!
//! Each line of a Python file is either code or commentary. Commentary is:
//!
//! - **Comments**: `#` to end of line, including inline comments after code
//! - **Standalone strings**: triple-quoted string expressions that are not
//!   assigned, passed, returned or part of a collection
//! - **Docstrings**: the first string statement of a module, class or
//!   function body, confirmed on the syntax tree
//!
//! ## Pipeline
//!
//! 1. The [`scanner`] tokenizes the source.
//! 2. The [`standalone`] detector picks commentary strings from the tokens.
//! 3. The [`docstring`] locator refines the result from a tree-sitter parse.
//! 4. The [`classify`] module merges everything into a [`CommentaryMap`].
//! 5. Reports ([`report`]) or the [`rewrite`]r consume the map.
//!
//! Source the tokenizer rejects goes through the [`fallback`] line
//! heuristic instead; which path ran is recorded as a [`ClassifierPath`].
//!
//! ## Example
//!
//! ```rust
//! use pynoteslib::{analyze, strip, StripOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let file = dir.path().join("app.py");
//! fs::write(&file, "\"\"\"App.\"\"\"\nimport os  # stdlib\n").unwrap();
//!
//! let report = analyze(&file).unwrap();
//! assert_eq!(report.comment_line_count, 2);
//!
//! let summary = strip(&file, &StripOptions::new()).unwrap();
//! assert_eq!(summary.removed, 2);
//! assert_eq!(fs::read_to_string(&file).unwrap(), "\nimport os\n");
//! ```

pub mod classify;
pub mod docstring;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod options;
pub mod processor;
pub mod report;
pub mod rewrite;
pub mod scanner;
pub mod span;
pub mod standalone;
pub mod stats;
pub mod token;

pub use classify::{
    analyze_source, Analysis, ClassifierPath, Commentary, CommentaryKind, CommentaryMap,
};
pub use docstring::locate_docstrings;
pub use error::{LexicalError, PynotesError};
pub use fallback::classify_lines;
pub use filter::{discover_files, FilterConfig};
pub use options::{BackupMode, StripOptions};
pub use processor::{analyze, analyze_directory, read_source, strip, strip_directory};
pub use report::{BatchReport, CommentRecord, FileFailure, FileReport, StripReport};
pub use rewrite::{rewrite, strip_source, Rewrite};
pub use scanner::tokenize;
pub use span::{DocstringSpan, Extent, StandaloneStringSpan, StringSpan};
pub use standalone::find_standalone_strings;
pub use stats::Statistics;
pub use token::{Position, Token, TokenKind};

/// Result type for pynoteslib operations
pub type Result<T> = std::result::Result<T, PynotesError>;

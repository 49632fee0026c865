//! Standalone-string detection over the token stream.
//!
//! A triple-quoted string is *standalone* when it is not part of an
//! expression: not an argument, not a collection element, not the right
//! side of an assignment, not a default value or return value. Such strings
//! are inert statements and count as commentary.
//!
//! The decision only looks at the nearest semantic token on each side of
//! the string. It does not track bracket depth, so an expression like
//! `x = y + """s"""` is misread as standalone. That trade-off is accepted;
//! the syntax-tree docstring pass corrects the common cases.

use std::collections::HashSet;

use crate::span::StandaloneStringSpan;
use crate::token::{Token, TokenKind};

/// Operators after which a string is an argument, element or assigned value.
const BINDING_OPERATORS: &[&str] = &["(", "[", "{", ",", "="];

/// Keywords after which a string is a signature part or a returned value.
const BINDING_KEYWORDS: &[&str] = &["def", "class", "return"];

/// Operators before which a string is the tail of a call or collection.
const TRAILING_OPERATORS: &[&str] = &[")", "]", "}", ","];

fn is_semantic(token: &Token) -> bool {
    !token.kind.is_layout() && token.kind != TokenKind::Comment
}

/// Decide whether the string token at `index` is standalone commentary.
///
/// Layout tokens and comments are skipped in both directions. A string
/// with no semantic token before it (first statement of the file) is
/// standalone.
pub fn is_standalone_string(tokens: &[Token], index: usize) -> bool {
    if index >= tokens.len() {
        return true;
    }

    let Some(prev) = tokens[..index].iter().rev().find(|t| is_semantic(t)) else {
        return true;
    };

    if BINDING_OPERATORS.iter().any(|op| prev.is_op(op))
        || BINDING_KEYWORDS.iter().any(|kw| prev.is_name(kw))
    {
        return false;
    }

    let next = tokens[index + 1..].iter().find(|t| is_semantic(t));
    !next.is_some_and(|next| TRAILING_OPERATORS.iter().any(|op| next.is_op(op)))
}

/// Collect every standalone triple-quoted string in the token stream.
///
/// A string starting on a line already covered by an earlier span is not
/// reprocessed, so two strings sharing a line yield one span. f-strings are
/// never standalone: they evaluate embedded expressions.
pub fn find_standalone_strings(tokens: &[Token]) -> Vec<StandaloneStringSpan> {
    let mut spans = Vec::new();
    let mut processed_lines = HashSet::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::String || processed_lines.contains(&token.start.line) {
            continue;
        }
        if !token.is_triple_quoted() || token.string_prefix().contains('f') {
            continue;
        }

        if is_standalone_string(tokens, index) {
            let span = StandaloneStringSpan::new(
                token.start.line,
                token.end.line,
                token.start.column,
                token.text.clone(),
            );
            processed_lines.extend(span.lines());
            log::debug!(
                "standalone string at lines {}-{}",
                span.start_line,
                span.end_line
            );
            spans.push(span);
        } else {
            log::debug!("string at line {} is part of an expression", token.start.line);
        }
    }

    spans
}

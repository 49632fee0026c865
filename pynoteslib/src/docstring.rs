//! Syntax-tree docstring locator.
//!
//! Parses the source with tree-sitter and records, for the module and for
//! every class and function definition (at any nesting depth), the span of
//! the first body statement when that statement is a bare string
//! expression. These spans are authoritative: they override whatever the
//! token heuristic decided for the same lines.
//!
//! A tree containing error nodes is treated as a failed parse, matching the
//! language's own parser which rejects the whole file on any syntax error.

use tree_sitter::{Node, Parser};

use crate::error::PynotesError;
use crate::span::DocstringSpan;
use crate::Result;

/// Node kinds that own a docstring slot.
const DEFINITION_KINDS: &[&str] = &["function_definition", "class_definition"];

/// Node kinds that count as a string literal expression.
const STRING_KINDS: &[&str] = &["string", "concatenated_string"];

/// Locate every docstring in the given Python source.
///
/// # Errors
///
/// Returns [`PynotesError::Parse`] when the grammar cannot be loaded, the
/// parser produces no tree, or the tree contains syntax errors.
///
/// # Example
///
/// ```rust
/// use pynoteslib::locate_docstrings;
///
/// let source = "def greet():\n    \"\"\"Say hello.\"\"\"\n    print('hi')\n";
/// let spans = locate_docstrings(source).unwrap();
/// assert_eq!(spans.len(), 1);
/// assert_eq!((spans[0].start_line, spans[0].end_line), (2, 2));
/// ```
pub fn locate_docstrings(source: &str) -> Result<Vec<DocstringSpan>> {
    let (source, bom_width) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (rest, 1),
        None => (source, 0),
    };

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| PynotesError::Parse(format!("failed to load Python grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| PynotesError::Parse("parser produced no syntax tree".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        return Err(PynotesError::Parse(format!(
            "invalid syntax near line {line}"
        )));
    }

    let mut spans = Vec::new();
    if let Some(span) = docstring_of_body(root, source) {
        spans.push(span);
    }
    collect_definitions(root, source, &mut spans);
    spans.sort_by_key(|s| s.start_line);
    for span in &mut spans {
        span.shift_first_line(bom_width);
    }

    Ok(spans)
}

fn collect_definitions(node: Node, source: &str, spans: &mut Vec<DocstringSpan>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if DEFINITION_KINDS.contains(&child.kind()) {
            if let Some(span) = child
                .child_by_field_name("body")
                .and_then(|body| docstring_of_body(body, source))
            {
                spans.push(span);
            }
        }
        collect_definitions(child, source, spans);
    }
}

/// The docstring span of a module or block node, if its first statement is
/// a bare string expression.
fn docstring_of_body(body: Node, source: &str) -> Option<DocstringSpan> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let expr = first.named_child(0)?;
    if !STRING_KINDS.contains(&expr.kind()) || is_interpolated(expr, source) {
        return None;
    }

    let raw_text = first.utf8_text(source.as_bytes()).ok()?;
    let start_column = char_column(source, first.start_byte());

    Some(DocstringSpan::new(
        first.start_position().row + 1,
        first.end_position().row + 1,
        start_column,
        raw_text,
    ))
}

/// f-strings and byte strings are not docstrings.
fn is_interpolated(expr: Node, source: &str) -> bool {
    let text = expr.utf8_text(source.as_bytes()).unwrap_or("");
    text.chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .any(|c| matches!(c.to_ascii_lowercase(), 'f' | 'b'))
}

/// Convert a byte offset into a character column on its line.
fn char_column(source: &str, byte_offset: usize) -> usize {
    let before = source.get(..byte_offset).unwrap_or("");
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    before[line_start..].chars().count()
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}

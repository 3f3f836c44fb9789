//! Source spans and node text helpers.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// A contiguous region of source text. Rows and columns are 0-based,
/// matching tree-sitter's `Point` directly; byte offsets index into the
/// original source string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub start_byte: u32,
    pub end_byte: u32,
}

impl SourceSpan {
    pub fn of_node(node: &Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_line: start.row as u32,
            start_col: start.column as u32,
            end_line: end.row as u32,
            end_col: end.column as u32,
            start_byte: node.start_byte() as u32,
            end_byte: node.end_byte() as u32,
        }
    }

    /// An empty span at the origin, for records with no syntactic home.
    pub fn zero() -> Self {
        Self {
            start_line: 0,
            start_col: 0,
            end_line: 0,
            end_col: 0,
            start_byte: 0,
            end_byte: 0,
        }
    }

    /// Whether `other` is fully contained within `self` (byte-wise).
    pub fn contains(&self, other: &SourceSpan) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }

    /// Whether a 0-based (row, column) position falls inside this span.
    pub fn contains_position(&self, row: u32, col: u32) -> bool {
        let after_start =
            row > self.start_line || (row == self.start_line && col >= self.start_col);
        let before_end = row < self.end_line || (row == self.end_line && col <= self.end_col);
        after_start && before_end
    }

    pub fn len_bytes(&self) -> u32 {
        self.end_byte.saturating_sub(self.start_byte)
    }
}

/// Source text covered by a node. Falls back to the empty string on a
/// (pathological) non-UTF-8 slice rather than propagating the error.
pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Collect the named children of a node. Tree-sitter iteration needs a
/// cursor; collecting keeps call sites free of cursor bookkeeping.
pub fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Collect all children of a node, anonymous tokens included. Heritage
/// clauses and modifier keywords are anonymous in several grammars.
pub fn all_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start_byte: u32, end_byte: u32) -> SourceSpan {
        SourceSpan {
            start_line: 0,
            start_col: start_byte,
            end_line: 0,
            end_col: end_byte,
            start_byte,
            end_byte,
        }
    }

    #[test]
    fn containment_is_byte_based() {
        let outer = span(0, 100);
        let inner = span(10, 20);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.contains(&outer));
    }

    #[test]
    fn position_containment_respects_row_and_column() {
        let s = SourceSpan {
            start_line: 2,
            start_col: 4,
            end_line: 5,
            end_col: 1,
            start_byte: 0,
            end_byte: 0,
        };
        assert!(s.contains_position(2, 4));
        assert!(s.contains_position(3, 0));
        assert!(s.contains_position(5, 1));
        assert!(!s.contains_position(2, 3));
        assert!(!s.contains_position(5, 2));
    }
}

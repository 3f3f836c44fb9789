//! Per-language visibility-before-use predicates.
//!
//! Step four of the resolution chain. JavaScript/TypeScript function
//! declarations are hoisted, so only the scope relation matters; Rust
//! module items are mutually visible regardless of order; Python
//! additionally requires the declaration to appear textually at or
//! before the reference.

use crate::config::{get_config, VisibilityOrder};
use crate::scope::{ScopeId, ScopeTree};
use crate::types::Definition;
use parser_core::{SourceSpan, SupportedLanguage};

/// Whether `definition` is visible from a reference at `site` inside
/// `reference_scope`. Pluggable per language via the config table.
pub fn is_visible_from(
    language: SupportedLanguage,
    tree: &ScopeTree,
    definition: &Definition,
    reference_scope: ScopeId,
    site: &SourceSpan,
) -> bool {
    let declaring = declaring_scope(tree, definition);
    let scope_ok = match get_config(language).visibility_order {
        VisibilityOrder::Unordered => tree.is_ancestor_of(declaring, reference_scope),
        VisibilityOrder::DeclarationBeforeUse => {
            // Ancestor, equal, or reverse ancestor: the last supports
            // same-scope siblings where the reference sits in a nested
            // scope created between the two declarations.
            tree.is_ancestor_of(declaring, reference_scope)
                || tree.is_ancestor_of(reference_scope, declaring)
        }
    };
    if !scope_ok {
        return false;
    }
    match get_config(language).visibility_order {
        VisibilityOrder::Unordered => true,
        VisibilityOrder::DeclarationBeforeUse => {
            definition.name_span.start_line <= site.start_line
        }
    }
}

/// The scope a definition's name is declared in: the scope at the name
/// position, stepping out of the entity's own scope if the name sits
/// inside it (a function's name belongs to the parent).
fn declaring_scope(tree: &ScopeTree, definition: &Definition) -> ScopeId {
    let at_name = tree.find_scope_at_position(
        definition.name_span.start_line,
        definition.name_span.start_col,
    );
    let node = tree.node(at_name);
    if node.span.start_byte == definition.span.start_byte
        && node.span.end_byte == definition.span.end_byte
    {
        node.parent.unwrap_or(at_name)
    } else {
        at_name
    }
}

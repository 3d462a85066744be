//! Inline-quoting helpers: quote-safety analysis and space handling.

use crate::tree::{Kind, NodeId, Tree};

/// Characters with markup significance inside inline quotes. Content
/// containing any of them cannot be wrapped directly.
const SENSITIVE: [char; 6] = ['*', '^', '#', '`', '_', '+'];

/// Wrap `s` in `pre`/`suf` unless it is empty.
pub fn decorate_if_not_blank(s: &str, pre: &str, suf: &str) -> String {
    if s.is_empty() {
        String::new()
    } else {
        format!("{pre}{s}{suf}")
    }
}

/// Split off the leading and trailing space runs of `input`. Spaces must move
/// outside quote markers or the target format misparses adjacency.
pub fn space_trimmings(input: &str) -> (&str, &str) {
    let trimmed = input.trim_start_matches(' ');
    let leading = &input[..input.len() - trimmed.len()];
    let trimmed = input.trim_end_matches(' ');
    let trailing = &input[trimmed.len()..];
    (leading, trailing)
}

/// True when every given node's content is free of markup-sensitive
/// characters and contains no nested includes.
pub fn quote_safe(tree: &Tree, ids: &[NodeId]) -> bool {
    for &id in ids {
        let flat = tree.flatten(&tree.children(id).to_vec());
        if tree.contains_kind(&flat, &[Kind::Include]) {
            return false;
        }
        let texts = tree.filter(&flat, &[Kind::Text]);
        if tree.xml_of(&texts).contains(SENSITIVE) {
            return false;
        }
    }
    true
}

//! DocBook source documents.
//!
//! A [`Document`] is the loaded, already-resolved form of a DocBook book:
//! the node tree with entity definitions and includes spliced in, the
//! publican build configuration, and the map of out-of-line resources
//! (images, verbatim includes) referenced by the tree.

pub mod parser;
mod reader;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::tree::Tree;

pub use parser::{parse, parse_fragment};

/// A loaded DocBook document ready for translation.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Parsed `publican.cfg` key/value pairs, when loaded through one.
    pub publican_cfg: Option<HashMap<String, String>>,
    /// Output-relative resource path → source path on disk.
    pub resources: std::collections::BTreeMap<String, PathBuf>,
    /// The resolved node tree.
    pub data: Tree,
}

impl Document {
    /// The document's active condition list (empty when none is configured).
    pub fn condition(&self) -> &str {
        self.publican_cfg
            .as_ref()
            .and_then(|cfg| cfg.get("condition"))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Publican brand content directory, when a brand is configured.
    pub fn brand_dir(&self) -> Option<PathBuf> {
        let cfg = self.publican_cfg.as_ref()?;
        let brand = cfg.get("brand")?;
        let lang = cfg.get("xml_lang").map(String::as_str).unwrap_or("");
        Some(PathBuf::from(format!(
            "/usr/share/publican/Common_Content/{brand}/{lang}/"
        )))
    }
}

/// Inclusion/exclusion matching of two semicolon-separated condition lists.
///
/// An empty node condition always matches; otherwise any token of the
/// document list equal to any token of the node list (whitespace-trimmed) is
/// a match.
pub fn conditions_match(doc_conditions: &str, node_condition: &str) -> bool {
    if node_condition.is_empty() {
        return true;
    }
    doc_conditions
        .split(';')
        .map(str::trim)
        .any(|d| node_condition.split(';').map(str::trim).any(|c| c == d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_node_condition_always_matches() {
        assert!(conditions_match("", ""));
        assert!(conditions_match("a;b", ""));
    }

    #[test]
    fn any_token_pair_matches() {
        assert!(conditions_match("a;b", "b;c"));
        assert!(conditions_match(" a ; b ", "b"));
        assert!(!conditions_match("a;b", "c;d"));
    }

    #[test]
    fn conditioned_node_without_doc_conditions_is_excluded() {
        assert!(!conditions_match("", "beta"));
    }
}

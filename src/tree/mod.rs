//! The generic labeled tree the converter operates over.
//!
//! Nodes live in an arena owned by [`Tree`]; a [`NodeId`] is an index into it.
//! Every non-root node's parent link names the node whose children vector
//! contains it, and [`Tree::add_child`] / [`Tree::detach`] are the only
//! structural mutations, so the invariant holds at every query point.
//! Cloning the tree is the deep copy: ids are arena indices, so a clone's
//! parent links refer to the clone and never into the source.

mod kind;

pub use kind::Kind;

use std::collections::BTreeMap;

/// Identity of a node within its [`Tree`]. Ordered by allocation, which
/// follows document order for parsed trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Clone)]
struct NodeData {
    kind: Kind,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An ordered forest of attribute-bearing, parent-linked nodes.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached node of the given kind.
    pub fn new_node(&mut self, kind: Kind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached TEXT node holding `text` in its content slot.
    pub fn new_text(&mut self, text: &str) -> NodeId {
        let id = self.new_node(Kind::Text);
        self.set_attr(id, "TEXT", text);
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Append a detached node to the root sequence.
    pub fn add_root(&mut self, id: NodeId) {
        debug_assert!(self.nodes[id.0 as usize].parent.is_none());
        self.roots.push(id);
    }

    pub fn kind(&self, id: NodeId) -> &Kind {
        &self.nodes[id.0 as usize].kind
    }

    pub fn set_kind(&mut self, id: NodeId, kind: Kind) {
        self.nodes[id.0 as usize].kind = kind;
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.nodes[id.0 as usize].attrs.get(key).map(String::as_str)
    }

    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        self.nodes[id.0 as usize]
            .attrs
            .insert(key.to_string(), value.to_string());
    }

    /// Literal content of a TEXT node; empty for anything else.
    pub fn text(&self, id: NodeId) -> &str {
        self.attr(id, "TEXT").unwrap_or("")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0 as usize].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0 as usize].children
    }

    /// Append `child` under `parent`, fixing up the parent link.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0 as usize].children.push(child);
        self.nodes[child.0 as usize].parent = Some(parent);
    }

    pub fn add_children(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.add_child(parent, child);
        }
    }

    /// Unlink a node from its parent's children sequence (or from the root
    /// sequence), leaving it detached.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0 as usize].parent {
            self.nodes[parent.0 as usize].children.retain(|&c| c != id);
            self.nodes[id.0 as usize].parent = None;
        } else {
            self.roots.retain(|&r| r != id);
        }
    }

    /// Ordered ancestor sequence, immediate parent first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(a) = cur {
            out.push(a);
            cur = self.parent(a);
        }
        out
    }

    pub fn is_kind(&self, id: NodeId, kinds: &[Kind]) -> bool {
        kinds.contains(self.kind(id))
    }

    /// True if any strict ancestor has one of the given kinds.
    pub fn is_within(&self, id: NodeId, kinds: &[Kind]) -> bool {
        let mut cur = self.parent(id);
        while let Some(a) = cur {
            if kinds.contains(self.kind(a)) {
                return true;
            }
            cur = self.parent(a);
        }
        false
    }

    /// Set-based variant of [`Tree::is_within`] for style category lookups.
    pub fn is_within_set(&self, id: NodeId, kinds: &std::collections::HashSet<Kind>) -> bool {
        let mut cur = self.parent(id);
        while let Some(a) = cur {
            if kinds.contains(self.kind(a)) {
                return true;
            }
            cur = self.parent(a);
        }
        false
    }

    /// Pre-order sequence of the given nodes and all their descendants.
    pub fn flatten(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &id in ids {
            self.flatten_into(id, &mut out);
        }
        out
    }

    fn flatten_into(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in self.children(id) {
            self.flatten_into(child, out);
        }
    }

    /// Keep nodes whose kind is in the given set; order preserved.
    pub fn filter(&self, ids: &[NodeId], kinds: &[Kind]) -> Vec<NodeId> {
        ids.iter()
            .copied()
            .filter(|&id| self.is_kind(id, kinds))
            .collect()
    }

    /// Drop nodes whose kind is in the given set; order preserved.
    pub fn filter_out(&self, ids: &[NodeId], kinds: &[Kind]) -> Vec<NodeId> {
        ids.iter()
            .copied()
            .filter(|&id| !self.is_kind(id, kinds))
            .collect()
    }

    pub fn first(&self, ids: &[NodeId], kinds: &[Kind]) -> Option<NodeId> {
        ids.iter().copied().find(|&id| self.is_kind(id, kinds))
    }

    pub fn last(&self, ids: &[NodeId], kinds: &[Kind]) -> Option<NodeId> {
        ids.iter().rev().copied().find(|&id| self.is_kind(id, kinds))
    }

    pub fn contains_kind(&self, ids: &[NodeId], kinds: &[Kind]) -> bool {
        ids.iter().any(|&id| self.is_kind(id, kinds))
    }

    /// Serialize a node back to markup text. TEXT nodes yield their literal
    /// content; attributes are emitted in sorted key order so output is
    /// deterministic.
    pub fn xml(&self, id: NodeId) -> String {
        if *self.kind(id) == Kind::Text {
            return self.text(id).to_string();
        }
        let data = &self.nodes[id.0 as usize];
        let mut out = String::new();
        out.push('<');
        out.push_str(data.kind.name());
        for (k, v) in &data.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(v);
            out.push('"');
        }
        out.push('>');
        for &child in &data.children {
            out.push_str(&self.xml(child));
        }
        out.push_str("</");
        out.push_str(data.kind.name());
        out.push('>');
        out
    }

    pub fn xml_of(&self, ids: &[NodeId]) -> String {
        let mut out = String::new();
        for &id in ids {
            out.push_str(&self.xml(id));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let book = tree.new_node(Kind::parse("book"));
        let chapter = tree.new_node(Kind::Chapter);
        let text = tree.new_text("hello");
        tree.add_root(book);
        tree.add_child(book, chapter);
        tree.add_child(chapter, text);
        (tree, book, chapter, text)
    }

    #[test]
    fn add_child_maintains_parent_links() {
        let (tree, book, chapter, text) = sample();
        assert_eq!(tree.parent(chapter), Some(book));
        assert_eq!(tree.parent(text), Some(chapter));
        assert!(tree.children(book).contains(&chapter));
    }

    #[test]
    fn detach_unlinks_both_directions() {
        let (mut tree, book, chapter, _) = sample();
        tree.detach(chapter);
        assert_eq!(tree.parent(chapter), None);
        assert!(tree.children(book).is_empty());
    }

    #[test]
    fn ancestors_ordered_parent_first() {
        let (tree, book, chapter, text) = sample();
        assert_eq!(tree.ancestors(text), vec![chapter, book]);
    }

    #[test]
    fn is_within_checks_strict_ancestors() {
        let (tree, _, chapter, text) = sample();
        assert!(tree.is_within(text, &[Kind::Chapter]));
        assert!(!tree.is_within(chapter, &[Kind::Chapter]));
    }

    #[test]
    fn flatten_is_preorder() {
        let (tree, book, chapter, text) = sample();
        assert_eq!(tree.flatten(&[book]), vec![book, chapter, text]);
    }

    #[test]
    fn filter_preserves_order() {
        let mut tree = Tree::new();
        let root = tree.new_node(Kind::Section);
        let t1 = tree.new_text("a");
        let title = tree.new_node(Kind::Title);
        let t2 = tree.new_text("b");
        tree.add_root(root);
        tree.add_children(root, &[t1, title, t2]);
        assert_eq!(tree.filter(tree.children(root), &[Kind::Text]), vec![t1, t2]);
        assert_eq!(
            tree.filter_out(tree.children(root), &[Kind::Text]),
            vec![title]
        );
        assert_eq!(tree.first(tree.children(root), &[Kind::Text]), Some(t1));
        assert_eq!(tree.last(tree.children(root), &[Kind::Text]), Some(t2));
        assert_eq!(tree.first(tree.children(root), &[Kind::Para]), None);
    }

    #[test]
    fn clone_is_independent_deep_copy() {
        let (tree, _, chapter, text) = sample();
        let mut copy = tree.clone();
        copy.set_attr(text, "TEXT", "changed");
        copy.detach(chapter);
        assert_eq!(tree.text(text), "hello");
        assert!(tree.parent(chapter).is_some());
        assert_eq!(copy.parent(chapter), None);
    }

    #[test]
    fn set_kind_relabels_in_place() {
        let mut tree = Tree::new();
        let n = tree.new_node(Kind::Directive);
        tree.set_kind(n, Kind::Entity);
        assert_eq!(*tree.kind(n), Kind::Entity);
    }

    #[test]
    fn xml_serializes_attrs_sorted() {
        let mut tree = Tree::new();
        let n = tree.new_node(Kind::Ulink);
        tree.set_attr(n, "url", "http://x");
        tree.set_attr(n, "condition", "beta");
        let t = tree.new_text("label");
        tree.add_child(n, t);
        assert_eq!(
            tree.xml(n),
            "<ulink condition=\"beta\" url=\"http://x\">label</ulink>"
        );
    }
}

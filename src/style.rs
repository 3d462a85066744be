//! Style configuration: which node kinds belong to which semantic category.
//!
//! The translator consults this to decide inline quoting and structural
//! treatment. Defaults cover stock DocBook; callers override whole categories
//! at a time (last writer wins).

use std::collections::{HashMap, HashSet};

use crate::tree::Kind;

/// Semantic category a node kind can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Custom,
    Monospace,
    Superscript,
    Italic,
    Bold,
    Highlight,
    Admonitions,
    ListItems,
    Paragraphs,
    Literal,
}

/// Mapping from category to the set of node kinds in it. Immutable for the
/// duration of one conversion run.
#[derive(Debug, Clone)]
pub struct StyleConfig {
    categories: HashMap<Category, HashSet<Kind>>,
}

fn kind_set(list: &str) -> HashSet<Kind> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Kind::parse)
        .collect()
}

impl Default for StyleConfig {
    fn default() -> Self {
        let mut cfg = StyleConfig {
            categories: HashMap::new(),
        };
        cfg.override_category(Category::Admonitions, kind_set("note,warning,important"));
        cfg.override_category(
            Category::ListItems,
            kind_set("listitem,step,biblioentry,member,contrib"),
        );
        cfg.override_category(Category::Paragraphs, kind_set("para,simpara,subtitle"));
        cfg.override_category(
            Category::Literal,
            kind_set("screen,synopsis,programlisting,indexterm,mediaobject"),
        );
        cfg.override_category(
            Category::Custom,
            kind_set("package,application,citetitle,command,option"),
        );
        cfg.override_category(
            Category::Monospace,
            kind_set(
                "literal,wordasword,filename,guilabel,systemitem,prompt,computeroutput,\
                 userinput,revnumber,parameter,guimenuitem,errortype,varname,function,\
                 methodname,classname,property,type,command,option,sgmltag,code,envar,guiicon",
            ),
        );
        cfg.override_category(Category::Superscript, kind_set("superscript"));
        cfg.override_category(
            Category::Italic,
            kind_set("firstterm,replaceable,citebiblioid,citetitle,citation,mathphrase,lineannotation"),
        );
        cfg.override_category(
            Category::Bold,
            kind_set(
                "emphasis,orgname,trademark,acronym,abbrev,uri,refentrytitle,application,\
                 package,productname",
            ),
        );
        cfg.override_category(Category::Highlight, HashSet::new());
        cfg
    }
}

impl StyleConfig {
    /// Replace a whole category's kind set.
    pub fn override_category(&mut self, category: Category, kinds: HashSet<Kind>) {
        self.categories.insert(category, kinds);
    }

    /// Replace a category from a comma-separated kind list.
    pub fn override_from_str(&mut self, category: Category, list: &str) {
        self.override_category(category, kind_set(list));
    }

    pub fn kinds(&self, category: Category) -> &HashSet<Kind> {
        static EMPTY: std::sync::OnceLock<HashSet<Kind>> = std::sync::OnceLock::new();
        self.categories
            .get(&category)
            .unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }

    pub fn contains(&self, category: Category, kind: &Kind) -> bool {
        self.kinds(category).contains(kind)
    }

    /// Union of every kind set that has a dedicated inline-quoting rule.
    pub fn all_quoted(&self) -> HashSet<Kind> {
        let mut out = HashSet::new();
        for cat in [
            Category::Monospace,
            Category::Superscript,
            Category::Italic,
            Category::Bold,
            Category::Highlight,
        ] {
            out.extend(self.kinds(cat).iter().cloned());
        }
        out
    }

    /// Custom semantic tags with no dedicated quoting character; these fall
    /// back to the generic highlight rule.
    pub fn unquoted_custom(&self) -> HashSet<Kind> {
        let quoted = self.all_quoted();
        self.kinds(Category::Custom)
            .iter()
            .filter(|k| !quoted.contains(k))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_populate_all_categories() {
        let cfg = StyleConfig::default();
        assert!(cfg.contains(Category::Paragraphs, &Kind::Para));
        assert!(cfg.contains(Category::Bold, &Kind::Emphasis));
        assert!(cfg.contains(Category::Monospace, &Kind::Command));
        assert!(cfg.kinds(Category::Highlight).is_empty());
    }

    #[test]
    fn override_replaces_whole_category() {
        let mut cfg = StyleConfig::default();
        cfg.override_from_str(Category::Bold, "emphasis");
        assert!(cfg.contains(Category::Bold, &Kind::Emphasis));
        assert!(!cfg.contains(Category::Bold, &Kind::OrgName));
    }

    #[test]
    fn all_quoted_is_union_of_inline_sets() {
        let cfg = StyleConfig::default();
        let quoted = cfg.all_quoted();
        assert!(quoted.contains(&Kind::Emphasis));
        assert!(quoted.contains(&Kind::Superscript));
        assert!(quoted.contains(&Kind::Filename));
        assert!(!quoted.contains(&Kind::Para));
    }

    #[test]
    fn unquoted_custom_subtracts_quoted_kinds() {
        let cfg = StyleConfig::default();
        // Every default custom kind already has a quoting rule via the
        // monospace/italic/bold sets.
        assert!(cfg.unquoted_custom().is_empty());

        let mut cfg = StyleConfig::default();
        cfg.override_from_str(Category::Custom, "package,mytag");
        let unquoted = cfg.unquoted_custom();
        assert!(unquoted.contains(&Kind::parse("mytag")));
        assert!(!unquoted.contains(&Kind::Package));
    }
}

//! The DocBook → AsciiDoc translation engine.
//!
//! A single depth-first pass over a working copy of the document tree, with
//! one production rule per recognized node kind. All mutable effects are
//! confined to the per-run accumulators (entity table, keyword set, metadata,
//! resources, completeness registry), so independent conversions never
//! cross-contaminate.

mod lists;
mod quote;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::asciidoc::{AdocDocument, MASTER, normalize};
use crate::asciidoc::normalize::BLANK_MARKER;
use crate::docbook::{Document, conditions_match};
use crate::error::{Error, Result};
use crate::style::{Category, StyleConfig};
use crate::tree::{Kind, NodeId, Tree};
use crate::util::{clean_path, strip_ext};

use lists::continuation_scan;
use quote::{decorate_if_not_blank, quote_safe, space_trimmings};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// What a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A markup kind with no production rule was encountered; its children
    /// were still translated best-effort.
    UnknownMarkup,
    /// A text node survived the whole walk without being emitted or
    /// deliberately discarded.
    LeftoverText,
}

/// A non-fatal finding from the translation pass.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Serialized form of the offending node.
    pub detail: String,
    /// Serialized or named context (the node's parent).
    pub context: String,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::UnknownMarkup => Severity::Warning,
            DiagnosticKind::LeftoverText => Severity::Error,
        }
    }
}

/// Result of one conversion run.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub output: AdocDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Translate a loaded document into an AsciiDoc output document.
pub fn convert(doc: &Document, style: &StyleConfig) -> Result<Conversion> {
    let mut tr = Translator {
        tree: doc.data.clone(),
        style,
        conditions: doc.condition().to_string(),
        resources: &doc.resources,
        out: AdocDocument::new(),
        registry: HashSet::new(),
        diagnostics: Vec::new(),
    };

    let roots = tr.tree.roots().to_vec();
    for id in tr.tree.flatten(&roots) {
        if *tr.tree.kind(id) == Kind::Text {
            tr.registry.insert(id);
        }
    }

    tr.bypass_broken_inclusions(&roots);

    let master = tr.translate(&roots)?;
    tr.out.data.insert(MASTER.to_string(), master);

    let entities = tr.out.entities.clone();
    for content in tr.out.data.values_mut() {
        *content = normalize(content, &entities);
    }

    let mut leftovers: Vec<NodeId> = tr.registry.iter().copied().collect();
    leftovers.sort();
    for id in leftovers {
        let detail = tr.tree.xml(id).trim().to_string();
        if detail.is_empty() {
            continue;
        }
        let context = tr
            .tree
            .parent(id)
            .map(|p| tr.tree.xml(p))
            .unwrap_or_default();
        tracing::error!("unprocessed content: {detail}");
        tr.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::LeftoverText,
            detail,
            context,
        });
    }

    Ok(Conversion {
        output: tr.out,
        diagnostics: tr.diagnostics,
    })
}

struct Translator<'a> {
    tree: Tree,
    style: &'a StyleConfig,
    conditions: String,
    resources: &'a std::collections::BTreeMap<String, PathBuf>,
    out: AdocDocument,
    registry: HashSet<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Translator<'_> {
    /// An included fragment's own title (or index entry) must attach to the
    /// surrounding container, not stay nested inside the include node.
    fn bypass_broken_inclusions(&mut self, ids: &[NodeId]) {
        for &c in ids {
            if self.tree.is_kind(c, &[Kind::Title, Kind::IndexTerm])
                && let Some(parent) = self.tree.parent(c)
                && *self.tree.kind(parent) == Kind::Include
                && let Some(grandparent) = self.tree.parent(parent)
            {
                self.tree.detach(c);
                self.tree.add_child(grandparent, c);
            }
            let children = self.tree.children(c).to_vec();
            self.bypass_broken_inclusions(&children);
        }
    }

    /// Drop a node and its whole subtree from the completeness registry.
    fn discard(&mut self, id: NodeId) {
        for d in self.tree.flatten(&[id]) {
            self.registry.remove(&d);
        }
    }

    fn warn_unknown(&mut self, child: NodeId, parent: NodeId) {
        let detail = self.tree.xml(child);
        tracing::warn!("unknown markup: {}", detail.trim());
        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::UnknownMarkup,
            detail,
            context: self.tree.kind(parent).name().to_string(),
        });
    }

    /// Anchor line plus decorated title of a container node.
    fn decorate_title(&mut self, c: NodeId, prefix: &str) -> Result<String> {
        let mut output = String::from("\n\n");
        if let Some(id) = self.tree.attr(c, "id") {
            output.push_str(&format!("[[{id}]]\n"));
        }
        let title = self.tree.filter(self.tree.children(c), &[Kind::Title]);
        let rendered = self.translate(&title)?;
        output.push_str(&decorate_if_not_blank(&rendered, prefix, ""));
        Ok(output)
    }

    /// Render an inline-emphasis node with one of the three escaping
    /// strategies, depending on literal-block context and quote-safety.
    fn quote_node(&mut self, c: NodeId, quoter: char) -> Result<String> {
        let children = self.tree.children(c).to_vec();
        let contents = self.translate(&children)?;
        let (ls, rs) = space_trimmings(&contents);
        let (ls, rs) = (ls.to_string(), rs.to_string());
        let con = contents.trim().to_string();
        if con.is_empty() {
            return Ok(String::new());
        }

        let block_kinds = [Kind::Screen, Kind::Synopsis, Kind::ProgramListing];
        let literal = self.tree.is_within_set(c, self.style.kinds(Category::Literal));
        let block = self.tree.is_within(c, &block_kinds);
        let safe = block && {
            let ancestors = self.tree.ancestors(c);
            let enclosing = self.tree.filter(&ancestors, &block_kinds);
            quote_safe(&self.tree, &enclosing)
        };
        let kind = self.tree.kind(c).clone();
        let is_custom = self.style.contains(Category::Custom, &kind);
        let esc = block
            && !is_custom
            && !self.tree.is_within_set(c, &self.style.all_quoted())
            && !self.tree.is_within_set(c, &self.style.unquoted_custom())
            && !con.contains(']');

        if !literal || safe {
            let tag = if is_custom {
                format!("[{}]", kind.name())
            } else {
                String::new()
            };
            Ok(format!(
                "{ls}{BLANK_MARKER}{tag}{quoter}{con}{quoter}{BLANK_MARKER}{rs}"
            ))
        } else if esc {
            let mut pass = String::from("quotes");
            if self.out.entities.keys().any(|e| con.contains(e.as_str())) {
                pass.push_str(",attributes");
            }
            Ok(format!("{ls}pass:{pass}[{quoter}{con}{quoter}]{rs}"))
        } else {
            Ok(format!("{ls}{con}{rs}"))
        }
    }

    /// Translate an ordered sibling sequence into AsciiDoc text.
    fn translate(&mut self, ids: &[NodeId]) -> Result<String> {
        let mut output = String::new();
        for &c in ids {
            let condition = self.tree.attr(c, "condition").unwrap_or("").to_string();
            if !conditions_match(&self.conditions, &condition) {
                self.discard(c);
                continue;
            }
            output.push_str(&self.translate_node(c)?);
        }
        Ok(output)
    }

    fn translate_node(&mut self, c: NodeId) -> Result<String> {
        let kind = self.tree.kind(c).clone();
        let children = self.tree.children(c).to_vec();
        let mut output = String::new();

        match &kind {
            Kind::Entity => {
                let mut contents = self.translate(&children)?;
                for (name, value) in &self.out.entities {
                    contents = contents.replace(&format!("&{name};"), value);
                }
                let key = self.tree.attr(c, "KEY").unwrap_or("").to_string();
                let token = format!("&{key};");
                for value in self.out.entities.values_mut() {
                    *value = value.replace(&token, &contents);
                }
                self.out.entities.insert(key, contents);
            }

            Kind::Text => {
                self.registry.remove(&c);
                output.push_str(self.tree.text(c));
            }

            Kind::VariableList
            | Kind::ItemizedList
            | Kind::BiblioList
            | Kind::Figure
            | Kind::Table => {
                let title = self.decorate_title(c, ".")?;
                output.push_str(&decorate_if_not_blank(&title, "", "\n"));
                let rest = self.tree.filter_out(&children, &[Kind::Text, Kind::Title]);
                output.push_str(&self.translate(&rest)?);
            }

            Kind::Ulink => {
                let url = self.tree.attr(c, "url").unwrap_or("").to_string();
                let custom = self.style.kinds(Category::Custom);
                let first_custom = children
                    .iter()
                    .copied()
                    .find(|&id| custom.contains(self.tree.kind(id)));
                if let Some(cc) = first_custom {
                    let flat = self.tree.flatten(&children);
                    let texts = self.tree.filter(&flat, &[Kind::Text]);
                    let text = self.translate(&texts)?;
                    // Link rendering and custom-tag quoting are mutually
                    // exclusive syntaxes; pre-render the link and re-enter.
                    let fake = self.tree.new_node(self.tree.kind(cc).clone());
                    let ftext = self.tree.new_text(&format!("link:++{url}++[{text}]"));
                    self.tree.add_child(fake, ftext);
                    output.push_str(&self.translate(&[fake])?);
                } else {
                    let text = self.translate(&children)?;
                    output.push_str(&format!("link:++{url}++[{text}]"));
                }
            }

            Kind::Xref | Kind::Link => {
                let target = self.tree.attr(c, "linkend").unwrap_or("").to_string();
                let text = self.translate(&children)?;
                output.push_str(&format!(
                    "<<{target}{}>>",
                    decorate_if_not_blank(&text, ",", "")
                ));
            }

            Kind::Screen | Kind::Synopsis | Kind::ProgramListing => {
                if let Some(parent) = self.tree.parent(c)
                    && self
                        .style
                        .kinds(Category::Paragraphs)
                        .contains(self.tree.kind(parent))
                {
                    output.push('\n');
                }
                let mut subs: Vec<&str> = Vec::new();
                let mut escape_angles = false;
                if quote_safe(&self.tree, &[c]) {
                    subs.push("quotes");
                    escape_angles = true;
                }
                let mut contents = self.translate(&children)?;
                let flat = self.tree.flatten(&children);
                if contents.contains("pass:") || self.tree.contains_kind(&flat, &[Kind::Ulink]) {
                    subs.push("macros");
                    escape_angles = true;
                }
                if escape_angles {
                    contents = contents.replace('<', "&lt;").replace('>', "&gt;");
                }
                if self
                    .out
                    .entities
                    .keys()
                    .any(|e| contents.contains(&format!("&{e};")))
                {
                    subs.push("attributes");
                }
                if !subs.is_empty() {
                    output.push_str(&format!("\n[subs=\"{}\"]", subs.join(", ")));
                }
                output.push_str(&format!("\n----\n{contents}\n----\n"));
            }

            k if self.style.contains(Category::Paragraphs, k) => {
                let mut body = String::new();
                for &child in &children {
                    if self
                        .style
                        .kinds(Category::Literal)
                        .contains(self.tree.kind(child))
                    {
                        body.push_str(&self.translate(&[child])?);
                    } else {
                        let mut text = self.translate(&[child])?;
                        while text.contains("  ") {
                            text = text.replace("  ", " ");
                        }
                        text = text.replace('\t', "");
                        text = text.replace("\n ", "\n");
                        body.push_str(&text);
                    }
                }
                output.push_str(&format!("\n{}\n", body.trim()));
            }

            Kind::Abstract => {
                output.push_str(&self.decorate_title(c, ".")?);
                let rest = self.tree.filter_out(&children, &[Kind::Text, Kind::Title]);
                output.push_str(&format!(
                    "\n[abstract]\n--\n{}\n--\n",
                    self.translate(&rest)?
                ));
            }

            Kind::ImageData => {
                if let Some(href) = self.tree.attr(c, "fileref").map(str::to_string) {
                    let dir = self.tree.attr(c, "DIR").unwrap_or(".").to_string();
                    let key = clean_path(&format!("{dir}/{href}"));
                    match self.resources.get(&key) {
                        Some(src) => {
                            self.out.resources.insert(key, src.clone());
                        }
                        None => tracing::warn!("image resource not found: {key}"),
                    }
                    output.push_str(&href);
                }
            }

            Kind::MediaObject => {
                let image = self.tree.filter(&children, &[Kind::ImageObject]);
                let text = self.tree.filter(&children, &[Kind::TextObject]);
                output.push_str(&format!(
                    "\nimage::{}[{}]\n",
                    self.translate(&image)?,
                    self.translate(&text)?
                ));
            }

            Kind::InlineMediaObject => {
                let image = self.tree.filter(&children, &[Kind::ImageObject]);
                let text = self.tree.filter(&children, &[Kind::TextObject]);
                output.push_str(&format!(
                    "\nimage:{}[{}]",
                    self.translate(&image)?,
                    self.translate(&text)?
                ));
            }

            Kind::TGroup => {
                let head = self.translate(&self.tree.filter(&children, &[Kind::THead]))?;
                if !head.is_empty() {
                    output.push_str("\n[options=\"header\"]");
                }
                let foot = self.translate(&self.tree.filter(&children, &[Kind::TFoot]))?;
                let body_ids =
                    self.tree
                        .filter_out(&children, &[Kind::Text, Kind::THead, Kind::TFoot]);
                let body = self.translate(&body_ids)?;
                output.push_str(&format!("\n|==={head}{body}{foot}\n|===\n"));
            }

            Kind::Row => {
                let rest = self.tree.filter_out(&children, &[Kind::Text]);
                output.push_str(&format!("\n{}", self.translate(&rest)?));
            }

            Kind::Entry => {
                let ancestors = self.tree.ancestors(c);
                let tgroup = self
                    .tree
                    .last(&ancestors, &[Kind::TGroup])
                    .ok_or_else(|| Error::Structure("table cell outside tgroup".to_string()))?;
                let row = self.tree.parent(c).ok_or_else(|| {
                    Error::Structure("table cell outside any row".to_string())
                })?;
                let row_entries = self.tree.filter(self.tree.children(row), &[Kind::Entry]);
                if row_entries.first() == Some(&c) {
                    let flat = self.tree.flatten(&self.tree.children(tgroup).to_vec());
                    let rows = self.tree.filter(&flat, &[Kind::Row]);
                    let max = rows
                        .iter()
                        .map(|&r| self.tree.filter(self.tree.children(r), &[Kind::Entry]).len())
                        .max()
                        .unwrap_or(0);
                    if row_entries.len() < max {
                        output.push_str(&format!("{}+", max - row_entries.len() + 1));
                    }
                }
                let text = self.translate(&children)?;
                output.push_str(&format!("|{}", text.trim()));
            }

            Kind::Footnote => {
                let text = self.translate(&children)?;
                output.push_str(&format!("footnote:[{}]", text.trim()));
            }

            Kind::BookInfo | Kind::ArticleInfo => {
                let title = self.translate(&self.tree.filter(&children, &[Kind::Title]))?;
                output.push_str(&decorate_if_not_blank(title.trim(), "= ", ""));

                let meta = self.tree.filter(
                    &children,
                    &[
                        Kind::ProductName,
                        Kind::ProductNumber,
                        Kind::Subtitle,
                        Kind::Abstract,
                        Kind::Edition,
                        Kind::PubsNumber,
                    ],
                );
                for &m in &meta {
                    self.out.metadata.push(self.tree.xml(m));
                    self.discard(m);
                }

                let rest = self.tree.filter_out(
                    &children,
                    &[
                        Kind::Title,
                        Kind::Text,
                        Kind::ProductName,
                        Kind::ProductNumber,
                        Kind::Edition,
                        Kind::PubsNumber,
                    ],
                );
                output.push_str(&format!("\n{}", self.translate(&rest)?));
            }

            Kind::BridgeHead => {
                let text = self.translate(&children)?;
                output.push_str(&format!("\n.{}", text.trim()));
            }

            Kind::Chapter | Kind::Section | Kind::Part | Kind::Appendix | Kind::Preface => {
                let mut marker = String::from("==");
                for ancestor in self.tree.ancestors(c) {
                    if self
                        .tree
                        .contains_kind(self.tree.children(ancestor), &[Kind::Title])
                    {
                        marker.push('=');
                    }
                }
                // Past the deepest heading AsciiDoc supports, degrade to a
                // block-title paragraph.
                let marker = if marker.len() > 6 {
                    ".".to_string()
                } else {
                    marker + " "
                };
                output.push_str(&self.decorate_title(c, &marker)?);
                let rest = self.tree.filter_out(&children, &[Kind::Title, Kind::Text]);
                output.push_str(&format!("\n{}", self.translate(&rest)?));
            }

            Kind::Include => {
                if let Some(href) = self.tree.attr(c, "href").map(str::to_string) {
                    let in_list = self
                        .tree
                        .is_within_set(c, self.style.kinds(Category::ListItems));
                    let in_literal = self
                        .tree
                        .is_within_set(c, self.style.kinds(Category::Literal));
                    let decor = if in_list && !in_literal { "\n--\n" } else { "\n" };

                    if self
                        .tree
                        .is_within(c, &[Kind::MediaObject, Kind::InlineMediaObject])
                    {
                        output.push_str(&self.translate(&children)?);
                    } else if self.tree.attr(c, "parse") == Some("text") {
                        let dir = self.tree.attr(c, "DIR").unwrap_or(".").to_string();
                        let key = clean_path(&format!("{dir}/{href}"));
                        if let Some(src) = self.resources.get(&key) {
                            self.out.resources.insert(key, src.clone());
                            output.push_str(&format!("{decor}include::{href}[]{decor}"));
                        } else {
                            let fallback = self.tree.filter(&children, &[Kind::Fallback]);
                            output.push_str(&self.translate(&fallback)?);
                        }
                    } else {
                        let rest = self
                            .tree
                            .filter_out(&children, &[Kind::Fallback, Kind::Text]);
                        let content = self.translate(&rest)?;
                        if content.is_empty() {
                            let fallback = self.tree.filter(&children, &[Kind::Fallback]);
                            output.push_str(&self.translate(&fallback)?);
                        } else {
                            let name = self.out.create(strip_ext(&href), &content);
                            output.push_str(&format!("{decor}include::{name}[]{decor}"));
                        }
                    }
                }
            }

            Kind::Procedure | Kind::FormalPara => {
                output.push_str(&self.decorate_title(c, ".")?);
                let rest = self.tree.filter_out(&children, &[Kind::Text, Kind::Title]);
                output.push_str(&self.translate(&rest)?);
            }

            Kind::VarListEntry => {
                let rest = self.tree.filter_out(&children, &[Kind::Text, Kind::Term]);
                output.push_str(&self.translate(&rest)?);
            }

            k if self.style.contains(Category::Admonitions, k) || matches!(k, Kind::Example) => {
                let mut fence = String::from("\n====");
                let ancestors = self.tree.ancestors(c);
                for _ in self.tree.filter(&ancestors, &[Kind::Example]) {
                    fence.push('=');
                }
                fence.push('\n');
                output.push_str(&self.decorate_title(c, ".")?);
                if self.style.contains(Category::Admonitions, k) {
                    output.push_str(&format!("\n[{}]", k.name().to_uppercase()));
                }
                let rest = self.tree.filter_out(&children, &[Kind::Text, Kind::Title]);
                output.push_str(&format!("{fence}{}{fence}", self.translate(&rest)?));
            }

            Kind::CorpAuthor | Kind::PubDate | Kind::BiblioId => {
                let (pre, suf) = if self.tree.is_within(c, &[Kind::BiblioEntry]) {
                    (", ", "")
                } else if self.tree.is_within(c, &[Kind::AuthorGroup]) {
                    ("\n.", "\n&blank;\n\n")
                } else {
                    ("", "")
                };
                let text = self.translate(&children)?;
                output.push_str(&decorate_if_not_blank(text.trim(), pre, suf));
            }

            k if self.style.contains(Category::ListItems, k) => {
                output.push_str(&self.translate_list_item(c, k, &children)?);
            }

            Kind::Revision => {
                let flat = self.tree.flatten(&children);
                let number = self.translate(&self.tree.filter(&flat, &[Kind::RevNumber]))?;
                let date = self.translate(&self.tree.filter(&flat, &[Kind::Date]))?;
                let author = self.translate(&self.tree.filter(&children, &[Kind::Author]))?;
                output.push_str(&format!("\n{number}:: {date}, {author}\n"));
                let desc = self.tree.filter(&children, &[Kind::RevDescription]);
                output.push_str(&self.translate(&desc)?);
            }

            Kind::Affiliation => {
                let orgname = self.translate(&self.tree.filter(&children, &[Kind::OrgName]))?;
                output.push_str(&decorate_if_not_blank(&orgname, "\n", "\n"));
                let orgdiv = self.translate(&self.tree.filter(&children, &[Kind::OrgDiv]))?;
                if !orgdiv.is_empty() {
                    if orgname.is_empty() {
                        output.push('\n');
                    }
                    output.push_str(&orgdiv);
                    output.push('\n');
                }
            }

            Kind::Author | Kind::Editor => {
                if self.tree.is_within(c, &[Kind::AuthorGroup]) {
                    let first =
                        self.translate(&self.tree.filter(&children, &[Kind::FirstName]))?;
                    let surname =
                        self.translate(&self.tree.filter(&children, &[Kind::Surname]))?;
                    output.push_str(&format!(
                        "\n.{}{surname}\n",
                        decorate_if_not_blank(&first, "", " ")
                    ));
                    let mut parts: Vec<String> = Vec::new();
                    for k in [Kind::Affiliation, Kind::Email, Kind::Contrib] {
                        let text = self.translate(&self.tree.filter(&children, &[k]))?;
                        if !text.is_empty() {
                            parts.push(text);
                        }
                    }
                    if parts.is_empty() {
                        output.push_str("\n&blank;");
                    }
                    output.push_str(&parts.join("\n"));
                    output.push('\n');
                } else {
                    let first =
                        self.translate(&self.tree.filter(&children, &[Kind::FirstName]))?;
                    let surname =
                        self.translate(&self.tree.filter(&children, &[Kind::Surname]))?;
                    let email = self.translate(&self.tree.filter(&children, &[Kind::Email]))?;
                    output.push_str(&format!("{first} {surname} ({email})"));
                }
            }

            Kind::Term => {
                let term = self.translate(&children)?.trim().to_string();
                let no_index = self.tree.filter_out(&children, &[Kind::IndexTerm]);
                let flat = self.tree.flatten(&no_index);
                let texts = self.tree.filter(&flat, &[Kind::Text]);
                let plain = self.translate(&texts)?.trim().to_string();
                if let Some(parent) = self.tree.parent(c)
                    && let Some(id) = self.tree.attr(parent, "id")
                {
                    output.push_str(&format!("[[{id},{plain}]]\n"));
                }
                output.push_str(&term.replace('\n', ""));
            }

            Kind::Title
            | Kind::Phrase
            | Kind::Date
            | Kind::FirstName
            | Kind::Surname
            | Kind::OrgDiv
            | Kind::Email
            | Kind::TextObject
            | Kind::Primary
            | Kind::Secondary
            | Kind::Tertiary
            | Kind::SeeAlso
            | Kind::See => {
                let text = self.translate(&children)?;
                output.push_str(text.trim());
            }

            k if self.style.contains(Category::Monospace, k) => {
                if self
                    .tree
                    .is_within_set(c, self.style.kinds(Category::Monospace))
                {
                    output.push_str(&self.translate(&children)?);
                } else {
                    output.push_str(&self.quote_node(c, '`')?);
                }
            }

            k if self.style.contains(Category::Superscript, k) => {
                if self
                    .tree
                    .is_within_set(c, self.style.kinds(Category::Superscript))
                {
                    output.push_str(&self.translate(&children)?);
                } else {
                    output.push_str(&self.quote_node(c, '^')?);
                }
            }

            k if self.style.contains(Category::Italic, k) => {
                if self.tree.is_within_set(c, self.style.kinds(Category::Italic)) {
                    output.push_str(&self.translate(&children)?);
                } else {
                    output.push_str(&self.quote_node(c, '_')?);
                }
            }

            k if self.style.contains(Category::Bold, k) => {
                if self.tree.is_within_set(c, self.style.kinds(Category::Bold)) {
                    output.push_str(&self.translate(&children)?);
                } else {
                    output.push_str(&self.quote_node(c, '*')?);
                }
            }

            k if self.style.contains(Category::Highlight, k)
                || self.style.unquoted_custom().contains(k) =>
            {
                if self
                    .tree
                    .is_within_set(c, self.style.kinds(Category::Highlight))
                {
                    output.push_str(&self.translate(&children)?);
                } else {
                    output.push_str(&self.quote_node(c, '#')?);
                }
            }

            Kind::IndexTerm => {
                let mut terms: Vec<String> = Vec::new();
                for k in [
                    Kind::Primary,
                    Kind::Secondary,
                    Kind::Tertiary,
                    Kind::See,
                    Kind::SeeAlso,
                ] {
                    let selected = self.tree.filter(&children, &[k]);
                    let flat = self.tree.flatten(&selected);
                    let texts = self.tree.filter(&flat, &[Kind::Text]);
                    let text = self.translate(&texts)?.trim().to_string();
                    if !text.is_empty() {
                        terms.push(text);
                    }
                }
                if !terms.is_empty() {
                    output.push_str(&format!("indexterm:[{}]", terms.join(",")));
                }
            }

            Kind::Quote => {
                output.push_str(&format!("\"{}\"", self.translate(&children)?));
            }

            Kind::ManVolNum => {
                output.push_str(&format!("({})", self.translate(&children)?));
            }

            Kind::GuiButton => {
                if self
                    .tree
                    .is_within_set(c, self.style.kinds(Category::Literal))
                {
                    output.push_str(&self.translate(&children)?);
                } else {
                    output.push_str(&format!("btn:[{}]", self.translate(&children)?));
                }
            }

            Kind::MenuChoice => {
                let rest = self.tree.filter_out(&children, &[Kind::GuiMenu]);
                let mut parts: Vec<String> = Vec::new();
                for &child in &rest {
                    parts.push(self.translate(&[child])?);
                }
                let menu = self.translate(&self.tree.filter(&children, &[Kind::GuiMenu]))?;
                output.push_str(&format!(
                    "menu:{}[{}]",
                    menu.trim(),
                    parts.join(" > ")
                ));
            }

            Kind::KeyCap => {
                if self.tree.is_within(c, &[Kind::KeyCombo]) {
                    output.push_str(&self.translate(&children)?);
                } else {
                    output.push_str(&format!("kbd:[{}]", self.translate(&children)?));
                }
            }

            Kind::KeyCombo => {
                let mut parts: Vec<String> = Vec::new();
                for &child in &children {
                    parts.push(self.translate(&[child])?);
                }
                output.push_str(&format!("kbd:[{}]", parts.join(" + ")));
            }

            Kind::GuiMenu
            | Kind::GuiSubmenu
            | Kind::Optional
            | Kind::ProductNumber
            | Kind::Edition
            | Kind::PubsNumber => {
                output.push_str(&self.translate(&children)?);
            }

            Kind::Remark => {
                output.push_str(&format!("\n//{}\n", self.translate(&children)?));
            }

            Kind::Keyword | Kind::SubjectTerm => {
                let text = self.translate(&children)?;
                self.out.keywords.insert(text.trim().to_string());
            }

            _ => {
                for &child in &children {
                    let mut text = self.translate(&[child])?;
                    if *self.tree.kind(child) == Kind::Text {
                        text = text.trim().to_string();
                        if !text.is_empty() {
                            self.warn_unknown(child, c);
                        }
                    }
                    output.push_str(&text);
                }
            }
        }

        Ok(output)
    }

    fn translate_list_item(&mut self, c: NodeId, kind: &Kind, children: &[NodeId]) -> Result<String> {
        let parent = self.tree.parent(c);
        let bullet = match parent.map(|p| self.tree.kind(p)) {
            Some(
                Kind::ItemizedList
                | Kind::VarListEntry
                | Kind::BiblioList
                | Kind::SimpleList
                | Kind::Author,
            ) => '*',
            _ => '.',
        };

        let translated = if matches!(kind, Kind::Member | Kind::Contrib) {
            self.translate(children)?
        } else {
            let rest = self.tree.filter_out(children, &[Kind::Text]);
            self.translate(&rest)?
        };
        let mut body = continuation_scan(translated.trim());

        let term_ids = match parent {
            Some(p) => self.tree.filter(self.tree.children(p), &[Kind::Term]),
            None => Vec::new(),
        };
        let term = self.translate(&term_ids)?;

        let mut item_decor = String::new();
        if !term.is_empty() {
            item_decor.push('\n');
            item_decor.push_str(&term);
            item_decor.push(':');
            let ancestors = self.tree.ancestors(c);
            for _ in self.tree.filter(&ancestors, &[Kind::VarListEntry]) {
                item_decor.push(':');
            }
            item_decor.push(' ');
        } else {
            item_decor.push('\n');
            item_decor.push(bullet);
            let set = self.style.kinds(Category::ListItems);
            for ancestor in self.tree.ancestors(c) {
                if set.contains(self.tree.kind(ancestor)) {
                    item_decor.push(bullet);
                }
            }
        }

        let mut output = String::new();
        if body.len() > 2 {
            if body.ends_with("+\n") {
                body.truncate(body.len() - 2);
            }
            let starts_visibly = body
                .bytes()
                .take(3)
                .any(|b| b.is_ascii_alphanumeric());
            if starts_visibly {
                output.push_str(&format!("{item_decor} {body}\n"));
            } else {
                // Leading punctuation would be misread as another construct;
                // anchor the item on a placeholder line instead.
                output.push_str(&format!("{item_decor} &blank;\n+\n{body}\n"));
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_str(xml: &str) -> Conversion {
        let doc = Document::from_xml_str(xml).unwrap();
        convert(&doc, &StyleConfig::default()).unwrap()
    }

    #[test]
    fn severities_distinguish_diagnostic_kinds() {
        let unknown = Diagnostic {
            kind: DiagnosticKind::UnknownMarkup,
            detail: String::new(),
            context: String::new(),
        };
        let leftover = Diagnostic {
            kind: DiagnosticKind::LeftoverText,
            ..unknown.clone()
        };
        assert_eq!(unknown.severity(), Severity::Warning);
        assert_eq!(leftover.severity(), Severity::Error);
    }

    #[test]
    fn independent_runs_share_no_state() {
        let first = convert_str(
            "<!DOCTYPE book [<!ENTITY A \"one\">]><book><para>&A;</para></book>",
        );
        let second = convert_str("<book><para>plain</para></book>");
        assert!(first.output.entities.contains_key("A"));
        assert!(!second.output.entities.contains_key("A"));
    }

    #[test]
    fn footnote_renders_inline() {
        let conversion =
            convert_str("<para>fact<footnote><para>source</para></footnote></para>");
        assert!(
            conversion
                .output
                .master()
                .contains("factfootnote:[source]")
        );
    }

    #[test]
    fn keycombo_joins_keycaps() {
        let conversion = convert_str(
            "<para><keycombo><keycap>Ctrl</keycap><keycap>C</keycap></keycombo></para>",
        );
        assert!(conversion.output.master().contains("kbd:[Ctrl + C]"));
    }

    #[test]
    fn menuchoice_renders_menu_macro() {
        let conversion = convert_str(
            "<para><menuchoice><guimenu>File</guimenu><guisubmenu>Save</guisubmenu>\
             </menuchoice></para>",
        );
        assert!(conversion.output.master().contains("menu:File[Save]"));
    }
}

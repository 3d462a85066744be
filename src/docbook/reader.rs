//! Document loading: doc-root discovery, publican.cfg, entity and include
//! resolution, resource registration.
//!
//! After loading, the tree already contains everything translation needs:
//! entity definitions as `ENTITY` nodes, included fragments spliced in as
//! children of their `include` nodes, and `DIR` attributes stamped on nodes
//! that reference out-of-line resources.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::tree::{Kind, NodeId};
use crate::util::{clean_path, decode_text, find_between};

use super::{Document, conditions_match, parser};

impl Document {
    /// Load from a publican.cfg, a directory, or a single XML file —
    /// whichever the path turns out to be.
    pub fn open(input: &Path) -> Result<Document> {
        Document::from_publican_cfg(input)
            .or_else(|_| Document::from_dir(input))
            .or_else(|_| Document::from_file(input))
    }

    /// Parse markup without filesystem resolution. Include targets are
    /// treated as missing; inline entity declarations still resolve.
    pub fn from_xml_str(text: &str) -> Result<Document> {
        let mut doc = Document {
            data: parser::parse(text),
            ..Document::default()
        };
        if doc.data.roots().is_empty() {
            return Err(Error::InvalidInput("no markup found".to_string()));
        }
        let root_dir = PathBuf::from(".");
        Resolver::new(&mut doc, &root_dir).run();
        Ok(doc)
    }

    pub fn from_file(filename: &Path) -> Result<Document> {
        let mut doc = Document::default();
        doc.load_data(filename)?;
        Ok(doc)
    }

    /// Find and load the document root inside a directory.
    pub fn from_dir(dir: &Path) -> Result<Document> {
        let root = find_doc_root(dir).ok_or_else(|| {
            Error::InvalidInput(format!("no book or article found in {}", dir.display()))
        })?;
        Document::from_file(&root)
    }

    /// Load via a publican.cfg: `key: value` lines, quotes stripped; the
    /// document root is discovered under the `xml_lang` subdirectory.
    pub fn from_publican_cfg(filename: &Path) -> Result<Document> {
        let text = read_text(filename).ok_or_else(|| {
            Error::InvalidInput(format!("cannot read {}", filename.display()))
        })?;
        let mut cfg = HashMap::new();
        for line in text.lines() {
            let line = line.replace('"', "");
            if let Some((k, v)) = line.split_once(':') {
                cfg.insert(k.trim().to_string(), v.trim().to_string());
            }
        }
        let lang = cfg
            .get("xml_lang")
            .ok_or_else(|| Error::InvalidInput("publican.cfg has no xml_lang".to_string()))?
            .clone();
        let base = filename.parent().unwrap_or(Path::new(".")).join(lang);
        let root = find_doc_root(&base).ok_or_else(|| {
            Error::InvalidInput(format!("no book or article found in {}", base.display()))
        })?;
        let mut doc = Document {
            publican_cfg: Some(cfg),
            ..Document::default()
        };
        doc.load_data(&root)?;
        Ok(doc)
    }

    fn load_data(&mut self, filename: &Path) -> Result<()> {
        let text = read_text(filename).ok_or_else(|| {
            Error::InvalidInput(format!("cannot read {}", filename.display()))
        })?;
        tracing::info!("processing {}", filename.display());
        self.data = parser::parse(&text);
        if self.data.roots().is_empty() {
            return Err(Error::InvalidInput(format!(
                "no markup found in {}",
                filename.display()
            )));
        }
        let root_dir = filename.parent().unwrap_or(Path::new(".")).to_path_buf();
        Resolver::new(self, &root_dir).run();
        Ok(())
    }
}

/// First `.xml` file in the directory that closes a `book` or `article`.
pub fn find_doc_root(dir: &Path) -> Option<PathBuf> {
    let mut names: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "xml"))
        .collect();
    names.sort();
    names.into_iter().find(|p| {
        read_text(p)
            .map(|s| s.contains("</book>") || s.contains("</article>"))
            .unwrap_or(false)
    })
}

fn read_text(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    Some(decode_text(&bytes).into_owned())
}

struct Resolver<'d> {
    doc: &'d mut Document,
    root_dir: PathBuf,
    entity_files: HashSet<PathBuf>,
}

impl<'d> Resolver<'d> {
    fn new(doc: &'d mut Document, root_dir: &Path) -> Self {
        Resolver {
            doc,
            root_dir: root_dir.to_path_buf(),
            entity_files: HashSet::new(),
        }
    }

    fn run(&mut self) {
        let roots = self.doc.data.roots().to_vec();
        let root_dir = self.root_dir.clone();
        self.process(&root_dir, &roots);
    }

    fn process(&mut self, dir: &Path, ids: &[NodeId]) {
        for &id in ids {
            let condition = self
                .doc
                .data
                .attr(id, "condition")
                .unwrap_or("")
                .to_string();
            if self.doc.publican_cfg.is_some()
                && !conditions_match(self.doc.condition(), &condition)
            {
                continue;
            }
            match self.doc.data.kind(id).clone() {
                Kind::Directive => self.process_directive(dir, id),
                Kind::ImageData => {
                    self.register_image(dir, id);
                }
                Kind::Include => self.process_include(dir, id),
                _ => {
                    let children = self.doc.data.children(id).to_vec();
                    self.process(dir, &children);
                }
            }
        }
    }

    fn process_directive(&mut self, dir: &Path, id: NodeId) {
        let text = self
            .doc
            .data
            .attr(id, "DIRECTIVE")
            .unwrap_or("")
            .to_string();
        let original = self.doc.data.children(id).to_vec();

        // External entity set: <!ENTITY % BOOK_ENTITIES SYSTEM "Book.ent">
        let sysfile = find_between(&text, "ENTITY % BOOK_ENTITIES SYSTEM \"", "\"").to_string();
        if !sysfile.is_empty() {
            let path = dir.join(&sysfile);
            if self.entity_files.insert(path.clone())
                && let Some(content) = read_text(&path)
            {
                tracing::info!("processing {}", path.display());
                let decls = self.scan_entity_decls(&content);
                self.doc.data.add_children(id, &decls);
                let entity_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
                self.process(&entity_dir, &decls);
            }
        }

        // Inline declarations in the internal subset or a standalone
        // <!ENTITY key "value"> directive.
        let decls = self.scan_entity_decls(&text);
        if !decls.is_empty() {
            self.doc.data.add_children(id, &decls);
            self.process(dir, &decls);
        }

        self.process(dir, &original);
    }

    /// Extract `<!ENTITY name "value">` declarations (parameter entities
    /// skipped) into ENTITY nodes whose children are the parsed value.
    fn scan_entity_decls(&mut self, text: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut rest = text;
        while let Some(start) = rest.find("<!ENTITY ") {
            rest = &rest[start + "<!ENTITY ".len()..];
            let decl = match rest.find('>') {
                Some(end) => &rest[..end],
                None => rest,
            };
            let mut parts = decl.trim().splitn(2, char::is_whitespace);
            let key = parts.next().unwrap_or("").trim();
            let value = find_between(decl, "\"", "\"").to_string();
            if key.is_empty() || key.starts_with('%') || value.is_empty() {
                continue;
            }
            let entity = self.doc.data.new_node(Kind::Entity);
            self.doc.data.set_attr(entity, "KEY", key);
            let children = parser::parse_fragment(&mut self.doc.data, &value);
            self.doc.data.add_children(entity, &children);
            out.push(entity);
        }
        out
    }

    fn register_image(&mut self, dir: &Path, id: NodeId) {
        let Some(href) = self.doc.data.attr(id, "fileref").map(str::to_string) else {
            return;
        };
        let src = self.locate(dir, &href);
        let rel = rel_dir(&self.root_dir, dir);
        self.doc.data.set_attr(id, "DIR", &rel);
        self.doc
            .resources
            .insert(clean_path(&format!("{rel}/{href}")), src);
    }

    fn process_include(&mut self, dir: &Path, id: NodeId) {
        let Some(href) = self.doc.data.attr(id, "href").map(str::to_string) else {
            return;
        };
        let fname = self.locate(dir, &href);
        if fname.is_file() {
            let original = self.doc.data.children(id).to_vec();
            if self.doc.data.attr(id, "parse") == Some("text") {
                let rel = rel_dir(&self.root_dir, dir);
                self.doc.data.set_attr(id, "DIR", &rel);
                self.doc
                    .resources
                    .insert(clean_path(&format!("{rel}/{href}")), fname);
            } else if let Some(content) = read_text(&fname) {
                tracing::info!("processing {}", fname.display());
                let spliced = parser::parse_fragment(&mut self.doc.data, &content);
                self.doc.data.add_children(id, &spliced);
                let inc_dir = fname.parent().unwrap_or(Path::new(".")).to_path_buf();
                self.process(&inc_dir, &spliced);
            }
            let kept = self.doc.data.filter_out(&original, &[Kind::Fallback]);
            self.process(dir, &kept);
        } else {
            let children = self.doc.data.children(id).to_vec();
            self.process(dir, &children);
        }
    }

    /// Resolve a reference against the current directory, honoring the
    /// publican brand directory for `Common_Content/` paths.
    fn locate(&self, dir: &Path, href: &str) -> PathBuf {
        if let Some(brand) = self.doc.brand_dir()
            && let Some(tail) = href.strip_prefix("Common_Content/")
        {
            return brand.join(tail);
        }
        dir.join(href)
    }
}

/// Current directory expressed relative to the document root, `.` when equal.
fn rel_dir(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(p) if p.as_os_str().is_empty() => ".".to_string(),
        Ok(p) => p.to_string_lossy().into_owned(),
        Err(_) => dir.to_string_lossy().into_owned(),
    }
}

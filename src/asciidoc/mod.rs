//! AsciiDoc output documents.
//!
//! An [`AdocDocument`] is the converter's result: the generated text units
//! keyed by output file name, plus the side tables collected during the walk
//! (entity definitions, keywords, verbatim metadata fragments, and resources
//! to copy through). The writer serializes all of it to a directory.

pub mod normalize;
mod writer;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

pub use normalize::normalize;

/// Name of the primary text unit.
pub const MASTER: &str = "master.adoc";

/// The assembled AsciiDoc output of one conversion run.
#[derive(Debug, Clone)]
pub struct AdocDocument {
    /// Output file name → AsciiDoc text.
    pub data: BTreeMap<String, String>,
    /// Entity name → resolved replacement text.
    pub entities: HashMap<String, String>,
    /// Collected keyword set.
    pub keywords: BTreeSet<String>,
    /// Verbatim metadata markup fragments (docinfo passthrough).
    pub metadata: Vec<String>,
    /// Output-relative resource path → source path to copy from.
    pub resources: BTreeMap<String, PathBuf>,
}

impl Default for AdocDocument {
    fn default() -> Self {
        let mut entities = HashMap::new();
        entities.insert("nbsp".to_string(), String::new());
        entities.insert("blank".to_string(), String::new());
        AdocDocument {
            data: BTreeMap::new(),
            entities,
            keywords: BTreeSet::new(),
            metadata: Vec::new(),
            resources: BTreeMap::new(),
        }
    }
}

impl AdocDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// The primary text unit.
    pub fn master(&self) -> &str {
        self.data.get(MASTER).map(String::as_str).unwrap_or("")
    }

    /// Store a side document under a generated name derived from `title`.
    ///
    /// Identical content already stored under this title reuses its name;
    /// differing content gets a disambiguating numeric suffix.
    pub fn create(&mut self, title: &str, content: &str) -> String {
        let mut count = 0;
        loop {
            let name = if count == 0 {
                format!("{title}.adoc")
            } else {
                format!("{title}-{count}.adoc")
            };
            match self.data.get(&name) {
                Some(existing) if existing == content => return name,
                Some(_) => count += 1,
                None => {
                    self.data.insert(name.clone(), content.to_string());
                    return name;
                }
            }
        }
    }
}

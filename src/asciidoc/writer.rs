//! Serialize an [`AdocDocument`] to an output directory.

use std::path::Path;

use crate::error::{Error, Result};

use super::{AdocDocument, MASTER};

impl AdocDocument {
    /// Write every text unit, the entity and docinfo side files, and copy
    /// referenced resources into `dir`. Refuses to write anything when the
    /// primary text unit is empty.
    pub fn write(&self, dir: &Path) -> Result<()> {
        if self.master().is_empty() {
            return Err(Error::EmptyDocument(MASTER.to_string()));
        }

        for (dst, src) in &self.resources {
            if !src.is_file() {
                return Err(Error::InvalidInput(format!(
                    "resource not found: {}",
                    src.display()
                )));
            }
            let target = dir.join(dst);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            tracing::info!("copying {}", target.display());
            std::fs::copy(src, &target)?;
        }

        if !self.metadata.is_empty() {
            let mut fragments = self.metadata.clone();
            fragments.sort();
            write_file(&dir.join("master-docinfo.xml"), &fragments.join("\n"))?;
        }

        let mut master = self.master().to_string();

        if !self.entities.is_empty() {
            master = format!("\n\ninclude::entities.adoc[]\n\n{master}");
            let mut lines: Vec<String> = self
                .entities
                .iter()
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .map(|(k, v)| format!("\n:{k}: {v}"))
                .collect();
            lines.sort();
            let body = lines.join("\n").replace("&nbsp;", " ");
            write_file(&dir.join("entities.adoc"), &body)?;
        }

        if !self.keywords.is_empty() {
            let list: Vec<&str> = self.keywords.iter().map(String::as_str).collect();
            master = format!(":keywords: {}{master}", list.join(", "));
        }

        master = format!(":doctype: book\n{master}");
        master = format!(":experimental:\n{master}");

        for (name, content) in &self.data {
            let content = if name == MASTER { &master } else { content };
            write_file(&dir.join(name), content)?;
        }

        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    tracing::info!("creating {}", path.display());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

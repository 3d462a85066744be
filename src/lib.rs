//! # doklet
//!
//! A DocBook to AsciiDoc converter that preserves semantic structure, inline
//! emphasis, cross-references, tables, lists, images, and document metadata.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use doklet::{Document, StyleConfig, convert};
//!
//! let doc = Document::open(Path::new("my-book/")).unwrap();
//! let conversion = convert(&doc, &StyleConfig::default()).unwrap();
//! conversion.output.write(Path::new("out/")).unwrap();
//! ```
//!
//! ## Pipeline
//!
//! Loading produces a [`Document`]: the parsed node tree with entity
//! definitions and includes already resolved, plus the map of out-of-line
//! resources it references. [`convert`] walks that tree once, producing an
//! [`AdocDocument`] (the primary text unit, any split-out side documents, and
//! the entity/keyword/metadata side tables) along with advisory
//! [`Diagnostic`]s. The output document writes itself to a directory,
//! copying referenced resources through verbatim.

pub mod asciidoc;
pub mod docbook;
pub mod error;
pub mod style;
pub mod translate;
pub mod tree;
pub(crate) mod util;

pub use asciidoc::AdocDocument;
pub use docbook::Document;
pub use error::{Error, Result};
pub use style::{Category, StyleConfig};
pub use translate::{Conversion, Diagnostic, DiagnosticKind, Severity, convert};

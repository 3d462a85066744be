//! Error types for doklet operations.

use thiserror::Error;

/// Errors that can occur while loading, translating, or writing a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("structural anomaly: {0}")]
    Structure(String),

    #[error("refusing to write empty document: {0}")]
    EmptyDocument(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

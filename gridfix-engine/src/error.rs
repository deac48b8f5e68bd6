//! Error type shared by every engine operation

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, sizing, rewriting or saving a document
///
/// Malformed numeric markup is fatal: a single bad `width` or `colspan` aborts
/// the whole sizing pass. A missing root element is not an error at all.
#[derive(Debug, Error)]
pub enum GridError {
    /// Reading or writing a file failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A width attribute or `width:` style declaration could not be parsed
    #[error("invalid width '{value}' on <{tag}>")]
    InvalidWidth { tag: String, value: String },

    /// A colspan attribute was not a positive integer
    #[error("invalid colspan '{value}' on <{tag}>")]
    InvalidColspan { tag: String, value: String },

    /// The document has no file to be saved back to
    #[error("document was not opened from a file")]
    NoPath,

    /// An operation needed an open document
    #[error("no document is open")]
    NotOpened,

    /// Turning the DOM back into text failed
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl GridError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GridError::Io {
            path: path.into(),
            source,
        }
    }
}

//! Reading and writing of the JSON documents backing the stores.

use std::{
    fs::{self, read_to_string},
    io::{self, ErrorKind},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;

/// Outcome of loading a document from disk
///
/// Absence and malformed content are expected situations for a document store, so they are
/// reported as values rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document was read successfully, containing the given number of entries
    Found(usize),
    /// No document exists at the path
    NotFound,
    /// The document exists but could not be read, or does not have the expected shape
    Malformed(String),
}

/// Result of reading a document, carrying the parsed value when one was found
pub(crate) enum Document<T> {
    Found(T),
    NotFound,
    Malformed(String),
}

/// Reads and deserializes the JSON document at the given path
#[tracing::instrument(level = "trace")]
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Document<T> {
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Document::NotFound,
        Err(e) => return Document::Malformed(e.to_string()),
    };

    match serde_json::from_str(&content) {
        Ok(value) => Document::Found(value),
        Err(e) => Document::Malformed(e.to_string()),
    }
}

/// Serializes the value as pretty-printed JSON and replaces the document at the given path
///
/// Missing parent directories are created.
#[tracing::instrument(level = "trace", skip(value))]
pub(crate) fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(path, json)?;

    trace!("Wrote document to {path:?}");
    Ok(())
}

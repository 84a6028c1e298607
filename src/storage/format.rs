//! Text format of recording files
//!
//! A recording file is a sequence of documents. Each document is one encoded
//! [`Entry`] preceded by a comment block:
//!
//! ```text
//! # request 0
//! # timestamp 2024-05-01 12:00:00 UTC
//! # roundtrip 42ms
//! request:
//!   method: GET
//!   url: http://example.com/
//! response:
//!   status_code: 200
//!   body: hello
//! ```
//!
//! Documents after the first are preceded by [`WRITTEN_SEPARATOR`]. The
//! comment block is informational and never parsed back.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};

use crate::entry::Entry;
use crate::error::BoxError;

/// File extension of recording files
pub const RECORDING_EXTENSION: &str = ".yml";

/// Marker splitting a file into documents when loading
pub const DOCUMENT_SEPARATOR: &str = "\n---\n";

/// Marker written before every document after the first
pub const WRITTEN_SEPARATOR: &str = "\n---\n\n";

/// Encodes one entry to a text document and back.
///
/// Encoded documents must never contain a line consisting only of `---`,
/// since that line separates documents in a recording file.
pub trait EntryCodec: Send + Sync {
    /// Encode an entry as one document
    ///
    /// # Errors
    ///
    /// Returns error if the entry cannot be represented
    fn encode(&self, entry: &Entry) -> Result<String, BoxError>;

    /// Decode one document
    ///
    /// # Errors
    ///
    /// Returns error if the document is not a valid entry
    fn decode(&self, document: &str) -> Result<Entry, BoxError>;
}

/// YAML codec, the default
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl EntryCodec for YamlCodec {
    fn encode(&self, entry: &Entry) -> Result<String, BoxError> {
        Ok(serde_yaml::to_string(entry)?)
    }

    fn decode(&self, document: &str) -> Result<Entry, BoxError> {
        Ok(serde_yaml::from_str(document)?)
    }
}

/// Comment block written in front of each document
#[derive(Debug, Clone, Copy)]
pub struct DocumentHeader {
    /// Zero-based sequence number within this write session
    pub index: usize,
    /// When the live request started
    pub timestamp: DateTime<Utc>,
    /// Round-trip time of the live request
    pub roundtrip: Duration,
}

impl fmt::Display for DocumentHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# request {}", self.index)?;
        writeln!(
            f,
            "# timestamp {}",
            self.timestamp.round_subsecs(0).format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f, "# roundtrip {}ms", self.roundtrip.as_millis())
    }
}

/// Append the recording extension unless the path already ends with it
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(RECORDING_EXTENSION) {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(RECORDING_EXTENSION);
    PathBuf::from(name)
}

/// Split file content into documents, in file order.
///
/// Content that is empty or only whitespace has no documents.
pub fn split_documents(content: &str) -> impl Iterator<Item = &str> {
    let empty = content.trim().is_empty();
    content
        .split(DOCUMENT_SEPARATOR)
        .filter(move |_| !empty)
}

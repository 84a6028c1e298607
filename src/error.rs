//! Error types for httptape

use std::fmt;
use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use thiserror::Error;

/// Boxed error used at the transport and body boundaries
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for httptape operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Errors that can occur while recording or replaying
#[derive(Debug, Error)]
pub enum RecorderError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No recorded entry answers the request (replay-only mode)
    #[error(transparent)]
    NoRecordedEntry(#[from] NoRecordedEntry),

    /// The live call failed; nothing was recorded
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// Reading a request or response body failed
    #[error("Failed to read body: {0}")]
    Body(#[source] BoxError),

    /// A recorded response cannot be turned back into an HTTP response
    #[error("Invalid recorded response: {0}")]
    InvalidResponse(String),

    /// A document in the recording file could not be decoded
    #[error("Malformed recording {} (document {index}): {source}", path.display())]
    MalformedRecording {
        /// Recording file
        path: PathBuf,
        /// Zero-based document position in the file
        index: usize,
        /// Decoder error
        #[source]
        source: BoxError,
    },

    /// An entry could not be encoded
    #[error("Failed to encode entry: {0}")]
    Encode(#[source] BoxError),
}

impl RecorderError {
    /// Whether this is a replay miss rather than an infrastructure failure
    #[must_use]
    pub fn is_no_recorded_entry(&self) -> bool {
        matches!(self, Self::NoRecordedEntry(_))
    }

    /// The request that missed, if this is a replay miss
    #[must_use]
    pub fn no_recorded_entry(&self) -> Option<&NoRecordedEntry> {
        match self {
            Self::NoRecordedEntry(miss) => Some(miss),
            _ => None,
        }
    }
}

/// Replay miss in replay-only mode, carrying the request that had no entry.
///
/// The request body is read to the end and kept as sent.
#[derive(Debug, Clone)]
pub struct NoRecordedEntry {
    /// Request method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// HTTP version
    pub version: Version,
    /// Request headers
    pub headers: HeaderMap,
    /// Buffered request body
    pub body: Bytes,
}

impl fmt::Display for NoRecordedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no recorded entry for {} {}", self.method, self.uri)
    }
}

impl std::error::Error for NoRecordedEntry {}

//! Recording file reader

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use super::format::{split_documents, EntryCodec};
use crate::entry::Entry;
use crate::{RecorderError, Result};

/// Load every entry of a recording file, in file order.
///
/// A missing file is an empty recording. A document that fails to decode
/// fails the whole load; entries are never skipped.
///
/// # Errors
///
/// Returns error if the file cannot be read or a document is malformed
pub fn load_entries(path: &Path, codec: &dyn EntryCodec) -> Result<Vec<Entry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Recording {} does not exist, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    split_documents(&content)
        .enumerate()
        .map(|(index, document)| {
            codec
                .decode(document)
                .map_err(|source| RecorderError::MalformedRecording {
                    path: path.to_path_buf(),
                    index,
                    source,
                })
        })
        .collect()
}

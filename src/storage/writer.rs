//! Recording file writer

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::format::{DocumentHeader, EntryCodec, WRITTEN_SEPARATOR};
use crate::entry::Entry;
use crate::{RecorderError, Result};

/// Writer for recording files.
///
/// The first append truncates the file, so a recording session replaces
/// whatever an earlier session left behind. Later appends add documents.
/// The file is opened and closed on every append.
#[derive(Debug)]
pub struct RecordingWriter {
    path: PathBuf,
    index: usize,
}

impl RecordingWriter {
    /// Create a writer; nothing is touched on disk until the first append
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path, index: 0 }
    }

    /// Recording file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of documents written so far
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Append an entry to the recording
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created, or the
    /// entry cannot be encoded or written
    pub fn append(
        &mut self,
        entry: &Entry,
        started_at: DateTime<Utc>,
        roundtrip: Duration,
        codec: &dyn EntryCodec,
    ) -> Result<()> {
        let document = codec.encode(entry).map_err(RecorderError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        if self.index == 0 {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true);
        }
        let mut file = options.open(&self.path)?;

        let header = DocumentHeader {
            index: self.index,
            timestamp: started_at,
            roundtrip,
        };

        let mut out = String::with_capacity(document.len() + 96);
        if self.index > 0 {
            out.push_str(WRITTEN_SEPARATOR);
        }
        out.push_str(&header.to_string());
        out.push_str(&document);

        file.write_all(out.as_bytes())?;
        file.sync_data()?;

        debug!(
            "Wrote document {} to {}",
            self.index,
            self.path.display()
        );
        self.index += 1;

        Ok(())
    }
}

//! Text storage format for recordings

mod format;
mod reader;
mod writer;

pub use format::{
    normalize_path, split_documents, DocumentHeader, EntryCodec, YamlCodec, DOCUMENT_SEPARATOR,
    RECORDING_EXTENSION, WRITTEN_SEPARATOR,
};
pub use reader::load_entries;
pub use writer::RecordingWriter;

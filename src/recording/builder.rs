//! Builder for [`Recorder`]

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Mode;
use crate::filter::Filter;
use crate::network::Transport;
use crate::selector::Selector;
use crate::storage::EntryCodec;
use crate::{RecorderError, Result};

use super::Recorder;

/// Configures a [`Recorder`].
///
/// Defaults: [`Mode::Auto`], no filters, [`HttpTransport`](crate::network::HttpTransport),
/// first-match selection and the YAML codec.
#[derive(Default)]
pub struct RecorderBuilder {
    path: Option<PathBuf>,
    mode: Mode,
    filters: Vec<Filter>,
    transport: Option<Arc<dyn Transport>>,
    selector: Option<Arc<dyn Selector>>,
    codec: Option<Arc<dyn EntryCodec>>,
}

impl RecorderBuilder {
    /// Recording file; `.yml` is appended when missing and parent
    /// directories are created on first write. Required unless the mode
    /// is [`Mode::Passthrough`].
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Operating mode
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Append a filter; filters run in the order they were added
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append several filters
    #[must_use]
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Transport for live requests
    #[must_use]
    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Transport for live requests, shared with other owners
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Selection strategy for replayed requests
    #[must_use]
    pub fn selector(self, selector: impl Selector + 'static) -> Self {
        self.shared_selector(Arc::new(selector))
    }

    /// Selection strategy shared with other owners, e.g. one
    /// [`OncePerCall`](crate::selector::OncePerCall) used by several recorders
    #[must_use]
    pub fn shared_selector(mut self, selector: Arc<dyn Selector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Codec for recording documents
    #[must_use]
    pub fn codec(mut self, codec: impl EntryCodec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Build the recorder
    ///
    /// # Errors
    ///
    /// Returns error if no path was given for a mode that uses the disk
    pub fn build(self) -> Result<Recorder> {
        if self.path.is_none() && self.mode.uses_disk() {
            return Err(RecorderError::Config(format!(
                "A recording path is required in {} mode",
                self.mode
            )));
        }

        Ok(Recorder::assemble(
            self.path,
            self.mode,
            self.filters,
            self.transport,
            self.selector,
            self.codec,
        ))
    }
}

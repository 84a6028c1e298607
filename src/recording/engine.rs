//! The recorder: decides per request whether to replay or go live

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::Utc;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use hyper::http::request::Parts;
use hyper::StatusCode;
use parking_lot::{Mutex, RwLock};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::{Mode, RecorderConfig};
use crate::entry::{expand_headers, flatten_headers, Entry, Request, Response};
use crate::error::{BoxError, NoRecordedEntry};
use crate::filter::{apply_filters, remove_request_header, remove_response_header, Filter};
use crate::network::{HttpTransport, Transport};
use crate::selector::{FirstMatch, Selector};
use crate::storage::{load_entries, normalize_path, EntryCodec, RecordingWriter, YamlCodec};
use crate::{RecorderError, Result};

use super::builder::RecorderBuilder;
use super::{Counters, RecorderStats};

/// Record/replay HTTP transport.
///
/// Every request goes through [`Recorder::execute`]. Depending on the
/// [`Mode`], the recorder answers from recorded entries, fails with
/// [`RecorderError::NoRecordedEntry`], or performs the request through its
/// [`Transport`] and records the result.
///
/// Recorded entries are loaded from the backing file on first use, exactly
/// once. The first write of a recorder truncates the file, so entries from an
/// earlier session are replaced by the new session's entries.
///
/// Writes from one recorder are serialized. Two recorders must not write
/// the same file at the same time; nothing coordinates them.
pub struct Recorder {
    path: Option<PathBuf>,
    mode: Mode,
    filters: Vec<Filter>,
    transport: Arc<dyn Transport>,
    selector: Option<Arc<dyn Selector>>,
    codec: Arc<dyn EntryCodec>,
    loaded: OnceCell<()>,
    entries: RwLock<Vec<Entry>>,
    writer: Option<Mutex<RecordingWriter>>,
    counters: Counters,
}

impl Recorder {
    /// Recorder in [`Mode::Auto`] writing to `path` (`.yml` appended when
    /// missing), using the default transport
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, filters: Vec<Filter>) -> Self {
        Self::assemble(
            Some(path.into()),
            Mode::Auto,
            filters,
            None,
            None,
            None,
        )
    }

    /// Start configuring a recorder
    #[must_use]
    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::default()
    }

    /// Build a recorder from configuration, using the default transport.
    ///
    /// Redacted request headers become filters ahead of redacted response
    /// headers, each list in its configured order.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid
    pub fn from_config(config: &RecorderConfig) -> Result<Self> {
        config.validate()?;

        let filters = config
            .redact_request_headers
            .iter()
            .map(|name| remove_request_header(name.as_str()))
            .chain(
                config
                    .redact_response_headers
                    .iter()
                    .map(|name| remove_response_header(name.as_str())),
            );

        let mut builder = Self::builder().mode(config.mode).filters(filters);
        if let Some(path) = &config.path {
            builder = builder.path(path);
        }
        builder.build()
    }

    pub(super) fn assemble(
        path: Option<PathBuf>,
        mode: Mode,
        filters: Vec<Filter>,
        transport: Option<Arc<dyn Transport>>,
        selector: Option<Arc<dyn Selector>>,
        codec: Option<Arc<dyn EntryCodec>>,
    ) -> Self {
        let path = path.map(|p| normalize_path(&p));
        let writer = path
            .as_ref()
            .filter(|_| mode.uses_disk())
            .map(|p| Mutex::new(RecordingWriter::new(p.clone())));

        Self {
            path,
            mode,
            filters,
            transport: transport.unwrap_or_else(|| Arc::new(HttpTransport::new())),
            selector,
            codec: codec.unwrap_or_else(|| Arc::new(YamlCodec)),
            loaded: OnceCell::new(),
            entries: RwLock::new(Vec::new()),
            writer,
            counters: Counters::default(),
        }
    }

    /// Operating mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Normalized recording file path, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Request counters
    #[must_use]
    pub fn stats(&self) -> RecorderStats {
        self.counters.snapshot()
    }

    /// Perform a request according to the recorder mode.
    ///
    /// | Mode          | Behavior                                                  |
    /// |---------------|-----------------------------------------------------------|
    /// | `Auto`        | Replay a matching entry; otherwise go live and record.    |
    /// | `ReplayOnly`  | Replay a matching entry; otherwise fail, never go live.   |
    /// | `Record`      | Always go live and record, even when an entry matches.    |
    /// | `Passthrough` | Always go live; keep the entry in memory, write nothing.  |
    ///
    /// Live responses are returned as they look after the filters ran.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NoRecordedEntry`] on a replay-only miss,
    /// [`RecorderError::Transport`] when the live call fails, and I/O or
    /// format errors from loading or writing the recording
    pub async fn execute<B>(&self, request: hyper::Request<B>) -> Result<hyper::Response<Full<Bytes>>>
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let mode = self.mode;
        self.ensure_loaded().await?;

        let (parts, body) = request.into_parts();

        if mode.replays() {
            if let Some(entry) = self.select(&parts) {
                debug!(
                    "Replaying {} {} -> {}",
                    parts.method, parts.uri, entry.response.status_code
                );
                self.counters.replayed.fetch_add(1, Ordering::Relaxed);
                return build_response(&entry.response);
            }

            if mode == Mode::ReplayOnly {
                warn!("No recorded entry for {} {}", parts.method, parts.uri);
                return Err(NoRecordedEntry {
                    method: parts.method,
                    uri: parts.uri,
                    version: parts.version,
                    headers: parts.headers,
                    body: collect_request_body(body).await?,
                }
                .into());
            }
        }

        // Buffer the request so the recorded copy and the sent copy agree
        let body = collect_request_body(body).await?;

        let recorded_request = Request {
            method: parts.method.to_string(),
            url: parts.uri.to_string(),
            headers: flatten_headers(&parts.headers),
            body: String::from_utf8_lossy(&body).into_owned(),
        };
        let outgoing = hyper::Request::from_parts(parts, Full::new(body));

        let started_at = Utc::now();
        let start = Instant::now();
        let response = self
            .transport
            .round_trip(outgoing)
            .await
            .map_err(RecorderError::Transport)?;

        let (parts, body) = response.into_parts();
        let body = body.collect().await.map_err(RecorderError::Body)?.to_bytes();
        let roundtrip = start.elapsed();

        self.counters.live.fetch_add(1, Ordering::Relaxed);
        info!(
            "{} {} -> {} ({}ms, mode: {})",
            recorded_request.method,
            recorded_request.url,
            parts.status.as_u16(),
            roundtrip.as_millis(),
            mode
        );

        // The body is stored decoded, so its transfer framing is not kept
        let mut headers = parts.headers;
        headers.remove(TRANSFER_ENCODING);

        let mut entry = Entry {
            request: recorded_request,
            response: Response {
                status_code: parts.status.as_u16(),
                headers: flatten_headers(&headers),
                body: String::from_utf8_lossy(&body).into_owned(),
            },
        };
        apply_filters(&self.filters, &mut entry);

        let response = build_response(&entry.response)?;
        self.entries.write().push(entry.clone());

        if mode.persists() {
            if let Some(writer) = &self.writer {
                writer
                    .lock()
                    .append(&entry, started_at, roundtrip, self.codec.as_ref())?;
                self.counters.persisted.fetch_add(1, Ordering::Relaxed);
            }
        }

        Ok(response)
    }

    /// First recorded entry for `method` and `url`, ignoring ASCII case.
    ///
    /// Always uses first-match selection, whatever selector the recorder was
    /// built with, and loads the recording if that has not happened yet.
    ///
    /// # Errors
    ///
    /// Returns error if the recording cannot be loaded
    pub async fn lookup(&self, method: &str, url: &str) -> Result<Option<Entry>> {
        self.ensure_loaded().await?;
        Ok(FirstMatch::find(&self.entries.read(), method, url))
    }

    /// Snapshot of every entry known to the recorder, in insertion order
    ///
    /// # Errors
    ///
    /// Returns error if the recording cannot be loaded
    pub async fn entries(&self) -> Result<Vec<Entry>> {
        self.ensure_loaded().await?;
        Ok(self.entries.read().clone())
    }

    /// Load the recording once. Concurrent callers wait for the first load;
    /// a failed load is retried by the next caller.
    async fn ensure_loaded(&self) -> Result<()> {
        self.loaded
            .get_or_try_init(|| async {
                let Some(path) = self.path.as_deref().filter(|_| self.mode.uses_disk()) else {
                    return Ok(());
                };

                let loaded = load_entries(path, self.codec.as_ref())?;
                info!("Loaded {} entries from {}", loaded.len(), path.display());
                self.entries.write().extend(loaded);
                Ok::<(), RecorderError>(())
            })
            .await?;
        Ok(())
    }

    fn select(&self, parts: &Parts) -> Option<Entry> {
        let entries = self.entries.read();
        match &self.selector {
            Some(selector) => selector.select(&entries, parts),
            None => FirstMatch.select(&entries, parts),
        }
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("filters", &self.filters.len())
            .field("custom_selector", &self.selector.is_some())
            .field("entries", &self.entries.read().len())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

async fn collect_request_body<B>(body: B) -> Result<Bytes>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    Ok(body
        .collect()
        .await
        .map_err(|e| RecorderError::Body(e.into()))?
        .to_bytes())
}

/// Caller-facing response for a recorded response.
///
/// The body is always sent whole, so any recorded `Transfer-Encoding` is
/// replaced by a `Content-Length`.
fn build_response(recorded: &Response) -> Result<hyper::Response<Full<Bytes>>> {
    let status = StatusCode::from_u16(recorded.status_code).map_err(|e| {
        RecorderError::InvalidResponse(format!("status {}: {e}", recorded.status_code))
    })?;

    let mut headers = expand_headers(&recorded.headers);
    headers.remove(TRANSFER_ENCODING);
    headers.insert(CONTENT_LENGTH, recorded.body.len().into());

    let mut response = hyper::Response::new(Full::new(Bytes::from(recorded.body.clone())));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

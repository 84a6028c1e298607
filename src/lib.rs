//! httptape - record/replay HTTP transport for deterministic tests
//!
//! A [`Recorder`] sits between an HTTP client and the network. Live responses
//! are written to a YAML recording file; later runs replay them without any
//! network traffic. See [`Mode`] for the available behaviors.
//!
//! ```no_run
//! use bytes::Bytes;
//! use http_body_util::Empty;
//! use httptape::{filter, Recorder};
//!
//! # async fn run() -> httptape::Result<()> {
//! let recorder = Recorder::new(
//!     "testdata/example",
//!     vec![filter::remove_request_header("Authorization")],
//! );
//!
//! let request = hyper::Request::get("http://example.com/")
//!     .header("Authorization", "secret")
//!     .body(Empty::<Bytes>::new())
//!     .unwrap();
//! let response = recorder.execute(request).await?;
//! assert!(response.status().is_success());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions
)]

pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod network;
pub mod recording;
pub mod selector;
pub mod storage;

pub use config::{Mode, RecorderConfig};
pub use entry::Entry;
pub use error::{NoRecordedEntry, RecorderError, Result};
pub use filter::Filter;
pub use recording::{Recorder, RecorderBuilder, RecorderStats};
pub use selector::{FirstMatch, OncePerCall, Selector};

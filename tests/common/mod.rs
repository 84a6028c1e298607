//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full};
use hyper::{Request, Response};

use httptape::error::BoxError;
use httptape::network::{full_body, ResponseBody, Transport};

/// Install a test subscriber; `RUST_LOG` selects the output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Transport answering every request locally.
///
/// Responds `200` with body `hello` (or the request body echoed back when
/// there is one), a `Content-Type`, a `Set-Cookie` and an `X-Call` header
/// numbering the call.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn round_trip(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<Response<ResponseBody>, BoxError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let body = request.into_body().collect().await?.to_bytes();
        let body = if body.is_empty() {
            Bytes::from_static(b"hello")
        } else {
            body
        };

        let response = Response::builder()
            .status(200)
            .header("content-type", "text/plain")
            .header("set-cookie", "session=secret")
            .header("x-call", call.to_string())
            .body(full_body(body))?;
        Ok(response)
    }
}

/// Transport that always fails, counting attempts
#[derive(Debug, Default)]
pub struct FailingTransport {
    calls: AtomicUsize,
}

impl FailingTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn round_trip(
        &self,
        _request: Request<Full<Bytes>>,
    ) -> Result<Response<ResponseBody>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err("connection refused".into())
    }
}

pub fn get(url: &str) -> Request<Empty<Bytes>> {
    Request::get(url).body(Empty::new()).unwrap()
}

pub fn post(url: &str, body: &'static str) -> Request<Full<Bytes>> {
    Request::post(url)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap()
}

pub async fn body_text(response: Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Transport answering with a chunked `hello`, the way a streaming server does
#[derive(Debug, Default)]
pub struct ChunkedTransport {
    calls: AtomicUsize,
}

impl ChunkedTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ChunkedTransport {
    async fn round_trip(
        &self,
        _request: Request<Full<Bytes>>,
    ) -> Result<Response<ResponseBody>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = Response::builder()
            .status(200)
            .header("content-type", "text/plain")
            .header("transfer-encoding", "chunked")
            .body(full_body("hello"))?;
        Ok(response)
    }
}

//! Live transport used for requests that are not replayed

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, warn};

use crate::error::BoxError;

/// Body type returned by transports
pub type ResponseBody = BoxBody<Bytes, BoxError>;

/// Sends a fully buffered request and returns the response.
///
/// Errors are passed through to the caller of `Recorder::execute`
/// untouched and are never recorded. Timeouts and retries belong to the
/// transport, not the recorder.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request
    async fn round_trip(&self, request: Request<Full<Bytes>>)
        -> Result<Response<ResponseBody>, BoxError>;
}

/// Box an in-memory body as a [`ResponseBody`]
#[must_use]
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Default transport: a pooled hyper client over plain HTTP
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpTransport {
    /// Create a new HTTP transport
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build_http();

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<Response<ResponseBody>, BoxError> {
        debug!("Sending {} {}", request.method(), request.uri());

        let response = self.client.request(request).await.map_err(|e| {
            warn!("Request failed: {e}");
            BoxError::from(e)
        })?;

        Ok(response.map(|body| body.map_err(BoxError::from).boxed()))
    }
}

//! Recorded request/response pairs

use std::collections::BTreeMap;

use hyper::header::{HeaderName, HeaderValue};
use hyper::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Header map with one value per name.
///
/// Multi-value headers keep only their first value. Names are stored in
/// canonical form (`Content-Type`), which is what filters match against.
pub type Headers = BTreeMap<String, String>;

/// A single recorded request/response pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Outgoing request
    pub request: Request,
    /// Response received for it
    pub response: Response,
}

/// A recorded outgoing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method
    pub method: String,
    /// Absolute URL
    pub url: String,
    /// Request headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: Headers,
    /// Request body
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

/// A recorded incoming response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status_code: u16,
    /// Response headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: Headers,
    /// Response body
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl Request {
    /// Whether this request has the given method and URL, ignoring ASCII case
    #[must_use]
    pub fn matches(&self, method: &str, url: &str) -> bool {
        self.method.eq_ignore_ascii_case(method) && self.url.eq_ignore_ascii_case(url)
    }
}

/// Collapse a header map to one value per canonical name
#[must_use]
pub fn flatten_headers(headers: &HeaderMap) -> Headers {
    let mut out = Headers::new();
    for name in headers.keys() {
        let Some(value) = headers.get(name) else {
            continue;
        };
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.insert(canonical_header_name(name.as_str()), value);
    }
    out
}

/// Expand a recorded header map back into a `HeaderMap`.
///
/// Names or values the HTTP stack rejects are skipped with a warning.
#[must_use]
pub fn expand_headers(headers: &Headers) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                out.insert(name, value);
            }
            _ => warn!("Skipping unrepresentable header {name:?}"),
        }
    }
    out
}

/// Canonical MIME form of a header name: `x-request-id` becomes `X-Request-Id`
#[must_use]
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("AUTHORIZATION"), "Authorization");
        assert_eq!(canonical_header_name("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_header_name("etag"), "Etag");
    }

    #[test]
    fn test_flatten_keeps_first_value() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let flat = flatten_headers(&headers);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat["Set-Cookie"], "a=1");
        assert_eq!(flat["Content-Type"], "text/plain");
    }

    #[test]
    fn test_expand_headers() {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Bad Name".to_string(), "x".to_string());

        let expanded = expand_headers(&headers);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded["content-type"], "application/json");
    }

    #[test]
    fn test_request_matches_ignores_case() {
        let request = Request {
            method: "GET".to_string(),
            url: "http://Example.com/Path".to_string(),
            ..Request::default()
        };

        assert!(request.matches("get", "http://example.com/path"));
        assert!(!request.matches("POST", "http://example.com/path"));
        assert!(!request.matches("GET", "http://example.com/other"));
    }
}

//! Network boundary for live requests

mod client;

pub use client::{full_body, HttpTransport, ResponseBody, Transport};

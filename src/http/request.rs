//! Inbound request as handed to the dispatcher by the transport.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
    /// Any non-standard method token.
    Extension,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
            Method::Connect => write!(f, "CONNECT"),
            Method::Trace => write!(f, "TRACE"),
            Method::Extension => write!(f, "EXTENSION"),
        }
    }
}

impl From<&hyper::Method> for Method {
    fn from(method: &hyper::Method) -> Self {
        match *method {
            hyper::Method::GET => Method::Get,
            hyper::Method::POST => Method::Post,
            hyper::Method::PUT => Method::Put,
            hyper::Method::DELETE => Method::Delete,
            hyper::Method::PATCH => Method::Patch,
            hyper::Method::HEAD => Method::Head,
            hyper::Method::OPTIONS => Method::Options,
            hyper::Method::CONNECT => Method::Connect,
            hyper::Method::TRACE => Method::Trace,
            _ => Method::Extension,
        }
    }
}

/// A fully-read HTTP request.
///
/// Header names are stored lowercased so lookups are case-insensitive,
/// matching how hyper presents them.
#[derive(Debug, Clone, Default)]
pub struct RuntimeRequest {
    /// HTTP method.
    pub method: Method,
    /// URL path, without the query string.
    pub path: String,
    /// HTTP headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// Request body, empty when none was sent.
    pub body: Bytes,
}

impl RuntimeRequest {
    /// Create a new request with no headers and an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value by case-insensitive name.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

//! Outbound response types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

/// Response produced by the dispatcher, handed back to the transport.
#[derive(Debug, Clone, Default)]
pub struct RuntimeResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// HTTP headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl RuntimeResponse {
    /// Create an empty response with the given status code.
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Create a 404 with no body.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    /// Create a text response.
    pub fn text(status: impl Into<StatusCode>, content: impl Into<String>) -> Self {
        let content: String = content.into();
        Self::new(status).body(content)
    }

    /// Add a header to the response.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the response body.
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
    pub fn text_body(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Writer given to HTTP invocation handlers.
///
/// The handler owns the status and body; headers set by the dispatcher
/// before the call (the log header) are preserved unless overwritten.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    response: RuntimeResponse,
    sent: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response header.
    pub fn set_header(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.response
            .headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Write the status and body. A second call replaces the first.
    pub fn send(&mut self, status: impl Into<StatusCode>, body: impl Into<Bytes>) {
        self.response.status = status.into();
        self.response.body = body.into();
        self.sent = true;
    }

    /// Whether the handler has written a response.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Finish writing. The flag reports whether `send` was ever called.
    pub fn into_parts(self) -> (RuntimeResponse, bool) {
        (self.response, self.sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_keeps_preset_headers_on_send() {
        let mut writer = ResponseWriter::new();
        writer.set_header("X-Fc-Log-Result", "log");
        assert!(!writer.is_sent());

        writer.send(StatusCode::OK, "echo:hi");
        let (response, sent) = writer.into_parts();
        assert!(sent);
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.get_header("x-fc-log-result"), Some("log"));
        assert_eq!(response.text_body(), "echo:hi");
    }

    #[test]
    fn unsent_writer_reports_not_sent() {
        let (response, sent) = ResponseWriter::new().into_parts();
        assert!(!sent);
        assert!(response.body.is_empty());
    }
}

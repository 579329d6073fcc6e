//! Per-request execution context parsed from the platform's reserved headers.

use crate::error::DispatchError;
use crate::http::RuntimeRequest;

/// Reserved request headers set by the Function Compute platform.
pub struct FcHeaders;

impl FcHeaders {
    pub const REQUEST_ID: &'static str = "x-fc-request-id";
    pub const ACCESS_KEY_ID: &'static str = "x-fc-access-key-id";
    pub const ACCESS_KEY_SECRET: &'static str = "x-fc-access-key-secret";
    pub const SECURITY_TOKEN: &'static str = "x-fc-security-token";
    pub const FUNCTION_HANDLER: &'static str = "x-fc-function-handler";
    pub const FUNCTION_INITIALIZER: &'static str = "x-fc-function-initializer";
    pub const CONTROL_PATH: &'static str = "x-fc-control-path";
    /// Response header carrying the escaped request log.
    pub const LOG_RESULT: &'static str = "x-fc-log-result";
}

/// Immutable snapshot of the identity and configuration of one request.
///
/// Optional headers that are absent become empty strings. Credentials are
/// passed through untouched; nothing here validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub request_id: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    pub security_token: String,
    pub handler_name: String,
    pub initializer_name: String,
    /// Route override; wins over the URL path when non-empty.
    pub control_path: String,
}

impl ExecutionContext {
    /// Create a context carrying only a request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Build the context from a request's headers.
    ///
    /// Fails only when `x-fc-request-id` is missing.
    pub fn from_request(request: &RuntimeRequest) -> Result<Self, DispatchError> {
        let request_id = request
            .get_header(FcHeaders::REQUEST_ID)
            .ok_or(DispatchError::MissingRequestId)?;

        let optional = |name: &str| request.get_header(name).unwrap_or_default().to_string();

        Ok(Self {
            request_id: request_id.to_string(),
            access_key_id: optional(FcHeaders::ACCESS_KEY_ID),
            access_key_secret: optional(FcHeaders::ACCESS_KEY_SECRET),
            security_token: optional(FcHeaders::SECURITY_TOKEN),
            handler_name: optional(FcHeaders::FUNCTION_HANDLER),
            initializer_name: optional(FcHeaders::FUNCTION_INITIALIZER),
            control_path: optional(FcHeaders::CONTROL_PATH),
        })
    }

    /// The path used for routing: the control path if set, else the URL path.
    pub fn effective_route<'a>(&'a self, url_path: &'a str) -> &'a str {
        if self.control_path.is_empty() {
            url_path
        } else {
            &self.control_path
        }
    }
}

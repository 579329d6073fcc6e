//! Handler contracts implemented by user function code.

use crate::function::context::ExecutionContext;
use crate::http::{ResponseWriter, RuntimeRequest};
use crate::logging::RequestLogger;
use async_trait::async_trait;
use bytes::Bytes;

/// Handler for plain-payload invocations (`/invoke`).
///
/// The logger passed to each call belongs to the current request and must not
/// be retained past the call.
#[async_trait]
pub trait InvocationHandler: Send + Sync {
    /// Run the function against `payload` and return the response body.
    async fn on_invoke(
        &self,
        payload: Bytes,
        context: &ExecutionContext,
        logger: &mut RequestLogger,
    ) -> Result<String, HandlerError>;

    /// One-time setup, called from `/initialize`.
    async fn on_initialize(
        &self,
        context: &ExecutionContext,
        logger: &mut RequestLogger,
    ) -> Result<(), HandlerError>;
}

/// Handler for raw HTTP invocations (`/http-invoke`).
///
/// The handler writes status and body itself through `response`; nothing is
/// sent on its behalf.
#[async_trait]
pub trait HttpInvocationHandler: Send + Sync {
    async fn on_invoke(
        &self,
        context: &ExecutionContext,
        request: &RuntimeRequest,
        response: &mut ResponseWriter,
        logger: &mut RequestLogger,
    ) -> Result<(), HandlerError>;

    /// One-time setup, called from `/initialize`.
    async fn on_initialize(
        &self,
        context: &ExecutionContext,
        logger: &mut RequestLogger,
    ) -> Result<(), HandlerError>;
}

/// Failure raised by a user callback.
///
/// Displays as the bare message; that text becomes the error response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

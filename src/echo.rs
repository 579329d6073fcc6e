//! Sample handlers bundled with the runtime binary.
//!
//! Both remember the initializer name seen by `/initialize` and echo it back
//! in front of the request body.

use crate::function::{ExecutionContext, HandlerError, HttpInvocationHandler, InvocationHandler};
use crate::http::{ResponseWriter, RuntimeRequest, StatusCode};
use crate::logging::RequestLogger;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

/// Echoes `/invoke` payloads.
#[derive(Debug, Default)]
pub struct EchoHandler {
    initializer: RwLock<String>,
}

impl EchoHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvocationHandler for EchoHandler {
    async fn on_invoke(
        &self,
        payload: Bytes,
        _context: &ExecutionContext,
        _logger: &mut RequestLogger,
    ) -> Result<String, HandlerError> {
        let mut response = self.initializer.read().await.clone();
        response.push_str(&String::from_utf8_lossy(&payload));
        Ok(response)
    }

    async fn on_initialize(
        &self,
        context: &ExecutionContext,
        logger: &mut RequestLogger,
    ) -> Result<(), HandlerError> {
        logger.log_info(format!("echo initializer: {}", context.initializer_name));
        *self.initializer.write().await = context.initializer_name.clone();
        Ok(())
    }
}

/// Echoes `/http-invoke` request bodies with a 200.
#[derive(Debug, Default)]
pub struct EchoHttpHandler {
    initializer: RwLock<String>,
}

impl EchoHttpHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpInvocationHandler for EchoHttpHandler {
    async fn on_invoke(
        &self,
        _context: &ExecutionContext,
        request: &RuntimeRequest,
        response: &mut ResponseWriter,
        _logger: &mut RequestLogger,
    ) -> Result<(), HandlerError> {
        let mut body = self.initializer.read().await.clone();
        body.push_str(&request.text());
        response.send(StatusCode::OK, body);
        Ok(())
    }

    async fn on_initialize(
        &self,
        context: &ExecutionContext,
        _logger: &mut RequestLogger,
    ) -> Result<(), HandlerError> {
        *self.initializer.write().await = context.initializer_name.clone();
        Ok(())
    }
}

//! # fc-runtime - Function Compute custom-runtime adapter
//!
//! A small HTTP server the Function Compute platform calls to run user code.
//! It exposes three control routes, builds a per-request
//! [`ExecutionContext`](function::ExecutionContext) from the platform's
//! reserved `x-fc-*` headers, forwards the payload to the registered handler
//! and returns the result with the request's log in `x-fc-log-result`.
//!
//! | Route | Method | Handler |
//! |---|---|---|
//! | `/initialize` | POST | `on_initialize` of every registered handler |
//! | `/invoke` | POST | [`InvocationHandler::on_invoke`](function::InvocationHandler::on_invoke) |
//! | `/http-invoke` | any | [`HttpInvocationHandler::on_invoke`](function::HttpInvocationHandler::on_invoke) |
//!
//! The `x-fc-control-path` header, when present, replaces the URL path for
//! routing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fc_runtime::prelude::*;
//! use std::sync::Arc;
//!
//! struct Upper;
//!
//! #[async_trait]
//! impl InvocationHandler for Upper {
//!     async fn on_invoke(
//!         &self,
//!         payload: Bytes,
//!         _context: &ExecutionContext,
//!         logger: &mut RequestLogger,
//!     ) -> Result<String, HandlerError> {
//!         logger.log_info("uppercasing");
//!         Ok(String::from_utf8_lossy(&payload).to_uppercase())
//!     }
//!
//!     async fn on_initialize(
//!         &self,
//!         _context: &ExecutionContext,
//!         _logger: &mut RequestLogger,
//!     ) -> Result<(), HandlerError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let registry = HandlerRegistry::new().with_invocation_handler(Arc::new(Upper))?;
//!     RuntimeServer::new(RuntimeConfig::default(), registry).run().await
//! }
//! ```

pub mod echo;
pub mod error;
pub mod function;
pub mod http;
pub mod logging;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::error::DispatchError;
    pub use crate::function::{
        ExecutionContext, FcHeaders, HandlerError, HandlerRegistry, HttpInvocationHandler,
        InvocationHandler,
    };
    pub use crate::http::{Method, ResponseWriter, RuntimeRequest, RuntimeResponse, StatusCode};
    pub use crate::logging::RequestLogger;
    pub use crate::runtime::{ControlRoute, Dispatcher, RuntimeConfig, RuntimeServer, ServerState};
    pub use async_trait::async_trait;
    pub use bytes::Bytes;
}

pub use error::DispatchError;
pub use function::{ExecutionContext, HandlerError, HandlerRegistry};
pub use logging::RequestLogger;
pub use runtime::{Dispatcher, RuntimeConfig, RuntimeServer, ServerState};

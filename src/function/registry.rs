//! Registry holding the user's handler implementations.

use crate::function::handler::{HttpInvocationHandler, InvocationHandler};
use std::sync::Arc;
use tracing::info;

/// Which of the two handler slots an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSlot {
    Invocation,
    HttpInvocation,
}

impl std::fmt::Display for HandlerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerSlot::Invocation => write!(f, "invocation"),
            HandlerSlot::HttpInvocation => write!(f, "http invocation"),
        }
    }
}

/// Registration failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("an {0} handler is already registered")]
    AlreadyRegistered(HandlerSlot),
}

/// Two independent write-once slots, one per handler contract.
///
/// Filled during startup, then moved into the server state where it is only
/// read. Either, both or neither slot may be populated.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    invocation: Option<Arc<dyn InvocationHandler>>,
    http_invocation: Option<Arc<dyn HttpInvocationHandler>>,
}

impl HandlerRegistry {
    /// Create a registry with both slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the plain invocation handler.
    pub fn register_invocation_handler(
        &mut self,
        handler: Arc<dyn InvocationHandler>,
    ) -> Result<(), RegistryError> {
        if self.invocation.is_some() {
            return Err(RegistryError::AlreadyRegistered(HandlerSlot::Invocation));
        }
        self.invocation = Some(handler);
        info!("Registered {} handler", HandlerSlot::Invocation);
        Ok(())
    }

    /// Register the HTTP invocation handler.
    pub fn register_http_handler(
        &mut self,
        handler: Arc<dyn HttpInvocationHandler>,
    ) -> Result<(), RegistryError> {
        if self.http_invocation.is_some() {
            return Err(RegistryError::AlreadyRegistered(HandlerSlot::HttpInvocation));
        }
        self.http_invocation = Some(handler);
        info!("Registered {} handler", HandlerSlot::HttpInvocation);
        Ok(())
    }

    /// Builder form of [`register_invocation_handler`](Self::register_invocation_handler).
    pub fn with_invocation_handler(
        mut self,
        handler: Arc<dyn InvocationHandler>,
    ) -> Result<Self, RegistryError> {
        self.register_invocation_handler(handler)?;
        Ok(self)
    }

    /// Builder form of [`register_http_handler`](Self::register_http_handler).
    pub fn with_http_handler(
        mut self,
        handler: Arc<dyn HttpInvocationHandler>,
    ) -> Result<Self, RegistryError> {
        self.register_http_handler(handler)?;
        Ok(self)
    }

    pub fn invocation_handler(&self) -> Option<&Arc<dyn InvocationHandler>> {
        self.invocation.as_ref()
    }

    pub fn http_handler(&self) -> Option<&Arc<dyn HttpInvocationHandler>> {
        self.http_invocation.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.invocation.is_none() && self.http_invocation.is_none()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("invocation", &self.invocation.is_some())
            .field("http_invocation", &self.http_invocation.is_some())
            .finish()
    }
}

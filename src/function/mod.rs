//! User-facing function contracts: context, handlers and their registry.

pub mod context;
pub mod handler;
pub mod registry;

pub use context::{ExecutionContext, FcHeaders};
pub use handler::{HandlerError, HttpInvocationHandler, InvocationHandler};
pub use registry::{HandlerRegistry, HandlerSlot, RegistryError};

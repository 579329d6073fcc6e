//! State shared by every request the server handles.

use crate::function::registry::HandlerRegistry;
use tokio::sync::RwLock;

/// Shared server state: the handler registry and the cached init log.
///
/// The registry is fixed at construction. The init log is overwritten by every
/// successful `/initialize` and read by every invocation. Concurrent
/// initializations, or an initialization racing an invocation, may leave an
/// invocation reporting a stale init log; initialization is expected to run
/// once, before invocation traffic.
#[derive(Debug, Default)]
pub struct ServerState {
    registry: HandlerRegistry,
    init_log: RwLock<String>,
}

impl ServerState {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            init_log: RwLock::new(String::new()),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Serialized log of the most recent successful initialization.
    pub async fn init_log(&self) -> String {
        self.init_log.read().await.clone()
    }

    /// Replace the cached init log.
    pub async fn set_init_log(&self, log: impl Into<String>) {
        *self.init_log.write().await = log.into();
    }

    /// Clear the cached init log.
    pub async fn reset_init_log(&self) {
        self.init_log.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_log_can_be_injected_and_reset() {
        let state = ServerState::new(HandlerRegistry::new());
        tokio_test::block_on(async {
            assert_eq!(state.init_log().await, "");
            state.set_init_log("cached").await;
            assert_eq!(state.init_log().await, "cached");
            state.reset_init_log().await;
            assert_eq!(state.init_log().await, "");
        });
    }
}

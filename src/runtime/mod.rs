//! The runtime: shared state, dispatcher and the HTTP server around them.

mod config;
mod dispatcher;
mod server;
mod state;

pub use config::RuntimeConfig;
pub use dispatcher::{ControlRoute, Dispatcher};
pub use server::RuntimeServer;
pub use state::ServerState;

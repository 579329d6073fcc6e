//! Transport-neutral HTTP types seen by the dispatcher and by handlers.

mod request;
mod response;

pub use request::{Method, RuntimeRequest};
pub use response::{ResponseWriter, RuntimeResponse, StatusCode};

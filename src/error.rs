//! Dispatch outcomes and their mapping onto HTTP responses.

use crate::function::context::FcHeaders;
use crate::function::handler::HandlerError;
use crate::http::{RuntimeResponse, StatusCode};
use crate::runtime::ControlRoute;
use thiserror::Error;

/// Every way a request can end without the normal success response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The request carried no `x-fc-request-id` header.
    #[error("missing required header: {}", FcHeaders::REQUEST_ID)]
    MissingRequestId,

    /// The slot required by the route is empty.
    #[error("{}", .0.not_registered_message())]
    HandlerNotRegistered(ControlRoute),

    /// A user callback returned an error.
    #[error(transparent)]
    InvocationFailure(#[from] HandlerError),

    /// An HTTP handler returned without writing a response.
    #[error("The http handler did not send a response.")]
    ResponseNotSent,

    /// Path and method matched no control route.
    #[error("no route matched")]
    UnknownRoute,
}

impl DispatchError {
    /// HTTP status for this outcome.
    ///
    /// Context and handler failures answer 404, not 500.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::HandlerNotRegistered(_) | DispatchError::ResponseNotSent => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            DispatchError::MissingRequestId
            | DispatchError::InvocationFailure(_)
            | DispatchError::UnknownRoute => StatusCode::NOT_FOUND,
        }
    }

    /// Whether the failure is recorded at ERROR level in the request log.
    pub fn is_logged(&self) -> bool {
        matches!(
            self,
            DispatchError::MissingRequestId
                | DispatchError::InvocationFailure(_)
                | DispatchError::ResponseNotSent
        )
    }

    /// Build the response for this outcome. Unknown routes get an empty body.
    pub fn into_response(self) -> RuntimeResponse {
        match self {
            DispatchError::UnknownRoute => RuntimeResponse::not_found(),
            other => RuntimeResponse::text(other.status(), other.to_string()),
        }
    }
}

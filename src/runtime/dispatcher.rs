//! Request dispatcher for the three control routes.
//!
//! For each request the dispatcher builds an [`ExecutionContext`], resolves the
//! route (the `x-fc-control-path` header wins over the URL path), calls the
//! registered handler and turns the outcome into a [`RuntimeResponse`]. All
//! failures come back as a [`DispatchError`] and are mapped onto a response in
//! one place.

use crate::error::DispatchError;
use crate::function::context::{ExecutionContext, FcHeaders};
use crate::http::{Method, ResponseWriter, RuntimeRequest, RuntimeResponse, StatusCode};
use crate::logging::{LogString, RequestLogger};
use crate::runtime::ServerState;
use std::sync::Arc;
use tracing::debug;

/// The control routes the platform calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRoute {
    Initialize,
    Invoke,
    HttpInvoke,
}

impl ControlRoute {
    /// Match an exact route path.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/initialize" => Some(ControlRoute::Initialize),
            "/invoke" => Some(ControlRoute::Invoke),
            "/http-invoke" => Some(ControlRoute::HttpInvoke),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            ControlRoute::Initialize => "/initialize",
            ControlRoute::Invoke => "/invoke",
            ControlRoute::HttpInvoke => "/http-invoke",
        }
    }

    /// `/http-invoke` takes any method, the others only POST.
    pub fn accepts(&self, method: Method) -> bool {
        match self {
            ControlRoute::HttpInvoke => true,
            ControlRoute::Initialize | ControlRoute::Invoke => method == Method::Post,
        }
    }

    /// Body of the 500 sent when the route's handler slot is empty.
    pub fn not_registered_message(&self) -> &'static str {
        match self {
            ControlRoute::Initialize => "The init handler is not registered.",
            ControlRoute::Invoke => "The invoke handler is not registered.",
            ControlRoute::HttpInvoke => "The http handler is not registered.",
        }
    }
}

impl std::fmt::Display for ControlRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Routes requests to the handlers held in the shared [`ServerState`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    state: Arc<ServerState>,
}

impl Dispatcher {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Handle one request with a fresh logger.
    pub async fn dispatch(&self, request: &RuntimeRequest) -> RuntimeResponse {
        let mut logger = RequestLogger::default();
        self.dispatch_with_logger(request, &mut logger).await
    }

    /// Handle one request, recording into the caller's logger.
    ///
    /// Never fails: every outcome ends in a response.
    pub async fn dispatch_with_logger(
        &self,
        request: &RuntimeRequest,
        logger: &mut RequestLogger,
    ) -> RuntimeResponse {
        debug!("{} {} is called", request.method, request.path);

        match self.route(request, logger).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_logged() {
                    logger.log_error(err.to_string());
                }
                err.into_response()
            }
        }
    }

    async fn route(
        &self,
        request: &RuntimeRequest,
        logger: &mut RequestLogger,
    ) -> Result<RuntimeResponse, DispatchError> {
        let context = ExecutionContext::from_request(request)?;
        logger.set_request_id(context.request_id.as_str());

        let route = ControlRoute::from_path(context.effective_route(&request.path))
            .filter(|route| route.accepts(request.method))
            .ok_or(DispatchError::UnknownRoute)?;

        match route {
            ControlRoute::Invoke => self.invoke(&context, request, logger).await,
            ControlRoute::Initialize => self.initialize(&context, logger).await,
            ControlRoute::HttpInvoke => self.http_invoke(&context, request, logger).await,
        }
    }

    async fn invoke(
        &self,
        context: &ExecutionContext,
        request: &RuntimeRequest,
        logger: &mut RequestLogger,
    ) -> Result<RuntimeResponse, DispatchError> {
        logger.log_info("handling invoke");
        let handler = self
            .state
            .registry()
            .invocation_handler()
            .ok_or(DispatchError::HandlerNotRegistered(ControlRoute::Invoke))?;

        LogString::start_invoke(&context.request_id);
        let body = handler
            .on_invoke(request.body.clone(), context, logger)
            .await?;
        LogString::end_invoke(&context.request_id);

        let log = self.log_result(logger).await;
        Ok(RuntimeResponse::text(StatusCode::OK, body).header(FcHeaders::LOG_RESULT, log))
    }

    async fn initialize(
        &self,
        context: &ExecutionContext,
        logger: &mut RequestLogger,
    ) -> Result<RuntimeResponse, DispatchError> {
        logger.log_info("handling initialize");
        let registry = self.state.registry();
        if registry.is_empty() {
            return Err(DispatchError::HandlerNotRegistered(ControlRoute::Initialize));
        }

        LogString::start_init(&context.request_id);
        // Plain handler strictly before the HTTP handler.
        if let Some(handler) = registry.invocation_handler() {
            handler.on_initialize(context, logger).await?;
        }
        if let Some(handler) = registry.http_handler() {
            handler.on_initialize(context, logger).await?;
        }
        LogString::end_init(&context.request_id);

        self.state.set_init_log(logger.get_log()).await;
        Ok(RuntimeResponse::new(StatusCode::OK))
    }

    async fn http_invoke(
        &self,
        context: &ExecutionContext,
        request: &RuntimeRequest,
        logger: &mut RequestLogger,
    ) -> Result<RuntimeResponse, DispatchError> {
        logger.log_info("handling http invoke");
        let handler = self
            .state
            .registry()
            .http_handler()
            .ok_or(DispatchError::HandlerNotRegistered(ControlRoute::HttpInvoke))?;

        // The log header is fixed before the handler runs.
        let mut writer = ResponseWriter::new();
        writer.set_header(FcHeaders::LOG_RESULT, self.log_result(logger).await);

        LogString::start_invoke(&context.request_id);
        handler.on_invoke(context, request, &mut writer, logger).await?;
        LogString::end_invoke(&context.request_id);

        match writer.into_parts() {
            (response, true) => Ok(response),
            (_, false) => Err(DispatchError::ResponseNotSent),
        }
    }

    /// Cached init log followed by this request's log.
    async fn log_result(&self, logger: &RequestLogger) -> String {
        let mut log = self.state.init_log().await;
        log.push_str(&logger.get_log());
        log
    }
}

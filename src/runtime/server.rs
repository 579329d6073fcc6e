//! HTTP/1.1 server feeding requests to the dispatcher.

use crate::function::registry::HandlerRegistry;
use crate::http::{Method, RuntimeRequest, RuntimeResponse, StatusCode};
use crate::logging::LogString;
use crate::runtime::{Dispatcher, RuntimeConfig, ServerState};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderName, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Custom-runtime HTTP server.
///
/// Owns the shared state built from a handler registry that was completed
/// before the server was constructed; registration cannot happen afterwards.
pub struct RuntimeServer {
    /// Server configuration.
    config: RuntimeConfig,
    /// Dispatcher over the shared state.
    dispatcher: Dispatcher,
}

impl RuntimeServer {
    /// Create a server around a fully populated registry.
    pub fn new(config: RuntimeConfig, registry: HandlerRegistry) -> Self {
        let state = Arc::new(ServerState::new(registry));
        Self {
            config,
            dispatcher: Dispatcher::new(state),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Shared state, for inspecting or resetting the cached init log.
    pub fn state(&self) -> Arc<ServerState> {
        self.dispatcher.state().clone()
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        self.serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve connections from an already bound listener until `shutdown`
    /// resolves. Connections in flight are left to finish on their own tasks.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Runtime listening on {}", listener.local_addr()?);
        info!("{}", LogString::RUNTIME_STARTED);

        tokio::pin!(shutdown);
        loop {
            let (stream, remote_addr) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => break,
            };
            let io = TokioIo::new(stream);
            let dispatcher = self.dispatcher.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let dispatcher = dispatcher.clone();
                    async move { handle_request(req, dispatcher, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }

        info!("Shutting down server");
        Ok(())
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    dispatcher: Dispatcher,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    debug!("Handling request: {} {} from {}", req.method(), req.uri().path(), remote_addr);

    let request = match convert_request(req).await {
        Ok(req) => req,
        Err(e) => {
            warn!("Failed to read request: {}", e);
            return Ok(build_response(RuntimeResponse::text(
                StatusCode::BAD_REQUEST,
                e.to_string(),
            )));
        }
    };

    Ok(build_response(dispatcher.dispatch(&request).await))
}

/// Convert a hyper request into a fully read [`RuntimeRequest`].
async fn convert_request(req: Request<Incoming>) -> Result<RuntimeRequest, hyper::Error> {
    let method = Method::from(req.method());
    let path = req.uri().path().to_string();

    // Values are copied as sent; non-UTF-8 bytes become U+FFFD.
    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let body = req.collect().await?.to_bytes();

    Ok(RuntimeRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Build a hyper response, dropping headers hyper would reject.
fn build_response(response: RuntimeResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut out = Response::new(Full::new(response.body));
    *out.status_mut() = status;

    for (name, value) in response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            (Ok(name), Ok(value)) => {
                out.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping invalid response header '{}'", name),
        }
    }

    out
}

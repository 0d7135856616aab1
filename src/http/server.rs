//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the check handler (every method is answered)
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Dispatch requests to the check dispatcher
//! - Graceful shutdown when the caller's future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    routing::any,
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::http::dispatch::Dispatcher;
use crate::probe::{CombinedResponse, HttpProber, ProbeError, Prober};

/// Header carrying the per-request identifier.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the origin status service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let prober = HttpProber::new(&config.probe)?;
        let dispatcher = Arc::new(Dispatcher::from_config(&config, prober));

        tracing::info!(
            checks = ?dispatcher.registry().names(),
            probe_timeout = ?dispatcher.coordinator().prober().timeout(),
            "Check registry loaded"
        );

        let router = build_router(dispatcher, &config);
        Ok(Self { router, config })
    }

    /// Run the server until `shutdown` resolves, then drain in-flight checks.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router<P: Prober>(dispatcher: Arc<Dispatcher<P>>, config: &ServiceConfig) -> Router {
    Router::new()
        .route("/", any(check_handler::<P>))
        .route("/{*path}", any(check_handler::<P>))
        .with_state(dispatcher)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// Runs the check named by the request path and writes its body once.
async fn check_handler<P: Prober>(
    State(dispatcher): State<Arc<Dispatcher<P>>>,
    headers: HeaderMap,
    uri: Uri,
) -> Json<CombinedResponse> {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Json(dispatcher.dispatch(&request_id, &uri).await)
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all proxy handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch every request to the augmentation pipeline
//! - Graceful shutdown on Ctrl+C or an explicit shutdown signal

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response, StatusCode},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, ProxyConfig};
use crate::http::request::MakeRequestUuid;
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::pipeline::AugmentationPipeline;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: AugmentationPipeline,
}

/// HTTP server hosting the augmentation pipeline.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let pipeline = AugmentationPipeline::from_config(&config)?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create a server around an already built pipeline.
    pub fn with_pipeline(config: ProxyConfig, pipeline: AugmentationPipeline) -> Self {
        let router = Self::build_router(&config, AppState { pipeline });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// A request that outlives `timeouts.request_secs` was held up by the
    /// identity service or the upstream, so it is answered `504`.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            identity_endpoint = %self.config.path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every route lands here; the pipeline decides what happens.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response<Body> {
    state.pipeline.handle(request).await
}

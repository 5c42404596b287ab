//! HTTP server that hosts webhook routers on axum.
//!
//! A router implements [`Webhook`]; [`webhook_route`] turns it into an axum
//! route accepting any method, and [`WebhookServer`] binds a listener, mounts
//! the routes alongside `/health`, and shuts down gracefully on [`WebhookServer::stop`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    response::{IntoResponse, Json},
    routing::{MethodRouter, any, get},
};
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::response::WebhookResponse;

/// Trait implemented by the webhook routers.
/// The transport calls this once per inbound request with the raw body.
pub trait Webhook: Send + Sync + 'static {
    fn serve(
        &self,
        headers: HeaderMap,
        body: Bytes,
    ) -> impl std::future::Future<Output = WebhookResponse> + Send;
}

/// Errors raised while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid bind address {0}")]
    InvalidAddress(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (0 for OS-assigned)
    pub port: u16,
    /// Hostname to bind to
    pub hostname: String,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9001,
            hostname: "0.0.0.0".into(),
            enable_cors: false,
        }
    }
}

/// An axum route that forwards every request, whatever its method, to `webhook`.
///
/// The request body limit is lifted: event rows can be arbitrarily large and
/// every body must reach the router so failures come back as JSON errors.
pub fn webhook_route<W: Webhook, S>(webhook: Arc<W>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    any(webhook_handler::<W>)
        .with_state(webhook)
        .layer(DefaultBodyLimit::disable())
}

/// Mount `webhook` at `path` on a fresh router.
pub fn mount<W: Webhook>(webhook: Arc<W>, path: &str) -> Router {
    Router::new().route(path, webhook_route(webhook))
}

async fn webhook_handler<W: Webhook>(
    State(webhook): State<Arc<W>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResponse {
    webhook.serve(headers, body).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// The webhook server: owns the listener task and its shutdown signal.
pub struct WebhookServer {
    /// Shutdown signal
    shutdown_tx: Option<mpsc::Sender<()>>,
    /// Server task handle
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Actual bound address
    local_addr: SocketAddr,
}

impl WebhookServer {
    /// Bind and start serving `routes` in a background task.
    pub async fn start(config: ServerConfig, routes: Router) -> Result<Self, TransportError> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let mut app = routes
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http());
        if config.enable_cors {
            app = app.layer(CorsLayer::permissive());
        }

        let addr: SocketAddr = format!("{}:{}", config.hostname, config.port)
            .parse()
            .map_err(|_| TransportError::InvalidAddress(format!("{}:{}", config.hostname, config.port)))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        info!("Webhook server listening on http://{local_addr}");

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await;
            if let Err(e) = result {
                error!("Webhook server stopped with error: {e}");
            }
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            local_addr,
        })
    }

    /// Get the actual bound port.
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Gracefully stop the server, waiting for in-flight requests.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("Webhook server stopped");
    }
}

//! API Server
//!
//! HTTP surface of the signal relay.
//!
//! # Features
//!
//! - **Config**: store the frontend's trading configuration verbatim
//! - **Webhook**: evaluate indicator signals and place testnet market buys
//! - **History**: executed orders and partial executions, newest first
//! - **OpenAPI**: generated document at `/api-docs/openapi.json`
//!
//! # Example
//!
//! ```ignore
//! use api_server::{ApiServer, ServerConfig};
//!
//! let server = ApiServer::new(ServerConfig::from_env(), relay_core::config::Config::from_env()?)?;
//! server.run().await?;
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Request};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// Origin of the hosted dashboard.
pub const DEFAULT_FRONTEND_URL: &str = "https://trading-bot-frontend-jet.vercel.app";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Only origin allowed for cross-origin requests.
    pub frontend_origin: String,
    /// Enable CORS for all origins (development only).
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_origin: DEFAULT_FRONTEND_URL.to_string(),
            cors_permissive: false,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // Hosting platforms inject PORT; API_PORT is the local override
            port: std::env::var("PORT")
                .or_else(|_| std::env::var("API_PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            frontend_origin: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            cors_permissive: std::env::var("CORS_PERMISSIVE")
                .map(|v| v == "true")
                .unwrap_or(false),
        }
    }

    /// Get the socket address.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// CORS policy for the configured frontend.
    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        if self.cors_permissive {
            return Ok(CorsLayer::permissive());
        }

        let origin: HeaderValue = self.frontend_origin.trim_end_matches('/').parse()?;
        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}

/// Router with tracing, body limit and CORS layers applied.
pub fn build_app(state: Arc<AppState>, config: &ServerConfig) -> anyhow::Result<Router> {
    let router = create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .on_request(|request: &Request<_>, _span: &tracing::Span| {
                    tracing::info!(
                        method = %request.method(),
                        uri = %request.uri(),
                        "Incoming request"
                    );
                })
                .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = latency.as_millis(),
                            "Request failed"
                        );
                    },
                ),
        )
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB
        .layer(config.cors_layer()?);

    Ok(router)
}

/// The API server.
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(config: ServerConfig, relay_config: relay_core::config::Config) -> anyhow::Result<Self> {
        let state = Arc::new(AppState::new(&relay_config)?);
        Ok(Self { config, state })
    }

    /// Run the server until Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        let router = build_app(self.state.clone(), &self.config)?;

        let addr = self.config.socket_addr()?;
        info!(
            address = %addr,
            frontend = %self.config.frontend_origin,
            cors_permissive = self.config.cors_permissive,
            "Starting API server"
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

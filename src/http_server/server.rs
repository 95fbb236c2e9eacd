//! # HTTP Server
//!
//! Combines the health check and the card routes behind CORS and request
//! tracing, and runs them until a shutdown signal arrives.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::health::health_routes;
use crate::observability::Event;
use crate::rest_api::RestServer;
use crate::service::CardService;
use crate::store::RecordStore;

/// HTTP server for the card API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server for `service` with the given configuration
    pub fn with_config<S>(config: HttpServerConfig, service: CardService<S>) -> Self
    where
        S: RecordStore + ?Sized + 'static,
    {
        let router = Self::build_router(&config, service);
        Self { config, router }
    }

    fn build_router<S>(config: &HttpServerConfig, service: CardService<S>) -> Router
    where
        S: RecordStore + ?Sized + 'static,
    {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(RestServer::new(service).router())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds and serves until `shutdown` resolves, then drains open
    /// connections.
    pub async fn start<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?;

        tracing::info!(event = Event::ServerListening.as_str(), %addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(event = Event::ShutdownComplete.as_str());
        Ok(())
    }
}

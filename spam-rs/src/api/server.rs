//! API Server - HTTP server for the REST API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::service::AnalysisService;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(service: AnalysisService, addr: String) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            addr,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let api_routes = Router::new()
            .route("/predict", post(handlers::predict))
            .route("/scan", post(handlers::scan))
            .route("/bulk-analyze", post(handlers::bulk_analyze))
            .route(
                "/history",
                get(handlers::list_history).delete(handlers::clear_history),
            )
            .route("/history/:id", get(handlers::get_scan))
            .route("/history/:id/download", get(handlers::download_scan))
            .route("/reports", get(handlers::list_reports))
            .route("/reports/:id", get(handlers::get_report))
            .route("/reports/:id/download", get(handlers::download_report))
            .route("/stats", get(handlers::user_stats))
            .route("/word-stats", get(handlers::word_stats));

        Router::new()
            .route("/health", get(handlers::health))
            .nest("/api", api_routes)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Starting API server on {}", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: tokio::net::TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}

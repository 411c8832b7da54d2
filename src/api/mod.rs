//! HTTP API - axum router, shared state and server loop.
//!
//! Public routes serve the storefront (catalog, quotes, uploads, checkout);
//! admin routes sit behind the [`auth::require_admin`] middleware.

/// Admin identity middleware
pub mod auth;
/// Catalog and status registry endpoints
pub mod catalog;
/// `Error` to HTTP response mapping
pub mod error;
/// Order endpoints
pub mod orders;
/// Quote endpoint
pub mod quote;
/// Upload endpoint
pub mod upload;

use crate::{
    core::{
        mesh::{BoundingBoxHeuristic, VolumeStrategy},
        storage::LocalObjectStore,
    },
    errors::Result,
};
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Headroom for multipart framing and form fields around the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub database: DatabaseConnection,
    /// Where uploads are written
    pub storage: Arc<LocalObjectStore>,
    /// Volume estimation used for quotes
    pub volume: Arc<dyn VolumeStrategy>,
}

impl AppState {
    /// Creates state with the bounding-box volume heuristic.
    #[must_use]
    pub fn new(database: DatabaseConnection, storage: LocalObjectStore) -> Self {
        Self {
            database,
            storage: Arc::new(storage),
            volume: Arc::new(BoundingBoxHeuristic),
        }
    }

    /// Replaces the volume strategy used for quotes.
    #[must_use]
    pub fn with_volume_strategy(mut self, volume: Arc<dyn VolumeStrategy>) -> Self {
        self.volume = volume;
        self
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.storage.max_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let admin = Router::new()
        .route(
            "/order/:id",
            get(orders::get_order).put(orders::update_order),
        )
        .route("/order/:id/history", get(orders::order_history))
        .route("/orders", get(orders::list_orders))
        .route("/admin/summary", get(orders::summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let public = Router::new()
        .route("/order", post(orders::create_order))
        .route("/upload", post(upload::upload))
        .route("/quote", post(quote::quote))
        .route("/materials", get(catalog::materials))
        .route("/statuses", get(catalog::statuses));

    Router::new()
        .nest("/api/boxprint", public.merge(admin))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}

/// Binds `bind_addr` and serves the API until Ctrl-C.
///
/// # Errors
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("HTTP API listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

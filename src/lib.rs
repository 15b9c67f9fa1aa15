//! Study Sheet
//!
//! A REST backend with SQLite persistence for a personal Topic → Subtopic → Question
//! study sheet, plus the client-side sheet state model and the sync layer that keeps it
//! in step with the server.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod sheet;
pub mod sync;

use std::path::Path;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;
use errors::AppError;
use models::{SeedDocument, SheetDocument};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
    /// Seed sheet normalized at startup, if one was configured.
    pub seed: Option<Arc<SheetDocument>>,
}

/// Read a seed document from disk and normalize it into a sheet.
pub async fn load_seed(path: &Path) -> Result<SheetDocument, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Config(format!("Cannot read seed file {}: {}", path.display(), e))
    })?;
    let seed: SeedDocument = serde_json::from_str(&raw)?;
    let document = sheet::normalize(seed.into_records()).to_document();
    sheet::validate_document(&document)?;
    Ok(document)
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login));

    // Sheet routes require a bearer token
    let sheet_routes = Router::new()
        .route("/sheet", get(api::get_sheet).put(api::put_sheet))
        .route("/sheet/import", post(api::import_sheet))
        .route("/sheet/seed", post(api::reset_to_seed))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", auth_routes.merge(sheet_routes))
        .merge(health_routes)
        .fallback(api::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

pub mod error;
pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::http::state::{DetectionState, StorageState};

/// Acepta cualquier origen, método y cabecera. No apto para producción.
fn open_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn detection_router(state: DetectionState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::detection_root))
        .route("/predict", post(routes::predict))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(open_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn storage_router(state: StorageState) -> Router {
    Router::new()
        .route("/", get(routes::storage_root))
        .route("/save", post(routes::save))
        .route("/GetGarbagePercent", get(routes::garbage_percent))
        .layer(open_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Router configuration for the Depot web API.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_directory, delete_item, file_tree, monitor, move_item, rename, search, upload_file,
    uploaded_list, AppState,
};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/uploadfile/", post(upload_file))
        .route("/uploaded-list/", get(uploaded_list))
        .route("/createdir/", post(create_directory))
        .route("/search/", get(search))
        .route("/rename/", put(rename))
        .route("/delete/", delete(delete_item))
        .route("/move/", post(move_item))
        .route("/filetree/", get(file_tree))
        .route("/monitor/", get(monitor));

    // Stored files are served directly, the way the upload directory
    // is mounted as a static route in the UI.
    let uploads = ServeDir::new(app_state.repository.root());

    let body_limit = app_state.max_upload_size as usize;

    Router::new()
        .merge(api_routes)
        .nest_service("/uploads", uploads)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create the CORS layer. An empty origin list allows any origin.
fn create_cors_layer(cors_origins: &[String]) -> CorsLayer {
    if cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

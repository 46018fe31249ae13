pub mod analyze;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(analyze::upload_page))
        .route("/analyze", post(analyze::analyze))
        .route("/health", get(health::health_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        // Resumes are small, but the 2 MB multipart default is too tight for
        // design-heavy PDFs
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}

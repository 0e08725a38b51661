//! HTTP API for docgen.
//!
//! Serves project and template management plus document generation on top
//! of a [`docgen_core`] store and the [`docgen_template`] engine.

pub mod config;
pub mod error;
pub mod handlers;

use std::convert::Infallible;

use axum::extract::DefaultBodyLimit;
use axum::http::header;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, Locale};
pub use error::ApiError;
pub use handlers::AppState;

use handlers::{
    create_project_handler, delete_project_handler, delete_template_handler,
    generate_and_save_handler, generate_handler, get_project_handler, health_handler,
    list_projects_handler, list_templates_handler, update_project_handler,
    upload_template_handler,
};

/// Build the API router.
///
/// `max_upload_bytes` bounds the template upload request body; other routes
/// keep axum's default limit.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    let upload = post(upload_template_handler)
        .layer::<_, Infallible>(DefaultBodyLimit::disable())
        .layer::<_, Infallible>(RequestBodyLimitLayer::new(max_upload_bytes));

    Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/api/projects/{id}",
            get(get_project_handler)
                .put(update_project_handler)
                .delete(delete_project_handler),
        )
        .route("/api/templates", get(list_templates_handler))
        .route("/api/templates/upload", upload)
        .route("/api/templates/{id}", delete(delete_template_handler))
        .route("/api/documents/generate", post(generate_handler))
        .route(
            "/api/documents/generate-and-save",
            post(generate_and_save_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! HTTP handlers.
//!
//! Implements:
//! - GET /api/health - Health check endpoint
//! - /api/projects - Project CRUD
//! - /api/templates - Template listing, upload and removal
//! - /api/documents - Document generation

mod documents;
mod projects;
mod templates;

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use docgen_core::{ProjectStore, TemplateStore};
use docgen_template::PlaceholderDictionary;
use serde::Serialize;

pub use documents::{generate_and_save_handler, generate_handler};
pub use projects::{
    create_project_handler, delete_project_handler, get_project_handler, list_projects_handler,
    update_project_handler,
};
pub use templates::{delete_template_handler, list_templates_handler, upload_template_handler};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectStore>,
    pub templates: Arc<dyn TemplateStore>,
    pub dictionary: Arc<PlaceholderDictionary>,
}

impl AppState {
    /// Build state from one backend serving both projects and templates.
    pub fn new<S>(store: Arc<S>, dictionary: PlaceholderDictionary) -> Self
    where
        S: ProjectStore + TemplateStore + 'static,
    {
        Self {
            projects: store.clone(),
            templates: store,
            dictionary: Arc::new(dictionary),
        }
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    pub placeholders: usize,
}

/// GET /api/health - Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        placeholders: state.dictionary.len(),
    })
}

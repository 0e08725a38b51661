use std::path::Path as FsPath;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use docgen_core::{Template, TemplateFormat, DEFAULT_DOCUMENT_TYPE};
use docgen_template::discover;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::error::{ApiError, Result};

/// GET /api/templates
pub async fn list_templates_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Template>>> {
    Ok(Json(state.templates.list_templates().await?))
}

/// POST /api/templates/upload
///
/// Multipart fields: `file` (the `.docx`/`.pptx` package) and an optional
/// `documentType`. The package is scanned before anything is stored, so an
/// unreadable upload leaves no trace.
pub async fn upload_template_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Template>)> {
    let mut file: Option<(String, Bytes)> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::BadRequest("File field has no file name".into()))?;
                let data = field.bytes().await?;
                file = Some((file_name, data));
            }
            Some("documentType") => document_type = Some(field.text().await?),
            _ => {}
        }
    }

    let (file_name, data) = file.ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;
    let format = FsPath::new(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(TemplateFormat::from_extension)
        .ok_or_else(|| ApiError::BadRequest("Only .docx and .pptx files are allowed".into()))?;

    let scan_data = data.clone();
    let placeholders =
        tokio::task::spawn_blocking(move || discover(&scan_data, format)).await??;

    let file_path = state.templates.store_template_bytes(&file_name, &data).await?;
    let template = Template {
        id: Uuid::new_v4().to_string(),
        name: file_name,
        document_type: document_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.to_string()),
        format,
        file_path,
        placeholders: placeholders.into_iter().collect(),
        created_at: Utc::now(),
    };
    let created = state.templates.create_template(template).await?;

    info!(
        "Uploaded template {} ({}, {} placeholders)",
        created.name,
        created.format,
        created.placeholders.len()
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/templates/{id}
pub async fn delete_template_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let removed = state
        .templates
        .delete_template(&id)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;
    info!("Deleted template {} ({})", removed.id, removed.name);
    Ok(StatusCode::NO_CONTENT)
}

use std::path::PathBuf;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use docgen_template::{generate, GeneratedDocument, GenerationError, GenerationStage, TemplateError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::error::{ApiError, Result};

/// Characters left unescaped in the `Content-Disposition` file name; the
/// same set JavaScript's `encodeURIComponent` keeps.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub template_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAndSaveRequest {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub save_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    pub success: bool,
    pub file_path: PathBuf,
    pub filename: String,
}

/// POST /api/documents/generate
///
/// Returns the populated package as an attachment named
/// `<project>_<documentType>.<ext>`.
pub async fn generate_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    if request.project_id.is_empty() || request.template_id.is_empty() {
        return Err(ApiError::BadRequest(
            "projectId and templateId are required".into(),
        ));
    }

    let (document, filename) = render(&state, &request.project_id, &request.template_id).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        utf8_percent_encode(&filename, FILENAME_ENCODE_SET)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::Internal(format!("Invalid Content-Disposition: {}", e)))?;

    info!(
        "Delivered {} ({} bytes, {})",
        filename,
        document.bytes.len(),
        GenerationStage::Delivered
    );
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(document.format.content_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

/// POST /api/documents/generate-and-save
///
/// Writes the populated package into an existing directory on the server.
pub async fn generate_and_save_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateAndSaveRequest>, JsonRejection>,
) -> Result<Json<SavedDocument>> {
    let Json(request) = payload?;
    if request.project_id.is_empty()
        || request.template_id.is_empty()
        || request.save_path.is_empty()
    {
        return Err(ApiError::BadRequest(
            "projectId, templateId, and savePath are required".into(),
        ));
    }

    let save_dir = PathBuf::from(&request.save_path);
    let is_dir = tokio::fs::metadata(&save_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ApiError::BadRequest("Save path does not exist".into()));
    }

    let (document, filename) = render(&state, &request.project_id, &request.template_id).await?;

    let file_path = save_dir.join(&filename);
    tokio::fs::write(&file_path, &document.bytes)
        .await
        .map_err(|e| {
            ApiError::Internal(format!("Failed to write {}: {}", file_path.display(), e))
        })?;

    info!(
        "Delivered {} to {} ({})",
        filename,
        save_dir.display(),
        GenerationStage::Delivered
    );
    Ok(Json(SavedDocument {
        success: true,
        file_path,
        filename,
    }))
}

/// Load the project and template, then generate on the blocking pool.
async fn render(
    state: &AppState,
    project_id: &str,
    template_id: &str,
) -> Result<(GeneratedDocument, String)> {
    let project = state
        .projects
        .get_project(project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;
    let template = state
        .templates
        .get_template(template_id)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;
    // A stored package that cannot be read is a failed generation, not a
    // missing record.
    let bytes = state
        .templates
        .read_template_bytes(&template)
        .await
        .map_err(|e| GenerationError {
            stage: GenerationStage::Received,
            source: TemplateError::Io(std::io::Error::other(e.to_string())),
        })?;

    let filename = document_filename(
        &project.name,
        &template.document_type,
        template.format.extension(),
    );
    let dictionary = state.dictionary.clone();
    let format = template.format;
    let document = tokio::task::spawn_blocking(move || {
        generate(&project, &bytes, format, &dictionary)
    })
    .await??;

    Ok((document, filename))
}

/// `<project>_<documentType>.<ext>`, with characters that cannot appear in a
/// file name replaced by `_`.
fn document_filename(project_name: &str, document_type: &str, extension: &str) -> String {
    let stem: String = format!("{}_{}", project_name.trim(), document_type.trim())
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}.{}", stem, extension)
}

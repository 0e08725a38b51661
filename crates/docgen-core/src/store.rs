use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::project::{Project, ProjectDraft};
use crate::template::Template;

/// Persistence for project records.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;

    async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError>;

    /// Assign a fresh id and timestamps to the draft and persist it.
    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, StoreError>;

    /// Returns `None` when no project has this id.
    async fn update_project(
        &self,
        id: &str,
        draft: ProjectDraft,
    ) -> Result<Option<Project>, StoreError>;

    /// Returns `false` when no project has this id.
    async fn delete_project(&self, id: &str) -> Result<bool, StoreError>;
}

/// Persistence for template metadata and the stored package bytes.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError>;

    async fn get_template(&self, id: &str) -> Result<Option<Template>, StoreError>;

    async fn create_template(&self, template: Template) -> Result<Template, StoreError>;

    /// Remove the metadata and the stored package.
    ///
    /// Returns the removed template, or `None` when no template has this id.
    async fn delete_template(&self, id: &str) -> Result<Option<Template>, StoreError>;

    /// Write an uploaded package and return the path it was stored at.
    async fn store_template_bytes(
        &self,
        file_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, StoreError>;

    /// Read the stored package of a template.
    async fn read_template_bytes(&self, template: &Template) -> Result<Vec<u8>, StoreError>;
}

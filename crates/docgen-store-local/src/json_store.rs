use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use docgen_core::{Project, ProjectDraft, ProjectStore, StoreError, Template, TemplateStore};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const STORE_FILE: &str = "store.json";
const TEMPLATES_DIR: &str = "templates";

/// On-disk layout of the store document. Unknown top-level keys are kept so
/// rewriting the file never drops data written by other tools.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    templates: Vec<Template>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Project and template store backed by a JSON file.
///
/// Storage layout:
/// ```text
/// {data_dir}/
///   store.json             # { "projects": [...], "templates": [...] }
///   templates/
///     {uuid}.docx|.pptx    # uploaded packages
/// ```
///
/// Mutations are serialized through one lock and written with
/// write-then-rename, so readers always see a complete document.
#[derive(Debug)]
pub struct JsonFileStore {
    store_file: PathBuf,
    templates_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `data_dir`.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        let templates_dir = data_dir.join(TEMPLATES_DIR);
        fs::create_dir_all(&templates_dir).await?;

        let store = Self {
            store_file: data_dir.join(STORE_FILE),
            templates_dir,
            write_lock: Mutex::new(()),
        };
        if fs::metadata(&store.store_file).await.is_err() {
            store.write(&StoreData::default()).await?;
            info!("Created store at {}", store.store_file.display());
        }
        Ok(store)
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    async fn read(&self) -> Result<StoreData, StoreError> {
        match fs::read(&self.store_file).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
            Err(e) => Err(StoreError::Io(format!(
                "Failed to read {}: {}",
                self.store_file.display(),
                e
            ))),
        }
    }

    async fn write(&self, data: &StoreData) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(data)?;
        let temp_path = self.store_file.with_extension("json.tmp");
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, &self.store_file).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for JsonFileStore {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.read().await?.projects)
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.read().await?.projects.into_iter().find(|p| p.id == id))
    }

    #[instrument(skip(self, draft), level = "debug")]
    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.read().await?;
        let project = Project::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        data.projects.push(project.clone());
        self.write(&data).await?;
        debug!("Created project {}", project.id);
        Ok(project)
    }

    #[instrument(skip(self, draft), level = "debug")]
    async fn update_project(
        &self,
        id: &str,
        draft: ProjectDraft,
    ) -> Result<Option<Project>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.read().await?;
        let Some(project) = data.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        project.apply(draft, Utc::now());
        let updated = project.clone();
        self.write(&data).await?;
        Ok(Some(updated))
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_project(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.read().await?;
        let before = data.projects.len();
        data.projects.retain(|p| p.id != id);
        if data.projects.len() == before {
            return Ok(false);
        }
        self.write(&data).await?;
        Ok(true)
    }
}

#[async_trait]
impl TemplateStore for JsonFileStore {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        Ok(self.read().await?.templates)
    }

    async fn get_template(&self, id: &str) -> Result<Option<Template>, StoreError> {
        Ok(self.read().await?.templates.into_iter().find(|t| t.id == id))
    }

    #[instrument(skip(self, template), level = "debug")]
    async fn create_template(&self, template: Template) -> Result<Template, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.read().await?;
        data.templates.push(template.clone());
        self.write(&data).await?;
        debug!("Created template {} ({})", template.id, template.name);
        Ok(template)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_template(&self, id: &str) -> Result<Option<Template>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.read().await?;
        let Some(index) = data.templates.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = data.templates.remove(index);
        self.write(&data).await?;

        match fs::remove_file(&removed.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove template file {}: {}",
                removed.file_path.display(),
                e
            ),
        }
        Ok(Some(removed))
    }

    #[instrument(skip(self, data), level = "debug", fields(data_len = data.len()))]
    async fn store_template_bytes(
        &self,
        file_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let stored_name = if extension.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}.{}", Uuid::new_v4(), extension)
        };
        let path = self.templates_dir.join(stored_name);
        fs::write(&path, data).await.map_err(|e| {
            StoreError::Io(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(path)
    }

    async fn read_template_bytes(&self, template: &Template) -> Result<Vec<u8>, StoreError> {
        match fs::read(&template.file_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(
                format!("template file {}", template.file_path.display()),
            )),
            Err(e) => Err(StoreError::Io(format!(
                "Failed to read {}: {}",
                template.file_path.display(),
                e
            ))),
        }
    }
}

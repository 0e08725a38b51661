use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use docgen_core::{Project, Requirement};
use serde::{Deserialize, Serialize};

use crate::error::DictionaryError;

/// A project value a placeholder can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    Name,
    Client,
    Description,
    Scope,
    StartDate,
    EndDate,
    Status,
    TeamSize,
    MilestoneCount,
    /// One `name (role): responsibility` line per team member.
    TeamRoster,
    /// One `name - date: deliverables` line per milestone.
    MilestoneList,
    /// One `id [priority] category: description` line per requirement.
    FunctionalRequirements,
    NonFunctionalRequirements,
}

impl ProjectField {
    pub fn render<'a>(&self, project: &'a Project) -> Cow<'a, str> {
        match self {
            Self::Name => Cow::Borrowed(&project.name),
            Self::Client => Cow::Borrowed(&project.client),
            Self::Description => Cow::Borrowed(&project.description),
            Self::Scope => Cow::Borrowed(&project.scope),
            Self::StartDate => Cow::Borrowed(&project.start_date),
            Self::EndDate => Cow::Borrowed(&project.end_date),
            Self::Status => Cow::Borrowed(&project.status),
            Self::TeamSize => Cow::Owned(project.team.len().to_string()),
            Self::MilestoneCount => Cow::Owned(project.milestones.len().to_string()),
            Self::TeamRoster => Cow::Owned(
                project
                    .team
                    .iter()
                    .map(|m| format!("{} ({}): {}", m.name, m.role, m.responsibility))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Self::MilestoneList => Cow::Owned(
                project
                    .milestones
                    .iter()
                    .map(|m| format!("{} - {}: {}", m.name, m.date, m.deliverables))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Self::FunctionalRequirements => {
                Cow::Owned(requirement_lines(&project.requirements.functional))
            }
            Self::NonFunctionalRequirements => {
                Cow::Owned(requirement_lines(&project.requirements.non_functional))
            }
        }
    }
}

fn requirement_lines(requirements: &[Requirement]) -> String {
    requirements
        .iter()
        .map(|r| {
            format!(
                "{} [{}] {}: {}",
                r.id,
                r.priority.as_str(),
                r.category,
                r.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Maps placeholder keys to project fields.
///
/// Serialized as a flat JSON object, e.g. `{"프로젝트명": "name"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderDictionary {
    entries: BTreeMap<String, ProjectField>,
}

impl Default for PlaceholderDictionary {
    fn default() -> Self {
        Self::korean()
    }
}

impl PlaceholderDictionary {
    /// The Korean vocabulary templates have always used.
    pub fn korean() -> Self {
        Self::from_pairs(&[
            ("프로젝트명", ProjectField::Name),
            ("고객사", ProjectField::Client),
            ("설명", ProjectField::Description),
            ("범위", ProjectField::Scope),
            ("시작일", ProjectField::StartDate),
            ("종료일", ProjectField::EndDate),
            ("상태", ProjectField::Status),
            ("팀원수", ProjectField::TeamSize),
            ("마일스톤수", ProjectField::MilestoneCount),
            ("팀원목록", ProjectField::TeamRoster),
            ("마일스톤목록", ProjectField::MilestoneList),
            ("기능요구사항목록", ProjectField::FunctionalRequirements),
            ("비기능요구사항목록", ProjectField::NonFunctionalRequirements),
        ])
    }

    pub fn english() -> Self {
        Self::from_pairs(&[
            ("projectName", ProjectField::Name),
            ("client", ProjectField::Client),
            ("description", ProjectField::Description),
            ("scope", ProjectField::Scope),
            ("startDate", ProjectField::StartDate),
            ("endDate", ProjectField::EndDate),
            ("status", ProjectField::Status),
            ("teamSize", ProjectField::TeamSize),
            ("milestoneCount", ProjectField::MilestoneCount),
            ("teamMembers", ProjectField::TeamRoster),
            ("milestones", ProjectField::MilestoneList),
            ("functionalRequirements", ProjectField::FunctionalRequirements),
            ("nonFunctionalRequirements", ProjectField::NonFunctionalRequirements),
        ])
    }

    /// Built-in dictionary for a locale tag (`ko`, `en`, `en-US`, ...).
    pub fn for_locale(locale: &str) -> Result<Self, DictionaryError> {
        let language = locale.split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_str() {
            "ko" => Ok(Self::korean()),
            "en" => Ok(Self::english()),
            _ => Err(DictionaryError::UnknownLocale(locale.to_string())),
        }
    }

    fn from_pairs(pairs: &[(&str, ProjectField)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(key, field)| (key.to_string(), *field))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let json = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn field(&self, key: &str) -> Option<ProjectField> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves placeholder keys against one project.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    project: &'a Project,
    dictionary: &'a PlaceholderDictionary,
}

impl<'a> Resolver<'a> {
    pub fn new(project: &'a Project, dictionary: &'a PlaceholderDictionary) -> Self {
        Self {
            project,
            dictionary,
        }
    }

    /// The value for `key`, or `None` when the dictionary does not know it.
    pub fn lookup(&self, key: &str) -> Option<Cow<'a, str>> {
        self.dictionary
            .field(key.trim())
            .map(|field| field.render(self.project))
    }

    /// The value for `key`; unknown keys come back as the literal `{{key}}`
    /// so they stay visible in the generated document.
    pub fn resolve(&self, key: &str) -> Cow<'a, str> {
        let key = key.trim();
        self.lookup(key)
            .unwrap_or_else(|| Cow::Owned(format!("{{{{{key}}}}}")))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person on the project team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub responsibility: String,
}

/// A dated checkpoint with its expected deliverables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    /// Free-form date as entered by the user.
    pub date: String,
    pub deliverables: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default)]
    pub functional: Vec<Requirement>,
    #[serde(default)]
    pub non_functional: Vec<Requirement>,
}

/// The editable part of a project: everything except identity and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub name: String,
    pub client: String,
    pub description: String,
    pub scope: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub team: Vec<TeamMember>,
    pub milestones: Vec<Milestone>,
    pub requirements: Requirements,
}

/// A project record as persisted by a [`crate::ProjectStore`].
///
/// `id` and `created_at` never change once the project exists; every update
/// goes through [`Project::apply`], which bumps `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub requirements: Requirements,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn from_draft(id: impl Into<String>, draft: ProjectDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            client: draft.client,
            description: draft.description,
            scope: draft.scope,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            team: draft.team,
            milestones: draft.milestones,
            requirements: draft.requirements,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field with the draft's values.
    pub fn apply(&mut self, draft: ProjectDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.client = draft.client;
        self.description = draft.description;
        self.scope = draft.scope;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.status = draft.status;
        self.team = draft.team;
        self.milestones = draft.milestones;
        self.requirements = draft.requirements;
        self.updated_at = now;
    }
}

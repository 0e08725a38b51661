//! Core types and traits shared by the docgen crates.
//!
//! This crate defines:
//! - `Project` and `Template`: the records documents are generated from
//! - `ProjectStore` / `TemplateStore`: the persistence seams the server talks to
//! - `StoreError`: the error type every store backend reports

mod error;
mod project;
mod store;
mod template;

pub use error::StoreError;
pub use project::{Milestone, Priority, Project, ProjectDraft, Requirement, Requirements, TeamMember};
pub use store::{ProjectStore, TemplateStore};
pub use template::{Template, TemplateFormat, DEFAULT_DOCUMENT_TYPE};

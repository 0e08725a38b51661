//! Placeholder-aware rewriting of OOXML (`.docx` / `.pptx`) templates.
//!
//! Templates carry `{{key}}` tokens in their text. Word processors often split
//! a single token over several runs, so every text-bearing part goes through
//! three steps:
//! - `normalize`: move each token's characters into one run
//! - `scan` / `resolve`: find tokens and map keys to project values
//! - `package`: rewrite the selected parts and copy everything else verbatim

mod dialect;
mod error;
mod generate;
mod normalize;
mod package;
mod paragraph;
mod resolve;
mod scan;
mod substitute;

pub use dialect::Dialect;
pub use error::{DictionaryError, TemplateError};
pub use generate::{generate, GeneratedDocument, GenerationError, GenerationStage};
pub use normalize::normalize_part;
pub use package::{OoxmlPackage, RewrittenPackage};
pub use paragraph::paragraph_texts;
pub use resolve::{PlaceholderDictionary, ProjectField, Resolver};
pub use scan::{discover, scan_placeholders};
pub use substitute::substitute_part;

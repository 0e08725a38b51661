//! Local storage backend for docgen.
//!
//! Project and template records live in a single JSON document; uploaded
//! template packages are kept as files next to it.

mod json_store;

pub use json_store::JsonFileStore;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use docgen_template::{DictionaryError, PlaceholderDictionary};

/// Built-in placeholder vocabularies.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// Korean keys (`{{프로젝트명}}`, `{{고객사}}`, ...)
    Ko,
    /// English keys (`{{projectName}}`, `{{client}}`, ...)
    En,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        }
    }
}

/// Configuration for the docgen server.
#[derive(Parser, Debug, Clone)]
#[command(name = "docgen-server")]
#[command(about = "Project document generator for DOCX/PPTX templates")]
pub struct Config {
    /// TCP host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "DOCGEN_HOST")]
    pub host: String,

    /// TCP port to bind to
    #[arg(long, default_value = "4000", env = "DOCGEN_PORT")]
    pub port: u16,

    /// Directory holding store.json and uploaded templates
    #[arg(long, default_value = "./data", env = "DOCGEN_DATA_DIR")]
    pub data_dir: PathBuf,

    /// JSON file mapping placeholder keys to project fields.
    /// Replaces the built-in dictionary when set.
    #[arg(long, env = "DOCGEN_PLACEHOLDER_DICTIONARY")]
    pub placeholder_dictionary: Option<PathBuf>,

    /// Built-in dictionary used when no dictionary file is given
    #[arg(long, value_enum, default_value_t = Locale::Ko, env = "DOCGEN_LOCALE")]
    pub locale: Locale,

    /// Maximum accepted template upload size in bytes
    #[arg(long, default_value = "10485760", env = "DOCGEN_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn load_dictionary(&self) -> Result<PlaceholderDictionary, DictionaryError> {
        match &self.placeholder_dictionary {
            Some(path) => PlaceholderDictionary::load(path),
            None => PlaceholderDictionary::for_locale(self.locale.tag()),
        }
    }
}

use std::path::PathBuf;

/// Errors raised while reading or rewriting a template package.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Malformed XML in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Part {part} is not UTF-8 encoded")]
    Encoding { part: String },
}

/// Errors raised while loading a placeholder dictionary.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("Failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dictionary: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No built-in dictionary for locale {0}")]
    UnknownLocale(String),
}

//! Error types for the toolkit

use std::path::PathBuf;

use thiserror::Error;

/// Result type for toolkit operations
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Toolkit errors
///
/// Lookup misses (unknown tool/objective/tag slugs) are deliberately *not*
/// errors; they surface as `Option::None` or as the raw slug. Errors here are
/// reserved for the initial dataset load, which is fail-fast.
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Required document not found in {}: {name}", .dir.display())]
    DocumentMissing { dir: PathBuf, name: String },

    #[error("Failed to parse {name}: {source}")]
    DocumentParse {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Duplicate tool slug: {0}")]
    DuplicateToolSlug(String),

    #[error("Duplicate objective slug: {0}")]
    DuplicateObjectiveSlug(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

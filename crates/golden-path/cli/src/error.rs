//! CLI error types

use golden_path_types::GoldenPathError;
use golden_path_validator::ManifestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Definition or configuration error
    #[error(transparent)]
    GoldenPath(#[from] GoldenPathError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Unknown module code or step
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type CliResult<T> = Result<T, CliError>;

/// Read a file, keeping the path in the error
pub fn read_file(path: &str) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })
}

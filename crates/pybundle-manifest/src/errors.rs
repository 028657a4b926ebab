use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a project manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse pyproject.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("pyproject.toml not found in {0}")]
    NotFound(PathBuf),

    #[error("project {field} not found in {path}")]
    MissingField { field: &'static str, path: String },
}

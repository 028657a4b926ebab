use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("failed to register template '{template}': {message}")]
    Template { template: String, message: String },

    #[error("failed to render template '{template}': {message}")]
    Render { template: String, message: String },

    #[error("failed to serialize template data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("failed to read template override {path}: {source}")]
    Override {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("emitted unit path must be relative and stay inside the output: {0}")]
    InvalidPath(PathBuf),
}

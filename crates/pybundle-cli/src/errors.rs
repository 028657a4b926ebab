//! Centralized error types for the pybundle CLI
//!
//! Library crates keep their own error enums; [`BundleError`] wraps them so
//! the binary has a single type to report.

use pybundle_emit::EmitError;
use pybundle_manifest::ManifestError;
use pybundle_tree::TreeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A toolchain subprocess that could not start or did not succeed
#[derive(Error, Debug)]
pub enum ExternalToolError {
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{}", failure_message(command, *status, stderr))]
    Failed {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn failure_message(command: &str, status: Option<i32>, stderr: &str) -> String {
    let status = match status {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("'{}' failed with {}", command, status)
    } else {
        format!("'{}' failed with {}:\n{}", command, status, stderr)
    }
}

#[derive(Error, Debug)]
pub enum BundleError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Tool(#[from] ExternalToolError),

    #[error("output directory {0} is not empty (use --overwrite to replace it)")]
    OutputExists(PathBuf),

    #[error("output directory {0} contains the project being bundled")]
    OutputContainsSource(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    /// Failures whose details were captured to the log file
    pub fn has_logged_output(&self) -> bool {
        matches!(self, BundleError::Tool(_))
    }
}

//! Executable resolution for the external toolchain (`uv`, `cargo`)

use std::path::Path;
use which::which;

/// Candidate executable names for uv
#[cfg(not(windows))]
pub const UV_CANDIDATES: &[&str] = &["uv"];
#[cfg(windows)]
pub const UV_CANDIDATES: &[&str] = &["uv.exe", "uv"];

/// Candidate executable names for cargo
#[cfg(not(windows))]
pub const CARGO_CANDIDATES: &[&str] = &["cargo"];
#[cfg(windows)]
pub const CARGO_CANDIDATES: &[&str] = &["cargo.exe", "cargo"];

/// Error type for tool resolution
#[derive(Debug, Clone)]
pub enum ToolError {
    /// A configured path does not point to an existing file or PATH entry
    ConfiguredMissing(String),
    /// None of the candidate names were found on PATH
    NotFound(Vec<String>),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::ConfiguredMissing(path) => {
                write!(f, "Configured tool path does not exist: {}", path)
            }
            ToolError::NotFound(candidates) => {
                write!(f, "None of [{}] found on PATH", candidates.join(", "))
            }
        }
    }
}

impl std::error::Error for ToolError {}

/// Resolve a tool executable
///
/// A configured value wins when it exists as a path or resolves on PATH;
/// otherwise the first candidate found on PATH is returned.
pub fn resolve_tool(configured: Option<&str>, candidates: &[&str]) -> Result<String, ToolError> {
    if let Some(configured) = configured.map(str::trim).filter(|c| !c.is_empty()) {
        if Path::new(configured).is_file() {
            return Ok(configured.to_string());
        }
        return which(configured)
            .map(|path| path.to_string_lossy().to_string())
            .map_err(|_| ToolError::ConfiguredMissing(configured.to_string()));
    }

    candidates
        .iter()
        .find_map(|name| which(name).ok())
        .map(|path| path.to_string_lossy().to_string())
        .ok_or_else(|| ToolError::NotFound(candidates.iter().map(|c| c.to_string()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_file_wins() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let tool = dir.path().join("uv");
        if std::fs::write(&tool, "").is_err() {
            return;
        }
        let configured = tool.to_string_lossy().to_string();
        let resolved = resolve_tool(Some(&configured), &["definitely-not-a-tool"]);
        assert!(resolved.is_ok_and(|path| path == configured));
    }

    #[test]
    fn test_configured_missing() {
        let resolved = resolve_tool(Some("/no/such/dir/uv-missing"), UV_CANDIDATES);
        assert!(matches!(resolved, Err(ToolError::ConfiguredMissing(_))));
    }

    #[test]
    fn test_no_candidates_found() {
        let resolved = resolve_tool(None, &["pybundle-test-missing-tool"]);
        let Err(err) = resolved else {
            panic!("missing tool should not resolve");
        };
        assert_eq!(
            err.to_string(),
            "None of [pybundle-test-missing-tool] found on PATH"
        );
    }
}

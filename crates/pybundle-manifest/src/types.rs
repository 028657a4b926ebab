//! pyproject.toml types (PEP 621 `[project]` table, the fields pybundle reads)

use crate::entry::{EntryPointSet, EntryPointSpec, Origin};
use crate::errors::ManifestError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Entry point groups that PEP 621 reserves for `scripts` / `gui-scripts`
const RESERVED_GROUPS: &[&str] = &["console_scripts", "gui_scripts"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PyProject {
    #[serde(default)]
    pub project: Project,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    #[serde(default, rename = "gui-scripts")]
    pub gui_scripts: BTreeMap<String, String>,
    #[serde(default, rename = "entry-points")]
    pub entry_points: BTreeMap<String, BTreeMap<String, String>>,
}

impl PyProject {
    /// Load `pyproject.toml` from a project directory
    pub fn load(project_dir: &Path) -> Result<Self, ManifestError> {
        let path = project_dir.join(PYPROJECT_FILE);
        if !path.is_file() {
            return Err(ManifestError::NotFound(project_dir.to_path_buf()));
        }
        debug!("Reading project manifest: {:?}", path);
        let content = fs::read_to_string(&path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse manifest content; `origin` names the source in error messages
    pub fn parse(content: &str, origin: &str) -> Result<Self, ManifestError> {
        let pyproject: PyProject = toml::from_str(content)?;
        if pyproject.project.name.trim().is_empty() {
            return Err(ManifestError::MissingField {
                field: "name",
                path: origin.to_string(),
            });
        }
        if pyproject.project.version.trim().is_empty() {
            return Err(ManifestError::MissingField {
                field: "version",
                path: origin.to_string(),
            });
        }
        Ok(pyproject)
    }

    pub fn name(&self) -> &str {
        self.project.name.trim()
    }

    pub fn version(&self) -> &str {
        self.project.version.trim()
    }

    pub fn description(&self) -> Option<&str> {
        self.project
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Collect every declared entry point into origin buckets
    ///
    /// Groups named `console_scripts` / `gui_scripts` are skipped: PEP 621
    /// requires those to be declared as `scripts` / `gui-scripts`.
    pub fn entry_points(&self) -> EntryPointSet {
        let project = &self.project;
        let mut set = EntryPointSet::new();

        set.scripts = project
            .scripts
            .iter()
            .map(|(name, reference)| EntryPointSpec::new(name, reference, Origin::Plain))
            .collect();
        set.gui = project
            .gui_scripts
            .iter()
            .map(|(name, reference)| EntryPointSpec::new(name, reference, Origin::Gui))
            .collect();

        for (group, entries) in &project.entry_points {
            if RESERVED_GROUPS.contains(&group.as_str()) {
                warn!(
                    "Skipping entry point group '{}': declare these under [project.{}] instead",
                    group,
                    if group == "console_scripts" {
                        "scripts"
                    } else {
                        "gui-scripts"
                    }
                );
                continue;
            }
            let specs = entries
                .iter()
                .map(|(name, reference)| {
                    EntryPointSpec::new(name, reference, Origin::Named(group.clone()))
                })
                .collect();
            set.groups.insert(group.clone(), specs);
        }

        debug!(
            "Collected {} entry points ({} scripts, {} gui-scripts, {} groups)",
            set.len(),
            set.scripts.len(),
            set.gui.len(),
            set.groups.len()
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use crate::types::*;

    const FASTAPI_APP: &str = r#"
[project]
name = "fastapi-app"
version = "0.1.0"
description = "  Demo service  "

[project.scripts]
serve = "fastapi_app.main:serve"
dev = "fastapi_app.main:dev"

[project.gui-scripts]
dashboard = "fastapi_app.gui:run"

[project.entry-points."fastapi_app.plugins"]
health = "fastapi_app.plugins:health"

[project.entry-points.console_scripts]
legacy = "fastapi_app.main:legacy"
"#;

    #[test]
    fn test_parse_full_project() {
        let Ok(pyproject) = PyProject::parse(FASTAPI_APP, "test") else {
            panic!("fixture should parse");
        };
        assert_eq!(pyproject.name(), "fastapi-app");
        assert_eq!(pyproject.version(), "0.1.0");
        assert_eq!(pyproject.description(), Some("Demo service"));

        let set = pyproject.entry_points();
        assert_eq!(set.len(), 4);
        let scripts: Vec<&str> = set.scripts.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(scripts, vec!["dev", "serve"]);
        assert_eq!(set.gui.len(), 1);
        assert!(set.groups.contains_key("fastapi_app.plugins"));
        assert!(!set.groups.contains_key("console_scripts"));
        assert!(set.groups["fastapi_app.plugins"]
            .iter()
            .all(|e| e.origin == Origin::Named("fastapi_app.plugins".to_string())));
    }

    #[test]
    fn test_missing_name() {
        let content = "[project]\nversion = \"1.0\"\n";
        let result = PyProject::parse(content, "demo/pyproject.toml");
        assert!(matches!(
            result,
            Err(ManifestError::MissingField { field: "name", .. })
        ));
    }

    #[test]
    fn test_missing_version() {
        let content = "[project]\nname = \"demo\"\nversion = \"  \"\n";
        let result = PyProject::parse(content, "demo/pyproject.toml");
        assert!(matches!(
            result,
            Err(ManifestError::MissingField {
                field: "version",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let result = PyProject::parse("not valid toml {{{", "broken");
        assert!(matches!(result, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn test_empty_group_is_kept() {
        let content = r#"
[project]
name = "demo"
version = "1.0"

[project.entry-points.empty]
"#;
        let Ok(pyproject) = PyProject::parse(content, "test") else {
            panic!("fixture should parse");
        };
        let set = pyproject.entry_points();
        assert!(set.groups.get("empty").is_some_and(Vec::is_empty));
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_from_directory() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let missing = PyProject::load(dir.path());
        assert!(matches!(missing, Err(ManifestError::NotFound(_))));

        if fs::write(dir.path().join(PYPROJECT_FILE), FASTAPI_APP).is_err() {
            return;
        }
        let loaded = PyProject::load(dir.path());
        assert!(loaded.is_ok_and(|p| p.name() == "fastapi-app"));
    }
}

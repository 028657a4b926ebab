//! Bundle orchestration
//!
//! Sequences manifest loading, tree construction, emission, writing and the
//! external toolchain. Nothing touches the output directory until the tree
//! and every unit have been produced.

use crate::config_manager::Config;
use crate::errors::BundleError;
use crate::logger;
use crate::requirements::{render_requirements, REQUIREMENTS_FILE};
use crate::toolchain::{Step, Toolchain};
use pybundle_emit::{write_units, Emitter, HandlebarsRenderer, ProjectInfo};
use pybundle_manifest::PyProject;
use pybundle_tree::{CommandTree, TreeBuilder};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Output;
use tracing::{debug, info};

/// Outcome of a bundle run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub output: PathBuf,
    pub files: Vec<PathBuf>,
    /// Compiled binary, when the toolchain ran
    pub binary: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub source: PathBuf,
    pub output: PathBuf,
    pub overwrite: bool,
    pyproject: PyProject,
    config: Config,
}

impl BundleOptions {
    /// Resolve options using the persisted configuration
    pub fn new(
        source: Option<&Path>,
        output: Option<&Path>,
        overwrite: bool,
    ) -> Result<Self, BundleError> {
        let config = Config::load().map_err(|e| BundleError::Config(e.to_string()))?;
        Self::with_config(source, output, overwrite, config)
    }

    /// Resolve options against an explicit configuration
    ///
    /// Source defaults to `.`; output defaults to `<bundle-dir>/<project name>`.
    /// An output of `.` also selects the default, so the working directory is
    /// never used as a bundle target.
    pub fn with_config(
        source: Option<&Path>,
        output: Option<&Path>,
        overwrite: bool,
        config: Config,
    ) -> Result<Self, BundleError> {
        let source = match source {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let pyproject = PyProject::load(&source)?;

        let output = match output {
            Some(path) if !path.as_os_str().is_empty() && path != Path::new(".") => {
                path.to_path_buf()
            }
            _ => config.get_bundle_dir().join(pyproject.name()),
        };
        let output = absolute(&output)?;
        let source = absolute(&source)?;

        if source.starts_with(&output) {
            return Err(BundleError::OutputContainsSource(output));
        }
        if !overwrite && is_non_empty_dir(&output)? {
            return Err(BundleError::OutputExists(output));
        }

        logger::debug(&format!(
            "Bundling {} -> {}",
            source.display(),
            output.display()
        ));
        Ok(Self {
            source,
            output,
            overwrite,
            pyproject,
            config,
        })
    }

    pub fn project(&self) -> &PyProject {
        &self.pyproject
    }

    pub fn command_tree(&self) -> Result<CommandTree, BundleError> {
        build_tree(&self.pyproject)
    }

    /// Generate the crate and, when `build` is set, compile it
    pub fn run(&self, build: bool) -> Result<BundleSummary, BundleError> {
        let name = self.pyproject.name();
        let version = self.pyproject.version();
        logger::step(&format!("Bundling {} {}", name, version));

        // Resolve tools first so a missing uv or cargo fails before any output is touched
        let toolchain = if build {
            let mut config = self.config.clone();
            Some(Toolchain::from_config(&mut config)?)
        } else {
            None
        };

        let tree = self.command_tree()?;
        logger::debug(&format!("Command tree:\n{}", tree));
        debug!(
            leaves = tree.leaf_count(),
            collapsed = tree.is_collapsed(),
            "command tree built"
        );

        let renderer = match self.config.get_templates_dir() {
            Some(dir) => HandlebarsRenderer::with_overrides(&dir)?,
            None => HandlebarsRenderer::new()?,
        };
        let info = ProjectInfo::new(name, version).with_description(self.pyproject.description());
        let units = Emitter::new(renderer, info).emit(&tree)?;

        self.prepare_output()?;
        let files = write_units(&self.output, &units)?;
        logger::info(&format!(
            "Generated {} files in {}",
            files.len(),
            self.output.display()
        ));

        let binary = match toolchain {
            Some(toolchain) => {
                self.build(&toolchain)?;
                Some(
                    self.output
                        .join("target")
                        .join("release")
                        .join(format!("{}{}", tree.project_name(), std::env::consts::EXE_SUFFIX)),
                )
            }
            None => None,
        };

        Ok(BundleSummary {
            output: self.output.clone(),
            files,
            binary,
        })
    }

    /// Clear and recreate the output directory
    fn prepare_output(&self) -> Result<(), BundleError> {
        if self.output.exists() {
            if !self.overwrite && is_non_empty_dir(&self.output)? {
                return Err(BundleError::OutputExists(self.output.clone()));
            }
            logger::debug(&format!("Removing {}", self.output.display()));
            info!(output = %self.output.display(), "replacing existing output");
            fs::remove_dir_all(&self.output).map_err(|source| BundleError::Io {
                path: self.output.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&self.output).map_err(|source| BundleError::Io {
            path: self.output.clone(),
            source,
        })
    }

    fn build(&self, toolchain: &Toolchain) -> Result<(), BundleError> {
        run_with_spinner(
            "Building wheel",
            &toolchain.build_wheel(&self.source, &self.output),
        )?;

        let exported = run_with_spinner(
            "Exporting dependencies",
            &toolchain.export_requirements(&self.source),
        )?;
        let requirements = render_requirements(
            self.pyproject.name(),
            self.pyproject.version(),
            &self.config.get_platform_tag(),
            &String::from_utf8_lossy(&exported.stdout),
        );
        let requirements_path = self.output.join(REQUIREMENTS_FILE);
        fs::write(&requirements_path, requirements).map_err(|source| BundleError::Io {
            path: requirements_path.clone(),
            source,
        })?;

        run_with_spinner(
            "Installing site-packages",
            &toolchain.install_requirements(&self.output, Path::new(REQUIREMENTS_FILE)),
        )?;
        run_with_spinner("Compiling binary", &toolchain.cargo_build(&self.output))?;
        Ok(())
    }
}

/// Command tree for a loaded project
pub fn build_tree(pyproject: &PyProject) -> Result<CommandTree, BundleError> {
    let tree = TreeBuilder::new(pyproject.name())
        .with_description(pyproject.description())
        .build(&pyproject.entry_points())?;
    Ok(tree)
}

fn run_with_spinner(message: &str, step: &Step) -> Result<Output, BundleError> {
    logger::spinner_start(message);
    match Toolchain::run_step(step) {
        Ok(output) => {
            logger::spinner_success(message);
            Ok(output)
        }
        Err(e) => {
            logger::spinner_error(message);
            Err(e.into())
        }
    }
}

/// Absolute, `..`-free form of `path` with symlinks resolved
///
/// The deepest existing ancestor is canonicalized and the remaining
/// components are appended, so outputs that do not exist yet still compare
/// correctly against the source.
fn absolute(path: &Path) -> Result<PathBuf, BundleError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(path)
    };
    let folded = fold_components(&joined);

    let mut existing = folded.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(rest.iter().rev().fold(canonical, |acc, part| acc.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(folded),
        }
    }
}

/// Drop `.` and resolve `..` lexically
fn fold_components(path: &Path) -> PathBuf {
    let mut folded = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                folded.pop();
            }
            other => folded.push(other),
        }
    }
    folded
}

fn is_non_empty_dir(path: &Path) -> Result<bool, BundleError> {
    if !path.is_dir() {
        return Ok(path.exists());
    }
    let mut entries = fs::read_dir(path).map_err(|source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(entries.next().is_some())
}

#[cfg(test)]
mod tests {
    use crate::bundle::*;
    use tempfile::TempDir;

    const PYPROJECT: &str = r#"
[project]
name = "demo-app"
version = "0.2.0"
description = "Demo"

[project.scripts]
serve = "demo_app.main:serve"

[project.gui-scripts]
viewer = "demo_app.gui:run"
"#;

    /// Project directory plus a config whose bundle dir lives in the same tempdir
    fn workspace(pyproject: &str) -> Option<(TempDir, PathBuf, Config)> {
        let dir = TempDir::new().ok()?;
        let source = dir.path().join("project");
        fs::create_dir_all(&source).ok()?;
        fs::write(source.join("pyproject.toml"), pyproject).ok()?;
        let config = Config {
            bundle_dir: Some(dir.path().join("bundles").to_string_lossy().into_owned()),
            ..Config::default()
        };
        Some((dir, source, config))
    }

    #[test]
    fn test_default_output_uses_bundle_dir() {
        let Some((dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let Ok(options) = BundleOptions::with_config(Some(&source), None, false, config) else {
            panic!("options should resolve");
        };
        let Ok(base) = dir.path().canonicalize() else {
            return;
        };
        assert_eq!(options.output, base.join("bundles").join("demo-app"));
        assert!(options.output.is_absolute());
        assert_eq!(options.project().name(), "demo-app");
    }

    #[test]
    fn test_dot_output_selects_default() {
        let Some((dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let Ok(options) =
            BundleOptions::with_config(Some(&source), Some(Path::new(".")), false, config)
        else {
            panic!("options should resolve");
        };
        let Ok(base) = dir.path().canonicalize() else {
            return;
        };
        assert_eq!(options.output, base.join("bundles").join("demo-app"));
    }

    #[test]
    fn test_missing_pyproject() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let result = BundleOptions::with_config(Some(dir.path()), None, false, Config::default());
        assert!(matches!(result, Err(BundleError::Manifest(_))));
    }

    #[test]
    fn test_non_empty_output_requires_overwrite() {
        let Some((dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let output = dir.path().join("out");
        if fs::create_dir_all(&output).is_err() || fs::write(output.join("stale.txt"), "x").is_err()
        {
            return;
        }

        let refused =
            BundleOptions::with_config(Some(&source), Some(&output), false, config.clone());
        let Ok(resolved) = output.canonicalize() else {
            return;
        };
        assert!(matches!(refused, Err(BundleError::OutputExists(ref p)) if *p == resolved));

        let Ok(options) = BundleOptions::with_config(Some(&source), Some(&output), true, config)
        else {
            panic!("overwrite should be accepted");
        };
        let Ok(summary) = options.run(false) else {
            panic!("generation should succeed");
        };
        assert!(!output.join("stale.txt").exists());
        assert!(output.join("Cargo.toml").is_file());
        assert_eq!(summary.binary, None);
    }

    #[test]
    fn test_empty_output_directory_is_accepted() {
        let Some((dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let output = dir.path().join("empty");
        if fs::create_dir_all(&output).is_err() {
            return;
        }
        assert!(BundleOptions::with_config(Some(&source), Some(&output), false, config).is_ok());
    }

    #[test]
    fn test_output_containing_source_is_refused() {
        let Some((dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let result = BundleOptions::with_config(Some(&source), Some(dir.path()), true, config);
        assert!(matches!(result, Err(BundleError::OutputContainsSource(_))));
    }

    #[test]
    fn test_parent_dir_output_cannot_reach_source() {
        let Some((_dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let output = source.join("..").join("project");
        let result = BundleOptions::with_config(Some(&source), Some(&output), true, config);
        assert!(matches!(result, Err(BundleError::OutputContainsSource(_))));
        assert!(source.join("pyproject.toml").is_file());
    }

    #[test]
    fn test_fold_components() {
        assert_eq!(
            fold_components(Path::new("/work/app/./../app/out")),
            PathBuf::from("/work/app/out")
        );
        assert_eq!(fold_components(Path::new("/a/b/../../c")), PathBuf::from("/c"));
    }

    #[test]
    fn test_missing_output_resolves_against_existing_ancestor() {
        let Some((dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let output = dir.path().join("project").join("..").join("fresh").join("nested");
        let Ok(options) = BundleOptions::with_config(Some(&source), Some(&output), false, config)
        else {
            panic!("options should resolve");
        };
        let Ok(base) = dir.path().canonicalize() else {
            return;
        };
        assert_eq!(options.output, base.join("fresh").join("nested"));
    }

    #[test]
    fn test_run_without_build_writes_crate() {
        let Some((_dir, source, config)) = workspace(PYPROJECT) else {
            return;
        };
        let Ok(options) = BundleOptions::with_config(Some(&source), None, false, config) else {
            panic!("options should resolve");
        };
        let Ok(summary) = options.run(false) else {
            panic!("generation should succeed");
        };

        let out = &summary.output;
        for file in [
            "Cargo.toml",
            "src/main.rs",
            "src/bootstrap.rs",
            "src/root/mod.rs",
            "src/root/scripts/mod.rs",
            "src/root/scripts/serve.rs",
            "src/root/gui/mod.rs",
            "src/root/gui/viewer.rs",
        ] {
            assert!(out.join(file).is_file(), "missing {}", file);
        }
        assert_eq!(summary.files.len(), 8);
        assert!(!out.join(REQUIREMENTS_FILE).exists());
    }

    #[test]
    fn test_tree_errors_leave_output_untouched() {
        let pyproject = r#"
[project]
name = "broken"
version = "1.0"

[project.scripts]
hello = "pkg:main"

[project.gui-scripts]
hello = "pkg.gui:main"
"#;
        let Some((dir, source, config)) = workspace(pyproject) else {
            return;
        };
        let output = dir.path().join("out");
        if fs::create_dir_all(&output).is_err() || fs::write(output.join("keep.txt"), "x").is_err() {
            return;
        }
        let Ok(options) = BundleOptions::with_config(Some(&source), Some(&output), true, config)
        else {
            panic!("options should resolve");
        };
        assert!(matches!(options.run(false), Err(BundleError::Tree(_))));
        assert!(output.join("keep.txt").exists());
    }
}

//! Command tree to source units
//!
//! Emission order is fixed: `Cargo.toml`, `src/main.rs`, `src/bootstrap.rs`,
//! then one unit per tree node in depth-first pre-order. Identical trees
//! and templates always produce identical units.

use crate::errors::EmitError;
use crate::render::{Render, TemplateId};
use pybundle_tree::{CommandNode, CommandTree};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Source root inside the generated crate
const SRC_DIR: &str = "src";

/// Version used when the project version has no numeric prefix
const FALLBACK_VERSION: &str = "0.0.0";

/// Project metadata the generated crate carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
}

impl ProjectInfo {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    /// Cargo-compatible `major.minor.patch` taken from the leading numbers
    ///
    /// `1.2` -> `1.2.0`, `2.0.0rc1` -> `2.0.0`, `dev` -> `0.0.0`
    pub fn crate_version(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        for segment in self.version.trim().split('.').take(3) {
            let digits: String = segment.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                break;
            }
            let complete = digits.len() == segment.len();
            parts.push(digits.trim_start_matches('0').to_string());
            if !complete {
                break;
            }
        }
        if parts.is_empty() {
            return FALLBACK_VERSION.to_string();
        }
        while parts.len() < 3 {
            parts.push(String::new());
        }
        parts
            .iter()
            .map(|p| if p.is_empty() { "0" } else { p.as_str() })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// What an emitted unit contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Manifest,
    Entry,
    Bootstrap,
    Command,
    CommandGroup,
}

/// One generated file, path relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedUnit {
    pub path: PathBuf,
    pub kind: UnitKind,
    pub contents: String,
}

#[derive(Serialize)]
struct ManifestData<'a> {
    package: &'a str,
    version: String,
    description: String,
    bin: &'a str,
}

#[derive(Serialize)]
struct EntryData<'a> {
    program: &'a str,
    version: String,
    root_type: String,
}

#[derive(Serialize)]
struct BootstrapData<'a> {
    program: &'a str,
    env_var: String,
}

#[derive(Serialize)]
struct CommandData<'a> {
    display: &'a str,
    identifier: &'a str,
    summary: String,
    expression: String,
    target: String,
    callable: String,
}

#[derive(Serialize)]
struct GroupData<'a> {
    display: &'a str,
    identifier: &'a str,
    summary: String,
    children: Vec<ChildData<'a>>,
}

#[derive(Serialize)]
struct ChildData<'a> {
    display: &'a str,
    module: &'a str,
    path: String,
}

pub struct Emitter<R: Render> {
    renderer: R,
    project: ProjectInfo,
}

impl<R: Render> Emitter<R> {
    pub fn new(renderer: R, project: ProjectInfo) -> Self {
        Self { renderer, project }
    }

    pub fn emit(&self, tree: &CommandTree) -> Result<Vec<EmittedUnit>, EmitError> {
        let program = tree.project_name();
        let mut units = vec![
            self.manifest_unit(program)?,
            self.entry_unit(program, tree.root())?,
            self.bootstrap_unit(program)?,
        ];
        for node in tree.nodes() {
            units.push(self.node_unit(node)?);
        }
        debug!("Emitted {} units for '{}'", units.len(), program);
        Ok(units)
    }

    fn manifest_unit(&self, program: &str) -> Result<EmittedUnit, EmitError> {
        let description = self
            .project
            .description
            .clone()
            .unwrap_or_else(|| format!("Command line for {}", self.project.name));
        let package = package_name(program);
        let data = ManifestData {
            package: &package,
            version: self.project.crate_version(),
            // JSON string syntax is also a valid TOML basic string
            description: serde_json::to_string(&description)?,
            bin: program,
        };
        self.unit(
            PathBuf::from("Cargo.toml"),
            UnitKind::Manifest,
            TemplateId::CargoManifest,
            &data,
        )
    }

    fn entry_unit(&self, program: &str, root: &CommandNode) -> Result<EmittedUnit, EmitError> {
        let data = EntryData {
            program,
            version: self.project.crate_version(),
            root_type: root.import_path(),
        };
        self.unit(
            PathBuf::from(SRC_DIR).join("main.rs"),
            UnitKind::Entry,
            TemplateId::Entry,
            &data,
        )
    }

    fn bootstrap_unit(&self, program: &str) -> Result<EmittedUnit, EmitError> {
        let data = BootstrapData {
            program,
            env_var: site_packages_env(program),
        };
        self.unit(
            PathBuf::from(SRC_DIR).join("bootstrap.rs"),
            UnitKind::Bootstrap,
            TemplateId::Bootstrap,
            &data,
        )
    }

    fn node_unit(&self, node: &CommandNode) -> Result<EmittedUnit, EmitError> {
        match &node.invocation {
            Some(invocation) => {
                let data = CommandData {
                    display: &node.display_name,
                    identifier: &node.identifier_name,
                    summary: rust_literal(&node.summary),
                    expression: rust_literal(&invocation.expression()),
                    target: rust_literal(&invocation.target),
                    callable: rust_literal(&invocation.callable),
                };
                self.unit(leaf_path(node), UnitKind::Command, TemplateId::Command, &data)
            }
            None => {
                let children = node
                    .children
                    .iter()
                    .map(|child| ChildData {
                        display: &child.display_name,
                        module: &child.module_name,
                        path: child.import_path(),
                    })
                    .collect();
                let data = GroupData {
                    display: &node.display_name,
                    identifier: &node.identifier_name,
                    summary: rust_literal(&node.summary),
                    children,
                };
                self.unit(
                    group_path(node),
                    UnitKind::CommandGroup,
                    TemplateId::CommandGroup,
                    &data,
                )
            }
        }
    }

    fn unit<T: Serialize>(
        &self,
        path: PathBuf,
        kind: UnitKind,
        template: TemplateId,
        data: &T,
    ) -> Result<EmittedUnit, EmitError> {
        let value = serde_json::to_value(data)?;
        let contents = self.renderer.render(template, &value)?;
        Ok(EmittedUnit {
            path,
            kind,
            contents,
        })
    }
}

/// `src/<parent dirs>/<module>.rs`; the collapsed root lands at `src/root.rs`
fn leaf_path(node: &CommandNode) -> PathBuf {
    let dir = match &node.parent {
        Some(parent) => PathBuf::from(SRC_DIR).join(parent.to_dir()),
        None => PathBuf::from(SRC_DIR),
    };
    dir.join(format!("{}.rs", node.module_name))
}

/// `src/<module path>/mod.rs`
fn group_path(node: &CommandNode) -> PathBuf {
    PathBuf::from(SRC_DIR)
        .join(node.module_path().to_dir())
        .join("mod.rs")
}

/// Cargo package names cannot start with a digit: `3d-viewer` -> `cmd-3d-viewer`
fn package_name(program: &str) -> String {
    if program.starts_with(|c: char| c.is_ascii_digit()) {
        format!("cmd-{}", program)
    } else {
        program.to_string()
    }
}

/// `fastapi-app` -> `FASTAPI_APP_SITE_PACKAGES`
fn site_packages_env(program: &str) -> String {
    format!("{}_SITE_PACKAGES", program.replace('-', "_").to_uppercase())
}

/// Quoted Rust string literal
fn rust_literal(text: &str) -> String {
    format!("{:?}", text)
}

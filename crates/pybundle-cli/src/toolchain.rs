//! External build tools (`uv`, `cargo`)
//!
//! Each step runs to completion before the next one starts. Output is
//! captured into the log file, and a failing step aborts the pipeline.

use crate::config_manager::Config;
use crate::errors::{BundleError, ExternalToolError};
use crate::logger;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, warn};

/// One subprocess invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
}

impl Step {
    pub fn new(program: &str, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<std::ffi::OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Shell-like rendering for logs and errors
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resolved tool executables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    uv: String,
    cargo: String,
}

impl Toolchain {
    pub fn new(uv: &str, cargo: &str) -> Self {
        Self {
            uv: uv.to_string(),
            cargo: cargo.to_string(),
        }
    }

    /// Resolve `uv` and `cargo` from configuration or `PATH`
    pub fn from_config(config: &mut Config) -> Result<Self, BundleError> {
        let uv = config
            .ensure_uv_path()
            .map_err(|e| BundleError::Config(format!("uv: {}", e)))?;
        let cargo = config
            .ensure_cargo_path()
            .map_err(|e| BundleError::Config(format!("cargo: {}", e)))?;
        logger::debug(&format!("Using uv at {} and cargo at {}", uv, cargo));
        Ok(Self::new(&uv, &cargo))
    }

    /// `uv build --wheel -o <out>` in the project directory
    pub fn build_wheel(&self, source: &Path, out: &Path) -> Step {
        Step::new(&self.uv, source)
            .args(["build", "--wheel", "-o"])
            .arg(out)
    }

    /// Pinned runtime dependencies of the project, project itself excluded
    pub fn export_requirements(&self, source: &Path) -> Step {
        Step::new(&self.uv, source).args([
            "export",
            "--no-emit-project",
            "--no-dev",
            "--no-hashes",
        ])
    }

    /// Install the wheel and its dependencies into `<out>/site-packages`
    pub fn install_requirements(&self, out: &Path, requirements: &Path) -> Step {
        Step::new(&self.uv, out)
            .args(["pip", "install", "--target"])
            .arg(out.join("site-packages"))
            .arg("-r")
            .arg(requirements)
    }

    pub fn cargo_build(&self, out: &Path) -> Step {
        Step::new(&self.cargo, out).args(["build", "--release"])
    }

    /// Run one step, blocking until it exits
    pub fn run_step(step: &Step) -> Result<Output, ExternalToolError> {
        let command = step.command_line();
        logger::debug(&format!("Running: {} (in {})", command, step.cwd.display()));

        let output = Command::new(&step.program)
            .args(&step.args)
            .current_dir(&step.cwd)
            .output()
            .map_err(|source| ExternalToolError::Spawn {
                command: command.clone(),
                source,
            })?;

        logger::capture_output(&command, &output);
        debug!(
            command = %command,
            status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            "step finished"
        );

        if !output.status.success() {
            warn!(command = %command, "step failed");
            return Err(ExternalToolError::Failed {
                command,
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use crate::toolchain::*;

    fn toolchain() -> Toolchain {
        Toolchain::new("uv", "cargo")
    }

    #[test]
    fn test_step_command_lines() {
        let out = Path::new("/tmp/out");
        let source = Path::new("/src/app");
        let tools = toolchain();

        let wheel = tools.build_wheel(source, out);
        assert_eq!(wheel.cwd, source);
        assert_eq!(wheel.command_line(), "uv build --wheel -o /tmp/out");

        assert_eq!(
            tools.export_requirements(source).command_line(),
            "uv export --no-emit-project --no-dev --no-hashes"
        );

        let install = tools.install_requirements(out, Path::new("requirements.txt"));
        assert_eq!(install.cwd, out);
        let target = out.join("site-packages").to_string_lossy().into_owned();
        let expected: Vec<String> = ["pip", "install", "--target", target.as_str(), "-r", "requirements.txt"]
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(install.args, expected);

        let build = tools.cargo_build(out);
        assert_eq!(build.command_line(), "cargo build --release");
        assert_eq!(build.cwd, out);
    }

    #[test]
    fn test_run_step_success_captures_output() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let step = Step::new(env!("CARGO"), dir.path()).arg("--version");
        let Ok(output) = Toolchain::run_step(&step) else {
            panic!("cargo --version should succeed");
        };
        assert!(String::from_utf8_lossy(&output.stdout).contains("cargo"));
    }

    #[test]
    fn test_run_step_failure_carries_command() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let step = Step::new(env!("CARGO"), dir.path()).arg("no-such-subcommand-xyz");
        let result = Toolchain::run_step(&step);
        let Err(ExternalToolError::Failed { command, status, .. }) = result else {
            panic!("unknown cargo subcommand must fail");
        };
        assert!(command.ends_with("no-such-subcommand-xyz"));
        assert_ne!(status, Some(0));
    }

    #[test]
    fn test_run_step_missing_program() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let step = Step::new("pybundle-no-such-program", dir.path());
        assert!(matches!(
            Toolchain::run_step(&step),
            Err(ExternalToolError::Spawn { .. })
        ));
    }
}

use crate::bundle::build_tree;
use crate::errors::BundleError;
use crate::logger;
use clap::Args;
use pybundle_manifest::PyProject;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct TreeCommand {
    /// Project directory containing pyproject.toml (default: current directory)
    pub path: Option<PathBuf>,
}

pub fn handle_tree(cmd: TreeCommand) -> Result<(), BundleError> {
    let path = cmd.path.unwrap_or_else(|| PathBuf::from("."));
    let pyproject = PyProject::load(&path)?;
    let tree = build_tree(&pyproject)?;
    logger::debug(&format!(
        "{} commands in {}",
        tree.leaf_count(),
        path.display()
    ));
    print!("{}", tree);
    Ok(())
}

use crate::bundle::BundleOptions;
use crate::errors::BundleError;
use crate::logger;
use crate::GlobalOpts;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct BundleCommand {
    /// Project directory containing pyproject.toml (default: current directory)
    pub path: Option<PathBuf>,

    /// Output directory (default: <bundle-dir>/<project name>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace a non-empty output directory
    #[arg(long)]
    pub overwrite: bool,

    /// Only generate the crate; skip uv and cargo
    #[arg(long)]
    pub no_build: bool,
}

pub fn handle_bundle(cmd: BundleCommand, opts: &GlobalOpts) -> Result<(), BundleError> {
    let options = BundleOptions::new(cmd.path.as_deref(), cmd.output.as_deref(), cmd.overwrite)?;
    let summary = options.run(!cmd.no_build)?;

    if opts.verbosity_level() > 0 {
        for file in &summary.files {
            logger::debug(&format!("  {}", file.display()));
        }
    }

    match summary.binary {
        Some(binary) => logger::success(&format!("Bundle created: {}", binary.display())),
        None => logger::success(&format!(
            "Generated crate in {}",
            summary.output.display()
        )),
    }
    Ok(())
}

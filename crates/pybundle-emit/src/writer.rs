use crate::emitter::EmittedUnit;
use crate::errors::EmitError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Write units below `out_dir`, creating parent directories as needed
///
/// Stops at the first failure; files written before it are left in place.
pub fn write_units(out_dir: &Path, units: &[EmittedUnit]) -> Result<Vec<PathBuf>, EmitError> {
    let mut written = Vec::with_capacity(units.len());
    for unit in units {
        let escapes = unit
            .path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || unit.path.as_os_str().is_empty() {
            return Err(EmitError::InvalidPath(unit.path.clone()));
        }

        let path = out_dir.join(&unit.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| EmitError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &unit.contents).map_err(|source| EmitError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

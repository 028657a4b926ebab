//! pybundle manifest loading
//!
//! Reads the `[project]` table of a `pyproject.toml` (PEP 621) and turns its
//! `scripts`, `gui-scripts` and `entry-points` tables into origin-tagged
//! entry point buckets for the command tree builder.

pub mod entry;
pub mod errors;
pub mod types;

pub use entry::{EntryPointSet, EntryPointSpec, Origin};
pub use errors::ManifestError;
pub use types::{Project, PyProject, PYPROJECT_FILE};

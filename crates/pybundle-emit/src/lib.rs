//! Source emitter for pybundle
//!
//! Renders a [`pybundle_tree::CommandTree`] into the files of a standalone
//! Rust crate: a manifest, an entry point, a one-time bootstrap module and
//! one module per command node.

pub mod emitter;
pub mod errors;
pub mod render;
pub mod writer;

pub use emitter::{EmittedUnit, Emitter, ProjectInfo, UnitKind};
pub use errors::EmitError;
pub use render::{HandlebarsRenderer, Render, TemplateId};
pub use writer::write_units;

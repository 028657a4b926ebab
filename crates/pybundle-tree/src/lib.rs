//! Command tree compiler
//!
//! Turns origin-tagged entry points into a validated [`CommandTree`]:
//! 1. [`reference`] parses `module:callable` references
//! 2. [`naming`] derives display / identifier / module names
//! 3. [`builder`] validates the buckets and assembles the hierarchy
//!
//! The tree is immutable once built; the emitter only reads it.

pub mod builder;
pub mod errors;
pub mod naming;
pub mod node;
pub mod reference;

pub use builder::{TreeBuilder, ENTRYPOINT_GROUP, GUI_GROUP, ROOT_MODULE, SCRIPTS_GROUP};
pub use errors::{ReferenceParseError, TreeError};
pub use node::{CommandNode, CommandTree, ModulePath};
pub use reference::{parse_reference, InvocationDescriptor};

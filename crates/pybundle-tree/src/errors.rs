use thiserror::Error;

/// A malformed entry point reference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid entry point reference '{reference}': {reason}")]
pub struct ReferenceParseError {
    pub reference: String,
    pub reason: &'static str,
}

impl ReferenceParseError {
    pub(crate) fn new(reference: &str, reason: &'static str) -> Self {
        Self {
            reference: reference.to_string(),
            reason,
        }
    }
}

/// Errors that abort command tree construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("entry point '{name}' ({origin}): {source}")]
    ReferenceParse {
        name: String,
        origin: String,
        #[source]
        source: ReferenceParseError,
    },

    #[error("entry point '{name}' is declared in multiple places: {}", origins.join(", "))]
    NameCollision { name: String, origins: Vec<String> },

    #[error("entry point group '{0}' has no entries")]
    EmptyGroup(String),

    #[error("project declares no scripts, gui-scripts or entry points")]
    EmptyTree,

    #[error("'{0}' cannot be used as a command name")]
    InvalidName(String),

    #[error("commands in '{parent}' resolve to the same name '{display_name}'")]
    SiblingConflict {
        parent: String,
        display_name: String,
    },

    #[error("could not derive a unique module name for '{0}'")]
    ModuleConflict(String),
}

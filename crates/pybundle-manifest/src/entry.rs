//! Origin-tagged entry points
//!
//! Every callable a project exposes comes from one of three places in
//! `[project]`: `scripts`, `gui-scripts`, or a named `entry-points` group.

use std::collections::BTreeMap;
use std::fmt;

/// Where an entry point was declared
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    /// `[project.scripts]`
    Plain,
    /// `[project.gui-scripts]`
    Gui,
    /// `[project.entry-points.<group>]`
    Named(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Plain => write!(f, "scripts"),
            Origin::Gui => write!(f, "gui-scripts"),
            Origin::Named(group) => write!(f, "entry-points.{}", group),
        }
    }
}

/// A single declared entry point, e.g. `serve = "app.main:serve"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointSpec {
    /// Entry point name (e.g., "serve", "add-user")
    pub name: String,
    /// Raw reference string (e.g., "app.main:serve")
    pub reference: String,
    pub origin: Origin,
}

impl EntryPointSpec {
    pub fn new(name: impl Into<String>, reference: impl Into<String>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            origin,
        }
    }
}

/// Entry points grouped by origin bucket
///
/// Named groups are kept even when empty so the tree builder can reject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPointSet {
    pub scripts: Vec<EntryPointSpec>,
    pub gui: Vec<EntryPointSpec>,
    pub groups: BTreeMap<String, Vec<EntryPointSpec>>,
}

impl EntryPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `[project.scripts]` entry
    pub fn with_script(mut self, name: &str, reference: &str) -> Self {
        self.scripts
            .push(EntryPointSpec::new(name, reference, Origin::Plain));
        self
    }

    /// Add a `[project.gui-scripts]` entry
    pub fn with_gui_script(mut self, name: &str, reference: &str) -> Self {
        self.gui.push(EntryPointSpec::new(name, reference, Origin::Gui));
        self
    }

    /// Add an entry to a named group, declaring the group if needed
    pub fn with_entry_point(mut self, group: &str, name: &str, reference: &str) -> Self {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(EntryPointSpec::new(
                name,
                reference,
                Origin::Named(group.to_string()),
            ));
        self
    }

    /// Declare a named group without entries
    pub fn with_group(mut self, group: &str) -> Self {
        self.groups.entry(group.to_string()).or_default();
        self
    }

    /// Total number of entry points across all buckets
    pub fn len(&self) -> usize {
        self.scripts.len() + self.gui.len() + self.groups.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entry points in bucket order: scripts, gui-scripts, then groups by name
    pub fn iter(&self) -> impl Iterator<Item = &EntryPointSpec> {
        self.scripts
            .iter()
            .chain(self.gui.iter())
            .chain(self.groups.values().flatten())
    }
}

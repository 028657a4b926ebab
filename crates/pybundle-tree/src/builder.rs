//! Command tree construction
//!
//! Checks run in a fixed order and the first failure aborts the build:
//! 1. every name is usable and every reference parses
//! 2. no raw name appears in more than one origin bucket
//! 3. no declared group is empty
//! 4. at least one entry point exists
//! 5. a single entry point becomes the root itself
//! 6. otherwise the root groups the non-empty buckets
//! 7. sibling display names are unique
//! 8. module names are made unique across the tree

use crate::errors::TreeError;
use crate::naming::{
    disambiguate, is_reserved_module, to_display, to_identifier, to_module, HASH_WIDTHS,
};
use crate::node::{CommandNode, CommandTree, ModulePath};
use crate::reference::parse_reference;
use pybundle_manifest::{EntryPointSet, EntryPointSpec};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Module name of the tree root
pub const ROOT_MODULE: &str = "root";
/// Group holding `[project.scripts]`
pub const SCRIPTS_GROUP: &str = "scripts";
/// Group holding `[project.gui-scripts]`
pub const GUI_GROUP: &str = "gui";
/// Group holding one subgroup per named entry point group
pub const ENTRYPOINT_GROUP: &str = "entrypoint";

pub struct TreeBuilder {
    project_name: String,
    description: Option<String>,
}

impl TreeBuilder {
    pub fn new(project_name: &str) -> Self {
        Self {
            project_name: project_name.trim().to_string(),
            description: None,
        }
    }

    /// Help text for the root group
    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    pub fn build(&self, set: &EntryPointSet) -> Result<CommandTree, TreeError> {
        let project_display = to_display(&self.project_name);
        if project_display.is_empty() {
            return Err(TreeError::InvalidName(self.project_name.clone()));
        }

        let scripts = parse_bucket(&set.scripts)?;
        let gui = parse_bucket(&set.gui)?;
        let mut groups = Vec::with_capacity(set.groups.len());
        for (group, entries) in &set.groups {
            if to_display(group).is_empty() {
                return Err(TreeError::InvalidName(group.clone()));
            }
            groups.push((group.as_str(), parse_bucket(entries)?));
        }

        check_collisions(set)?;

        if let Some((group, _)) = groups.iter().find(|(_, leaves)| leaves.is_empty()) {
            return Err(TreeError::EmptyGroup((*group).to_string()));
        }

        let total = scripts.len() + gui.len() + groups.iter().map(|(_, l)| l.len()).sum::<usize>();
        if total == 0 {
            return Err(TreeError::EmptyTree);
        }

        let mut root = if total == 1 {
            let Some(mut leaf) = scripts
                .into_iter()
                .chain(gui)
                .chain(groups.into_iter().flat_map(|(_, leaves)| leaves))
                .next()
            else {
                return Err(TreeError::EmptyTree);
            };
            debug!("Single entry point '{}', collapsing tree", leaf.display_name);
            leaf.module_name = ROOT_MODULE.to_string();
            leaf
        } else {
            self.group_root(project_display.clone(), scripts, gui, groups)
        };

        check_siblings(&root)?;

        let mut used = BTreeSet::from([ROOT_MODULE.to_string()]);
        assign_modules(&mut root, "", &mut used)?;
        assign_parents(&mut root, &ModulePath::new().child(ROOT_MODULE));

        debug!(
            "Built command tree for '{}' with {} commands",
            project_display,
            root.leaf_count()
        );
        Ok(CommandTree::new(root, project_display))
    }

    fn group_root(
        &self,
        display_name: String,
        scripts: Vec<CommandNode>,
        gui: Vec<CommandNode>,
        groups: Vec<(&str, Vec<CommandNode>)>,
    ) -> CommandNode {
        let mut children = Vec::new();
        if !scripts.is_empty() {
            children.push(bucket(SCRIPTS_GROUP, "Console scripts", scripts));
        }
        if !gui.is_empty() {
            children.push(bucket(GUI_GROUP, "GUI scripts", gui));
        }
        if !groups.is_empty() {
            let named = groups
                .into_iter()
                .map(|(group, leaves)| {
                    CommandNode::group(
                        to_display(group),
                        to_identifier(group),
                        to_module(group),
                        format!("Entry points in group '{}'", group),
                        leaves,
                    )
                })
                .collect();
            children.push(bucket(ENTRYPOINT_GROUP, "Entry point groups", named));
        }

        CommandNode::group(
            display_name,
            to_identifier(&self.project_name),
            ROOT_MODULE.to_string(),
            self.description.clone().unwrap_or_default(),
            children,
        )
    }
}

fn bucket(name: &str, summary: &str, children: Vec<CommandNode>) -> CommandNode {
    CommandNode::group(
        name.to_string(),
        to_identifier(name),
        name.to_string(),
        summary.to_string(),
        children,
    )
}

/// Parse one bucket into leaves, sorted by raw name
fn parse_bucket(entries: &[EntryPointSpec]) -> Result<Vec<CommandNode>, TreeError> {
    let mut sorted: Vec<&EntryPointSpec> = entries.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    sorted
        .into_iter()
        .map(|entry| {
            let display_name = to_display(&entry.name);
            if display_name.is_empty() {
                return Err(TreeError::InvalidName(entry.name.clone()));
            }
            let invocation =
                parse_reference(&entry.reference).map_err(|source| TreeError::ReferenceParse {
                    name: entry.name.clone(),
                    origin: entry.origin.to_string(),
                    source,
                })?;
            Ok(CommandNode::leaf(
                display_name,
                to_identifier(&entry.name),
                to_module(&entry.name),
                invocation,
            ))
        })
        .collect()
}

/// Reject raw names declared in more than one origin bucket
fn check_collisions(set: &EntryPointSet) -> Result<(), TreeError> {
    let mut origins: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in set.iter() {
        let seen = origins.entry(entry.name.as_str()).or_default();
        let origin = entry.origin.to_string();
        if !seen.contains(&origin) {
            seen.push(origin);
        }
    }

    match origins.into_iter().find(|(_, seen)| seen.len() > 1) {
        Some((name, origins)) => Err(TreeError::NameCollision {
            name: name.to_string(),
            origins,
        }),
        None => Ok(()),
    }
}

fn check_siblings(node: &CommandNode) -> Result<(), TreeError> {
    let mut seen = BTreeSet::new();
    for child in &node.children {
        if !seen.insert(child.display_name.as_str()) {
            return Err(TreeError::SiblingConflict {
                parent: node.display_name.clone(),
                display_name: child.display_name.clone(),
            });
        }
        check_siblings(child)?;
    }
    Ok(())
}

/// Pre-order walk; the first node keeps its base module name
fn assign_modules(
    node: &mut CommandNode,
    dotted_path: &str,
    used: &mut BTreeSet<String>,
) -> Result<(), TreeError> {
    for child in &mut node.children {
        let child_path = if dotted_path.is_empty() {
            child.display_name.clone()
        } else {
            format!("{}.{}", dotted_path, child.display_name)
        };
        child.module_name = unique_module(&child.module_name, &child_path, used)?;
        assign_modules(child, &child_path, used)?;
    }
    Ok(())
}

fn unique_module(
    base: &str,
    dotted_path: &str,
    used: &mut BTreeSet<String>,
) -> Result<String, TreeError> {
    if !is_reserved_module(base) && used.insert(base.to_string()) {
        return Ok(base.to_string());
    }
    for width in HASH_WIDTHS {
        let candidate = disambiguate(base, dotted_path, *width);
        if used.insert(candidate.clone()) {
            debug!("Module '{}' at '{}' renamed to '{}'", base, dotted_path, candidate);
            return Ok(candidate);
        }
    }
    Err(TreeError::ModuleConflict(dotted_path.to_string()))
}

fn assign_parents(node: &mut CommandNode, own_path: &ModulePath) {
    for child in &mut node.children {
        child.parent = Some(own_path.clone());
        let child_path = own_path.child(&child.module_name);
        assign_parents(child, &child_path);
    }
}

//! Command tree nodes

use crate::reference::InvocationDescriptor;
use std::fmt;
use std::path::PathBuf;

/// Module names from the tree root down to a node
///
/// Nodes refer to their parent through this path instead of a pointer, so
/// the tree has a single owner per node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Path one level below this one
    pub fn child(&self, module: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(module.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rust path from the crate root: `crate::root::scripts`
    pub fn to_import_path(&self) -> String {
        std::iter::once("crate")
            .chain(self.0.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("::")
    }

    /// Relative directory: `root/scripts`
    pub fn to_dir(&self) -> PathBuf {
        self.0.iter().collect()
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_import_path())
    }
}

/// One command in the generated interface
///
/// A node is either a leaf (an invocation, no children) or a group (at
/// least one child, no invocation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    /// Kebab-case name shown on the command line, unique among siblings
    pub display_name: String,
    /// Pascal-case name of the generated type
    pub identifier_name: String,
    /// Snake-case file and import segment, unique across the tree
    pub module_name: String,
    /// One-line help text
    pub summary: String,
    pub invocation: Option<InvocationDescriptor>,
    pub children: Vec<CommandNode>,
    /// Module path of the parent group, `None` for the root
    pub parent: Option<ModulePath>,
}

impl CommandNode {
    pub(crate) fn leaf(
        display_name: String,
        identifier_name: String,
        module_name: String,
        invocation: InvocationDescriptor,
    ) -> Self {
        Self {
            display_name,
            identifier_name,
            module_name,
            summary: format!("Run {}", invocation),
            invocation: Some(invocation),
            children: Vec::new(),
            parent: None,
        }
    }

    pub(crate) fn group(
        display_name: String,
        identifier_name: String,
        module_name: String,
        summary: String,
        children: Vec<CommandNode>,
    ) -> Self {
        Self {
            display_name,
            identifier_name,
            module_name,
            summary,
            invocation: None,
            children,
            parent: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.invocation.is_some()
    }

    pub fn is_group(&self) -> bool {
        !self.is_leaf()
    }

    /// Path of this node's own module
    pub fn module_path(&self) -> ModulePath {
        match &self.parent {
            Some(parent) => parent.child(&self.module_name),
            None => ModulePath::new().child(&self.module_name),
        }
    }

    /// Fully qualified path of the generated type: `crate::root::scripts::Scripts`
    pub fn import_path(&self) -> String {
        format!(
            "{}::{}",
            self.module_path().to_import_path(),
            self.identifier_name
        )
    }

    /// This node and all descendants in depth-first pre-order
    pub fn walk(&self) -> Vec<&CommandNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(CommandNode::leaf_count).sum()
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match &self.invocation {
            Some(invocation) => writeln!(f, "{}{} -> {}", indent, self.display_name, invocation)?,
            None => writeln!(f, "{}{}", indent, self.display_name)?,
        }
        for child in &self.children {
            child.write_outline(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Validated command hierarchy for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTree {
    root: CommandNode,
    project_name: String,
}

impl CommandTree {
    pub(crate) fn new(root: CommandNode, project_name: String) -> Self {
        Self { root, project_name }
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Display form of the project name, used as the program name
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn is_collapsed(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn nodes(&self) -> Vec<&CommandNode> {
        self.root.walk()
    }

    /// Look up a node by display names below the root, e.g. `["scripts", "serve"]`
    pub fn find(&self, path: &[&str]) -> Option<&CommandNode> {
        let mut node = &self.root;
        for name in path {
            node = node.children.iter().find(|c| c.display_name == *name)?;
        }
        Some(node)
    }
}

impl fmt::Display for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_outline(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::node::*;

    fn descriptor(target: &str, callable: &str) -> InvocationDescriptor {
        InvocationDescriptor {
            target: target.to_string(),
            callable: callable.to_string(),
        }
    }

    fn sample() -> CommandNode {
        let mut leaf = CommandNode::leaf(
            "hello".to_string(),
            "Hello".to_string(),
            "hello".to_string(),
            descriptor("pkg.mod", "main"),
        );
        leaf.parent = Some(ModulePath::from_segments(["root", "scripts"]));
        let mut scripts = CommandNode::group(
            "scripts".to_string(),
            "Scripts".to_string(),
            "scripts".to_string(),
            "Console scripts".to_string(),
            vec![leaf],
        );
        scripts.parent = Some(ModulePath::from_segments(["root"]));
        CommandNode::group(
            "demo".to_string(),
            "Demo".to_string(),
            "root".to_string(),
            String::new(),
            vec![scripts],
        )
    }

    #[test]
    fn test_module_path_renderings() {
        let path = ModulePath::new().child("root").child("scripts");
        assert_eq!(path.to_import_path(), "crate::root::scripts");
        assert_eq!(path.to_dir(), PathBuf::from("root").join("scripts"));
        assert_eq!(path.to_string(), "crate::root::scripts");
        assert_eq!(ModulePath::new().to_import_path(), "crate");
    }

    #[test]
    fn test_node_paths() {
        let root = sample();
        assert_eq!(root.module_path().to_import_path(), "crate::root");
        assert_eq!(root.import_path(), "crate::root::Demo");

        let leaf = &root.children[0].children[0];
        assert!(leaf.is_leaf());
        assert_eq!(leaf.summary, "Run pkg.mod:main");
        assert_eq!(leaf.import_path(), "crate::root::scripts::hello::Hello");
    }

    #[test]
    fn test_walk_is_pre_order() {
        let root = sample();
        let names: Vec<&str> = root.walk().iter().map(|n| n.display_name.as_str()).collect();
        assert_eq!(names, vec!["demo", "scripts", "hello"]);
        assert_eq!(root.leaf_count(), 1);
    }

    #[test]
    fn test_tree_outline_and_find() {
        let tree = CommandTree::new(sample(), "demo".to_string());
        assert_eq!(
            tree.to_string(),
            "demo\n  scripts\n    hello -> pkg.mod:main\n"
        );
        assert!(tree.find(&["scripts", "hello"]).is_some_and(CommandNode::is_leaf));
        assert!(tree.find(&["gui"]).is_none());
        assert!(!tree.is_collapsed());
    }
}

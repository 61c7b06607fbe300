//! Builds the nested group tree mirroring the corpus directory layout.

use serde::Serialize;

use crate::corpus::FixtureEntry;

/// One directory level of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupNode {
    /// Directory name (suite name for the root).
    pub name: String,
    /// `/`-separated directory relative to the corpus root, `""` for the root.
    pub dir_path: String,
    /// Child groups in insertion (scan) order.
    pub children: Vec<GroupNode>,
    /// Fixtures directly inside this directory, in insertion (scan) order.
    pub fixtures: Vec<FixtureEntry>,
}

impl GroupNode {
    pub fn new(name: impl Into<String>, dir_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir_path: dir_path.into(),
            children: Vec::new(),
            fixtures: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&GroupNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Find or create the child group called `name`.
    pub fn child_mut(&mut self, name: &str) -> &mut GroupNode {
        let idx = match self.children.iter().position(|child| child.name == name) {
            Some(idx) => idx,
            None => {
                let dir_path = if self.dir_path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}/{}", self.dir_path, name)
                };
                self.children.push(GroupNode::new(name, dir_path));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Follow a `/`-separated path of child names.
    pub fn find(&self, dir_path: &str) -> Option<&GroupNode> {
        dir_path
            .split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.child(part))
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty() && self.children.is_empty()
    }

    /// Number of fixtures in this group and all descendants.
    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
            + self
                .children
                .iter()
                .map(GroupNode::fixture_count)
                .sum::<usize>()
    }

    /// Drop groups with neither fixtures nor non-empty descendants,
    /// bottom-up. Returns the number of groups removed.
    pub fn prune_empty(&mut self) -> usize {
        let mut removed = 0;
        for child in &mut self.children {
            removed += child.prune_empty();
        }
        let before = self.children.len();
        self.children.retain(|child| !child.is_empty());
        removed + (before - self.children.len())
    }
}

/// Accumulates fixtures into a [`GroupNode`] tree.
pub struct HierarchyBuilder {
    root: GroupNode,
}

impl HierarchyBuilder {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: GroupNode::new(root_name, ""),
        }
    }

    /// Insert one fixture, creating its group chain on demand.
    pub fn insert(&mut self, entry: FixtureEntry) {
        let mut node = &mut self.root;
        for part in &entry.parent_group_path {
            node = node.child_mut(part);
        }
        node.fixtures.push(entry);
    }

    /// Finish the tree, pruning empty groups.
    pub fn finish(mut self) -> GroupNode {
        let pruned = self.root.prune_empty();
        if pruned > 0 {
            tracing::debug!("[Hierarchy] Pruned {} empty groups", pruned);
        }
        self.root
    }

    /// Build a tree from a scan in one go.
    pub fn from_entries<I>(root_name: impl Into<String>, entries: I) -> GroupNode
    where
        I: IntoIterator<Item = FixtureEntry>,
    {
        let mut builder = Self::new(root_name);
        for entry in entries {
            builder.insert(entry);
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{EntryKind, TestName};

    fn entry(path: &str) -> FixtureEntry {
        let stem = path
            .rsplit('/')
            .next()
            .unwrap()
            .trim_end_matches(".kt")
            .to_string();
        FixtureEntry::new(path.to_string(), TestName::Captured(stem), EntryKind::File)
    }

    fn build(paths: &[&str]) -> GroupNode {
        HierarchyBuilder::from_entries("s", paths.iter().map(|path| entry(path)))
    }

    fn group_names(node: &GroupNode) -> Vec<&str> {
        node.children.iter().map(|c| c.name.as_str()).collect()
    }

    fn file_names(node: &GroupNode) -> Vec<&str> {
        node.fixtures.iter().map(|f| f.file_name.as_str()).collect()
    }

    #[test]
    fn mirrors_directory_structure() {
        let tree = build(&["a/X.kt", "a/Y.kt", "b/sub/Z.kt"]);
        assert_eq!(tree.name, "s");
        assert!(tree.fixtures.is_empty());
        assert_eq!(group_names(&tree), vec!["a", "b"]);

        let a = tree.find("a").unwrap();
        assert_eq!(file_names(a), vec!["X.kt", "Y.kt"]);
        let sub = tree.find("b/sub").unwrap();
        assert_eq!(sub.dir_path, "b/sub");
        assert_eq!(sub.fixtures[0].relative_path, "b/sub/Z.kt");
        assert!(tree.find("b").unwrap().fixtures.is_empty());
        assert_eq!(tree.fixture_count(), 3);
    }

    #[test]
    fn keeps_insertion_order() {
        let tree = build(&["z.kt", "m/b.kt", "a.kt", "m/a.kt"]);
        assert_eq!(file_names(&tree), vec!["z.kt", "a.kt"]);
        assert_eq!(file_names(tree.find("m").unwrap()), vec!["b.kt", "a.kt"]);
    }

    #[test]
    fn sibling_groups_are_unique() {
        let tree = build(&["a/x.kt", "a/y.kt", "a/deep/z.kt"]);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].children.len(), 1);
    }

    #[test]
    fn prunes_empty_groups_bottom_up() {
        let mut root = GroupNode::new("s", "");
        root.child_mut("empty").child_mut("deeper");
        root.child_mut("kept").fixtures.push(entry("kept/x.kt"));
        root.child_mut("kept").child_mut("hollow");

        assert_eq!(root.prune_empty(), 3);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "kept");
        assert!(root.children[0].children.is_empty());
    }

    #[test]
    fn empty_scan_builds_empty_root() {
        let tree = HierarchyBuilder::from_entries("s", Vec::new());
        assert!(tree.is_empty());
    }
}

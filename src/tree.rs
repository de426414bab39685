use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Change status of a node as reported by the git-status backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GitStatus {
    #[default]
    None,
    Modified,
    /// Added to the index or untracked in the worktree
    Added,
}

impl GitStatus {
    pub fn is_changed(self) -> bool {
        self != GitStatus::None
    }

    /// Tag appended after the name, e.g. `" [M]"`
    pub fn tag(self) -> &'static str {
        match self {
            GitStatus::None => "",
            GitStatus::Modified => " [M]",
            GitStatus::Added => " [+]",
        }
    }
}

/// Represents a single node in the file tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub children: Vec<TreeNode>,
    pub collapsed: bool,
    pub hidden: bool,
    pub annotation: String,
    pub git_status: GitStatus,
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: String, path: PathBuf, is_dir: bool) -> Self {
        Self {
            name,
            path,
            is_dir,
            children: Vec::new(),
            collapsed: false,
            hidden: false,
            annotation: String::new(),
            git_status: GitStatus::None,
        }
    }

    /// Create a new directory node
    pub fn new_dir(name: String, path: PathBuf) -> Self {
        Self::new(name, path, true)
    }

    /// Create a new file node
    pub fn new_file(name: String, path: PathBuf) -> Self {
        Self::new(name, path, false)
    }

    /// Set the git status for this node
    pub fn with_git_status(mut self, status: GitStatus) -> Self {
        self.git_status = status;
        self
    }

    pub fn with_annotation(mut self, annotation: &str) -> Self {
        self.annotation = annotation.to_string();
        self
    }

    /// Add a child node. Children keep insertion order; files never get children.
    pub fn add_child(&mut self, child: TreeNode) {
        if self.is_dir {
            self.children.push(child);
        }
    }

    /// Find a direct child by name
    pub fn find_child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Find a node by its slash-separated path relative to this node
    pub fn find(&self, relative: &str) -> Option<&TreeNode> {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.find_child(part))
    }

    /// Mutable variant of [`TreeNode::find`]
    pub fn find_mut(&mut self, relative: &str) -> Option<&mut TreeNode> {
        let mut node = self;
        for part in relative.split('/').filter(|part| !part.is_empty()) {
            node = node.children.iter_mut().find(|child| child.name == part)?;
        }
        Some(node)
    }

    /// Flip the collapsed flag. Returns false for files, which cannot collapse.
    pub fn toggle_collapsed(&mut self) -> bool {
        if self.is_dir {
            self.collapsed = !self.collapsed;
            true
        } else {
            false
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.hidden = !self.hidden;
    }

    /// Whether annotation, collapsed or hidden differ from their defaults
    pub fn has_user_state(&self) -> bool {
        !self.annotation.is_empty() || self.collapsed || self.hidden
    }

    /// Number of nodes in this subtree, including this node
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Get tree statistics
    pub fn get_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for child in &self.children {
            Self::collect_stats(child, 0, &mut stats);
        }
        stats
    }

    /// Recursively collect tree statistics
    fn collect_stats(node: &TreeNode, depth: usize, stats: &mut TreeStats) {
        if node.is_dir {
            stats.directories += 1;
            if node.collapsed {
                stats.collapsed_directories += 1;
            }
        } else {
            stats.files += 1;
        }
        if node.hidden {
            stats.hidden += 1;
        }
        if !node.annotation.is_empty() {
            stats.annotated += 1;
        }
        if node.git_status.is_changed() {
            stats.files_with_git_status += 1;
        }

        stats.total_nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);

        for child in &node.children {
            Self::collect_stats(child, depth + 1, stats);
        }
    }
}

/// Statistics about the tree below the root (the root itself is not counted)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub files: usize,
    pub directories: usize,
    pub collapsed_directories: usize,
    pub hidden: usize,
    pub annotated: usize,
    pub files_with_git_status: usize,
    pub max_depth: usize,
}

/// Root-relative, slash-normalized key for `path`.
///
/// Returns `None` for the root itself and for paths outside of `root`.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Apply a root-relative status map onto every node of the tree
pub fn apply_git_status(root: &mut TreeNode, root_path: &Path, statuses: &HashMap<String, GitStatus>) {
    if statuses.is_empty() {
        return;
    }
    for child in &mut root.children {
        apply_git_status_to_node(child, root_path, statuses);
    }
}

fn apply_git_status_to_node(node: &mut TreeNode, root_path: &Path, statuses: &HashMap<String, GitStatus>) {
    if let Some(key) = relative_key(root_path, &node.path) {
        if let Some(&status) = statuses.get(&key) {
            node.git_status = status;
        }
    }
    for child in &mut node.children {
        apply_git_status_to_node(child, root_path, statuses);
    }
}

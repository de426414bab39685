//! Bounded directory walker
//!
//! Builds the in-memory [`TreeNode`] tree for a root directory. The scan is a
//! depth-first pre-order expansion capped by a node count and a depth limit;
//! when the count runs out the entries still waiting in the directories being
//! enumerated are dropped, so which nodes survive near the cap depends on
//! traversal order.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::error::{Result, TreemarkError};
use crate::tree::TreeNode;

/// Repository metadata directory, excluded regardless of ignore rules
pub const METADATA_DIR: &str = ".git";
pub const IGNORE_FILE: &str = ".gitignore";
pub const DEFAULT_MAX_NODES: usize = 5000;
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Gitignore rules compiled from the root's ignore file, matched against base names
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    /// Load `<root>/.gitignore`. Missing or unreadable files yield `None`.
    pub fn from_root(root: &Path) -> Option<Self> {
        let file = root.join(IGNORE_FILE);
        if !file.is_file() {
            return None;
        }
        let (matcher, error) = Gitignore::new(&file);
        if let Some(err) = error {
            log::warn!("ignore rules: partial parse of {}: {}", file.display(), err);
        }
        log::debug!("ignore rules: loaded {} patterns from {}", matcher.num_ignores(), file.display());
        Some(Self { matcher })
    }

    /// Compile rules from in-memory pattern lines
    pub fn from_patterns(root: &Path, patterns: &[&str]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| TreemarkError::Generic(e.to_string()))?;
        }
        let matcher = builder.build().map_err(|e| TreemarkError::Generic(e.to_string()))?;
        Ok(Self { matcher })
    }

    pub fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        self.matcher.matched(name, is_dir).is_ignore()
    }
}

#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub ignore: Option<IgnoreRules>,
    /// Cap on accepted nodes, root included. `None` means unlimited.
    pub max_nodes: Option<usize>,
    /// Deepest depth kept; the root's children are depth 0. `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            ignore: None,
            max_nodes: Some(DEFAULT_MAX_NODES),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl WalkOptions {
    /// Default caps plus the ignore rules found under `root`
    pub fn for_root(root: &Path) -> Self {
        Self {
            ignore: IgnoreRules::from_root(root),
            ..Self::default()
        }
    }

    /// No ignore rules and no caps
    pub fn unlimited() -> Self {
        Self {
            ignore: None,
            max_nodes: None,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub tree: TreeNode,
    pub limit_reached: bool,
}

/// Scan `root` into a tree. Only a root that cannot be stat'ed (or is not a
/// directory) is an error; every other failure skips the affected entry.
pub fn walk(root: &Path, options: &WalkOptions) -> Result<WalkOutcome> {
    let start_time = Instant::now();
    log::info!("🕐 walk: starting scan of {:?}", root);

    let metadata = fs::metadata(root).map_err(|e| {
        log::error!("walk: cannot stat root {}: {}", root.display(), e);
        TreemarkError::InvalidRoot(root.to_path_buf())
    })?;
    if !metadata.is_dir() {
        return Err(TreemarkError::InvalidRoot(root.to_path_buf()));
    }

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let mut tree = TreeNode::new_dir(name, root.to_path_buf());

    let mut walker = Walker {
        options,
        count: 1,
        limit_reached: false,
    };
    if walker.at_capacity() {
        walker.limit_reached = true;
    }
    walker.scan_into(&mut tree, 0);

    log::info!(
        "🕐 walk: {} nodes in {:?} (limit reached: {})",
        walker.count,
        start_time.elapsed(),
        walker.limit_reached
    );

    Ok(WalkOutcome {
        tree,
        limit_reached: walker.limit_reached,
    })
}

struct Walker<'o> {
    options: &'o WalkOptions,
    count: usize,
    limit_reached: bool,
}

impl Walker<'_> {
    fn at_capacity(&self) -> bool {
        self.options.max_nodes.is_some_and(|max| self.count >= max)
    }

    /// Scan the entries of `parent` into it; `depth` is the depth of those entries.
    fn scan_into(&mut self, parent: &mut TreeNode, depth: usize) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let entries = match fs::read_dir(&parent.path) {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("walk: skipping unreadable directory {}: {}", parent.path.display(), err);
                return;
            }
        };
        let mut entries: Vec<fs::DirEntry> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::debug!("walk: skipping entry in {}: {}", parent.path.display(), err);
                    None
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            if self.at_capacity() {
                self.limit_reached = true;
                break;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name == METADATA_DIR {
                continue;
            }

            let path = entry.path();
            let Some((is_dir, is_symlink)) = entry_kind(&entry, &path) else {
                continue;
            };

            if let Some(rules) = &self.options.ignore {
                if rules.is_ignored(&name, is_dir) {
                    continue;
                }
            }

            let mut node = TreeNode::new(name, path, is_dir);
            self.count += 1;
            if self.at_capacity() {
                self.limit_reached = true;
            }

            // Symlinked directories are listed but never entered
            if is_dir && !is_symlink {
                self.scan_into(&mut node, depth + 1);
            }
            parent.add_child(node);
        }
    }
}

/// `(is_dir, is_symlink)` for an entry, following links like `stat` does
fn entry_kind(entry: &fs::DirEntry, path: &Path) -> Option<(bool, bool)> {
    let file_type = match entry.file_type() {
        Ok(file_type) => file_type,
        Err(err) => {
            log::debug!("walk: cannot read type of {}: {}", path.display(), err);
            return None;
        }
    };
    if !file_type.is_symlink() {
        return Some((file_type.is_dir(), false));
    }
    match fs::metadata(path) {
        Ok(metadata) => Some((metadata.is_dir(), true)),
        Err(err) => {
            log::debug!("walk: skipping dangling link {}: {}", path.display(), err);
            None
        }
    }
}

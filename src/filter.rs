//! Visibility predicates over the tree
//!
//! A node belongs to the visible projection when it satisfies both the search
//! filter and the git filter. Both filters keep ancestors of matching nodes so
//! that matches are always reachable from the root.

use serde::{Deserialize, Serialize};

use crate::tree::TreeNode;

/// Active filter state of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub git_mode: bool,
}

impl FilterState {
    pub fn new(search_term: &str, git_mode: bool) -> Self {
        Self {
            search_term: search_term.to_string(),
            git_mode,
        }
    }

    /// Whether any filter is active
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.git_mode
    }

    /// While a filter is active every directory is shown expanded
    pub fn force_expand(&self) -> bool {
        self.is_active()
    }

    pub fn is_visible(&self, node: &TreeNode) -> bool {
        matches_search(node, &self.search_term) && matches_git(node, self.git_mode)
    }

    /// Case-insensitive match of the search term against this node's own name
    pub fn is_direct_match(&self, node: &TreeNode) -> bool {
        !self.search_term.is_empty() && contains_ignore_case(&node.name, &self.search_term.to_lowercase())
    }
}

/// True if `term` is empty or the node or any descendant has a name containing it
pub fn matches_search(node: &TreeNode, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    matches_search_lowered(node, &term)
}

fn matches_search_lowered(node: &TreeNode, term: &str) -> bool {
    contains_ignore_case(&node.name, term)
        || node.children.iter().any(|child| matches_search_lowered(child, term))
}

fn contains_ignore_case(name: &str, lowered_term: &str) -> bool {
    name.to_lowercase().contains(lowered_term)
}

/// True if git mode is off or the node or any descendant carries a change status
pub fn matches_git(node: &TreeNode, git_mode: bool) -> bool {
    !git_mode || has_changes(node)
}

fn has_changes(node: &TreeNode) -> bool {
    node.git_status.is_changed() || node.children.iter().any(has_changes)
}

/// A filter plus the policy for nodes the user hid.
///
/// The interactive view keeps hidden nodes (they are drawn struck through);
/// exports drop them together with their subtrees.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'f> {
    pub filter: &'f FilterState,
    pub include_hidden: bool,
}

impl<'f> Projection<'f> {
    pub fn interactive(filter: &'f FilterState) -> Self {
        Self {
            filter,
            include_hidden: true,
        }
    }

    pub fn export(filter: &'f FilterState) -> Self {
        Self {
            filter,
            include_hidden: false,
        }
    }

    pub fn includes(&self, node: &TreeNode) -> bool {
        (self.include_hidden || !node.hidden) && self.filter.is_visible(node)
    }

    /// Whether the children of `node` take part in the projection
    pub fn expands(&self, node: &TreeNode) -> bool {
        node.is_dir && (self.filter.force_expand() || !node.collapsed)
    }
}

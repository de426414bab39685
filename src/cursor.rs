//! Rank-based addressing over the visible projection
//!
//! Every row consumer (cursor lookups, mutations, the interactive frame and the
//! exports) goes through [`traverse`], so all of them agree on which node sits
//! at which rank. Positions are re-derived on each call; nodes are reached for
//! mutation through the child-index path recorded by the traversal.

use std::ops::ControlFlow;

use crate::filter::Projection;
use crate::tree::TreeNode;

/// One row of the projection as seen by a traversal visitor
#[derive(Debug)]
pub struct Row<'t, 's> {
    pub node: &'t TreeNode,
    /// 0-based pre-order rank within the projection
    pub rank: usize,
    /// Whether this is the last visible child of its parent
    pub is_last: bool,
    /// `is_last` of each visible ancestor below the root, outermost first
    pub lineage: &'s [bool],
    /// Child indices from the root down to this node
    pub index_path: &'s [usize],
    /// Whether some ancestor below the root is hidden
    pub under_hidden: bool,
}

impl Row<'_, '_> {
    /// Tree-drawing prefix built from the ancestors: `│   ` below non-last
    /// ancestors, four spaces below last ones
    pub fn prefix(&self) -> String {
        self.lineage
            .iter()
            .map(|&last| if last { "    " } else { "│   " })
            .collect()
    }

    pub fn connector(&self) -> &'static str {
        if self.is_last {
            "└── "
        } else {
            "├── "
        }
    }
}

#[derive(Default)]
struct TraversalState {
    rank: usize,
    lineage: Vec<bool>,
    index_path: Vec<usize>,
    hidden_depth: usize,
}

/// Depth-first pre-order walk over the projection below `root`.
///
/// The visitor may stop the walk early by returning `Break`; otherwise the
/// number of visited rows is returned.
pub fn traverse<'t, B, F>(root: &'t TreeNode, projection: &Projection, mut visit: F) -> ControlFlow<B, usize>
where
    F: FnMut(&Row<'t, '_>) -> ControlFlow<B>,
{
    let mut state = TraversalState::default();
    visit_children(root, projection, &mut state, &mut visit)?;
    ControlFlow::Continue(state.rank)
}

fn visit_children<'t, B, F>(
    node: &'t TreeNode,
    projection: &Projection,
    state: &mut TraversalState,
    visit: &mut F,
) -> ControlFlow<B>
where
    F: FnMut(&Row<'t, '_>) -> ControlFlow<B>,
{
    let visible: Vec<(usize, &'t TreeNode)> = node
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| projection.includes(child))
        .collect();
    let last = visible.len().saturating_sub(1);

    for (position, (index, child)) in visible.into_iter().enumerate() {
        let is_last = position == last;
        state.index_path.push(index);

        visit(&Row {
            node: child,
            rank: state.rank,
            is_last,
            lineage: &state.lineage,
            index_path: &state.index_path,
            under_hidden: state.hidden_depth > 0,
        })?;
        state.rank += 1;

        if projection.expands(child) {
            state.lineage.push(is_last);
            if child.hidden {
                state.hidden_depth += 1;
            }
            visit_children(child, projection, state, visit)?;
            if child.hidden {
                state.hidden_depth -= 1;
            }
            state.lineage.pop();
        }
        state.index_path.pop();
    }
    ControlFlow::Continue(())
}

/// Total number of addressable rows
pub fn count_visible(root: &TreeNode, projection: &Projection) -> usize {
    match traverse(root, projection, |_| ControlFlow::<()>::Continue(())) {
        ControlFlow::Continue(count) => count,
        ControlFlow::Break(()) => 0,
    }
}

/// Child-index path of the node at `cursor`, or `None` past the end
pub fn locate_path(root: &TreeNode, projection: &Projection, cursor: usize) -> Option<Vec<usize>> {
    match traverse(root, projection, |row| {
        if row.rank == cursor {
            ControlFlow::Break(row.index_path.to_vec())
        } else {
            ControlFlow::Continue(())
        }
    }) {
        ControlFlow::Break(path) => Some(path),
        ControlFlow::Continue(_) => None,
    }
}

/// The node at `cursor`, or `None` if `cursor >= count_visible`
pub fn locate<'t>(root: &'t TreeNode, projection: &Projection, cursor: usize) -> Option<&'t TreeNode> {
    match traverse(root, projection, |row| {
        if row.rank == cursor {
            ControlFlow::Break(row.node)
        } else {
            ControlFlow::Continue(())
        }
    }) {
        ControlFlow::Break(node) => Some(node),
        ControlFlow::Continue(_) => None,
    }
}

/// Follow a child-index path down from `root`
pub fn node_at_mut<'t>(root: &'t mut TreeNode, index_path: &[usize]) -> Option<&'t mut TreeNode> {
    let mut node = root;
    for &index in index_path {
        node = node.children.get_mut(index)?;
    }
    Some(node)
}

/// Mutable access to the node at `cursor`
pub fn locate_mut<'t>(root: &'t mut TreeNode, projection: &Projection, cursor: usize) -> Option<&'t mut TreeNode> {
    let path = locate_path(root, projection, cursor)?;
    node_at_mut(root, &path)
}

/// Flip `collapsed` on the directory at `cursor`. Files and out-of-range
/// cursors are left alone and report `false`.
pub fn toggle_collapse_at(root: &mut TreeNode, projection: &Projection, cursor: usize) -> bool {
    locate_mut(root, projection, cursor).is_some_and(TreeNode::toggle_collapsed)
}

/// Flip `hidden` on the node at `cursor`; `false` if there is no such node
pub fn toggle_hidden_at(root: &mut TreeNode, projection: &Projection, cursor: usize) -> bool {
    match locate_mut(root, projection, cursor) {
        Some(node) => {
            node.toggle_hidden();
            true
        }
        None => false,
    }
}

/// All rows of the projection in order
pub fn flatten<'t>(root: &'t TreeNode, projection: &Projection) -> Vec<&'t TreeNode> {
    let mut rows = Vec::new();
    let _ = traverse(root, projection, |row| {
        rows.push(row.node);
        ControlFlow::<()>::Continue(())
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;
    use crate::tree::GitStatus;
    use std::path::PathBuf;

    fn file(name: &str) -> TreeNode {
        TreeNode::new_file(name.to_string(), PathBuf::from(name))
    }

    fn dir(name: &str, children: Vec<TreeNode>) -> TreeNode {
        let mut node = TreeNode::new_dir(name.to_string(), PathBuf::from(name));
        for child in children {
            node.add_child(child);
        }
        node
    }

    /// root: src/{a.go, b.go}, README.md
    fn scenario_tree() -> TreeNode {
        dir("root", vec![dir("src", vec![file("a.go"), file("b.go")]), file("README.md")])
    }

    fn names(nodes: &[&TreeNode]) -> Vec<String> {
        nodes.iter().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn test_count_and_flatten_unfiltered() {
        let tree = scenario_tree();
        let filter = FilterState::default();
        let projection = Projection::interactive(&filter);

        assert_eq!(count_visible(&tree, &projection), 4);
        assert_eq!(names(&flatten(&tree, &projection)), vec!["src", "a.go", "b.go", "README.md"]);
    }

    #[test]
    fn test_search_force_expands() {
        let mut tree = scenario_tree();
        tree.children[0].collapsed = true;
        let filter = FilterState::new("a.go", false);
        let projection = Projection::interactive(&filter);

        assert_eq!(count_visible(&tree, &projection), 2);
        assert_eq!(names(&flatten(&tree, &projection)), vec!["src", "a.go"]);
    }

    #[test]
    fn test_case_insensitive_search_keeps_readme() {
        let tree = scenario_tree();
        let filter = FilterState::new("a", false);
        let projection = Projection::interactive(&filter);

        assert_eq!(names(&flatten(&tree, &projection)), vec!["src", "a.go", "README.md"]);
    }

    #[test]
    fn test_collapsed_directory_hides_children() {
        let mut tree = scenario_tree();
        let filter = FilterState::default();
        assert!(toggle_collapse_at(&mut tree, &Projection::interactive(&filter), 0));

        let projection = Projection::interactive(&filter);
        assert_eq!(count_visible(&tree, &projection), 2);
        assert_eq!(names(&flatten(&tree, &projection)), vec!["src", "README.md"]);
    }

    #[test]
    fn test_locate_matches_flatten() {
        let tree = scenario_tree();
        let filter = FilterState::default();
        let projection = Projection::interactive(&filter);
        let rows = flatten(&tree, &projection);

        for (rank, node) in rows.iter().enumerate() {
            assert_eq!(locate(&tree, &projection, rank).unwrap().name, node.name);
        }
        assert!(locate(&tree, &projection, rows.len()).is_none());
    }

    #[test]
    fn test_toggle_collapse_on_file_is_noop() {
        let mut tree = scenario_tree();
        let filter = FilterState::default();
        let projection = Projection::interactive(&filter);

        assert!(!toggle_collapse_at(&mut tree, &projection, 1));
        assert!(!tree.find("src/a.go").unwrap().collapsed);
        assert!(!toggle_collapse_at(&mut tree, &projection, 99));
    }

    #[test]
    fn test_toggle_hidden_keeps_row_in_interactive_projection() {
        let mut tree = scenario_tree();
        let filter = FilterState::default();

        assert!(toggle_hidden_at(&mut tree, &Projection::interactive(&filter), 3));
        assert!(tree.find("README.md").unwrap().hidden);
        assert_eq!(count_visible(&tree, &Projection::interactive(&filter)), 4);
        assert_eq!(count_visible(&tree, &Projection::export(&filter)), 3);
        assert!(!toggle_hidden_at(&mut tree, &Projection::interactive(&filter), 4));
    }

    #[test]
    fn test_rows_under_hidden_directory() {
        let mut tree = scenario_tree();
        tree.children[0].hidden = true;
        let filter = FilterState::default();

        let mut flags = Vec::new();
        let _ = traverse(&tree, &Projection::interactive(&filter), |row| {
            flags.push((row.node.name.clone(), row.under_hidden));
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(
            flags,
            vec![
                ("src".to_string(), false),
                ("a.go".to_string(), true),
                ("b.go".to_string(), true),
                ("README.md".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_row_prefix_and_connector() {
        let tree = dir("root", vec![dir("a", vec![dir("b", vec![file("c")])]), file("z")]);
        let filter = FilterState::default();

        let mut drawn = Vec::new();
        let _ = traverse(&tree, &Projection::interactive(&filter), |row| {
            drawn.push(format!("{}{}{}", row.prefix(), row.connector(), row.node.name));
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(drawn, vec!["├── a", "│   └── b", "│       └── c", "└── z"]);
    }

    #[test]
    fn test_git_mode_projection() {
        let mut tree = scenario_tree();
        tree.children[0].children[1].git_status = GitStatus::Modified;
        let filter = FilterState::new("", true);
        let projection = Projection::interactive(&filter);

        assert_eq!(names(&flatten(&tree, &projection)), vec!["src", "b.go"]);
    }

    #[test]
    fn test_traverse_short_circuits() {
        let tree = scenario_tree();
        let filter = FilterState::default();
        let mut visited = 0;
        let result = traverse(&tree, &Projection::interactive(&filter), |row| {
            visited += 1;
            if row.rank == 1 {
                ControlFlow::Break(row.rank)
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(result, ControlFlow::Break(1));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_node_at_mut_rejects_bad_paths() {
        let mut tree = scenario_tree();
        assert_eq!(node_at_mut(&mut tree, &[0, 1]).unwrap().name, "b.go");
        assert!(node_at_mut(&mut tree, &[0, 5]).is_none());
        assert_eq!(node_at_mut(&mut tree, &[]).unwrap().name, "root");
    }
}

use proptest::prelude::*;
use std::ops::ControlFlow;
use std::path::PathBuf;
use treemark::cursor;
use treemark::filter::{FilterState, Projection};
use treemark::tree::{GitStatus, TreeNode};

fn name_strategy() -> impl Strategy<Value = String> {
    "[abAB.]{1,4}"
}

fn status_strategy() -> impl Strategy<Value = GitStatus> {
    prop_oneof![Just(GitStatus::None), Just(GitStatus::Modified), Just(GitStatus::Added)]
}

fn node_strategy() -> impl Strategy<Value = TreeNode> {
    let leaf = (name_strategy(), any::<bool>(), status_strategy()).prop_map(|(name, hidden, status)| {
        let mut node = TreeNode::new_file(name.clone(), PathBuf::from(&name)).with_git_status(status);
        node.hidden = hidden;
        node
    });
    leaf.prop_recursive(4, 48, 5, |inner| {
        (
            name_strategy(),
            prop::collection::vec(inner, 0..5),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(name, children, collapsed, hidden)| {
                let mut node = TreeNode::new_dir(name.clone(), PathBuf::from(&name));
                node.collapsed = collapsed;
                node.hidden = hidden;
                for child in children {
                    node.add_child(child);
                }
                node
            })
    })
}

fn tree_strategy() -> impl Strategy<Value = TreeNode> {
    prop::collection::vec(node_strategy(), 0..6).prop_map(|children| {
        let mut root = TreeNode::new_dir("root".to_string(), PathBuf::from("/root"));
        for child in children {
            root.add_child(child);
        }
        root
    })
}

fn filter_strategy() -> impl Strategy<Value = FilterState> {
    ("[abAB]{0,2}", any::<bool>()).prop_map(|(term, git_mode)| FilterState::new(&term, git_mode))
}

fn direct_matches(node: &TreeNode, filter: &FilterState) -> usize {
    node.children
        .iter()
        .map(|child| usize::from(filter.is_direct_match(child)) + direct_matches(child, filter))
        .sum()
}

proptest! {
    #[test]
    fn prop_flatten_agrees_with_count(tree in tree_strategy(), filter in filter_strategy()) {
        for projection in [Projection::interactive(&filter), Projection::export(&filter)] {
            let rows = cursor::flatten(&tree, &projection);
            prop_assert_eq!(rows.len(), cursor::count_visible(&tree, &projection));
        }
    }

    #[test]
    fn prop_locate_addresses_each_row(tree in tree_strategy(), filter in filter_strategy()) {
        let projection = Projection::interactive(&filter);
        let rows = cursor::flatten(&tree, &projection);
        for (rank, row) in rows.iter().enumerate() {
            let located = cursor::locate(&tree, &projection, rank);
            prop_assert!(located.is_some_and(|node| std::ptr::eq(node, *row)));
        }
        prop_assert!(cursor::locate(&tree, &projection, rows.len()).is_none());
    }

    #[test]
    fn prop_rows_satisfy_filter(tree in tree_strategy(), filter in filter_strategy()) {
        for row in cursor::flatten(&tree, &Projection::interactive(&filter)) {
            prop_assert!(filter.is_visible(row));
        }
    }

    #[test]
    fn prop_export_drops_hidden_subtrees(tree in tree_strategy(), filter in filter_strategy()) {
        let mut leaked = Vec::new();
        let _ = cursor::traverse(&tree, &Projection::export(&filter), |row| {
            if row.node.hidden || row.under_hidden {
                leaked.push(row.node.name.clone());
            }
            ControlFlow::<()>::Continue(())
        });
        prop_assert!(leaked.is_empty(), "hidden rows exported: {:?}", leaked);
    }

    #[test]
    fn prop_search_reaches_every_match(tree in tree_strategy(), term in "[abAB]{1,2}") {
        let filter = FilterState::new(&term, false);
        let rows = cursor::flatten(&tree, &Projection::interactive(&filter));
        let shown = rows.iter().filter(|node| filter.is_direct_match(node)).count();
        prop_assert_eq!(shown, direct_matches(&tree, &filter));
    }

    #[test]
    fn prop_double_collapse_is_identity(tree in tree_strategy(), filter in filter_strategy(), pick in any::<prop::sample::Index>()) {
        let projection = Projection::interactive(&filter);
        let count = cursor::count_visible(&tree, &projection);
        prop_assume!(count > 0);
        let rank = pick.index(count);

        let mut toggled = tree.clone();
        let first = cursor::toggle_collapse_at(&mut toggled, &projection, rank);
        let second = cursor::toggle_collapse_at(&mut toggled, &projection, rank);
        prop_assert_eq!(first, second);
        prop_assert_eq!(cursor::count_visible(&toggled, &projection), count);
        prop_assert_eq!(toggled, tree);
    }

    #[test]
    fn prop_collapse_keeps_rows_up_to_cursor(tree in tree_strategy(), pick in any::<prop::sample::Index>()) {
        let filter = FilterState::default();
        let projection = Projection::interactive(&filter);
        let before: Vec<String> = cursor::flatten(&tree, &projection).iter().map(|n| n.name.clone()).collect();
        prop_assume!(!before.is_empty());
        let rank = pick.index(before.len());

        let mut toggled = tree.clone();
        cursor::toggle_collapse_at(&mut toggled, &projection, rank);
        let after: Vec<String> = cursor::flatten(&toggled, &projection).iter().map(|n| n.name.clone()).collect();
        prop_assert_eq!(&before[..=rank], &after[..=rank]);
    }
}

//! Per-node state persisted under the browsed root
//!
//! Only nodes with a non-default annotation, collapsed or hidden flag are
//! written. Keys are root-relative paths with `/` separators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::tree::{relative_key, TreeNode};

pub const CONFIG_FILE_NAME: &str = ".treemark.json";

fn is_false(value: &bool) -> bool {
    !*value
}

/// Persisted state of a single node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub annotation: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

impl NodeConfig {
    fn from_node(node: &TreeNode) -> Self {
        Self {
            annotation: node.annotation.clone(),
            collapsed: node.collapsed,
            hidden: node.hidden,
        }
    }

    fn apply_to(&self, node: &mut TreeNode) {
        node.annotation = self.annotation.clone();
        node.collapsed = self.collapsed;
        node.hidden = self.hidden;
    }
}

/// On-disk layout of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeConfig>,
}

pub fn config_path(root_path: &Path) -> PathBuf {
    root_path.join(CONFIG_FILE_NAME)
}

/// Read the persisted entries. A missing or unparsable file is an empty map.
pub fn read_config(root_path: &Path) -> ConfigFile {
    let path = config_path(root_path);
    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(err) => {
            log::debug!("store: no config at {}: {}", path.display(), err);
            return ConfigFile::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("store: ignoring malformed {}: {}", path.display(), err);
            ConfigFile::default()
        }
    }
}

/// Merge persisted state into a freshly scanned tree
pub fn load(root_path: &Path, tree: &mut TreeNode) {
    let config = read_config(root_path);
    if config.nodes.is_empty() {
        return;
    }
    let mut applied = 0;
    for child in &mut tree.children {
        apply_config(child, root_path, &config.nodes, &mut applied);
    }
    log::info!("store: applied {} of {} saved entries", applied, config.nodes.len());
}

fn apply_config(node: &mut TreeNode, root_path: &Path, nodes: &BTreeMap<String, NodeConfig>, applied: &mut usize) {
    if let Some(entry) = relative_key(root_path, &node.path).and_then(|key| nodes.get(&key)) {
        entry.apply_to(node);
        *applied += 1;
    }
    for child in &mut node.children {
        apply_config(child, root_path, nodes, applied);
    }
}

/// Sparse snapshot of every node carrying user state, independent of filters
pub fn collect(root_path: &Path, tree: &TreeNode) -> ConfigFile {
    let mut config = ConfigFile::default();
    for child in &tree.children {
        collect_config(child, root_path, &mut config.nodes);
    }
    config
}

fn collect_config(node: &TreeNode, root_path: &Path, nodes: &mut BTreeMap<String, NodeConfig>) {
    if node.has_user_state() {
        if let Some(key) = relative_key(root_path, &node.path) {
            nodes.insert(key, NodeConfig::from_node(node));
        }
    }
    for child in &node.children {
        collect_config(child, root_path, nodes);
    }
}

/// Overwrite the config file with the current tree state
pub fn save(root_path: &Path, tree: &TreeNode) -> Result<()> {
    let config = collect(root_path, tree);
    let data = serde_json::to_string_pretty(&config)?;
    let path = config_path(root_path);
    fs::write(&path, data)?;
    log::debug!("store: wrote {} entries to {}", config.nodes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::{walk, WalkOptions};
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/nested")).unwrap();
        fs::write(temp.path().join("src/main.rs"), "").unwrap();
        fs::write(temp.path().join("src/nested/deep.rs"), "").unwrap();
        fs::write(temp.path().join("README.md"), "").unwrap();
        temp
    }

    fn scan(root: &Path) -> TreeNode {
        walk(root, &WalkOptions::default()).unwrap().tree
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = project();
        let mut tree = scan(temp.path());
        tree.find_mut("src").unwrap().collapsed = true;
        tree.find_mut("src/nested/deep.rs").unwrap().annotation = "the deep one".to_string();
        tree.find_mut("README.md").unwrap().hidden = true;
        save(temp.path(), &tree).unwrap();

        let mut rescanned = scan(temp.path());
        load(temp.path(), &mut rescanned);

        assert!(rescanned.find("src").unwrap().collapsed);
        assert_eq!(rescanned.find("src/nested/deep.rs").unwrap().annotation, "the deep one");
        assert!(rescanned.find("README.md").unwrap().hidden);
        assert!(!rescanned.find("src/main.rs").unwrap().has_user_state());
    }

    #[test]
    fn test_only_non_default_entries_are_written() {
        let temp = project();
        let mut tree = scan(temp.path());
        tree.find_mut("src/main.rs").unwrap().annotation = "entry".to_string();
        save(temp.path(), &tree).unwrap();

        let raw = fs::read_to_string(config_path(temp.path())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let nodes = value["nodes"].as_object().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(value["nodes"]["src/main.rs"], serde_json::json!({ "annotation": "entry" }));
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let temp = project();
        let mut tree = scan(temp.path());
        let before = tree.clone();
        load(temp.path(), &mut tree);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_malformed_file_degrades_to_empty() {
        let temp = project();
        fs::write(config_path(temp.path()), "{ \"nodes\": { truncated").unwrap();
        assert_eq!(read_config(temp.path()), ConfigFile::default());

        let mut tree = scan(temp.path());
        load(temp.path(), &mut tree);
        assert_eq!(tree.get_stats().annotated, 0);
    }

    #[test]
    fn test_absent_fields_default() {
        let temp = project();
        fs::write(
            config_path(temp.path()),
            r#"{"nodes": {"src": {"collapsed": true}, "gone.txt": {"hidden": true}}}"#,
        )
        .unwrap();

        let mut tree = scan(temp.path());
        load(temp.path(), &mut tree);
        let src = tree.find("src").unwrap();
        assert!(src.collapsed);
        assert!(!src.hidden);
        assert!(src.annotation.is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let temp = project();
        let mut tree = scan(temp.path());
        tree.find_mut("src").unwrap().collapsed = true;
        save(temp.path(), &tree).unwrap();

        tree.find_mut("src").unwrap().collapsed = false;
        save(temp.path(), &tree).unwrap();

        assert!(read_config(temp.path()).nodes.is_empty());
    }

    #[test]
    fn test_collect_ignores_root_state() {
        let temp = project();
        let mut tree = scan(temp.path());
        tree.annotation = "root".to_string();
        tree.collapsed = true;
        assert!(collect(temp.path(), &tree).nodes.is_empty());
    }
}

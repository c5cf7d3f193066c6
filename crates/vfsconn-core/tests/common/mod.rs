//! Helpers shared by the integration test binaries.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Captures every entry below `root` as relative path to content, with
/// `None` for folders. `root` itself is not included.
pub fn snapshot_tree(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    let mut tree = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.unwrap();
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        let content = entry
            .file_type()
            .is_file()
            .then(|| fs::read(entry.path()).unwrap());
        tree.insert(relative, content);
    }
    tree
}

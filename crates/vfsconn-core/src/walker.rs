//! Folder tree walking.
//!
//! Two walks are provided: [`search`] collects the files whose base name
//! matches a pattern, and [`collect_descendants`] lists every entry below a
//! folder so that callers can act on the complete list afterwards.

use crate::ConnectorError;
use crate::FilePattern;
use crate::Result;
use crate::vfs::Entry;
use crate::vfs::EntryKind;
use crate::vfs::FileSystem;
use crate::vfs::VfsPath;
use log::debug;

/// Finds the files below `root` whose base name fully matches `pattern`.
///
/// Only direct children are considered unless `recursive` is set, in which
/// case every sub-folder is walked depth-first. Result order follows the
/// backend's listing order.
///
/// # Errors
///
/// - [`ConnectorError::NotFound`] if `root` does not exist
/// - [`ConnectorError::Enumeration`] if any folder listing fails; matches
///   collected so far are discarded
///
/// # Examples
///
/// ```no_run
/// use vfsconn_core::FilePattern;
/// use vfsconn_core::vfs::{LocalFileSystem, VfsPath};
/// use vfsconn_core::walker::search;
///
/// let fs = LocalFileSystem::new();
/// let pattern = FilePattern::new(r".*\.txt")?;
/// for path in search(&fs, &VfsPath::new("/data/in"), &pattern, true)? {
///     println!("{path}");
/// }
/// # Ok::<(), vfsconn_core::ConnectorError>(())
/// ```
pub fn search(
    fs: &dyn FileSystem,
    root: &VfsPath,
    pattern: &FilePattern,
    recursive: bool,
) -> Result<Vec<VfsPath>> {
    if !fs.exists(root)? {
        return Err(ConnectorError::not_found(root.as_str()));
    }

    let mut matches = Vec::new();
    search_into(fs, root, pattern, recursive, &mut matches)?;
    debug!(
        "Search for '{pattern}' under {root} found {} file(s)",
        matches.len()
    );
    Ok(matches)
}

fn search_into(
    fs: &dyn FileSystem,
    folder: &VfsPath,
    pattern: &FilePattern,
    recursive: bool,
    matches: &mut Vec<VfsPath>,
) -> Result<()> {
    for child in fs.children(folder)? {
        match child.kind {
            EntryKind::File if pattern.matches(child.base_name()) => matches.push(child.path),
            EntryKind::Directory if recursive => {
                search_into(fs, &child.path, pattern, recursive, matches)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Lists every file and folder below `root`, parents before their children.
///
/// `root` itself is not part of the result.
///
/// # Errors
///
/// Returns [`ConnectorError::Enumeration`] if any folder listing fails.
pub fn collect_descendants(fs: &dyn FileSystem, root: &VfsPath) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut pending = vec![root.clone()];
    while let Some(folder) = pending.pop() {
        for child in fs.children(&folder)? {
            if child.is_dir() {
                pending.push(child.path.clone());
            }
            entries.push(child);
        }
    }
    Ok(entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vfs::LocalFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        fs::write(temp.path().join("b.log"), b"b").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/c.txt"), b"c").unwrap();
        fs::create_dir(temp.path().join("sub/empty")).unwrap();
        temp
    }

    fn names(root: &VfsPath, paths: &[VfsPath]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.relative_to(root).unwrap().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_search_non_recursive() {
        let temp = sample_tree();
        let root = VfsPath::from(temp.path());
        let pattern = FilePattern::new(r".*\.txt").unwrap();

        let found = search(&LocalFileSystem::new(), &root, &pattern, false).unwrap();
        assert_eq!(names(&root, &found), vec!["a.txt"]);
    }

    #[test]
    fn test_search_recursive() {
        let temp = sample_tree();
        let root = VfsPath::from(temp.path());
        let pattern = FilePattern::new(r".*\.txt").unwrap();

        let found = search(&LocalFileSystem::new(), &root, &pattern, true).unwrap();
        assert_eq!(names(&root, &found), vec!["a.txt", "sub/c.txt"]);
    }

    #[test]
    fn test_search_does_not_match_folders() {
        let temp = sample_tree();
        let root = VfsPath::from(temp.path());
        let pattern = FilePattern::new("sub|empty").unwrap();

        let found = search(&LocalFileSystem::new(), &root, &pattern, true).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_search_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = VfsPath::from(temp.path()).join("missing");
        let pattern = FilePattern::new(".*").unwrap();

        let err = search(&LocalFileSystem::new(), &root, &pattern, true).unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound { .. }));
    }

    #[test]
    fn test_search_on_file_root_fails_enumeration() {
        let temp = sample_tree();
        let root = VfsPath::from(temp.path()).join("a.txt");
        let pattern = FilePattern::new(".*").unwrap();

        let err = search(&LocalFileSystem::new(), &root, &pattern, false).unwrap_err();
        assert!(matches!(err, ConnectorError::Enumeration { .. }));
    }

    #[test]
    fn test_collect_descendants() {
        let temp = sample_tree();
        let root = VfsPath::from(temp.path());

        let entries = collect_descendants(&LocalFileSystem::new(), &root).unwrap();
        let mut listed: Vec<(String, bool)> = entries
            .iter()
            .map(|e| (e.path.relative_to(&root).unwrap().to_string(), e.is_dir()))
            .collect();
        listed.sort();
        assert_eq!(
            listed,
            vec![
                ("a.txt".to_string(), false),
                ("b.log".to_string(), false),
                ("sub".to_string(), true),
                ("sub/c.txt".to_string(), false),
                ("sub/empty".to_string(), true),
            ]
        );
    }
}

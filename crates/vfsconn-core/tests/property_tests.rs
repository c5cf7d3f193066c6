//! Property-based tests for pattern matching, tree walking and ZIP round
//! trips.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use proptest::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use vfsconn_core::FilePattern;
use vfsconn_core::VfsPath;
use vfsconn_core::archive::write_zip;
use vfsconn_core::extract::extract;
use vfsconn_core::vfs::EntryKind;
use vfsconn_core::vfs::LocalFileSystem;
use vfsconn_core::walker::search;

use common::snapshot_tree;

/// Relative file path to content.
type Tree = BTreeMap<String, Vec<u8>>;

fn tree_strategy() -> impl Strategy<Value = Tree> {
    prop::collection::btree_map(
        prop::collection::vec("[a-z]{1,6}", 1..4).prop_map(|parts| parts.join("/")),
        prop::collection::vec(any::<u8>(), 0..256),
        0..8,
    )
    .prop_filter("no file may also be a folder", |tree| {
        tree.keys().all(|a| {
            tree.keys()
                .all(|b| a == b || !b.starts_with(&format!("{a}/")))
        })
    })
}

fn materialize(root: &Path, tree: &Tree) {
    fs::create_dir_all(root).unwrap();
    for (path, data) in tree {
        let file = root.join(path);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, data).unwrap();
    }
}

fn files_only(root: &Path) -> Tree {
    snapshot_tree(root)
        .into_iter()
        .filter_map(|(path, content)| content.map(|c| (path, c)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A pattern accepts a name exactly when the regex matches all of it.
    #[test]
    fn prop_pattern_is_anchored_full_match(
        pattern in "[a-c.*]{1,4}",
        name in "[a-c.]{0,6}",
    ) {
        prop_assume!(Regex::new(&pattern).is_ok());
        let compiled = FilePattern::new(&pattern).unwrap();
        let anchored = Regex::new(&format!("^(?:{pattern})$")).unwrap();
        prop_assert_eq!(compiled.matches(&name), anchored.is_match(&name));
    }

    /// A literal pattern matches its own text and nothing longer.
    #[test]
    fn prop_literal_pattern_matches_only_itself(
        literal in "[a-z0-9_-]{1,12}",
        suffix in "[a-z]{1,3}",
    ) {
        let compiled = FilePattern::new(&literal).unwrap();
        prop_assert!(compiled.matches(&literal));
        let longer = format!("{literal}{suffix}");
        prop_assert!(!compiled.matches(&longer));
        let prefixed = format!("{suffix}{literal}");
        prop_assert!(!compiled.matches(&prefixed));
    }

    /// Extracting an archive of a tree reproduces every file and its bytes.
    #[test]
    fn prop_archive_extract_round_trip(tree in tree_strategy()) {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        materialize(&src, &tree);
        let local = LocalFileSystem::new();

        let (cursor, report) = write_zip(
            &local,
            &VfsPath::from(src.as_path()),
            EntryKind::Directory,
            Cursor::new(Vec::new()),
        )
        .unwrap();
        prop_assert_eq!(report.files_added, tree.len());

        let dst = VfsPath::from(temp.path()).join("dst");
        extract(&local, &mut Cursor::new(cursor.into_inner()), &dst).unwrap();
        prop_assert_eq!(files_only(dst.as_std_path()), tree);
    }

    /// Extracting the same archive twice leaves the same tree.
    #[test]
    fn prop_extraction_is_idempotent(tree in tree_strategy()) {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        materialize(&src, &tree);
        let local = LocalFileSystem::new();
        let (cursor, _) = write_zip(
            &local,
            &VfsPath::from(src.as_path()),
            EntryKind::Directory,
            Cursor::new(Vec::new()),
        )
        .unwrap();
        let data = cursor.into_inner();
        let dst = VfsPath::from(temp.path()).join("dst");

        extract(&local, &mut Cursor::new(data.clone()), &dst).unwrap();
        let first = snapshot_tree(dst.as_std_path());
        extract(&local, &mut Cursor::new(data), &dst).unwrap();
        prop_assert_eq!(snapshot_tree(dst.as_std_path()), first);
    }

    /// A non-recursive search only returns direct children of the root.
    #[test]
    fn prop_non_recursive_search_stays_at_top(tree in tree_strategy()) {
        let temp = TempDir::new().unwrap();
        materialize(temp.path(), &tree);
        let root = VfsPath::from(temp.path());
        let pattern = FilePattern::new(".*").unwrap();
        let local = LocalFileSystem::new();

        let shallow = search(&local, &root, &pattern, false).unwrap();
        let top_level = tree.keys().filter(|k| !k.contains('/')).count();
        prop_assert_eq!(shallow.len(), top_level);
        for path in &shallow {
            prop_assert!(!path.relative_to(&root).unwrap().contains('/'));
        }

        let deep = search(&local, &root, &pattern, true).unwrap();
        prop_assert_eq!(deep.len(), tree.len());
    }
}

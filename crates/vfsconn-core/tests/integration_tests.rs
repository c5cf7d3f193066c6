//! Integration tests for vfsconn-core.
//!
//! These tests drive complete workflows against the local backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::fs;
use tempfile::TempDir;
use vfsconn_core::ConnectorError;
use vfsconn_core::ConnectorOutput;
use vfsconn_core::ConnectorParams;
use vfsconn_core::FilePattern;
use vfsconn_core::Operation;
use vfsconn_core::VfsPath;
use vfsconn_core::archive;
use vfsconn_core::connector::run;
use vfsconn_core::extract;
use vfsconn_core::vfs::LocalFileSystem;
use vfsconn_core::walker;

use common::snapshot_tree;

fn params(pairs: &[(&str, String)]) -> ConnectorParams {
    pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
}

fn display(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_archive_then_extract_reproduces_files() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("a.txt"), b"alpha").unwrap();
    fs::write(src.join("sub/b.txt"), b"beta").unwrap();
    let local = LocalFileSystem::new();
    let zip = VfsPath::from(temp.path()).join("src.zip");
    let dst = VfsPath::from(temp.path()).join("dst");

    assert!(archive::archive(&local, &VfsPath::from(src.as_path()), &local, &zip).unwrap());
    let report = extract::unzip(&local, &zip, &local, &dst).unwrap();

    assert_eq!(report.files_extracted, 2);
    assert_eq!(snapshot_tree(&src), snapshot_tree(dst.as_std_path()));
}

#[test]
fn test_round_trip_drops_empty_folders() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("empty")).unwrap();
    fs::write(src.join("f.txt"), b"f").unwrap();
    let local = LocalFileSystem::new();
    let zip = VfsPath::from(temp.path()).join("out.zip");
    let dst = VfsPath::from(temp.path()).join("dst");

    archive::archive(&local, &VfsPath::from(src.as_path()), &local, &zip).unwrap();
    extract::unzip(&local, &zip, &local, &dst).unwrap();

    assert!(temp.path().join("dst/f.txt").is_file());
    assert!(!temp.path().join("dst/empty").exists());
}

#[test]
fn test_empty_folder_archive_unzips_and_lists() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("empty");
    fs::create_dir(&src).unwrap();
    let local = LocalFileSystem::new();
    let zip = VfsPath::from(temp.path()).join("empty.zip");
    let dst = VfsPath::from(temp.path()).join("dst");

    assert!(archive::archive(&local, &VfsPath::from(src.as_path()), &local, &zip).unwrap());
    assert!(extract::list_zip(&local, &zip).unwrap().is_empty());

    let report = extract::unzip(&local, &zip, &local, &dst).unwrap();
    assert_eq!(report.files_extracted, 0);
    assert!(dst.as_std_path().is_dir());
    assert!(snapshot_tree(dst.as_std_path()).is_empty());
}

#[test]
fn test_absent_roots() {
    let temp = TempDir::new().unwrap();
    let local = LocalFileSystem::new();
    let missing = VfsPath::from(temp.path()).join("missing");
    let out = VfsPath::from(temp.path()).join("out");
    let pattern = FilePattern::new(".*").unwrap();

    let err = walker::search(&local, &missing, &pattern, true).unwrap_err();
    assert!(matches!(err, ConnectorError::NotFound { .. }));

    let err = extract::unzip(&local, &missing, &local, &out).unwrap_err();
    assert!(matches!(err, ConnectorError::NotFound { .. }));

    assert!(!archive::archive(&local, &missing, &local, &out).unwrap());
}

#[test]
fn test_connector_archive_unzip_list() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("order.xml"), b"<order/>").unwrap();
    fs::write(src.join("nested/item.xml"), b"<item/>").unwrap();
    let zip = temp.path().join("in.zip");
    let dst = temp.path().join("out");

    let output = run(
        Operation::Archive,
        &params(&[("source", display(&src)), ("destination", display(&zip))]),
    )
    .unwrap();
    assert_eq!(output, ConnectorOutput::Success(true));

    let ConnectorOutput::Files(mut names) =
        run(Operation::ListZip, &params(&[("source", display(&zip))])).unwrap()
    else {
        panic!("list-zip returns names");
    };
    names.sort();
    assert_eq!(names, vec!["nested/item.xml", "order.xml"]);

    run(
        Operation::Unzip,
        &params(&[("source", display(&zip)), ("destination", display(&dst))]),
    )
    .unwrap();
    assert_eq!(fs::read(dst.join("nested/item.xml")).unwrap(), b"<item/>");
}

#[test]
fn test_connector_copy_move_delete() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("a.txt"), b"a").unwrap();
    fs::write(src.join("sub/b.txt"), b"b").unwrap();
    let copy_dst = temp.path().join("copy");
    let move_dst = temp.path().join("moved");

    run(
        Operation::Copy,
        &params(&[
            ("source", display(&src)),
            ("destination", display(&copy_dst)),
            ("includeParentDirectory", "true".into()),
        ]),
    )
    .unwrap();
    assert!(copy_dst.join("src/sub/b.txt").is_file());

    run(
        Operation::Move,
        &params(&[("source", display(&src)), ("destination", display(&move_dst))]),
    )
    .unwrap();
    assert!(move_dst.join("a.txt").is_file());
    assert!(src.is_dir());
    assert!(!src.join("a.txt").exists());

    let output = run(
        Operation::Delete,
        &params(&[("source", display(&move_dst)), ("filePattern", "a\\.txt".into())]),
    )
    .unwrap();
    assert!(output.is_success());
    assert!(!move_dst.join("a.txt").exists());
    assert!(move_dst.join("sub/b.txt").exists());
}

#[test]
fn test_connector_read_send_append() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    run(
        Operation::Send,
        &params(&[("destination", display(&out)), ("content", "<r/>".into())]),
    )
    .unwrap();
    run(
        Operation::Append,
        &params(&[
            ("source", display(&out.join("response.xml"))),
            ("content", "<s/>".into()),
        ]),
    )
    .unwrap();

    let ConnectorOutput::Content(result) =
        run(Operation::Read, &params(&[("source", display(&out))])).unwrap()
    else {
        panic!("read returns content");
    };
    assert_eq!(result.text(), "<r/><s/>");
    assert_eq!(result.content_type, "application/xml");
}

#[test]
fn test_connector_missing_copy_source_is_false() {
    let temp = TempDir::new().unwrap();
    let output = run(
        Operation::Copy,
        &params(&[
            ("source", display(&temp.path().join("nothing"))),
            ("destination", display(&temp.path().join("dst"))),
        ]),
    )
    .unwrap();
    assert_eq!(output, ConnectorOutput::Success(false));
    assert!(output.to_xml().unwrap().contains("false"));
}

#[test]
fn test_file_uri_locations() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), b"a").unwrap();
    let uri = format!("file://{}", display(&temp.path().join("a.txt")));

    let output = run(Operation::Exists, &params(&[("source", uri)])).unwrap();
    assert_eq!(output, ConnectorOutput::Success(true));
}

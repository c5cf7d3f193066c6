//! ZIP extraction and listing.
//!
//! The source is spooled into memory (or a temporary file once it grows past
//! the spool limit) and then read through its central directory, so entries
//! written with trailing data descriptors are handled. Entries are processed
//! in storage order and each one is fully written before the next is opened.

use crate::ConnectorError;
use crate::Result;
use crate::archive::SPOOL_MEMORY_LIMIT;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::report::ExtractionReport;
use crate::vfs::EntryKind;
use crate::vfs::FileSystem;
use crate::vfs::VfsPath;
use crate::vfs::WriteMode;
use log::debug;
use log::info;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::time::Instant;
use tempfile::SpooledTempFile;
use zip::ZipArchive;
use zip::result::ZipError;

/// Extracts the ZIP archive at `source` into the folder `destination`.
///
/// # Errors
///
/// Returns [`ConnectorError::NotFound`] if `source` does not exist, and any
/// error of [`extract`].
pub fn unzip(
    source_fs: &dyn FileSystem,
    source: &VfsPath,
    dest_fs: &dyn FileSystem,
    destination: &VfsPath,
) -> Result<ExtractionReport> {
    if !source_fs.exists(source)? {
        return Err(ConnectorError::not_found(source.as_str()));
    }
    let mut reader = source_fs.open_read(source)?;
    let report = extract(dest_fs, &mut reader, destination)?;
    info!(
        "Extracted {source} into {destination}: {} file(s), {} folder(s)",
        report.files_extracted, report.directories_created
    );
    Ok(report)
}

/// Extracts a ZIP byte stream into the folder `destination`.
///
/// The destination folder is created when missing. Folder entries create
/// folders; file entries create or overwrite files together with any missing
/// parent folders. Entries written before a failure are left in place. An
/// archive without entries only creates the destination.
///
/// # Errors
///
/// - [`ConnectorError::InvalidArchive`] if the stream is not a ZIP archive;
///   nothing is written in that case
/// - [`ConnectorError::PathTraversal`] for entry names that are absolute or
///   climb out of `destination`
/// - [`ConnectorError::Extraction`] if opening or streaming an entry fails
pub fn extract<R: Read + ?Sized>(
    fs: &dyn FileSystem,
    reader: &mut R,
    destination: &VfsPath,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let mut archive = open_archive(reader)?;
    if fs.kind(destination)? != Some(EntryKind::Directory) {
        fs.create_dir(destination)?;
    }

    let mut report = ExtractionReport::new();
    for index in 0..archive.len() {
        let name = archive
            .name_for_index(index)
            .map_or_else(|| format!("#{index}"), str::to_string);
        let mut entry = archive
            .by_index(index)
            .map_err(|e| open_entry_error(&name, e))?;
        let Some(relative) = entry_relative_path(&name)? else {
            continue;
        };
        let target = destination.join(&relative);

        if entry.is_dir() {
            debug!("Creating folder {target}");
            fs.create_dir(&target)?;
            report.directories_created += 1;
        } else {
            debug!("Extracting {name} to {target}");
            let bytes = fs
                .write_from(&target, &mut entry, WriteMode::Truncate)
                .map_err(|e| extraction_error(&name, e))?;
            report.files_extracted += 1;
            report.bytes_written += bytes;
        }
    }

    report.duration = start.elapsed();
    Ok(report)
}

/// Lists the names of the file entries of the ZIP archive at `source`, in
/// storage order. Folder entries are skipped.
///
/// # Errors
///
/// Returns [`ConnectorError::NotFound`] if `source` does not exist, or
/// [`ConnectorError::InvalidArchive`] if it is not a ZIP archive.
pub fn list_zip(fs: &dyn FileSystem, source: &VfsPath) -> Result<Vec<String>> {
    if !fs.exists(source)? {
        return Err(ConnectorError::not_found(source.as_str()));
    }
    let mut reader = fs.open_read(source)?;
    let archive = open_archive(&mut reader)?;
    Ok((0..archive.len())
        .filter_map(|index| archive.name_for_index(index))
        .filter(|name| !name.ends_with(['/', '\\']))
        .map(str::to_string)
        .collect())
}

fn open_archive<R: Read + ?Sized>(reader: &mut R) -> Result<ZipArchive<SpooledTempFile>> {
    let mut spool = tempfile::spooled_tempfile(SPOOL_MEMORY_LIMIT);
    copy_with_buffer(reader, &mut spool, &mut CopyBuffer::new())?;
    spool.rewind()?;
    Ok(ZipArchive::new(spool)?)
}

fn open_entry_error(entry: &str, err: ZipError) -> ConnectorError {
    let source = match err {
        ZipError::Io(e) => e,
        other => io::Error::other(other),
    };
    ConnectorError::Extraction {
        entry: entry.to_string(),
        source,
    }
}

/// Normalizes an entry name to `/`-separated segments below the destination.
///
/// Returns `Ok(None)` for names that denote the destination itself.
fn entry_relative_path(name: &str) -> Result<Option<String>> {
    let traversal = || ConnectorError::PathTraversal {
        entry: name.to_string(),
    };

    if name.starts_with('/') || name.starts_with('\\') {
        return Err(traversal());
    }

    let mut segments = Vec::new();
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return Err(traversal()),
            s if s.len() >= 2 && s.as_bytes()[1] == b':' && segments.is_empty() => {
                return Err(traversal());
            }
            s => segments.push(s),
        }
    }

    Ok((!segments.is_empty()).then(|| segments.join("/")))
}

fn extraction_error(entry: &str, err: ConnectorError) -> ConnectorError {
    match err {
        ConnectorError::Io(source) => ConnectorError::Extraction {
            entry: entry.to_string(),
            source,
        },
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;
    use crate::vfs::LocalFileSystem;
    use std::fs;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_extract_creates_destination() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path()).join("dst");
        let data = ZipTestBuilder::new()
            .add_file("a.txt", b"a")
            .add_file("sub/b.txt", b"bb")
            .build();

        let report = extract(&LocalFileSystem::new(), &mut Cursor::new(data), &dest).unwrap();
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.bytes_written, 3);
        assert_eq!(fs::read(temp.path().join("dst/a.txt")).unwrap(), b"a");
        assert_eq!(fs::read(temp.path().join("dst/sub/b.txt")).unwrap(), b"bb");
    }

    #[test]
    fn test_extract_directory_entries() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path());
        let data = ZipTestBuilder::new()
            .add_directory("empty/")
            .add_file("full/x.txt", b"x")
            .build();

        let report = extract(&LocalFileSystem::new(), &mut Cursor::new(data), &dest).unwrap();
        assert_eq!(report.directories_created, 1);
        assert!(temp.path().join("empty").is_dir());
        assert!(temp.path().join("full/x.txt").is_file());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path());
        let data = ZipTestBuilder::new()
            .add_directory("d/")
            .add_file("d/f.txt", b"content")
            .build();
        let local = LocalFileSystem::new();

        extract(&local, &mut Cursor::new(data.clone()), &dest).unwrap();
        fs::write(temp.path().join("d/f.txt"), b"changed locally").unwrap();
        extract(&local, &mut Cursor::new(data), &dest).unwrap();
        assert_eq!(fs::read(temp.path().join("d/f.txt")).unwrap(), b"content");
    }

    #[test]
    fn test_extract_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path()).join("dst");
        let data = ZipTestBuilder::new()
            .add_file("ok.txt", b"ok")
            .add_file("../evil.txt", b"evil")
            .build();

        let err = extract(&LocalFileSystem::new(), &mut Cursor::new(data), &dest).unwrap_err();
        assert!(matches!(err, ConnectorError::PathTraversal { .. }));
        assert!(temp.path().join("dst/ok.txt").exists());
        assert!(!temp.path().join("evil.txt").exists());
    }

    #[test]
    fn test_extract_invalid_stream() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path());
        let mut garbage = Cursor::new(b"definitely not a zip archive".to_vec());

        assert!(extract(&LocalFileSystem::new(), &mut garbage, &dest).is_err());
    }

    #[test]
    fn test_extract_entries_with_data_descriptors() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path());
        let mut writer = ZipWriter::new_stream(Vec::new());
        let options = SimpleFileOptions::default();
        writer.add_directory("logs/", options).unwrap();
        writer.start_file("logs/today.log", options).unwrap();
        writer.write_all(b"started\nstopped\n").unwrap();
        writer.start_file("readme.txt", options).unwrap();
        writer.write_all(b"read me").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let report = extract(&LocalFileSystem::new(), &mut Cursor::new(data.clone()), &dest).unwrap();
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.directories_created, 1);
        assert_eq!(
            fs::read(temp.path().join("logs/today.log")).unwrap(),
            b"started\nstopped\n"
        );
        assert_eq!(fs::read(temp.path().join("readme.txt")).unwrap(), b"read me");

        let zip_path = temp.path().join("streamed.zip");
        fs::write(&zip_path, data).unwrap();
        let names = list_zip(&LocalFileSystem::new(), &VfsPath::from(zip_path.as_path())).unwrap();
        assert_eq!(names, vec!["logs/today.log", "readme.txt"]);
    }

    #[test]
    fn test_extract_empty_archive() {
        let temp = TempDir::new().unwrap();
        let data = ZipWriter::new(Cursor::new(Vec::new()))
            .finish()
            .unwrap()
            .into_inner();

        let dest = VfsPath::from(temp.path()).join("dst");
        let report = extract(&LocalFileSystem::new(), &mut Cursor::new(data.clone()), &dest).unwrap();
        assert_eq!(report.files_extracted, 0);
        assert!(temp.path().join("dst").is_dir());

        let zip_path = temp.path().join("empty.zip");
        fs::write(&zip_path, data).unwrap();
        let names = list_zip(&LocalFileSystem::new(), &VfsPath::from(zip_path.as_path())).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_extract_damaged_entry_after_complete_one() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path());
        let mut data = ZipTestBuilder::new()
            .add_file("first.txt", b"intact")
            .add_file("second.txt", b"damaged")
            .build();
        let second_header = data
            .windows(4)
            .enumerate()
            .filter(|(_, w)| *w == b"PK\x03\x04")
            .map(|(i, _)| i)
            .nth(1)
            .unwrap();
        data[second_header..second_header + 4].copy_from_slice(b"XXXX");

        let err = extract(&LocalFileSystem::new(), &mut Cursor::new(data), &dest).unwrap_err();
        match err {
            ConnectorError::Extraction { entry, .. } => assert_eq!(entry, "second.txt"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read(temp.path().join("first.txt")).unwrap(), b"intact");
        assert!(!temp.path().join("second.txt").exists());
    }

    #[test]
    fn test_extract_truncated_archive_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let dest = VfsPath::from(temp.path()).join("dst");
        let data = ZipTestBuilder::new()
            .add_file("first.txt", b"intact")
            .add_file("second.txt", b"cut off")
            .build();
        let truncated = data[..data.len() / 2].to_vec();

        let err = extract(&LocalFileSystem::new(), &mut Cursor::new(truncated), &dest).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidArchive(_)));
        assert!(!temp.path().join("dst").exists());
    }

    #[test]
    fn test_unzip_missing_source() {
        let temp = TempDir::new().unwrap();
        let local = LocalFileSystem::new();
        let source = VfsPath::from(temp.path()).join("missing.zip");

        let err = unzip(&local, &source, &local, &VfsPath::from(temp.path())).unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound { .. }));
    }

    #[test]
    fn test_list_zip_skips_directories() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("in.zip");
        let data = ZipTestBuilder::new()
            .add_directory("a/")
            .add_file("a/one.txt", b"1")
            .add_directory("b/")
            .add_file("b/two.txt", b"2")
            .build();
        fs::write(&zip_path, data).unwrap();

        let names = list_zip(&LocalFileSystem::new(), &VfsPath::from(zip_path.as_path())).unwrap();
        assert_eq!(names, vec!["a/one.txt", "b/two.txt"]);
    }

    #[test]
    fn test_entry_relative_path() {
        assert_eq!(entry_relative_path("a/b.txt").unwrap().as_deref(), Some("a/b.txt"));
        assert_eq!(entry_relative_path("./a//b/").unwrap().as_deref(), Some("a/b"));
        assert_eq!(entry_relative_path(r"win\dir\f.txt").unwrap().as_deref(), Some("win/dir/f.txt"));
        assert_eq!(entry_relative_path("./").unwrap(), None);
        assert!(entry_relative_path("/etc/passwd").is_err());
        assert!(entry_relative_path("a/../../b").is_err());
        assert!(entry_relative_path("C:/windows").is_err());
    }
}

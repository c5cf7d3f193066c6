//! ZIP archive creation.
//!
//! A folder is archived in two passes: every descendant is listed first, then
//! one entry per file is written, named by its path relative to the folder.
//! Folders get no entries of their own. The archive is assembled in a spooled
//! temporary buffer and copied to the destination only once it is complete.

use crate::ConnectorError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::report::ArchiveReport;
use crate::vfs::EntryKind;
use crate::vfs::FileSystem;
use crate::vfs::VfsPath;
use crate::vfs::WriteMode;
use crate::walker::collect_descendants;
use log::debug;
use log::error;
use log::info;
use std::io;
use std::io::Seek;
use std::io::Write;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Archives up to this size stay in memory while being built.
pub(crate) const SPOOL_MEMORY_LIMIT: usize = 8 * 1024 * 1024;

/// Deflate level used for every entry.
const COMPRESSION_LEVEL: i64 = 6;

/// Archives `root` into a ZIP file at `destination`.
///
/// Returns `Ok(false)` without writing anything when `root` does not exist.
///
/// # Errors
///
/// Returns [`ConnectorError::ArchiveWrite`] if an entry cannot be written, or
/// [`ConnectorError::Enumeration`] if a folder listing fails.
pub fn archive(
    source_fs: &dyn FileSystem,
    root: &VfsPath,
    dest_fs: &dyn FileSystem,
    destination: &VfsPath,
) -> Result<bool> {
    Ok(create_archive(source_fs, root, dest_fs, destination)?.is_some())
}

/// Archives `root` into a ZIP file at `destination`, returning statistics.
///
/// Returns `Ok(None)` when `root` does not exist.
///
/// # Errors
///
/// See [`archive`].
pub fn create_archive(
    source_fs: &dyn FileSystem,
    root: &VfsPath,
    dest_fs: &dyn FileSystem,
    destination: &VfsPath,
) -> Result<Option<ArchiveReport>> {
    let start = Instant::now();
    let Some(kind) = source_fs.kind(root)? else {
        error!("The file location does not exist: {root}");
        return Ok(None);
    };

    let spool = tempfile::spooled_tempfile(SPOOL_MEMORY_LIMIT);
    let (mut spool, mut report) = write_zip(source_fs, root, kind, spool)?;
    spool.rewind()?;
    report.archive_size = dest_fs.write_from(destination, &mut spool, WriteMode::Truncate)?;
    report.duration = start.elapsed();

    info!(
        "Archived {root} into {destination}: {} file(s), {} bytes",
        report.files_added, report.archive_size
    );
    Ok(Some(report))
}

/// Writes the ZIP archive of `root` into `writer` and returns the finished
/// writer.
///
/// A file root yields a single entry named after its base name. A folder root
/// yields one entry per descendant file.
///
/// # Errors
///
/// See [`archive`].
pub fn write_zip<W: Write + Seek>(
    fs: &dyn FileSystem,
    root: &VfsPath,
    kind: EntryKind,
    writer: W,
) -> Result<(W, ArchiveReport)> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));
    let mut buffer = CopyBuffer::new();
    let mut report = ArchiveReport::new();

    match kind {
        EntryKind::File => {
            add_file(&mut zip, fs, root, root.base_name(), options, &mut buffer, &mut report)?;
        }
        EntryKind::Directory => {
            let entries = collect_descendants(fs, root)?;
            debug!("Collected {} entries under {root}", entries.len());

            for entry in entries.iter().filter(|e| e.is_file()) {
                let name = entry.path.relative_to(root).ok_or_else(|| {
                    archive_error(entry.path.as_str(), "entry is outside the archive root")
                })?;
                add_file(&mut zip, fs, &entry.path, name, options, &mut buffer, &mut report)?;
            }
        }
    }

    let writer = zip
        .finish()
        .map_err(|e| archive_error("<central directory>", e))?;
    Ok((writer, report))
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    fs: &dyn FileSystem,
    path: &VfsPath,
    name: &str,
    options: SimpleFileOptions,
    buffer: &mut CopyBuffer,
    report: &mut ArchiveReport,
) -> Result<()> {
    debug!("Adding {path} as {name}");
    zip.start_file(name, options)
        .map_err(|e| archive_error(name, e))?;

    let mut reader = fs.open_read(path)?;
    let bytes = copy_with_buffer(&mut reader, zip, buffer).map_err(|e| match e {
        ConnectorError::Io(source) => ConnectorError::ArchiveWrite {
            entry: name.to_string(),
            source,
        },
        other => other,
    })?;

    report.files_added += 1;
    report.bytes_read += bytes;
    Ok(())
}

fn archive_error(entry: &str, err: impl std::fmt::Display) -> ConnectorError {
    ConnectorError::ArchiveWrite {
        entry: entry.to_string(),
        source: io::Error::other(err.to_string()),
    }
}

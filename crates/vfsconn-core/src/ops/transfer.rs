//! Copy and move between backends.
//!
//! Both operations accept any pair of backends. A move inside one backend is
//! a rename where possible; otherwise entries are streamed to the target and
//! the source is removed afterwards.

use crate::ConnectorError;
use crate::FilePattern;
use crate::Result;
use crate::vfs::EntryKind;
use crate::vfs::FileSystem;
use crate::vfs::VfsPath;
use crate::vfs::WriteMode;
use crate::walker::collect_descendants;
use log::debug;
use log::error;
use log::info;

/// Selection rules shared by [`copy`] and [`move_entry`].
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Only files whose base name matches are transferred, flattened into
    /// the destination.
    pub pattern: Option<FilePattern>,

    /// Transfer a folder as `destination/<name>` instead of transferring its
    /// contents into `destination`.
    pub include_parent: bool,
}

impl TransferOptions {
    /// Creates options that transfer everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the transfer to files matching `pattern`.
    #[must_use]
    pub fn with_pattern(mut self, pattern: Option<FilePattern>) -> Self {
        self.pattern = pattern;
        self
    }

    /// Sets whether a source folder keeps its own name at the destination.
    #[must_use]
    pub fn with_include_parent(mut self, include_parent: bool) -> Self {
        self.include_parent = include_parent;
        self
    }
}

/// A pair of backend and path.
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    /// Backend holding the entry.
    pub fs: &'a dyn FileSystem,
    /// Path of the entry.
    pub path: &'a VfsPath,
}

impl<'a> Endpoint<'a> {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, path: &'a VfsPath) -> Self {
        Self { fs, path }
    }

    fn same_backend(&self, other: &Endpoint<'_>) -> bool {
        self.fs.authority() == other.fs.authority()
    }
}

/// Copies `source` to `destination`.
///
/// Returns `Ok(false)` when `source` does not exist.
///
/// - With a pattern, the matching files of a folder tree are copied flat into
///   `destination`. A file source is copied only if it matches.
/// - A file source is copied to `destination/<name>`.
/// - A folder's tree is copied into `destination`, or into
///   `destination/<name>` with `include_parent`.
///
/// # Errors
///
/// Returns [`ConnectorError::InvalidParameter`] if the target is the source
/// itself or lies inside a folder source, before anything is copied.
pub fn copy(source: Endpoint<'_>, destination: Endpoint<'_>, options: &TransferOptions) -> Result<bool> {
    let Some(kind) = source.fs.kind(source.path)? else {
        error!("The file location does not exist: {}", source.path);
        return Ok(false);
    };
    let mut copied = 0usize;

    match (kind, &options.pattern) {
        (EntryKind::File, Some(pattern)) => {
            if pattern.matches(source.path.base_name()) {
                let target = destination.path.join(source.path.base_name());
                reject_overlap(source, Endpoint::new(destination.fs, &target))?;
                copy_file(source, Endpoint::new(destination.fs, &target))?;
                copied += 1;
            }
        }
        (EntryKind::Directory, Some(pattern)) => {
            reject_overlap(source, destination)?;
            copied += copy_matching(source, destination, pattern)?;
        }
        (EntryKind::File, None) => {
            let target = destination.path.join(source.path.base_name());
            reject_overlap(source, Endpoint::new(destination.fs, &target))?;
            copy_file(source, Endpoint::new(destination.fs, &target))?;
            copied += 1;
        }
        (EntryKind::Directory, None) => {
            let target = if options.include_parent {
                destination.path.join(source.path.base_name())
            } else {
                destination.path.clone()
            };
            reject_overlap(source, Endpoint::new(destination.fs, &target))?;
            copied += copy_tree(source, Endpoint::new(destination.fs, &target))?;
        }
    }

    info!("Copied {copied} file(s) from {} to {}", source.path, destination.path);
    Ok(true)
}

/// Moves `source` to `destination`.
///
/// Returns `Ok(false)` when `source` does not exist. `destination_is_folder`
/// tells whether the destination names a folder, which decides where a file
/// source lands.
///
/// - A file moves to `destination`, or to `destination/<name>` when the
///   destination is a folder.
/// - With a pattern, the matching files of a folder tree move flat into
///   `destination`.
/// - With `include_parent`, a folder moves to `destination/<name>`.
/// - Otherwise a folder's contents move into `destination` and the source
///   folder is left in place, empty.
///
/// # Errors
///
/// Returns [`ConnectorError::InvalidParameter`] if the target is the source
/// itself or lies inside a folder source, before anything is moved.
pub fn move_entry(
    source: Endpoint<'_>,
    destination: Endpoint<'_>,
    destination_is_folder: bool,
    options: &TransferOptions,
) -> Result<bool> {
    let Some(kind) = source.fs.kind(source.path)? else {
        error!("The file location does not exist: {}", source.path);
        return Ok(false);
    };

    match kind {
        EntryKind::File => {
            let target = if destination_is_folder {
                destination.path.join(source.path.base_name())
            } else {
                destination.path.clone()
            };
            reject_overlap(source, Endpoint::new(destination.fs, &target))?;
            if destination_is_folder {
                destination.fs.create_dir(destination.path)?;
            }
            relocate(source, kind, Endpoint::new(destination.fs, &target))?;
        }
        EntryKind::Directory => {
            if let Some(pattern) = &options.pattern {
                reject_overlap(source, destination)?;
                move_matching(source, destination, pattern)?;
            } else if options.include_parent {
                let target = destination.path.join(source.path.base_name());
                reject_overlap(source, Endpoint::new(destination.fs, &target))?;
                relocate(source, kind, Endpoint::new(destination.fs, &target))?;
            } else {
                reject_overlap(source, destination)?;
                relocate(source, kind, destination)?;
                source.fs.create_dir(source.path)?;
            }
        }
    }

    info!("Moved {} to {}", source.path, destination.path);
    Ok(true)
}

/// Fails when `target` is `source` or a path below it on the same backend.
fn reject_overlap(source: Endpoint<'_>, target: Endpoint<'_>) -> Result<()> {
    let overlaps = target.path == source.path || target.path.relative_to(source.path).is_some();
    if overlaps && source.same_backend(&target) {
        return Err(ConnectorError::InvalidParameter {
            name: "destination",
            reason: format!("{} is {} or lies inside it", target.path, source.path),
        });
    }
    Ok(())
}

fn copy_file(source: Endpoint<'_>, target: Endpoint<'_>) -> Result<u64> {
    debug!("Copying {} to {}", source.path, target.path);
    let mut reader = source.fs.open_read(source.path)?;
    target
        .fs
        .write_from(target.path, &mut reader, WriteMode::Truncate)
}

fn copy_tree(source: Endpoint<'_>, target: Endpoint<'_>) -> Result<usize> {
    target.fs.create_dir(target.path)?;
    let mut copied = 0;
    for entry in collect_descendants(source.fs, source.path)? {
        let Some(relative) = entry.path.relative_to(source.path) else {
            continue;
        };
        let dest = target.path.join(relative);
        if entry.is_dir() {
            target.fs.create_dir(&dest)?;
        } else {
            copy_file(
                Endpoint::new(source.fs, &entry.path),
                Endpoint::new(target.fs, &dest),
            )?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn copy_matching(
    source: Endpoint<'_>,
    target: Endpoint<'_>,
    pattern: &FilePattern,
) -> Result<usize> {
    let mut copied = 0;
    for entry in collect_descendants(source.fs, source.path)? {
        if entry.is_file() && pattern.matches(entry.base_name()) {
            let dest = target.path.join(entry.base_name());
            copy_file(
                Endpoint::new(source.fs, &entry.path),
                Endpoint::new(target.fs, &dest),
            )?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn move_matching(
    source: Endpoint<'_>,
    target: Endpoint<'_>,
    pattern: &FilePattern,
) -> Result<()> {
    let matching: Vec<VfsPath> = collect_descendants(source.fs, source.path)?
        .into_iter()
        .filter(|e| e.is_file() && pattern.matches(e.base_name()))
        .map(|e| e.path)
        .collect();

    if !matching.is_empty() {
        target.fs.create_dir(target.path)?;
    }
    for path in &matching {
        let dest = target.path.join(path.base_name());
        relocate(
            Endpoint::new(source.fs, path),
            EntryKind::File,
            Endpoint::new(target.fs, &dest),
        )?;
    }
    debug!("Moved {} file(s) matching '{pattern}'", matching.len());
    Ok(())
}

/// Moves one entry, renaming within a backend and copying across backends.
fn relocate(
    source: Endpoint<'_>,
    kind: EntryKind,
    target: Endpoint<'_>,
) -> Result<()> {
    if source.same_backend(&target) && !target.fs.exists(target.path)? {
        match source.fs.rename(source.path, target.path) {
            Ok(()) => {
                debug!("Renamed {} to {}", source.path, target.path);
                return Ok(());
            }
            Err(e) => debug!("Rename of {} failed ({e}), copying instead", source.path),
        }
    }

    match kind {
        EntryKind::File => {
            copy_file(source, target)?;
            source.fs.remove_file(source.path)?;
        }
        EntryKind::Directory => {
            target.fs.create_dir(target.path)?;
            for child in source.fs.children(source.path)? {
                let dest = target.path.join(child.base_name());
                relocate(
                    Endpoint::new(source.fs, &child.path),
                    child.kind,
                    Endpoint::new(target.fs, &dest),
                )?;
            }
            source.fs.remove_dir_all(source.path)?;
        }
    }
    Ok(())
}

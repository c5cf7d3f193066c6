//! Filesystem abstraction shared by every connector.
//!
//! Connectors never touch `std::fs` or an FTP session directly. They address
//! entries through a [`FileSystem`] backend and a [`VfsPath`] inside it, so
//! the same search, archive and copy code runs against local folders and
//! remote FTP servers.

mod ftp;
mod local;
mod path;

pub use ftp::FtpFileSystem;
pub use local::LocalFileSystem;
pub use path::VfsPath;

use crate::Result;
use crate::config::FileSystemOptions;
use crate::location::Location;
use std::io::Read;

/// Kind of an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Folder.
    Directory,
}

/// A child returned by [`FileSystem::children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path of the entry inside its backend.
    pub path: VfsPath,
    /// Whether the entry is a file or a folder.
    pub kind: EntryKind,
}

impl Entry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(path: VfsPath, kind: EntryKind) -> Self {
        Self { path, kind }
    }

    /// Last segment of the entry path.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.path.base_name()
    }

    /// Returns `true` for regular files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns `true` for folders.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// How [`FileSystem::write_from`] treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace existing content.
    Truncate,
    /// Add to the end of existing content.
    Append,
}

/// Operations a backend must provide.
///
/// Every call is blocking and runs to completion on the caller's thread.
/// Handles returned by a backend are released when dropped.
pub trait FileSystem {
    /// Identifies the backend instance: two filesystems with the same
    /// authority can rename entries between each other.
    fn authority(&self) -> String;

    /// Kind of the entry at `path`, or `None` when it does not exist.
    fn kind(&self, path: &VfsPath) -> Result<Option<EntryKind>>;

    /// Returns `true` if an entry exists at `path`.
    fn exists(&self, path: &VfsPath) -> Result<bool> {
        Ok(self.kind(path)?.is_some())
    }

    /// Direct children of the folder at `path`.
    ///
    /// Order is backend-dependent. Failures are reported as
    /// [`ConnectorError::Enumeration`](crate::ConnectorError::Enumeration).
    fn children(&self, path: &VfsPath) -> Result<Vec<Entry>>;

    /// Opens the file at `path` for reading.
    fn open_read(&self, path: &VfsPath) -> Result<Box<dyn Read + '_>>;

    /// Streams `reader` into the file at `path`, creating missing parent
    /// folders. Returns the number of bytes written.
    fn write_from(&self, path: &VfsPath, reader: &mut dyn Read, mode: WriteMode) -> Result<u64>;

    /// Creates the folder at `path` and any missing parents. Succeeds if the
    /// folder already exists.
    fn create_dir(&self, path: &VfsPath) -> Result<()>;

    /// Creates an empty file at `path` unless one already exists.
    fn create_file(&self, path: &VfsPath) -> Result<()>;

    /// Deletes the file at `path`.
    fn remove_file(&self, path: &VfsPath) -> Result<()>;

    /// Deletes the folder at `path` with all of its descendants.
    fn remove_dir_all(&self, path: &VfsPath) -> Result<()>;

    /// Renames an entry within this backend.
    fn rename(&self, from: &VfsPath, to: &VfsPath) -> Result<()>;
}

/// Opens the backend that serves `location`.
///
/// # Errors
///
/// Returns an error if the remote server cannot be reached or rejects the
/// login.
pub fn open(location: &Location, options: &FileSystemOptions) -> Result<Box<dyn FileSystem>> {
    match location {
        Location::Local { .. } => Ok(Box::new(LocalFileSystem::new())),
        Location::Ftp { server, .. } => Ok(Box::new(FtpFileSystem::connect(server, options)?)),
    }
}

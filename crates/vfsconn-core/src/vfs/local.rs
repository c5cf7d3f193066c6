//! Local filesystem backend.

use super::Entry;
use super::EntryKind;
use super::FileSystem;
use super::VfsPath;
use super::WriteMode;
use crate::ConnectorError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use log::debug;
use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;

/// Backend over `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Creates the local backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(path: &VfsPath) -> Result<()> {
        if let Some(parent) = path.as_std_path().parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl FileSystem for LocalFileSystem {
    fn authority(&self) -> String {
        "file://".to_string()
    }

    fn kind(&self, path: &VfsPath) -> Result<Option<EntryKind>> {
        match fs::metadata(path.as_std_path()) {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn children(&self, path: &VfsPath) -> Result<Vec<Entry>> {
        let enumeration = |source: io::Error| ConnectorError::Enumeration {
            path: path.to_string(),
            source,
        };

        let mut children = Vec::new();
        for dir_entry in fs::read_dir(path.as_std_path()).map_err(enumeration)? {
            let dir_entry = dir_entry.map_err(enumeration)?;
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            let child = path.join(&name);
            // Follows symlinks so linked folders are walked like real ones.
            match fs::metadata(dir_entry.path()) {
                Ok(meta) => {
                    let kind = if meta.is_dir() {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    };
                    children.push(Entry::new(child, kind));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Skipping dangling link {child}");
                }
                Err(e) => return Err(enumeration(e)),
            }
        }
        Ok(children)
    }

    fn open_read(&self, path: &VfsPath) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(fs::File::open(path.as_std_path())?))
    }

    fn write_from(&self, path: &VfsPath, reader: &mut dyn Read, mode: WriteMode) -> Result<u64> {
        Self::ensure_parent(path)?;
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Truncate => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };
        let mut file = options.open(path.as_std_path())?;
        let mut buffer = CopyBuffer::new();
        copy_with_buffer(reader, &mut file, &mut buffer)
    }

    fn create_dir(&self, path: &VfsPath) -> Result<()> {
        fs::create_dir_all(path.as_std_path())?;
        Ok(())
    }

    fn create_file(&self, path: &VfsPath) -> Result<()> {
        Self::ensure_parent(path)?;
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path.as_std_path())
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn remove_file(&self, path: &VfsPath) -> Result<()> {
        fs::remove_file(path.as_std_path())?;
        Ok(())
    }

    fn remove_dir_all(&self, path: &VfsPath) -> Result<()> {
        fs::remove_dir_all(path.as_std_path())?;
        Ok(())
    }

    fn rename(&self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        Self::ensure_parent(to)?;
        fs::rename(from.as_std_path(), to.as_std_path())?;
        Ok(())
    }
}

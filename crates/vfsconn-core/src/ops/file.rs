//! Single-entry file operations: existence checks, creation, appends, reads,
//! payload writes and deletion.

use crate::ConnectorError;
use crate::FilePattern;
use crate::Result;
use crate::vfs::EntryKind;
use crate::vfs::FileSystem;
use crate::vfs::VfsPath;
use crate::vfs::WriteMode;
use log::debug;
use log::error;
use log::info;
use log::warn;
use std::io::Read;

/// File name used by [`send`] when the destination is a folder.
pub const DEFAULT_RESPONSE_FILE: &str = "response.xml";

/// Encoding applied when none is given.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Content read by [`read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// Path of the file that was read.
    pub path: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl ReadResult {
    /// Content decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Returns `true` if an entry exists at `path`.
pub fn exists(fs: &dyn FileSystem, path: &VfsPath) -> Result<bool> {
    let exists = fs.exists(path)?;
    debug!("{path} exists: {exists}");
    Ok(exists)
}

/// Creates a folder or a file at `path`.
///
/// With `as_folder` set the folder and its parents are created. Otherwise a
/// file is created, holding `content` encoded with `encoding` when content is
/// given and empty otherwise. An existing file is overwritten only when
/// content is given.
///
/// # Errors
///
/// Returns [`ConnectorError::UnsupportedEncoding`] for an unknown encoding, or
/// an I/O error from the backend.
pub fn create(
    fs: &dyn FileSystem,
    path: &VfsPath,
    as_folder: bool,
    content: Option<&str>,
    encoding: Option<&str>,
) -> Result<bool> {
    if as_folder {
        fs.create_dir(path)?;
        info!("Created folder {path}");
        return Ok(true);
    }

    match content.filter(|c| !c.is_empty()) {
        Some(content) => {
            let bytes = encode(content, encoding)?;
            fs.write_from(path, &mut bytes.as_slice(), WriteMode::Truncate)?;
        }
        None => fs.create_file(path)?,
    }
    info!("Created file {path}");
    Ok(true)
}

/// Appends encoded `content` to the file at `path`, creating it if missing.
///
/// # Errors
///
/// See [`create`].
pub fn append(
    fs: &dyn FileSystem,
    path: &VfsPath,
    content: &str,
    encoding: Option<&str>,
) -> Result<bool> {
    let bytes = encode(content, encoding)?;
    let written = fs.write_from(path, &mut bytes.as_slice(), WriteMode::Append)?;
    debug!("Appended {written} bytes to {path}");
    Ok(true)
}

/// Reads a file, or one file of a folder.
///
/// For a folder the first child file (by name) whose base name matches
/// `pattern` is read, or the first child file when no pattern is given.
/// The content type is `content_type` when given, otherwise it is inferred
/// from the file extension.
///
/// # Errors
///
/// Returns [`ConnectorError::NotFound`] if `path` does not exist or a folder
/// has no eligible file.
pub fn read(
    fs: &dyn FileSystem,
    path: &VfsPath,
    pattern: Option<&FilePattern>,
    content_type: Option<&str>,
) -> Result<ReadResult> {
    let target = match fs.kind(path)? {
        None => return Err(ConnectorError::not_found(path.as_str())),
        Some(EntryKind::File) => path.clone(),
        Some(EntryKind::Directory) => {
            let mut files: Vec<VfsPath> = fs
                .children(path)?
                .into_iter()
                .filter(|child| child.is_file())
                .filter(|child| pattern.is_none_or(|p| p.matches(child.base_name())))
                .map(|child| child.path)
                .collect();
            files.sort();
            files.into_iter().next().ok_or_else(|| {
                error!("No file to read in folder {path}");
                ConnectorError::not_found(path.as_str())
            })?
        }
    };

    let mut bytes = Vec::new();
    fs.open_read(&target)?.read_to_end(&mut bytes)?;
    let content_type = content_type
        .filter(|t| !t.is_empty())
        .map_or_else(|| infer_content_type(&target).to_string(), str::to_string);
    debug!("Read {} bytes from {target} as {content_type}", bytes.len());

    Ok(ReadResult {
        path: target.to_string(),
        content_type,
        bytes,
    })
}

/// Writes `payload` to `destination`.
///
/// When `destination` is an existing folder the payload goes to
/// [`DEFAULT_RESPONSE_FILE`] inside it. With `append` set the payload is added
/// to the end of an existing file.
pub fn send(
    fs: &dyn FileSystem,
    destination: &VfsPath,
    payload: &[u8],
    append: bool,
) -> Result<bool> {
    let target = if fs.kind(destination)? == Some(EntryKind::Directory) {
        destination.join(DEFAULT_RESPONSE_FILE)
    } else {
        destination.clone()
    };
    let mode = if append {
        WriteMode::Append
    } else {
        WriteMode::Truncate
    };
    let written = fs.write_from(&target, &mut &payload[..], mode)?;
    info!("Sent {written} bytes to {target}");
    Ok(true)
}

/// Deletes a file, a folder tree, or the matching children of a folder.
///
/// Returns `Ok(false)` when `path` does not exist. For a folder with a
/// pattern only the direct children whose base name matches are deleted,
/// and the folder itself is kept.
pub fn delete(fs: &dyn FileSystem, path: &VfsPath, pattern: Option<&FilePattern>) -> Result<bool> {
    match fs.kind(path)? {
        None => {
            error!("The file location does not exist: {path}");
            Ok(false)
        }
        Some(EntryKind::File) => {
            fs.remove_file(path)?;
            info!("Deleted file {path}");
            Ok(true)
        }
        Some(EntryKind::Directory) => match pattern {
            Some(pattern) => {
                let mut deleted = 0usize;
                for child in fs.children(path)? {
                    if !pattern.matches(child.base_name()) {
                        continue;
                    }
                    if child.is_dir() {
                        fs.remove_dir_all(&child.path)?;
                    } else {
                        fs.remove_file(&child.path)?;
                    }
                    deleted += 1;
                }
                info!("Deleted {deleted} entries matching '{pattern}' in {path}");
                Ok(true)
            }
            None => {
                fs.remove_dir_all(path)?;
                info!("Deleted folder {path}");
                Ok(true)
            }
        },
    }
}

/// MIME type for the extension of `path`.
fn infer_content_type(path: &VfsPath) -> &'static str {
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Encodes `content` with the named character set.
///
/// Characters the target set cannot represent are replaced with `?`.
pub fn encode(content: &str, encoding: Option<&str>) -> Result<Vec<u8>> {
    let name = encoding
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_ENCODING);

    let bytes = match name.to_ascii_uppercase().replace('_', "-").as_str() {
        "UTF-8" | "UTF8" => content.as_bytes().to_vec(),
        "US-ASCII" | "ASCII" => narrow(content, 0x7F, name),
        "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => narrow(content, 0xFF, name),
        "UTF-16BE" => content.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        "UTF-16LE" => content.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        "UTF-16" => [0xFE, 0xFF]
            .into_iter()
            .chain(content.encode_utf16().flat_map(u16::to_be_bytes))
            .collect(),
        _ => return Err(ConnectorError::UnsupportedEncoding(name.to_string())),
    };
    Ok(bytes)
}

fn narrow(content: &str, max: u32, name: &str) -> Vec<u8> {
    let mut replaced = 0usize;
    let bytes = content
        .chars()
        .map(|c| {
            u8::try_from(u32::from(c))
                .ok()
                .filter(|b| u32::from(*b) <= max)
                .unwrap_or_else(|| {
                    replaced += 1;
                    b'?'
                })
        })
        .collect();
    if replaced > 0 {
        warn!("{replaced} character(s) not representable in {name} were replaced");
    }
    bytes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vfs::LocalFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> VfsPath {
        VfsPath::from(temp.path())
    }

    #[test]
    fn test_exists() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        let local = LocalFileSystem::new();

        assert!(exists(&local, &root(&temp).join("a.txt")).unwrap());
        assert!(!exists(&local, &root(&temp).join("b.txt")).unwrap());
    }

    #[test]
    fn test_create_folder() {
        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("x/y");

        assert!(create(&LocalFileSystem::new(), &path, true, None, None).unwrap());
        assert!(temp.path().join("x/y").is_dir());
    }

    #[test]
    fn test_create_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("out/empty.txt");

        create(&LocalFileSystem::new(), &path, false, None, None).unwrap();
        assert_eq!(fs::read(temp.path().join("out/empty.txt")).unwrap(), b"");
    }

    #[test]
    fn test_create_with_encoding() {
        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("latin.txt");

        create(&LocalFileSystem::new(), &path, false, Some("café"), Some("ISO-8859-1")).unwrap();
        assert_eq!(fs::read(temp.path().join("latin.txt")).unwrap(), b"caf\xE9");
    }

    #[test]
    fn test_create_unknown_encoding() {
        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("a.txt");

        let err = create(&LocalFileSystem::new(), &path, false, Some("x"), Some("KLINGON")).unwrap_err();
        assert!(matches!(err, ConnectorError::UnsupportedEncoding(_)));
    }

    #[test]
    fn test_append_creates_and_extends() {
        let temp = TempDir::new().unwrap();
        let path = root(&temp).join("log.txt");
        let local = LocalFileSystem::new();

        append(&local, &path, "one\n", None).unwrap();
        append(&local, &path, "two\n", None).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("log.txt")).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_read_file_infers_content_type() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.xml"), b"<a/>").unwrap();

        let result = read(&LocalFileSystem::new(), &root(&temp).join("a.xml"), None, None).unwrap();
        assert_eq!(result.content_type, "application/xml");
        assert_eq!(result.text(), "<a/>");
    }

    #[test]
    fn test_read_folder_with_pattern() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.log"), b"log").unwrap();
        fs::write(temp.path().join("b.txt"), b"txt").unwrap();
        let pattern = FilePattern::new(r".*\.txt").unwrap();

        let result = read(&LocalFileSystem::new(), &root(&temp), Some(&pattern), Some("text/x-custom")).unwrap();
        assert!(result.path.ends_with("b.txt"));
        assert_eq!(result.content_type, "text/x-custom");
        assert_eq!(result.bytes, b"txt");
    }

    #[test]
    fn test_read_empty_folder() {
        let temp = TempDir::new().unwrap();
        let err = read(&LocalFileSystem::new(), &root(&temp), None, None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_send_into_folder() {
        let temp = TempDir::new().unwrap();
        let local = LocalFileSystem::new();

        send(&local, &root(&temp), b"<r/>", false).unwrap();
        send(&local, &root(&temp), b"<s/>", true).unwrap();
        assert_eq!(
            fs::read(temp.path().join(DEFAULT_RESPONSE_FILE)).unwrap(),
            b"<r/><s/>"
        );
    }

    #[test]
    fn test_delete_missing_is_false() {
        let temp = TempDir::new().unwrap();
        assert!(!delete(&LocalFileSystem::new(), &root(&temp).join("nope"), None).unwrap());
    }

    #[test]
    fn test_delete_matching_children() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        fs::write(temp.path().join("b.log"), b"b").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/c.txt"), b"c").unwrap();
        let pattern = FilePattern::new(r".*\.txt").unwrap();

        assert!(delete(&LocalFileSystem::new(), &root(&temp), Some(&pattern)).unwrap());
        assert!(!temp.path().join("a.txt").exists());
        assert!(temp.path().join("b.log").exists());
        assert!(temp.path().join("sub/c.txt").exists());
    }

    #[test]
    fn test_delete_tree() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("t/u")).unwrap();
        fs::write(temp.path().join("t/u/f"), b"f").unwrap();

        assert!(delete(&LocalFileSystem::new(), &root(&temp).join("t"), None).unwrap());
        assert!(!temp.path().join("t").exists());
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("hé", None).unwrap(), "hé".as_bytes());
        assert_eq!(encode("hé", Some("us-ascii")).unwrap(), b"h?");
        assert_eq!(encode("A", Some("UTF-16LE")).unwrap(), vec![0x41, 0x00]);
        assert_eq!(encode("A", Some("UTF-16")).unwrap(), vec![0xFE, 0xFF, 0x00, 0x41]);
    }
}

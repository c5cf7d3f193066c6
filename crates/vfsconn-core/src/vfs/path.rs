//! Backend-neutral paths.

use std::fmt;
use std::path::Path;

/// Path inside a filesystem backend, always `/`-separated.
///
/// Trailing separators are dropped on construction, so `"/data/in/"` and
/// `"/data/in"` name the same entry. The root path `"/"` is kept as is.
///
/// # Examples
///
/// ```
/// use vfsconn_core::VfsPath;
///
/// let dir = VfsPath::new("/data/in/");
/// let file = dir.join("a.txt");
/// assert_eq!(file.as_str(), "/data/in/a.txt");
/// assert_eq!(file.base_name(), "a.txt");
/// assert_eq!(file.relative_to(&dir), Some("a.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VfsPath(String);

impl VfsPath {
    /// Creates a path, trimming trailing separators.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        if path.is_empty() {
            path.push('.');
        }
        Self(path)
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path as a local filesystem path.
    #[must_use]
    pub fn as_std_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Appends a child name (which may itself contain `/` segments).
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        let name = name.trim_start_matches('/');
        if name.is_empty() {
            return self.clone();
        }
        if self.0 == "/" {
            Self::new(format!("/{name}"))
        } else {
            Self::new(format!("{}/{name}", self.0))
        }
    }

    /// Last path segment.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Text after the last `.` of the base name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let base = self.base_name();
        base.rfind('.')
            .map(|idx| &base[idx + 1..])
            .filter(|ext| !ext.is_empty())
    }

    /// Parent path, or `None` for a root or single-segment relative path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.0.rfind('/') {
            Some(0) if self.0.len() > 1 => Some(Self("/".to_string())),
            Some(0) | None => None,
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// Path with `root` and the following separator stripped from the front.
    ///
    /// Returns `None` when `self` is not strictly below `root`.
    #[must_use]
    pub fn relative_to(&self, root: &Self) -> Option<&str> {
        if root.0 == "/" {
            return self.0.strip_prefix('/').filter(|rest| !rest.is_empty());
        }
        self.0
            .strip_prefix(root.0.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VfsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VfsPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for VfsPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for VfsPath {
    fn from(path: &Path) -> Self {
        let text = path.to_string_lossy();
        if std::path::MAIN_SEPARATOR == '/' {
            Self::new(text.into_owned())
        } else {
            Self::new(text.replace(std::path::MAIN_SEPARATOR, "/"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separator_trimmed() {
        assert_eq!(VfsPath::new("/a/b/").as_str(), "/a/b");
        assert_eq!(VfsPath::new("/").as_str(), "/");
        assert_eq!(VfsPath::new("").as_str(), ".");
    }

    #[test]
    fn test_join() {
        assert_eq!(VfsPath::new("/").join("a").as_str(), "/a");
        assert_eq!(VfsPath::new("src").join("sub/c.txt").as_str(), "src/sub/c.txt");
        assert_eq!(VfsPath::new("/a").join("").as_str(), "/a");
    }

    #[test]
    fn test_parent() {
        assert_eq!(VfsPath::new("/a/b").parent(), Some(VfsPath::new("/a")));
        assert_eq!(VfsPath::new("/a").parent(), Some(VfsPath::new("/")));
        assert_eq!(VfsPath::new("/").parent(), None);
        assert_eq!(VfsPath::new("a").parent(), None);
    }

    #[test]
    fn test_extension() {
        assert_eq!(VfsPath::new("/a/report.xml").extension(), Some("xml"));
        assert_eq!(VfsPath::new("/a/archive.tar.gz").extension(), Some("gz"));
        assert_eq!(VfsPath::new("/a/folder").extension(), None);
        assert_eq!(VfsPath::new("/a/trailing.").extension(), None);
    }

    #[test]
    fn test_relative_to() {
        let root = VfsPath::new("/src");
        assert_eq!(VfsPath::new("/src/sub/b.txt").relative_to(&root), Some("sub/b.txt"));
        assert_eq!(VfsPath::new("/src").relative_to(&root), None);
        assert_eq!(VfsPath::new("/srcx/a").relative_to(&root), None);
        assert_eq!(
            VfsPath::new("/a").relative_to(&VfsPath::new("/")),
            Some("a")
        );
    }
}

//! Error types for connector operations.

use std::io;
use thiserror::Error;

/// Result type alias using `ConnectorError`.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Errors that can occur while running a file connector.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File name pattern is not a valid regular expression.
    #[error("invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// Compilation failure reported by the regex engine.
        #[source]
        source: Box<regex::Error>,
    },

    /// The addressed file or folder does not exist.
    #[error("file or folder not found: {path}")]
    NotFound {
        /// Location that was looked up.
        path: String,
    },

    /// Listing the children of a folder failed.
    #[error("failed to list folder {path}: {source}")]
    Enumeration {
        /// Folder whose listing failed.
        path: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// Streaming an archive entry to its target failed.
    #[error("failed to extract entry '{entry}': {source}")]
    Extraction {
        /// Name of the entry being extracted.
        entry: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// Writing an entry into a new archive failed.
    #[error("failed to write archive entry '{entry}': {source}")]
    ArchiveWrite {
        /// Name of the entry being written.
        entry: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// Archive entry name escapes the destination folder.
    #[error("path traversal detected in archive entry: {entry}")]
    PathTraversal {
        /// The offending entry name.
        entry: String,
    },

    /// Archive container is malformed.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Location string could not be parsed.
    #[error("invalid location '{location}': {reason}")]
    InvalidLocation {
        /// The location as supplied.
        location: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Location uses a scheme with no backend.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Text encoding is unknown or cannot represent the content.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// A required connector parameter is missing.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A connector parameter has an unusable value.
    #[error("invalid value for parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An FTP command failed.
    #[error("FTP {command} failed: {reason}")]
    Ftp {
        /// The command or phase that failed.
        command: &'static str,
        /// Server or client failure text.
        reason: String,
    },

    /// The HTTP proxy refused or broke the tunnel.
    #[error("proxy tunnel failed: {0}")]
    Proxy(String),

    /// Result payload could not be serialized.
    #[error("failed to build result payload: {0}")]
    Payload(String),
}

impl ConnectorError {
    /// Returns `true` if this error means the addressed entry is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use vfsconn_core::ConnectorError;
    ///
    /// let err = ConnectorError::NotFound { path: "/missing".into() };
    /// assert!(err.is_not_found());
    ///
    /// let err = ConnectorError::Proxy("refused".into());
    /// assert!(!err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Returns `true` if the failure came from the remote side of a
    /// connection rather than from local input.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Ftp { .. } | Self::Proxy(_))
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use vfsconn_core::ConnectorError;
    ///
    /// let err = ConnectorError::InvalidArchive("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    ///
    /// let err = ConnectorError::MissingParameter("source");
    /// assert_eq!(err.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) | Self::Proxy(msg) | Self::Payload(msg) => Some(msg),
            Self::InvalidLocation { reason, .. } | Self::InvalidParameter { reason, .. } => {
                Some(reason)
            }
            Self::Ftp { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn ftp(command: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Ftp {
            command,
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ConnectorError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

//! Filesystem connection options.

use crate::ConnectorError;
use crate::Result;
use std::time::Duration;

/// Default connect timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// Options applied when opening a remote backend.
///
/// Local backends ignore every option.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vfsconn_core::FileSystemOptions;
///
/// let options = FileSystemOptions::default()
///     .with_passive_mode(false)
///     .with_so_timeout(Duration::from_secs(30));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemOptions {
    /// Timeout for establishing the control connection.
    ///
    /// Default: 100 seconds.
    pub timeout: Duration,

    /// Use passive mode for data connections.
    ///
    /// Default: `true`.
    pub passive_mode: bool,

    /// Read/write timeout on the control connection.
    ///
    /// Default: 100 seconds.
    pub so_timeout: Duration,

    /// Resolve paths relative to the login folder instead of the server root.
    ///
    /// Default: `false`.
    pub user_dir_is_root: bool,
}

impl Default for FileSystemOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            passive_mode: true,
            so_timeout: DEFAULT_TIMEOUT,
            user_dir_is_root: false,
        }
    }
}

impl FileSystemOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets passive (`true`) or active (`false`) data connections.
    #[must_use]
    pub fn with_passive_mode(mut self, passive: bool) -> Self {
        self.passive_mode = passive;
        self
    }

    /// Sets the control connection socket timeout.
    #[must_use]
    pub fn with_so_timeout(mut self, timeout: Duration) -> Self {
        self.so_timeout = timeout;
        self
    }

    /// Sets whether paths are relative to the login folder.
    #[must_use]
    pub fn with_user_dir_is_root(mut self, user_dir_is_root: bool) -> Self {
        self.user_dir_is_root = user_dir_is_root;
        self
    }

    /// Checks the options for values the socket layer rejects.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::InvalidParameter`] for a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(ConnectorError::InvalidParameter {
                name: "setTimeout",
                reason: "timeout must be greater than zero".into(),
            });
        }
        if self.so_timeout.is_zero() {
            return Err(ConnectorError::InvalidParameter {
                name: "setSoTimeout",
                reason: "socket timeout must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

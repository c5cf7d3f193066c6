//! String-keyed connector parameters.
//!
//! Connectors are configured the way a mediation engine passes template
//! parameters: every value is a string, looked up by name. Values are trimmed
//! and empty values count as absent.

use crate::ConnectorError;
use crate::FilePattern;
use crate::Result;
use crate::config::FileSystemOptions;
use crate::location::DEFAULT_FTP_PORT;
use crate::location::FtpServer;
use crate::ops::HttpProxy;
use crate::ops::ProxyFtpConfig;
use crate::ops::TransferType;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Parameter names understood by the connectors.
#[allow(missing_docs)]
pub mod keys {
    pub const SOURCE: &str = "source";
    pub const DESTINATION: &str = "destination";
    pub const FILE_PATTERN: &str = "filePattern";
    pub const RECURSIVE_SEARCH: &str = "recursiveSearch";
    pub const INCLUDE_PARENT_DIRECTORY: &str = "includeParentDirectory";
    pub const CONTENT: &str = "content";
    pub const ENCODING: &str = "encoding";
    pub const CONTENT_TYPE: &str = "contentType";
    pub const APPEND: &str = "append";

    pub const SET_TIMEOUT: &str = "setTimeout";
    pub const SET_PASSIVE_MODE: &str = "setPassiveMode";
    pub const SET_SO_TIMEOUT: &str = "setSoTimeout";
    pub const SET_USER_DIR_IS_ROOT: &str = "setUserDirIsRoot";

    pub const PROXY_HOST: &str = "proxyHost";
    pub const PROXY_PORT: &str = "proxyPort";
    pub const PROXY_USERNAME: &str = "proxyUsername";
    pub const PROXY_PASSWORD: &str = "proxyPassword";
    pub const FTP_SERVER: &str = "ftpServer";
    pub const FTP_PORT: &str = "ftpPort";
    pub const FTP_USERNAME: &str = "ftpUsername";
    pub const FTP_PASSWORD: &str = "ftpPassword";
    pub const KEEP_ALIVE_TIMEOUT: &str = "keepAliveTimeout";
    pub const CONTROL_KEEP_ALIVE_REPLY_TIMEOUT: &str = "controlKeepAliveReplyTimeout";
    pub const TARGET_PATH: &str = "targetPath";
    pub const TARGET_FILE: &str = "targetFile";
    pub const ACTIVE_MODE: &str = "activeMode";
    pub const FILE_TYPE: &str = "fileType";
}

/// Pattern value meaning "every entry".
const MATCH_ALL: &str = "*";

/// Parameter set of one connector invocation.
///
/// # Examples
///
/// ```
/// use vfsconn_core::ConnectorParams;
///
/// let params = ConnectorParams::new()
///     .with("source", " /data/in ")
///     .with("recursiveSearch", "TRUE");
/// assert_eq!(params.required("source")?, "/data/in");
/// assert!(params.flag("recursiveSearch"));
/// assert!(params.optional("filePattern").is_none());
/// # Ok::<(), vfsconn_core::ConnectorError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorParams {
    values: HashMap<String, String>,
}

impl ConnectorParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Trimmed value of `key`, or `None` when absent or blank.
    #[must_use]
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::MissingParameter`] when absent or blank.
    pub fn required(&self, key: &'static str) -> Result<&str> {
        self.optional(key)
            .ok_or(ConnectorError::MissingParameter(key))
    }

    /// `true` only for a case-insensitive `true`; anything else is `false`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.flag_or(key, false)
    }

    /// Like [`flag`](Self::flag), with `default` for an absent value.
    #[must_use]
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        self.optional(key)
            .map_or(default, |v| v.eq_ignore_ascii_case("true"))
    }

    /// Parses the value of `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::InvalidParameter`] for a value that does not
    /// parse.
    pub fn number<T>(&self, key: &'static str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|v| {
                v.parse().map_err(|e: T::Err| ConnectorError::InvalidParameter {
                    name: key,
                    reason: format!("'{v}': {e}"),
                })
            })
            .transpose()
    }

    /// Compiled `filePattern`. Blank and `*` mean "no pattern".
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn file_pattern(&self) -> Result<Option<FilePattern>> {
        FilePattern::optional(
            self.optional(keys::FILE_PATTERN)
                .filter(|p| *p != MATCH_ALL),
        )
    }

    /// Backend options from `setTimeout`, `setPassiveMode`, `setSoTimeout`
    /// and `setUserDirIsRoot`. Timeouts are given in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::InvalidParameter`] for malformed or zero
    /// timeouts.
    pub fn filesystem_options(&self) -> Result<FileSystemOptions> {
        let mut options = FileSystemOptions::new()
            .with_passive_mode(self.flag_or(keys::SET_PASSIVE_MODE, true))
            .with_user_dir_is_root(self.flag(keys::SET_USER_DIR_IS_ROOT));
        if let Some(ms) = self.number::<u64>(keys::SET_TIMEOUT)? {
            options = options.with_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.number::<u64>(keys::SET_SO_TIMEOUT)? {
            options = options.with_so_timeout(Duration::from_millis(ms));
        }
        options.validate()?;
        Ok(options)
    }

    /// Upload settings for [`ftp_over_proxy`](crate::ops::ftp_over_proxy).
    ///
    /// The proxy is used only when host, port, user and password are all
    /// given. A port of zero or below selects the default FTP port.
    /// `keepAliveTimeout` is in seconds, `controlKeepAliveReplyTimeout` in
    /// milliseconds.
    ///
    /// # Errors
    ///
    /// - [`ConnectorError::MissingParameter`] without `ftpServer`
    /// - [`ConnectorError::InvalidParameter`] for malformed numbers
    pub fn proxy_ftp_config(&self) -> Result<ProxyFtpConfig> {
        let port = self
            .number::<i64>(keys::FTP_PORT)?
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_FTP_PORT);
        let server = FtpServer {
            host: self.required(keys::FTP_SERVER)?.to_string(),
            port,
            user: self.optional(keys::FTP_USERNAME).map(str::to_string),
            password: self.optional(keys::FTP_PASSWORD).map(str::to_string),
        };

        let proxy = match (
            self.optional(keys::PROXY_HOST),
            self.optional(keys::PROXY_PORT),
            self.optional(keys::PROXY_USERNAME),
            self.optional(keys::PROXY_PASSWORD),
        ) {
            (Some(host), Some(_), Some(user), Some(password)) => Some(HttpProxy {
                host: host.to_string(),
                port: self.number::<u16>(keys::PROXY_PORT)?.unwrap_or_default(),
                user: user.to_string(),
                password: password.to_string(),
            }),
            _ => None,
        };

        let mut config = ProxyFtpConfig::new(server)
            .with_proxy(proxy)
            .with_active_mode(self.flag(keys::ACTIVE_MODE))
            .with_transfer_type(
                self.optional(keys::FILE_TYPE)
                    .and_then(|t| t.parse::<TransferType>().ok())
                    .unwrap_or_default(),
            );
        if let Some(secs) = self.number::<u64>(keys::KEEP_ALIVE_TIMEOUT)? {
            config = config.with_keep_alive_timeout(Duration::from_secs(secs));
        }
        if let Some(ms) = self.number::<u64>(keys::CONTROL_KEEP_ALIVE_REPLY_TIMEOUT)? {
            config = config.with_keep_alive_reply_timeout(Duration::from_millis(ms));
        }
        config.target_path = self.optional(keys::TARGET_PATH).map(str::to_string);
        config.target_file = self.optional(keys::TARGET_FILE).map(str::to_string);
        config.validate()?;
        Ok(config)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConnectorParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

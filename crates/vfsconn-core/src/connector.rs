//! Connector dispatch.
//!
//! [`run`] is the single entry point used by hosts: it takes an operation
//! name and a parameter set, resolves locations, opens the backends and
//! returns a [`ConnectorOutput`] that renders to the XML result payload.

use crate::ConnectorError;
use crate::Result;
use crate::archive;
use crate::extract;
use crate::location::Location;
use crate::ops;
use crate::ops::Endpoint;
use crate::ops::ReadResult;
use crate::ops::TransferOptions;
use crate::params::ConnectorParams;
use crate::params::keys;
use crate::payload;
use crate::vfs;
use crate::vfs::FileSystem;
use crate::walker;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// The connector operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Check whether an entry exists.
    Exists,
    /// Create a file or folder.
    Create,
    /// Append content to a file.
    Append,
    /// Read a file.
    Read,
    /// Copy files or folders.
    Copy,
    /// Move files or folders.
    Move,
    /// Delete files or folders.
    Delete,
    /// Find files by name pattern.
    Search,
    /// Pack a file or folder into a ZIP archive.
    Archive,
    /// Unpack a ZIP archive.
    Unzip,
    /// List the file entries of a ZIP archive.
    ListZip,
    /// Write a payload to a file.
    Send,
    /// Upload a payload over FTP, optionally through an HTTP proxy.
    FtpOverProxy,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Exists,
        Self::Create,
        Self::Append,
        Self::Read,
        Self::Copy,
        Self::Move,
        Self::Delete,
        Self::Search,
        Self::Archive,
        Self::Unzip,
        Self::ListZip,
        Self::Send,
        Self::FtpOverProxy,
    ];

    /// Canonical name of the operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Create => "create",
            Self::Append => "append",
            Self::Read => "read",
            Self::Copy => "copy",
            Self::Move => "move",
            Self::Delete => "delete",
            Self::Search => "search",
            Self::Archive => "archive",
            Self::Unzip => "unzip",
            Self::ListZip => "list-zip",
            Self::Send => "send",
            Self::FtpOverProxy => "ftp-proxy",
        }
    }

    /// Alternative name used by mediation templates.
    const fn template_name(self) -> &'static str {
        match self {
            Self::Exists => "isFileExist",
            Self::ListZip => "listFileZip",
            Self::FtpOverProxy => "ftpOverProxy",
            other => other.name(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s || op.template_name() == s)
            .ok_or_else(|| ConnectorError::InvalidParameter {
                name: "operation",
                reason: format!("unknown operation '{s}'"),
            })
    }
}

/// Result of a connector run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorOutput {
    /// Outcome of a boolean operation.
    Success(bool),
    /// Paths or entry names, in order.
    Files(Vec<String>),
    /// Content read from a file.
    Content(ReadResult),
}

impl ConnectorOutput {
    /// `false` only for a boolean operation that reported failure.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Success(false))
    }

    /// Renders the XML result payload.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Payload`] if the document cannot be written.
    pub fn to_xml(&self) -> Result<String> {
        match self {
            Self::Success(success) => payload::success_payload(*success),
            Self::Files(files) => payload::files_payload(files.as_slice()),
            Self::Content(result) => payload::content_payload(result),
        }
    }
}

/// Runs `operation` with `params`.
///
/// # Errors
///
/// Returns [`ConnectorError::MissingParameter`] when a required parameter is
/// absent, and any error of the invoked operation.
///
/// # Examples
///
/// ```no_run
/// use vfsconn_core::ConnectorParams;
/// use vfsconn_core::connector::{Operation, run};
///
/// let params = ConnectorParams::new()
///     .with("source", "/data/in")
///     .with("filePattern", r".*\.xml")
///     .with("recursiveSearch", "true");
/// let output = run(Operation::Search, &params)?;
/// println!("{}", output.to_xml()?);
/// # Ok::<(), vfsconn_core::ConnectorError>(())
/// ```
pub fn run(operation: Operation, params: &ConnectorParams) -> Result<ConnectorOutput> {
    debug!("Running {operation}");
    match operation {
        Operation::Exists => {
            let (fs, source) = open_param(params, keys::SOURCE)?;
            Ok(ConnectorOutput::Success(ops::exists(&*fs, source.path())?))
        }
        Operation::Create => {
            let (fs, source) = open_param(params, keys::SOURCE)?;
            ops::create(
                &*fs,
                source.path(),
                source.looks_like_directory(),
                params.optional(keys::CONTENT),
                params.optional(keys::ENCODING),
            )
            .map(ConnectorOutput::Success)
        }
        Operation::Append => {
            let (fs, source) = open_param(params, keys::SOURCE)?;
            ops::append(
                &*fs,
                source.path(),
                params.required(keys::CONTENT)?,
                params.optional(keys::ENCODING),
            )
            .map(ConnectorOutput::Success)
        }
        Operation::Read => {
            let (fs, source) = open_param(params, keys::SOURCE)?;
            let pattern = params.file_pattern()?;
            ops::read(
                &*fs,
                source.path(),
                pattern.as_ref(),
                params.optional(keys::CONTENT_TYPE),
            )
            .map(ConnectorOutput::Content)
        }
        Operation::Copy | Operation::Move => {
            let options = TransferOptions::new()
                .with_pattern(params.file_pattern()?)
                .with_include_parent(params.flag(keys::INCLUDE_PARENT_DIRECTORY));
            let (src_fs, source) = open_param(params, keys::SOURCE)?;
            let (dst_fs, destination) = open_param(params, keys::DESTINATION)?;
            let from = Endpoint::new(&*src_fs, source.path());
            let to = Endpoint::new(&*dst_fs, destination.path());
            let done = if operation == Operation::Copy {
                ops::copy(from, to, &options)?
            } else {
                ops::move_entry(from, to, destination.looks_like_directory(), &options)?
            };
            Ok(ConnectorOutput::Success(done))
        }
        Operation::Delete => {
            let (fs, source) = open_param(params, keys::SOURCE)?;
            let pattern = params.file_pattern()?;
            ops::delete(&*fs, source.path(), pattern.as_ref()).map(ConnectorOutput::Success)
        }
        Operation::Search => {
            let pattern = params
                .file_pattern()?
                .ok_or(ConnectorError::MissingParameter(keys::FILE_PATTERN))?;
            let (fs, source) = open_param(params, keys::SOURCE)?;
            let found = walker::search(
                &*fs,
                source.path(),
                &pattern,
                params.flag(keys::RECURSIVE_SEARCH),
            )?;
            Ok(ConnectorOutput::Files(
                found.into_iter().map(|p| p.to_string()).collect(),
            ))
        }
        Operation::Archive => {
            let (src_fs, source) = open_param(params, keys::SOURCE)?;
            let (dst_fs, destination) = open_param(params, keys::DESTINATION)?;
            archive::archive(&*src_fs, source.path(), &*dst_fs, destination.path())
                .map(ConnectorOutput::Success)
        }
        Operation::Unzip => {
            let (src_fs, source) = open_param(params, keys::SOURCE)?;
            let (dst_fs, destination) = open_param(params, keys::DESTINATION)?;
            extract::unzip(&*src_fs, source.path(), &*dst_fs, destination.path())?;
            Ok(ConnectorOutput::Success(true))
        }
        Operation::ListZip => {
            let (fs, source) = open_param(params, keys::SOURCE)?;
            extract::list_zip(&*fs, source.path()).map(ConnectorOutput::Files)
        }
        Operation::Send => {
            let (fs, destination) = open_param(params, keys::DESTINATION)?;
            let content = params.optional(keys::CONTENT).unwrap_or_default();
            ops::send(
                &*fs,
                destination.path(),
                content.as_bytes(),
                params.flag(keys::APPEND),
            )
            .map(ConnectorOutput::Success)
        }
        Operation::FtpOverProxy => {
            let config = params.proxy_ftp_config()?;
            let content = params.optional(keys::CONTENT).unwrap_or_default();
            ops::ftp_over_proxy(&config, content.as_bytes()).map(ConnectorOutput::Success)
        }
    }
}

/// Parses the location in parameter `key` and opens its backend.
fn open_param(
    params: &ConnectorParams,
    key: &'static str,
) -> Result<(Box<dyn FileSystem>, Location)> {
    let location = Location::parse(params.required(key)?)?;
    let options = params.filesystem_options()?;
    let fs = vfs::open(&location, &options)?;
    Ok((fs, location))
}

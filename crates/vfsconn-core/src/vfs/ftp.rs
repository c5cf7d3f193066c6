//! FTP backend over a single control connection.
//!
//! The session is held for the lifetime of the backend and closed with
//! `QUIT` on drop. Entry kinds are probed with `CWD` (folders) and `SIZE`
//! (files), falling back to a listing of the parent for servers without
//! `SIZE` support.

use super::Entry;
use super::EntryKind;
use super::FileSystem;
use super::VfsPath;
use super::WriteMode;
use crate::ConnectorError;
use crate::Result;
use crate::config::FileSystemOptions;
use crate::location::FtpServer;
use log::debug;
use log::warn;
use std::cell::RefCell;
use std::io;
use std::io::Read;
use std::net::ToSocketAddrs;
use suppaftp::FtpStream;
use suppaftp::Mode;
use suppaftp::types::FileType;

/// Backend over an authenticated FTP session.
pub struct FtpFileSystem {
    stream: RefCell<FtpStream>,
    authority: String,
    home: String,
    user_dir_is_root: bool,
}

impl FtpFileSystem {
    /// Connects to `server`, logs in and switches to binary transfers.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Ftp`] if the server is unreachable or
    /// rejects the login.
    pub fn connect(server: &FtpServer, options: &FileSystemOptions) -> Result<Self> {
        options.validate()?;
        let addr = server
            .address()
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| ConnectorError::ftp("CONNECT", format!("cannot resolve {}", server.host)))?;

        debug!("Connecting to FTP server {addr}");
        let stream = FtpStream::connect_timeout(addr, options.timeout)
            .map_err(|e| ConnectorError::ftp("CONNECT", e))?;
        Self::from_stream(stream, server, options)
    }

    /// Logs in over an already connected control stream.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Ftp`] if login or session setup fails.
    pub fn from_stream(
        mut stream: FtpStream,
        server: &FtpServer,
        options: &FileSystemOptions,
    ) -> Result<Self> {
        stream
            .login(server.login_user(), server.login_password())
            .map_err(|e| ConnectorError::ftp("LOGIN", e))?;

        stream.get_ref().set_read_timeout(Some(options.so_timeout))?;
        stream.get_ref().set_write_timeout(Some(options.so_timeout))?;

        stream.set_mode(if options.passive_mode {
            Mode::Passive
        } else {
            Mode::Active
        });
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| ConnectorError::ftp("TYPE", e))?;

        let home = stream.pwd().map_err(|e| ConnectorError::ftp("PWD", e))?;
        debug!("Logged in to {} as {}, home {home}", server.host, server.login_user());

        let authority = match &server.user {
            Some(user) => format!("ftp://{user}@{}", server.address()),
            None => format!("ftp://{}", server.address()),
        };

        Ok(Self {
            stream: RefCell::new(stream),
            authority,
            home,
            user_dir_is_root: options.user_dir_is_root,
        })
    }

    fn remote(&self, path: &VfsPath) -> String {
        remote_path(path, self.user_dir_is_root)
    }

    fn is_dir(&self, remote: &str) -> Result<bool> {
        let mut stream = self.stream.borrow_mut();
        if stream.cwd(remote).is_err() {
            return Ok(false);
        }
        stream
            .cwd(&self.home)
            .map_err(|e| ConnectorError::ftp("CWD", e))?;
        Ok(true)
    }

    fn listed_in_parent(&self, path: &VfsPath) -> bool {
        let parent = path.parent().unwrap_or_else(|| VfsPath::new("."));
        let remote_parent = self.remote(&parent);
        self.stream
            .borrow_mut()
            .nlst(Some(remote_parent.as_str()))
            .map(|names| {
                names
                    .iter()
                    .filter_map(|raw| listing_name(raw))
                    .any(|name| name == path.base_name())
            })
            .unwrap_or(false)
    }

    fn ensure_parent(&self, path: &VfsPath) -> Result<()> {
        match path.parent() {
            Some(parent) => self.create_dir(&parent),
            None => Ok(()),
        }
    }
}

impl FileSystem for FtpFileSystem {
    fn authority(&self) -> String {
        self.authority.clone()
    }

    fn kind(&self, path: &VfsPath) -> Result<Option<EntryKind>> {
        let remote = self.remote(path);
        if remote == "/" || remote == "." || self.is_dir(&remote)? {
            return Ok(Some(EntryKind::Directory));
        }
        let has_size = self.stream.borrow_mut().size(&remote).is_ok();
        if has_size || self.listed_in_parent(path) {
            return Ok(Some(EntryKind::File));
        }
        Ok(None)
    }

    fn children(&self, path: &VfsPath) -> Result<Vec<Entry>> {
        let remote = self.remote(path);
        let names = self
            .stream
            .borrow_mut()
            .nlst(Some(remote.as_str()))
            .map_err(|e| ConnectorError::Enumeration {
                path: path.to_string(),
                source: io::Error::other(e.to_string()),
            })?;

        let mut children = Vec::with_capacity(names.len());
        for name in names.iter().filter_map(|raw| listing_name(raw)) {
            let child = path.join(name);
            let kind = if self.is_dir(&self.remote(&child))? {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            children.push(Entry::new(child, kind));
        }
        Ok(children)
    }

    fn open_read(&self, path: &VfsPath) -> Result<Box<dyn Read + '_>> {
        let data = self
            .stream
            .borrow_mut()
            .retr_as_buffer(&self.remote(path))
            .map_err(|e| ConnectorError::ftp("RETR", e))?;
        Ok(Box::new(data))
    }

    fn write_from(&self, path: &VfsPath, reader: &mut dyn Read, mode: WriteMode) -> Result<u64> {
        self.ensure_parent(path)?;
        let remote = self.remote(path);
        let mut reader = reader;
        let mut stream = self.stream.borrow_mut();
        match mode {
            WriteMode::Truncate => stream
                .put_file(&remote, &mut reader)
                .map_err(|e| ConnectorError::ftp("STOR", e)),
            WriteMode::Append => stream
                .append_file(&remote, &mut reader)
                .map_err(|e| ConnectorError::ftp("APPE", e)),
        }
    }

    fn create_dir(&self, path: &VfsPath) -> Result<()> {
        let mut current: Option<VfsPath> = None;
        for segment in path.as_str().split('/') {
            let next = match (&current, segment) {
                (None, "") => VfsPath::new("/"),
                (None, seg) => VfsPath::new(seg),
                (Some(_), "") => continue,
                (Some(cur), seg) => cur.join(seg),
            };
            match self.kind(&next)? {
                Some(EntryKind::Directory) => {}
                Some(EntryKind::File) => {
                    return Err(ConnectorError::ftp(
                        "MKD",
                        format!("{next} exists and is not a folder"),
                    ));
                }
                None => {
                    self.stream
                        .borrow_mut()
                        .mkdir(self.remote(&next))
                        .map_err(|e| ConnectorError::ftp("MKD", e))?;
                }
            }
            current = Some(next);
        }
        Ok(())
    }

    fn create_file(&self, path: &VfsPath) -> Result<()> {
        if self.exists(path)? {
            return Ok(());
        }
        self.write_from(path, &mut io::empty(), WriteMode::Truncate)?;
        Ok(())
    }

    fn remove_file(&self, path: &VfsPath) -> Result<()> {
        self.stream
            .borrow_mut()
            .rm(self.remote(path))
            .map_err(|e| ConnectorError::ftp("DELE", e))
    }

    fn remove_dir_all(&self, path: &VfsPath) -> Result<()> {
        for child in self.children(path)? {
            if child.is_dir() {
                self.remove_dir_all(&child.path)?;
            } else {
                self.remove_file(&child.path)?;
            }
        }
        self.stream
            .borrow_mut()
            .rmdir(self.remote(path))
            .map_err(|e| ConnectorError::ftp("RMD", e))
    }

    fn rename(&self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        self.ensure_parent(to)?;
        self.stream
            .borrow_mut()
            .rename(self.remote(from), self.remote(to))
            .map_err(|e| ConnectorError::ftp("RNFR/RNTO", e))
    }
}

impl Drop for FtpFileSystem {
    fn drop(&mut self) {
        if let Err(e) = self.stream.get_mut().quit() {
            warn!("Error while closing FTP session {}: {e}", self.authority);
        }
    }
}

/// Maps a backend path to the path sent to the server.
fn remote_path(path: &VfsPath, user_dir_is_root: bool) -> String {
    if !user_dir_is_root {
        return path.as_str().to_string();
    }
    let relative = path.as_str().trim_start_matches('/');
    if relative.is_empty() {
        ".".to_string()
    } else {
        relative.to_string()
    }
}

/// Base name of an `NLST` line. Servers answer with bare names or with the
/// listed folder prepended; `.` and `..` are dropped.
fn listing_name(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_end_matches(['\r', '\n']).trim_end_matches('/');
    let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
    (!name.is_empty() && name != "." && name != "..").then_some(name)
}

//! Single-file FTP upload, optionally tunnelled through an HTTP proxy.
//!
//! Through a proxy, the control connection and every passive data connection
//! get their own tunnel, opened with `CONNECT host:port` and Basic proxy
//! authentication. Active mode is rejected with a proxy, since the server
//! could not connect back through it.

use crate::ConnectorError;
use crate::Result;
use crate::config::DEFAULT_TIMEOUT;
use crate::location::FtpServer;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use log::info;
use log::warn;
use std::io;
use std::io::Read;
use std::io::Write;
use std::net::SocketAddr;
use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::str::FromStr;
use std::time::Duration;
use suppaftp::FtpError;
use suppaftp::FtpResult;
use suppaftp::FtpStream;
use suppaftp::Mode;
use suppaftp::types::FileType;
use suppaftp::types::FormatControl;

/// Default interval for control connection keep-alive.
pub const DEFAULT_KEEP_ALIVE_TIMEOUT: Duration = Duration::from_secs(300);

/// Default wait for a reply to a keep-alive command.
pub const DEFAULT_KEEP_ALIVE_REPLY_TIMEOUT: Duration = Duration::from_millis(1000);

/// Upper bound on the size of a proxy response header.
const MAX_PROXY_RESPONSE: usize = 8 * 1024;

/// FTP representation type requested with `TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferType {
    /// Image (binary) transfers.
    Binary,
    /// ASCII text transfers.
    #[default]
    Ascii,
    /// EBCDIC text transfers.
    Ebcdic,
    /// Local byte size transfers.
    Local,
}

impl TransferType {
    fn to_file_type(self) -> FileType {
        match self {
            Self::Binary => FileType::Binary,
            Self::Ascii => FileType::Ascii(FormatControl::Default),
            Self::Ebcdic => FileType::Ebcdic(FormatControl::Default),
            Self::Local => FileType::Local(8),
        }
    }
}

impl FromStr for TransferType {
    type Err = std::convert::Infallible;

    /// Parses `BINARY`, `ASCII`, `EBCDIC` or `LOCAL`. Anything else is
    /// [`TransferType::Ascii`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "BINARY" => Self::Binary,
            "EBCDIC" => Self::Ebcdic,
            "LOCAL" => Self::Local,
            _ => Self::Ascii,
        })
    }
}

/// HTTP proxy used to reach the FTP server.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpProxy {
    /// Proxy host.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Proxy user.
    pub user: String,
    /// Proxy password.
    pub password: String,
}

impl std::fmt::Debug for HttpProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProxy")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl HttpProxy {
    fn authorization(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.user, self.password))
    }
}

/// Settings of an [`ftp_over_proxy`] upload.
///
/// # Examples
///
/// ```
/// use vfsconn_core::location::FtpServer;
/// use vfsconn_core::ops::{ProxyFtpConfig, TransferType};
///
/// let server = FtpServer {
///     host: "ftp.example.com".into(),
///     port: 21,
///     user: Some("bob".into()),
///     password: Some("secret".into()),
/// };
/// let config = ProxyFtpConfig::new(server)
///     .with_transfer_type(TransferType::Binary)
///     .with_target("/upload", "order.xml");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ProxyFtpConfig {
    /// FTP server to upload to.
    pub server: FtpServer,

    /// Proxy to tunnel through. `None` connects directly.
    pub proxy: Option<HttpProxy>,

    /// Socket timeout of the control connection.
    ///
    /// Default: 300 seconds.
    pub keep_alive_timeout: Duration,

    /// Wait for the reply to the closing `NOOP`.
    ///
    /// Default: 1000 milliseconds.
    pub keep_alive_reply_timeout: Duration,

    /// Representation type of the upload.
    ///
    /// Default: ASCII.
    pub transfer_type: TransferType,

    /// Use active instead of passive data connections. Not allowed together
    /// with a proxy.
    ///
    /// Default: `false`.
    pub active_mode: bool,

    /// Folder to change into before storing. No file is stored without it.
    pub target_path: Option<String>,

    /// Name of the stored file inside `target_path`.
    pub target_file: Option<String>,
}

impl ProxyFtpConfig {
    /// Creates a direct-connection configuration with default settings.
    #[must_use]
    pub fn new(server: FtpServer) -> Self {
        Self {
            server,
            proxy: None,
            keep_alive_timeout: DEFAULT_KEEP_ALIVE_TIMEOUT,
            keep_alive_reply_timeout: DEFAULT_KEEP_ALIVE_REPLY_TIMEOUT,
            transfer_type: TransferType::default(),
            active_mode: false,
            target_path: None,
            target_file: None,
        }
    }

    /// Tunnels the control and data connections through `proxy`.
    #[must_use]
    pub fn with_proxy(mut self, proxy: Option<HttpProxy>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Sets the control connection socket timeout.
    #[must_use]
    pub fn with_keep_alive_timeout(mut self, timeout: Duration) -> Self {
        self.keep_alive_timeout = timeout;
        self
    }

    /// Sets the wait for the closing `NOOP` reply.
    #[must_use]
    pub fn with_keep_alive_reply_timeout(mut self, timeout: Duration) -> Self {
        self.keep_alive_reply_timeout = timeout;
        self
    }

    /// Sets the representation type.
    #[must_use]
    pub fn with_transfer_type(mut self, transfer_type: TransferType) -> Self {
        self.transfer_type = transfer_type;
        self
    }

    /// Sets active (`true`) or passive (`false`) data connections.
    #[must_use]
    pub fn with_active_mode(mut self, active: bool) -> Self {
        self.active_mode = active;
        self
    }

    /// Sets the folder and file name the payload is stored as.
    #[must_use]
    pub fn with_target(mut self, path: impl Into<String>, file: impl Into<String>) -> Self {
        self.target_path = Some(path.into());
        self.target_file = Some(file.into());
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConnectorError::MissingParameter`] if the host is empty, or a target
    ///   folder is set without a file name
    /// - [`ConnectorError::InvalidParameter`] for zero timeouts, or active mode
    ///   combined with a proxy
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(ConnectorError::MissingParameter("ftpServer"));
        }
        if self.keep_alive_timeout.is_zero() {
            return Err(ConnectorError::InvalidParameter {
                name: "keepAliveTimeout",
                reason: "timeout must be greater than zero".into(),
            });
        }
        if self.keep_alive_reply_timeout.is_zero() {
            return Err(ConnectorError::InvalidParameter {
                name: "controlKeepAliveReplyTimeout",
                reason: "timeout must be greater than zero".into(),
            });
        }
        if self.active_mode && self.proxy.is_some() {
            return Err(ConnectorError::InvalidParameter {
                name: "activeMode",
                reason: "active data connections cannot pass through an HTTP proxy".into(),
            });
        }
        if self.has_target() && self.target_file.as_deref().is_none_or(str::is_empty) {
            return Err(ConnectorError::MissingParameter("targetFile"));
        }
        Ok(())
    }

    fn has_target(&self) -> bool {
        self.target_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Uploads `payload` to the configured FTP server.
///
/// Connects directly or through the HTTP proxy, logs in, applies the
/// transfer type and data connection mode, then stores the payload as
/// `target_file` inside `target_path` when a target folder is configured.
/// A final `NOOP` checks that the control connection survived.
///
/// # Errors
///
/// - [`ConnectorError::Proxy`] if the proxy refuses the tunnel
/// - [`ConnectorError::Ftp`] if connecting, logging in or any command fails
pub fn ftp_over_proxy(config: &ProxyFtpConfig, payload: &[u8]) -> Result<bool> {
    config.validate()?;
    let mut stream = connect(config)?;

    stream
        .get_ref()
        .set_read_timeout(Some(config.keep_alive_timeout))?;
    stream
        .get_ref()
        .set_write_timeout(Some(config.keep_alive_timeout))?;

    let result = upload(&mut stream, config, payload);
    if let Err(e) = stream.quit() {
        warn!("Error while closing FTP session with {}: {e}", config.server.host);
    }
    result?;
    Ok(true)
}

fn upload(stream: &mut FtpStream, config: &ProxyFtpConfig, payload: &[u8]) -> Result<()> {
    stream
        .login(config.server.login_user(), config.server.login_password())
        .map_err(|e| ConnectorError::ftp("LOGIN", e))?;
    stream
        .transfer_type(config.transfer_type.to_file_type())
        .map_err(|e| ConnectorError::ftp("TYPE", e))?;
    stream.set_mode(if config.active_mode {
        Mode::Active
    } else {
        Mode::Passive
    });

    if let (true, Some(path), Some(file)) = (
        config.has_target(),
        config.target_path.as_deref(),
        config.target_file.as_deref(),
    ) {
        stream.cwd(path).map_err(|e| ConnectorError::ftp("CWD", e))?;
        let mut reader = payload;
        let written = stream
            .put_file(file, &mut reader)
            .map_err(|e| ConnectorError::ftp("STOR", e))?;
        info!("Stored {written} bytes as {path}/{file} on {}", config.server.host);
    }

    stream
        .get_ref()
        .set_read_timeout(Some(config.keep_alive_reply_timeout))?;
    stream.noop().map_err(|e| ConnectorError::ftp("NOOP", e))?;
    debug!("Control connection to {} is alive", config.server.host);
    Ok(())
}

fn connect(config: &ProxyFtpConfig) -> Result<FtpStream> {
    let server = &config.server;
    match &config.proxy {
        None => {
            let addr = resolve(&server.host, server.port)?;
            debug!("Connecting to FTP server {addr}");
            FtpStream::connect_timeout(addr, DEFAULT_TIMEOUT)
                .map_err(|e| ConnectorError::ftp("CONNECT", e))
        }
        Some(proxy) => {
            let proxy_addr = resolve(&proxy.host, proxy.port)?;
            debug!("Connecting to {} through proxy {proxy_addr}", server.address());
            let tcp = tunnel(proxy_addr, proxy, &server.address(), config.keep_alive_timeout)?;
            let stream =
                FtpStream::connect_with_stream(tcp).map_err(|e| ConnectorError::ftp("CONNECT", e))?;
            Ok(stream.passive_stream_builder(data_stream_builder(
                proxy_addr,
                proxy.clone(),
                config.keep_alive_timeout,
            )))
        }
    }
}

/// Builds passive data connections as tunnels through the proxy at
/// `proxy_addr`, one per `PASV` address announced by the server.
fn data_stream_builder(
    proxy_addr: SocketAddr,
    proxy: HttpProxy,
    timeout: Duration,
) -> impl Fn(SocketAddr) -> FtpResult<TcpStream> + Send + Sync + 'static {
    move |data_addr| {
        debug!("Opening data connection to {data_addr} through proxy {proxy_addr}");
        tunnel(proxy_addr, &proxy, &data_addr.to_string(), timeout).map_err(|e| {
            FtpError::ConnectionError(match e {
                ConnectorError::Io(io_err) => io_err,
                other => io::Error::other(other.to_string()),
            })
        })
    }
}

/// Connects to the proxy and opens a tunnel to `target`.
fn tunnel(
    proxy_addr: SocketAddr,
    proxy: &HttpProxy,
    target: &str,
    timeout: Duration,
) -> Result<TcpStream> {
    let mut tcp = TcpStream::connect_timeout(&proxy_addr, DEFAULT_TIMEOUT)
        .map_err(|e| ConnectorError::Proxy(format!("cannot reach {proxy_addr}: {e}")))?;
    tcp.set_read_timeout(Some(timeout))?;
    open_tunnel(&mut tcp, target, proxy)?;
    Ok(tcp)
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| ConnectorError::ftp("CONNECT", format!("cannot resolve {host}")))
}

/// Sends `CONNECT target` and consumes the proxy's response header.
///
/// The header is read byte by byte so no bytes of the tunnelled stream are
/// consumed.
fn open_tunnel<S: Read + Write>(stream: &mut S, target: &str, proxy: &HttpProxy) -> Result<()> {
    let request = format!(
        "CONNECT {target} HTTP/1.1\r\nHost: {target}\r\nProxy-Authorization: Basic {}\r\n\r\n",
        proxy.authorization()
    );
    stream.write_all(request.as_bytes())?;
    stream.flush()?;

    let mut header = Vec::new();
    let mut byte = [0u8; 1];
    while !header.ends_with(b"\r\n\r\n") {
        if header.len() >= MAX_PROXY_RESPONSE {
            return Err(ConnectorError::Proxy("response header too large".into()));
        }
        if stream.read(&mut byte)? == 0 {
            return Err(ConnectorError::Proxy(
                "connection closed before the response header ended".into(),
            ));
        }
        header.push(byte[0]);
    }

    let header = String::from_utf8_lossy(&header);
    let status_line = header.lines().next().unwrap_or_default();
    let status = parse_status(status_line)?;
    if !(200..300).contains(&status) {
        return Err(ConnectorError::Proxy(format!(
            "CONNECT {target} refused: {status_line}"
        )));
    }
    debug!("Proxy tunnel to {target} established");
    Ok(())
}

fn parse_status(line: &str) -> Result<u16> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code
            .parse()
            .map_err(|_| ConnectorError::Proxy(format!("malformed status line: {line}"))),
        _ => Err(ConnectorError::Proxy(format!("malformed status line: {line}"))),
    }
}

//! Connector operations over filesystem backends.
//!
//! Boolean operations answer `Ok(false)` for soft failures such as a missing
//! source and reserve `Err` for failures of the backend itself.

mod file;
mod proxy;
mod transfer;

pub use file::DEFAULT_ENCODING;
pub use file::DEFAULT_RESPONSE_FILE;
pub use file::ReadResult;
pub use file::append;
pub use file::create;
pub use file::delete;
pub use file::encode;
pub use file::exists;
pub use file::read;
pub use file::send;
pub use proxy::DEFAULT_KEEP_ALIVE_REPLY_TIMEOUT;
pub use proxy::DEFAULT_KEEP_ALIVE_TIMEOUT;
pub use proxy::HttpProxy;
pub use proxy::ProxyFtpConfig;
pub use proxy::TransferType;
pub use proxy::ftp_over_proxy;
pub use transfer::Endpoint;
pub use transfer::TransferOptions;
pub use transfer::copy;
pub use transfer::move_entry;

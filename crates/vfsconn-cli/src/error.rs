//! Error conversion utilities for CLI.
//!
//! Converts vfsconn-core's typed errors (thiserror) into contextual errors
//! (anyhow) that tell the user what to change.

use anyhow::anyhow;
use vfsconn_core::ConnectorError;
use vfsconn_core::Operation;

/// Converts a `ConnectorError` raised by `operation` on `subject`.
pub fn convert_connector_error(
    err: ConnectorError,
    operation: Operation,
    subject: &str,
) -> anyhow::Error {
    match err {
        ConnectorError::NotFound { path } => {
            anyhow!(
                "'{path}' does not exist\n\
                 HINT: Check the location passed to '{operation}'."
            )
        }
        ConnectorError::InvalidPattern { pattern, source } => {
            anyhow!(
                "Invalid file pattern '{pattern}': {source}\n\
                 HINT: Patterns are regular expressions that must match the whole file name, e.g. '.*\\.xml'."
            )
        }
        ConnectorError::PathTraversal { entry } => {
            anyhow!(
                "Security violation: archive '{subject}' contains entry '{entry}' outside the destination\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources."
            )
        }
        ConnectorError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{subject}': {reason}\n\
                 HINT: The archive may be corrupted or not a ZIP file."
            )
        }
        ConnectorError::UnsupportedScheme(scheme) => {
            anyhow!(
                "Unsupported location scheme '{scheme}'\n\
                 HINT: Use a local path, a file:// URI or an ftp:// URI."
            )
        }
        ConnectorError::UnsupportedEncoding(encoding) => {
            anyhow!(
                "Unsupported encoding '{encoding}'\n\
                 HINT: Supported encodings: UTF-8, US-ASCII, ISO-8859-1, UTF-16, UTF-16BE, UTF-16LE."
            )
        }
        ConnectorError::MissingParameter(name) => {
            anyhow!(
                "'{operation}' needs a value for '{name}'\n\
                 HINT: Run 'vfsconn {operation} --help' for usage."
            )
        }
        ConnectorError::Ftp { command, reason } => {
            anyhow!(
                "FTP {command} failed for '{subject}': {reason}\n\
                 HINT: Check the server address and credentials, or try --active or a larger --timeout."
            )
        }
        ConnectorError::Proxy(reason) => {
            anyhow!(
                "Proxy tunnel to '{subject}' failed: {reason}\n\
                 HINT: Check --proxy-host, --proxy-port and the proxy credentials."
            )
        }
        _ => anyhow::Error::from(err).context(format!("'{operation}' failed for '{subject}'")),
    }
}

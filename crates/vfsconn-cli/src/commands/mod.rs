//! Subcommand implementations.
//!
//! Every subcommand translates its arguments into a [`ConnectorParams`] set
//! and goes through [`connector::run`], so the CLI and embedding hosts share
//! one code path.

pub mod archive;
pub mod completion;
pub mod file;
pub mod proxy;
pub mod search;
pub mod transfer;

use crate::cli::ConnectionArgs;
use crate::cli::PayloadArgs;
use crate::error::convert_connector_error;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::fs;
use std::io;
use std::io::Read;
use vfsconn_core::ConnectorParams;
use vfsconn_core::Operation;
use vfsconn_core::connector;
use vfsconn_core::params::keys;

/// Parameters carrying the global FTP connection flags.
pub fn connection_params(connection: &ConnectionArgs) -> ConnectorParams {
    let mut params =
        ConnectorParams::new().with(keys::SET_PASSIVE_MODE, (!connection.active).to_string());
    if let Some(ms) = connection.timeout {
        params.insert(keys::SET_TIMEOUT, ms.to_string());
    }
    if let Some(ms) = connection.so_timeout {
        params.insert(keys::SET_SO_TIMEOUT, ms.to_string());
    }
    if connection.user_dir_is_root {
        params.insert(keys::SET_USER_DIR_IS_ROOT, "true");
    }
    params
}

/// Inserts `value` under `key` when present.
pub fn insert_optional(params: &mut ConnectorParams, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        params.insert(key, value);
    }
}

/// Resolves the payload text from `--content`, `--input` or standard input.
pub fn read_payload(payload: &PayloadArgs) -> Result<String> {
    if let Some(content) = &payload.content {
        return Ok(content.clone());
    }
    if let Some(path) = &payload.input {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from '{}'", path.display()));
    }
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("failed to read payload from standard input")?;
    Ok(content)
}

/// Runs `operation` and hands its output to `formatter`.
///
/// `subject` names the location the operation is about; it appears in error
/// messages. Returns `false` when a boolean operation reported failure.
pub fn run(
    operation: Operation,
    params: &ConnectorParams,
    subject: &str,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let output = connector::run(operation, params)
        .map_err(|err| convert_connector_error(err, operation, subject))?;
    formatter.format_output(operation, &output)?;
    Ok(output.is_success())
}

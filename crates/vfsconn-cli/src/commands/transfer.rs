//! Copy and move commands.

use super::connection_params;
use super::insert_optional;
use super::run;
use crate::cli::ConnectionArgs;
use crate::cli::TransferArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use vfsconn_core::ConnectorParams;
use vfsconn_core::Operation;
use vfsconn_core::params::keys;

fn transfer_params(args: &TransferArgs, connection: &ConnectionArgs) -> ConnectorParams {
    let mut params = connection_params(connection)
        .with(keys::SOURCE, args.source.as_str())
        .with(keys::DESTINATION, args.destination.as_str())
        .with(keys::INCLUDE_PARENT_DIRECTORY, args.include_parent.to_string());
    insert_optional(&mut params, keys::FILE_PATTERN, args.pattern.as_deref());
    params
}

pub fn copy(
    args: &TransferArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    run(
        Operation::Copy,
        &transfer_params(args, connection),
        &args.source,
        formatter,
    )
}

pub fn move_entry(
    args: &TransferArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    run(
        Operation::Move,
        &transfer_params(args, connection),
        &args.source,
        formatter,
    )
}

//! Single-location file commands: exists, create, append, read, delete and
//! send.

use super::connection_params;
use super::insert_optional;
use super::read_payload;
use super::run;
use crate::cli::AppendArgs;
use crate::cli::ConnectionArgs;
use crate::cli::CreateArgs;
use crate::cli::DeleteArgs;
use crate::cli::LocationArgs;
use crate::cli::ReadArgs;
use crate::cli::SendArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use vfsconn_core::Operation;
use vfsconn_core::params::keys;

pub fn exists(
    args: &LocationArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let params = connection_params(connection).with(keys::SOURCE, args.location.as_str());
    run(Operation::Exists, &params, &args.location, formatter)
}

pub fn create(
    args: &CreateArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let mut params = connection_params(connection).with(keys::SOURCE, args.location.as_str());
    insert_optional(&mut params, keys::CONTENT, args.content.as_deref());
    insert_optional(&mut params, keys::ENCODING, args.encoding.as_deref());
    run(Operation::Create, &params, &args.location, formatter)
}

pub fn append(
    args: &AppendArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let mut params = connection_params(connection)
        .with(keys::SOURCE, args.location.as_str())
        .with(keys::CONTENT, args.content.as_str());
    insert_optional(&mut params, keys::ENCODING, args.encoding.as_deref());
    run(Operation::Append, &params, &args.location, formatter)
}

pub fn read(
    args: &ReadArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let mut params = connection_params(connection).with(keys::SOURCE, args.location.as_str());
    insert_optional(&mut params, keys::FILE_PATTERN, args.pattern.as_deref());
    insert_optional(&mut params, keys::CONTENT_TYPE, args.content_type.as_deref());
    run(Operation::Read, &params, &args.location, formatter)
}

pub fn delete(
    args: &DeleteArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let mut params = connection_params(connection).with(keys::SOURCE, args.location.as_str());
    insert_optional(&mut params, keys::FILE_PATTERN, args.pattern.as_deref());
    run(Operation::Delete, &params, &args.location, formatter)
}

pub fn send(
    args: &SendArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let payload = read_payload(&args.payload)?;
    let params = connection_params(connection)
        .with(keys::DESTINATION, args.destination.as_str())
        .with(keys::CONTENT, payload)
        .with(keys::APPEND, args.append.to_string());
    run(Operation::Send, &params, &args.destination, formatter)
}

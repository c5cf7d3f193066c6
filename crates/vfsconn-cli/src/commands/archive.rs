//! ZIP commands: archive, unzip and list-zip.

use super::connection_params;
use super::run;
use crate::cli::ArchiveArgs;
use crate::cli::ConnectionArgs;
use crate::cli::ListZipArgs;
use crate::cli::UnzipArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use vfsconn_core::Operation;
use vfsconn_core::params::keys;

pub fn archive(
    args: &ArchiveArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let params = connection_params(connection)
        .with(keys::SOURCE, args.source.as_str())
        .with(keys::DESTINATION, args.archive.as_str());
    run(Operation::Archive, &params, &args.source, formatter)
}

pub fn unzip(
    args: &UnzipArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let params = connection_params(connection)
        .with(keys::SOURCE, args.archive.as_str())
        .with(keys::DESTINATION, args.destination.as_str());
    run(Operation::Unzip, &params, &args.archive, formatter)
}

pub fn list_zip(
    args: &ListZipArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let params = connection_params(connection).with(keys::SOURCE, args.archive.as_str());
    run(Operation::ListZip, &params, &args.archive, formatter)
}

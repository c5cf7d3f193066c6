//! Search command implementation.

use super::connection_params;
use super::run;
use crate::cli::ConnectionArgs;
use crate::cli::SearchArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use vfsconn_core::Operation;
use vfsconn_core::params::keys;

pub fn execute(
    args: &SearchArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let params = connection_params(connection)
        .with(keys::SOURCE, args.location.as_str())
        .with(keys::FILE_PATTERN, args.pattern.as_str())
        .with(keys::RECURSIVE_SEARCH, args.recursive.to_string());
    run(Operation::Search, &params, &args.location, formatter)
}

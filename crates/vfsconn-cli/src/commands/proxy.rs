//! FTP upload command, optionally tunnelled through an HTTP proxy.

use super::connection_params;
use super::insert_optional;
use super::read_payload;
use super::run;
use crate::cli::ConnectionArgs;
use crate::cli::FtpProxyArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use vfsconn_core::ConnectorParams;
use vfsconn_core::Operation;
use vfsconn_core::params::keys;

fn proxy_params(args: &FtpProxyArgs, connection: &ConnectionArgs) -> ConnectorParams {
    let mut params = connection_params(connection)
        .with(keys::FTP_SERVER, args.server.as_str())
        .with(keys::FTP_PORT, args.port.to_string())
        .with(keys::FILE_TYPE, args.file_type.to_uppercase())
        .with(keys::ACTIVE_MODE, connection.active.to_string());
    insert_optional(&mut params, keys::FTP_USERNAME, args.user.as_deref());
    insert_optional(&mut params, keys::FTP_PASSWORD, args.password.as_deref());
    insert_optional(&mut params, keys::PROXY_HOST, args.proxy_host.as_deref());
    insert_optional(
        &mut params,
        keys::PROXY_PORT,
        args.proxy_port.map(|p| p.to_string()).as_deref(),
    );
    insert_optional(&mut params, keys::PROXY_USERNAME, args.proxy_user.as_deref());
    insert_optional(&mut params, keys::PROXY_PASSWORD, args.proxy_password.as_deref());
    insert_optional(
        &mut params,
        keys::KEEP_ALIVE_TIMEOUT,
        args.keep_alive_timeout.map(|s| s.to_string()).as_deref(),
    );
    insert_optional(
        &mut params,
        keys::CONTROL_KEEP_ALIVE_REPLY_TIMEOUT,
        args.reply_timeout.map(|ms| ms.to_string()).as_deref(),
    );
    insert_optional(&mut params, keys::TARGET_PATH, args.target_path.as_deref());
    insert_optional(&mut params, keys::TARGET_FILE, args.target_file.as_deref());
    params
}

pub fn execute(
    args: &FtpProxyArgs,
    connection: &ConnectionArgs,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    let payload = read_payload(&args.payload)?;
    let params = proxy_params(args, connection).with(keys::CONTENT, payload);
    let subject = format!("ftp://{}:{}", args.server, args.port);
    run(Operation::FtpOverProxy, &params, &subject, formatter)
}

//! vfsconn CLI - File connector operations over local and FTP filesystems.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use cli::Commands;
use env_logger::Env;
use log::debug;
use std::process::ExitCode;

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.xml, cli.verbose, cli.quiet);
    let connection = &cli.connection;

    let result = match &cli.command {
        Commands::Exists(args) => commands::file::exists(args, connection, &*formatter),
        Commands::Create(args) => commands::file::create(args, connection, &*formatter),
        Commands::Append(args) => commands::file::append(args, connection, &*formatter),
        Commands::Read(args) => commands::file::read(args, connection, &*formatter),
        Commands::Copy(args) => commands::transfer::copy(args, connection, &*formatter),
        Commands::Move(args) => commands::transfer::move_entry(args, connection, &*formatter),
        Commands::Delete(args) => commands::file::delete(args, connection, &*formatter),
        Commands::Search(args) => commands::search::execute(args, connection, &*formatter),
        Commands::Archive(args) => commands::archive::archive(args, connection, &*formatter),
        Commands::Unzip(args) => commands::archive::unzip(args, connection, &*formatter),
        Commands::ListZip(args) => commands::archive::list_zip(args, connection, &*formatter),
        Commands::Send(args) => commands::file::send(args, connection, &*formatter),
        Commands::FtpProxy(args) => commands::proxy::execute(args, connection, &*formatter),
        Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            debug!("operation reported failure");
            ExitCode::FAILURE
        }
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}

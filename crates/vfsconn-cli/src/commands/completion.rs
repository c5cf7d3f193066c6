//! Shell completion generation command.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;
use std::io::Write;

const BIN_NAME: &str = "vfsconn";

/// Writes the completion script for `shell` to `out`.
fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, out);
}

/// Prints the completion script for `shell` to standard output.
pub fn execute(shell: Shell) {
    write_completions(shell, &mut io::stdout());
}

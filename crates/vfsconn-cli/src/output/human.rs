//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::io;
use std::io::Write;
use vfsconn_core::ConnectorOutput;
use vfsconn_core::Operation;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn outcome_message(operation: Operation, success: bool) -> String {
        match (operation, success) {
            (Operation::Exists, true) => "Location exists".to_string(),
            (Operation::Exists, false) => "Location does not exist".to_string(),
            (Operation::Unzip, true) => "Extraction complete".to_string(),
            (Operation::Archive, true) => "Archive created".to_string(),
            (_, true) => format!("{operation} complete"),
            (_, false) => format!("{operation} reported failure"),
        }
    }

    fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_output(&self, operation: Operation, output: &ConnectorOutput) -> Result<()> {
        match output {
            ConnectorOutput::Success(true) => self.success(&Self::outcome_message(operation, true)),
            ConnectorOutput::Success(false) => {
                self.warning(&Self::outcome_message(operation, false));
            }
            ConnectorOutput::Files(files) => {
                for file in files {
                    self.term.write_line(file)?;
                }
                if self.verbose {
                    let _ = self
                        .err_term
                        .write_line(&format!("  {} entries", files.len()));
                }
            }
            ConnectorOutput::Content(result) => {
                if self.verbose {
                    let _ = self.err_term.write_line(&format!(
                        "{} ({}, {})",
                        result.path,
                        result.content_type,
                        Self::format_size(result.bytes.len() as u64)
                    ));
                }
                let mut stdout = io::stdout().lock();
                stdout.write_all(&result.bytes)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}

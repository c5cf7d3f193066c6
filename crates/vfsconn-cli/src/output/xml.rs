//! Prints the connector's XML result payload.

use super::formatter::OutputFormatter;
use anyhow::Result;
use std::io;
use std::io::Write;
use vfsconn_core::ConnectorOutput;
use vfsconn_core::Operation;

pub struct XmlFormatter;

impl OutputFormatter for XmlFormatter {
    fn format_output(&self, _operation: Operation, output: &ConnectorOutput) -> Result<()> {
        let xml = output.to_xml()?;
        writeln!(io::stdout(), "{xml}")?;
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        let _ = writeln!(io::stderr(), "ERROR: {error:?}");
    }
}

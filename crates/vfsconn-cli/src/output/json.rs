//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::io;
use std::io::Write;
use vfsconn_core::ConnectorOutput;
use vfsconn_core::Operation;

pub struct JsonFormatter;

#[derive(Serialize)]
struct SuccessData {
    success: bool,
}

#[derive(Serialize)]
struct FilesData<'a> {
    count: usize,
    files: &'a [String],
}

#[derive(Serialize)]
struct ContentData<'a> {
    path: &'a str,
    content_type: &'a str,
    size: usize,
    /// Base64 of the raw bytes.
    content: String,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn render(operation: Operation, output: &ConnectorOutput) -> Result<String> {
        let name = operation.name();
        let json = match output {
            ConnectorOutput::Success(true) => {
                serde_json::to_string_pretty(&JsonOutput::success(name, SuccessData { success: true }))?
            }
            ConnectorOutput::Success(false) => serde_json::to_string_pretty(&JsonOutput::failure(
                name,
                SuccessData { success: false },
                format!("{operation} reported failure"),
            ))?,
            ConnectorOutput::Files(files) => serde_json::to_string_pretty(&JsonOutput::success(
                name,
                FilesData {
                    count: files.len(),
                    files,
                },
            ))?,
            ConnectorOutput::Content(result) => {
                serde_json::to_string_pretty(&JsonOutput::success(
                    name,
                    ContentData {
                        path: &result.path,
                        content_type: &result.content_type,
                        size: result.bytes.len(),
                        content: STANDARD.encode(&result.bytes),
                    },
                ))?
            }
        };
        Ok(json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_output(&self, operation: Operation, output: &ConnectorOutput) -> Result<()> {
        let json = Self::render(operation, output)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }
}

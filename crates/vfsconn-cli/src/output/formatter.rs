//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use vfsconn_core::ConnectorOutput;
use vfsconn_core::Operation;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a connector operation
    fn format_output(&self, operation: Operation, output: &ConnectorOutput) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// An error result that still carries the operation's data.
    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

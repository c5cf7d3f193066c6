//! XML result payloads.
//!
//! Every connector answers with a small XML document in the connector
//! namespace:
//!
//! ```text
//! <file:result xmlns:file="urn:vfsconn:result">
//!     <file:success>true</file:success>
//! </file:result>
//! ```

use crate::ConnectorError;
use crate::Result;
use crate::ops::ReadResult;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::Writer;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;

/// Namespace URI of result payloads.
pub const NAMESPACE: &str = "urn:vfsconn:result";

const ROOT: &str = "file:result";

/// Builds `<file:result><file:success>..</file:success></file:result>`.
///
/// # Errors
///
/// Returns [`ConnectorError::Payload`] if the document cannot be written.
///
/// # Examples
///
/// ```
/// use vfsconn_core::payload::success_payload;
///
/// let xml = success_payload(true)?;
/// assert!(xml.contains("<file:success>true</file:success>"));
/// # Ok::<(), vfsconn_core::ConnectorError>(())
/// ```
pub fn success_payload(success: bool) -> Result<String> {
    let mut doc = ResultDocument::open()?;
    doc.text_element("file:success", if success { "true" } else { "false" })?;
    doc.finish()
}

/// Builds one `<file:file>` element per path, in order.
///
/// # Errors
///
/// Returns [`ConnectorError::Payload`] if the document cannot be written.
pub fn files_payload<S: AsRef<str>>(files: &[S]) -> Result<String> {
    let mut doc = ResultDocument::open()?;
    for file in files {
        doc.text_element("file:file", file.as_ref())?;
    }
    doc.finish()
}

/// Describes read content: its path, content type and the bytes in base64.
///
/// # Errors
///
/// Returns [`ConnectorError::Payload`] if the document cannot be written.
pub fn content_payload(result: &ReadResult) -> Result<String> {
    let mut doc = ResultDocument::open()?;
    doc.text_element("file:file", &result.path)?;
    doc.text_element("file:contentType", &result.content_type)?;
    doc.text_element("file:content", &STANDARD.encode(&result.bytes))?;
    doc.finish()
}

struct ResultDocument {
    writer: Writer<Vec<u8>>,
}

impl ResultDocument {
    fn open() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        let root = BytesStart::new(ROOT).with_attributes([("xmlns:file", NAMESPACE)]);
        writer
            .write_event(Event::Start(root))
            .map_err(payload_error)?;
        Ok(Self { writer })
    }

    fn text_element(&mut self, tag: &str, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(tag)))
            .map_err(payload_error)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(payload_error)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(payload_error)?;
        Ok(())
    }

    fn finish(mut self) -> Result<String> {
        self.writer
            .write_event(Event::End(BytesEnd::new(ROOT)))
            .map_err(payload_error)?;
        String::from_utf8(self.writer.into_inner()).map_err(payload_error)
    }
}

fn payload_error(err: impl std::fmt::Display) -> ConnectorError {
    ConnectorError::Payload(err.to_string())
}

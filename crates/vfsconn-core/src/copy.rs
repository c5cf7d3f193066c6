//! Chunked stream copying with an operation-scoped buffer.
//!
//! Every connector operation that moves bytes allocates its own
//! [`CopyBuffer`] and passes it down to the copies it performs. Buffers are
//! never shared between operations.

use std::io;
use std::io::Read;
use std::io::Write;

use crate::Result;

/// Size of one copy chunk (64KB).
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Scratch space for [`copy_with_buffer`].
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use vfsconn_core::copy::{CopyBuffer, copy_with_buffer};
///
/// let mut buffer = CopyBuffer::new();
/// let mut input = Cursor::new(b"payload".to_vec());
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer)?;
/// assert_eq!(copied, 7);
/// # Ok::<(), vfsconn_core::ConnectorError>(())
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Allocates a zeroed buffer of [`COPY_BUFFER_SIZE`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` into `writer` one buffer-sized chunk at a time.
///
/// Interrupted reads are retried. Returns the number of bytes copied.
///
/// # Errors
///
/// Returns [`ConnectorError::Io`](crate::ConnectorError::Io) if reading or
/// writing fails.
pub fn copy_with_buffer<R, W>(reader: &mut R, writer: &mut W, buffer: &mut CopyBuffer) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;
        total += bytes_read as u64;
    }

    writer.flush()?;
    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ConnectorError;
    use std::io::Cursor;

    #[test]
    fn test_copy_buffer_size() {
        assert_eq!(CopyBuffer::new().size(), 64 * 1024);
        assert_eq!(CopyBuffer::default().size(), COPY_BUFFER_SIZE);
    }

    #[test]
    fn test_copy_empty_source() {
        let mut buffer = CopyBuffer::new();
        let mut input = Cursor::new(Vec::<u8>::new());
        let mut output = Vec::new();

        assert_eq!(copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap(), 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_multiple_chunks() {
        let mut buffer = CopyBuffer::new();
        let input_data = vec![0x55u8; COPY_BUFFER_SIZE * 3 + 1000];
        let mut input = Cursor::new(&input_data);
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
        assert_eq!(copied, input_data.len() as u64);
        assert_eq!(output, input_data);
    }

    #[test]
    fn test_copy_through_trait_objects() {
        let mut buffer = CopyBuffer::new();
        let mut input = Cursor::new(b"dyn".to_vec());
        let mut output = Vec::new();
        let reader: &mut dyn Read = &mut input;
        let writer: &mut dyn Write = &mut output;

        copy_with_buffer(reader, writer, &mut buffer).unwrap();
        assert_eq!(output, b"dyn");
    }

    #[test]
    fn test_copy_with_interrupted_reads() {
        struct InterruptedReader {
            data: Vec<u8>,
            position: usize,
            calls: usize,
        }

        impl Read for InterruptedReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.calls += 1;
                if self.calls % 2 == 1 && self.position < self.data.len() {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
                }
                let remaining = self.data.len() - self.position;
                let n = remaining.min(buf.len()).min(100);
                buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
                self.position += n;
                Ok(n)
            }
        }

        let data = vec![0x42u8; 1000];
        let mut reader = InterruptedReader {
            data: data.clone(),
            position: 0,
            calls: 0,
        };
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();

        copy_with_buffer(&mut reader, &mut output, &mut buffer).unwrap();
        assert_eq!(output, data);
    }

    #[test]
    fn test_copy_with_write_failure() {
        struct FailingWriter;

        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("write failed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut input = Cursor::new(vec![1u8; 10]);
        let mut buffer = CopyBuffer::new();
        let result = copy_with_buffer(&mut input, &mut FailingWriter, &mut buffer);

        match result {
            Err(ConnectorError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
            other => panic!("expected IO error, got {other:?}"),
        }
    }
}

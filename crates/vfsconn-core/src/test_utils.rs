//! Builders for in-memory test archives.

use std::io::Cursor;
use std::io::Write;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for ZIP archives mixing file and folder entries.
pub struct ZipTestBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored file entry.
    pub fn add_file(mut self, name: &str, data: &[u8]) -> Self {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.zip.start_file(name, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a folder entry.
    pub fn add_directory(mut self, name: &str) -> Self {
        self.zip
            .add_directory(name, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

#[test]
fn test_builder_entries() {
    let data = ZipTestBuilder::new()
        .add_directory("d/")
        .add_file("d/f.txt", b"f")
        .build();
    let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.name_for_index(1), Some("d/f.txt"));
}

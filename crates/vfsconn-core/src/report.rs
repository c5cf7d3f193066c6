//! Archive operation reporting.

use std::time::Duration;

/// Report of an archive creation.
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Number of file entries written to the archive.
    pub files_added: usize,

    /// Uncompressed bytes read from the source files.
    pub bytes_read: u64,

    /// Size of the finished archive in bytes.
    pub archive_size: u64,

    /// Duration of the operation.
    pub duration: Duration,
}

impl ArchiveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 for an empty archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use vfsconn_core::ArchiveReport;
    ///
    /// let mut report = ArchiveReport::new();
    /// report.bytes_read = 1000;
    /// report.archive_size = 250;
    /// assert_eq!(report.compression_ratio(), 4.0);
    /// ```
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_size as f64
    }
}

/// Report of an archive extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of file entries written.
    pub files_extracted: usize,

    /// Number of folder entries created.
    pub directories_created: usize,

    /// Total bytes written to files.
    pub bytes_written: u64,

    /// Duration of the operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of entries processed.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}

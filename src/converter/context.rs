//! Extraction context that holds state during the conversion process.

use tracing::{debug, info, warn};

use crate::error::{PrepareError, Result};
use crate::texcache::{Header, TextureRecord};
use crate::ExtractionOptions;

/// An encoded image ready to be stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Encoded file contents
    pub data: Vec<u8>,
    /// File extension without the dot
    pub extension: &'static str,
}

/// Turns a decoded texture record into an image file.
pub trait ImagePreparer {
    /// Converts the record, taking ownership of its payload.
    fn prepare(&self, record: TextureRecord) -> std::result::Result<PreparedImage, PrepareError>;
}

/// Append-only archive sink.
pub trait EntryWriter {
    /// Appends one named file.
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()>;

    /// Appends the end-of-archive marker. No entry may follow.
    fn finish(&mut self) -> Result<()>;
}

/// Result of processing one index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// An archive entry was appended
    Written,
    /// Preparation failed and the record was skipped
    Skipped,
}

/// Context for the extraction process.
///
/// This replaces process-wide state: the options, the image preparer and the
/// output sink are borrowed for the duration of one run.
pub struct ExtractionContext<'a> {
    /// Run options
    pub options: &'a ExtractionOptions,
    /// Image conversion
    pub preparer: &'a dyn ImagePreparer,
    /// Archive output
    pub writer: &'a mut dyn EntryWriter,
    /// Verbosity level (0=quiet, 1=config, 2=record headers)
    pub verbosity: u8,
}

impl<'a> ExtractionContext<'a> {
    /// Creates a new extraction context.
    pub fn new(
        options: &'a ExtractionOptions,
        preparer: &'a dyn ImagePreparer,
        writer: &'a mut dyn EntryWriter,
    ) -> Self {
        Self {
            options,
            preparer,
            writer,
            verbosity: options.verbosity,
        }
    }

    /// Sets the verbosity level.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Returns true if per-record headers should be dumped.
    #[inline]
    pub fn dump_record_headers(&self) -> bool {
        self.verbosity >= 2
    }

    /// Returns the archive name for a texture.
    pub fn entry_name(&self, checksum: u64, extension: &str) -> String {
        match self.options.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => {
                format!("{}#{:016X}.{}", prefix, checksum, extension)
            }
            _ => format!("{:016X}.{}", checksum, extension),
        }
    }

    /// Logs the validated config header.
    ///
    /// The summary line needs verbosity 1, the decoded fields verbosity 2.
    pub fn report_header(&self, header: &Header) {
        self.info(&format!(
            "Config header: {:#010x} ({} cache)",
            header.config.bits(),
            header.kind
        ));
        for line in header.describe() {
            self.debug(&format!("  {}", line));
        }
    }

    /// Logs a warning message.
    pub fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    /// Logs an info message if verbosity is high enough.
    pub fn info(&self, message: &str) {
        if self.verbosity >= 1 {
            info!("{}", message);
        }
    }

    /// Logs a debug message if verbosity is high enough.
    pub fn debug(&self, message: &str) {
        if self.verbosity >= 2 {
            debug!("{}", message);
        }
    }
}

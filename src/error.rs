//! Error types for texture stream extraction.
//!
//! Errors are split by layer: [`ReadError`] covers the byte reader,
//! [`PrepareError`] covers pixel conversion, and [`Error`] names the pipeline
//! stage that failed. Only preparation failures may be skipped.

use std::io;

use thiserror::Error;

use crate::texcache::InputKind;

/// Failures of the endian-aware byte reader.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("stream ended too early: needed {needed} bytes, got {available}")]
    ShortRead { needed: usize, available: usize },

    #[error("error while reading input: {0}")]
    Stream(#[source] io::Error),

    #[error("invalid item size {0} for endianness conversion")]
    InvalidFieldWidth(usize),

    #[error("failed to seek to offset {offset:#x}: {source}")]
    Seek {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("could not allocate {size} bytes")]
    Allocation { size: usize },

    #[error("failed to query stream position: {0}")]
    Position(#[source] io::Error),
}

impl ReadError {
    /// Returns true if the stream simply ran out of data.
    #[inline]
    pub fn is_short_read(&self) -> bool {
        matches!(self, ReadError::ShortRead { .. })
    }
}

/// Reasons a record cannot be turned into an image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("unsupported texture format {texture_format:#x} with pixel type {pixel_type:#x}")]
    UnsupportedFormat { texture_format: u16, pixel_type: u16 },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("payload has {actual} bytes but a {width}x{height} image needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// The main error type for extraction runs.
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Header Errors ====================
    #[error("failed to read config header: {0}")]
    HeaderRead(#[source] ReadError),

    #[error(
        "config {config:#010x} is not a texture stream, please use gliden64_cache_extract for this input"
    )]
    UnsupportedContainerVariant { config: u32 },

    #[error("input type '{requested}' does not match config {config:#010x}")]
    InputKindMismatch { requested: InputKind, config: u32 },

    // ==================== Index Errors ====================
    #[error("failed to read index storage offset: {0}")]
    IndexOffsetRead(#[source] ReadError),

    #[error("failed to switch to storage index offset {offset:#x}: {source}")]
    IndexSeek {
        offset: u64,
        #[source]
        source: ReadError,
    },

    #[error("failed to read index storage size: {0}")]
    IndexCountRead(#[source] ReadError),

    #[error("failed to read storage index entry {index}: {source}")]
    IndexEntryRead {
        index: u32,
        #[source]
        source: ReadError,
    },

    #[error("failed to switch back to storage index entry {index}: {source}")]
    ResumeSeek {
        index: u32,
        #[source]
        source: ReadError,
    },

    // ==================== Record Errors ====================
    #[error("failed to switch to file position {offset:#x}: {source}")]
    RecordSeek {
        offset: u64,
        #[source]
        source: ReadError,
    },

    #[error("failed to read file {field} at {offset:#x}: {source}")]
    RecordHeaderRead {
        offset: u64,
        field: &'static str,
        #[source]
        source: ReadError,
    },

    #[error("invalid filesize 0 for texture {checksum:016X} at {offset:#x}")]
    InvalidPayloadSize { offset: u64, checksum: u64 },

    #[error("could not allocate {size} bytes for file content")]
    Allocation { size: u32 },

    #[error("failed to read {size} bytes of file content at {offset:#x}: {source}")]
    PayloadRead {
        offset: u64,
        size: u32,
        #[source]
        source: ReadError,
    },

    #[error("failed to prepare texture {checksum:016X} for export: {source}")]
    Preparation {
        checksum: u64,
        #[source]
        source: PrepareError,
    },

    // ==================== Output Errors ====================
    #[error("could not write {what}: {source}")]
    Write {
        what: String,
        #[source]
        source: io::Error,
    },

    #[error("archive is already finalized, refusing to append '{name}'")]
    ArchiveFinished { name: String },
}

/// A specialized Result type for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if this error may be skipped under the ignore-errors policy.
    ///
    /// Only a failed image preparation qualifies. Read, seek and write failures
    /// leave either the input cursor or the output stream in an unknown state.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Preparation { .. })
    }

    /// Creates a write error for the given output item.
    #[inline]
    pub fn write(what: impl Into<String>, source: io::Error) -> Self {
        Error::Write {
            what: what.into(),
            source,
        }
    }
}

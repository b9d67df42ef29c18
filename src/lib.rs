//! texstream-extract - GLideN64 texture stream extractor.
//!
//! This library reads the texture stream (`.hts`) files written by the
//! GLideN64 texture cache and repackages every cached texture as a bitmap
//! inside a tar archive. It is meant for inspecting what a cache holds.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! use texstream_extract::{extract, ExtractionOptions};
//!
//! fn main() -> texstream_extract::Result<()> {
//!     let input = BufReader::new(File::open("MUPEN64PLUS.hts").expect("input"));
//!     let output = BufWriter::new(File::create("mupen64plus.tar").expect("output"));
//!
//!     let options = ExtractionOptions {
//!         prefix: Some("MUPEN64PLUS".to_string()),
//!         ..Default::default()
//!     };
//!     let summary = extract(input, output, &options)?;
//!     println!("{} textures written", summary.written);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitmap;
pub mod converter;
pub mod error;
pub mod texcache;
pub mod util;

// Re-export main types
pub use bitmap::{BitmapMode, BitmapPreparer};
pub use converter::{EntryWriter, ImagePreparer, TarWriter};
pub use error::{Error, Result};
pub use texcache::{Header, InputKind};

use std::io::{Read, Seek, Write};

use converter::{decode_record, walk_index, ExtractionContext};
use texcache::{parse_header, FieldReader};

/// Options for an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOptions {
    /// Verbosity level (0=quiet, 1=config header, 2=record headers)
    pub verbosity: u8,
    /// Skip records whose image cannot be prepared instead of aborting
    pub ignore_errors: bool,
    /// Emit V5 bitmaps with an alpha channel
    pub bitmap_v5: bool,
    /// Prefix for archive entry names
    pub prefix: Option<String>,
    /// Expected kind of texture stream, inferred when unset
    pub input_kind: Option<InputKind>,
}

impl ExtractionOptions {
    /// Returns the bitmap flavour selected by these options.
    pub fn bitmap_mode(&self) -> BitmapMode {
        if self.bitmap_v5 {
            BitmapMode::V5
        } else {
            BitmapMode::Plain
        }
    }
}

/// Outcome of a successful extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Validated stream header
    pub header: Header,
    /// Number of index entries
    pub entries: u32,
    /// Archive entries written
    pub written: u32,
    /// Records skipped under the ignore-errors policy
    pub skipped: u32,
}

/// Extracts every texture of `input` into a tar archive written to `output`.
///
/// Output is appended as records are decoded. On error whatever was written
/// so far stays in `output`.
pub fn extract<R, W>(input: R, output: W, options: &ExtractionOptions) -> Result<ExtractionSummary>
where
    R: Read + Seek,
    W: Write,
{
    let preparer = BitmapPreparer::new(options.bitmap_mode());
    let mut writer = TarWriter::new(output);
    extract_with(input, &preparer, &mut writer, options)
}

/// Extracts with a custom image preparer and entry writer.
///
/// The writer is finalized only if every index entry was processed.
pub fn extract_with<R: Read + Seek>(
    input: R,
    preparer: &dyn ImagePreparer,
    writer: &mut dyn EntryWriter,
    options: &ExtractionOptions,
) -> Result<ExtractionSummary> {
    let mut reader = FieldReader::new(input);
    let header = parse_header(&mut reader, options.input_kind)?;

    let mut ctx = ExtractionContext::new(options, preparer, writer);
    ctx.report_header(&header);

    let stats = walk_index(&mut reader, |reader, entry| {
        decode_record(reader, &mut ctx, entry)
    })?;

    ctx.info(&format!(
        "Processed {} index entries at {:#x}: {} written, {} skipped",
        stats.entries, stats.index_offset, stats.written, stats.skipped
    ));

    ctx.writer.finish()?;

    Ok(ExtractionSummary {
        header,
        entries: stats.entries,
        written: stats.written,
        skipped: stats.skipped,
    })
}

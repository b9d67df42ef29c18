//! Decoding of a single texture record.

use std::io::{Read, Seek};

use crate::error::{Error, ReadError, Result};
use crate::texcache::{FieldReader, IndexEntry, RecordHeader, TextureRecord};
use crate::util::format_size;

use super::{ExtractionContext, PreparedImage, RecordOutcome};

/// Decodes the record an index entry points at and appends it to the archive.
///
/// Under the ignore-errors policy a record whose image cannot be prepared is
/// reported and skipped. Every other failure is returned to the caller.
pub fn decode_record<R: Read + Seek>(
    reader: &mut FieldReader<R>,
    ctx: &mut ExtractionContext<'_>,
    entry: &IndexEntry,
) -> Result<RecordOutcome> {
    let offset = entry.offset;
    reader
        .seek_absolute(offset)
        .map_err(|source| Error::RecordSeek { offset, source })?;

    let header = read_record_header(reader, offset)?;

    if ctx.dump_record_headers() {
        dump_header(ctx, entry, &header);
    }

    if header.size == 0 {
        return Err(Error::InvalidPayloadSize {
            offset,
            checksum: entry.checksum,
        });
    }

    let data = read_payload(reader, offset, header.size)?;
    let record = TextureRecord {
        checksum: entry.checksum,
        header,
        data,
    };

    let image = match prepare(ctx, record) {
        Ok(image) => image,
        Err(err) if ctx.options.ignore_errors && err.is_recoverable() => {
            ctx.warn(&format!("Skipping entry {}: {}", entry.index, err));
            return Ok(RecordOutcome::Skipped);
        }
        Err(err) => return Err(err),
    };

    let name = ctx.entry_name(entry.checksum, image.extension);
    ctx.writer.write_entry(&name, &image.data)?;
    ctx.debug(&format!(
        "Wrote {} ({})",
        name,
        format_size(image.data.len() as u64)
    ));

    Ok(RecordOutcome::Written)
}

/// Reads the fixed-size record header at the current position.
fn read_record_header<R: Read + Seek>(
    reader: &mut FieldReader<R>,
    offset: u64,
) -> Result<RecordHeader> {
    let field_err = move |field: &'static str| {
        move |source: ReadError| Error::RecordHeaderRead {
            offset,
            field,
            source,
        }
    };

    Ok(RecordHeader {
        width: reader.read_u32().map_err(field_err("width"))?,
        height: reader.read_u32().map_err(field_err("height"))?,
        format: reader.read_u32().map_err(field_err("format"))?,
        texture_format: reader.read_u16().map_err(field_err("texture_format"))?,
        pixel_type: reader.read_u16().map_err(field_err("pixel_type"))?,
        is_hires_tex: reader.read_u8().map_err(field_err("is_hires_tex"))?,
        size: reader.read_u32().map_err(field_err("size"))?,
    })
}

/// Reads exactly `size` payload bytes.
fn read_payload<R: Read + Seek>(
    reader: &mut FieldReader<R>,
    offset: u64,
    size: u32,
) -> Result<Vec<u8>> {
    reader
        .read_bytes(size as usize)
        .map_err(|source| match source {
            ReadError::Allocation { .. } => Error::Allocation { size },
            source => Error::PayloadRead {
                offset,
                size,
                source,
            },
        })
}

/// Runs the image preparer, tagging failures with the texture checksum.
fn prepare(ctx: &ExtractionContext<'_>, record: TextureRecord) -> Result<PreparedImage> {
    let checksum = record.checksum;
    ctx.preparer
        .prepare(record)
        .map_err(|source| Error::Preparation { checksum, source })
}

fn dump_header(ctx: &ExtractionContext<'_>, entry: &IndexEntry, header: &RecordHeader) {
    ctx.debug(&format!("Offset: {:#x}", entry.offset));
    ctx.debug("File header:");
    ctx.debug(&format!("\tchecksum: 0x{:016X}", entry.checksum));
    ctx.debug(&format!("\twidth: {}", header.width));
    ctx.debug(&format!("\theight: {}", header.height));
    ctx.debug(&format!("\tformat: {:#x}", header.format));
    ctx.debug(&format!("\ttexture_format: {:#x}", header.texture_format));
    ctx.debug(&format!("\tpixel_type: {:#x}", header.pixel_type));
    ctx.debug(&format!("\tis_hires_tex: {}", header.is_hires_tex));
    ctx.debug(&format!("\tsize: {}", header.size));
}

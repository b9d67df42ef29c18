//! Builders for synthetic texture streams used by tests.

use super::structs::RecordHeader;

/// Config word of a plain texture cache stream.
pub const TEX_CONFIG: u32 = 0x0010_0000;

/// Assembles a texture stream by placing byte blobs at absolute offsets.
#[derive(Debug, Default)]
pub struct StreamBuilder {
    data: Vec<u8>,
}

impl StreamBuilder {
    /// Starts a stream with the given config word and index offset.
    pub fn new(config: u32, index_offset: u64) -> Self {
        let mut builder = Self::default();
        builder.put(0, &config.to_le_bytes());
        builder.put(4, &index_offset.to_le_bytes());
        builder
    }

    /// Writes `bytes` at `offset`, zero-extending the stream if needed.
    pub fn put(&mut self, offset: u64, bytes: &[u8]) -> &mut Self {
        let start = offset as usize;
        let end = start + bytes.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(bytes);
        self
    }

    /// Writes a storage index at `offset`.
    pub fn index(&mut self, offset: u64, entries: &[(u64, u64)]) -> &mut Self {
        self.put(offset, &index_bytes(entries))
    }

    /// Writes a record at `offset`.
    pub fn record(&mut self, offset: u64, header: RecordHeader, payload: &[u8]) -> &mut Self {
        self.put(offset, &record_bytes(&header, payload))
    }

    /// Returns the assembled stream.
    pub fn build(&self) -> Vec<u8> {
        self.data.clone()
    }
}

/// Encodes a storage index.
pub fn index_bytes(entries: &[(u64, u64)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + entries.len() * 16);
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for (checksum, offset) in entries {
        out.extend_from_slice(&checksum.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out
}

/// Encodes a record header followed by its payload.
pub fn record_bytes(header: &RecordHeader, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(RecordHeader::SIZE + payload.len());
    out.extend_from_slice(&header.width.to_le_bytes());
    out.extend_from_slice(&header.height.to_le_bytes());
    out.extend_from_slice(&header.format.to_le_bytes());
    out.extend_from_slice(&header.texture_format.to_le_bytes());
    out.extend_from_slice(&header.pixel_type.to_le_bytes());
    out.push(header.is_hires_tex);
    out.extend_from_slice(&header.size.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Header of a `width` x `height` RGBA8 texture.
pub fn rgba8_header(width: u32, height: u32) -> RecordHeader {
    RecordHeader {
        width,
        height,
        format: 0x8058,
        texture_format: super::GL_RGBA,
        pixel_type: super::GL_UNSIGNED_BYTE,
        is_hires_tex: 0,
        size: width * height * 4,
    }
}

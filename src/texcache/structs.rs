//! Texture stream structures and constants.
//!
//! A texture stream starts with a u32 config word and a u64 offset of the
//! storage index. The index is a u32 count followed by `(checksum, offset)`
//! pairs, each offset pointing at one texture record.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

// =============================================================================
// Config Header
// =============================================================================

bitflags! {
    /// Texture cache configuration word stored at offset 0.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigFlags: u32 {
        /// Smoothing filters
        const SMOOTH_FILTER_MASK = 0x0000_000F;
        /// Sharpening filters
        const SHARP_FILTER_MASK = 0x0000_00F0;
        /// Texture enhancement (hqx, xbrz, ...)
        const ENHANCEMENT_MASK = 0x0000_0F00;
        /// Texture compression method
        const COMPRESSION_MASK = 0x0000_F000;
        /// Hi-res texture pack type
        const HIRESTEXTURES_MASK = 0x000F_0000;
        /// Stream holds a texture cache
        const FILE_TEXCACHE = 0x0010_0000;
        /// Stream holds a hi-res texture cache
        const FILE_HIRESTEXCACHE = 0x0020_0000;
        /// Zlib compressed texture cache
        const GZ_TEXCACHE = 0x0040_0000;
        /// Zlib compressed hi-res texture cache
        const GZ_HIRESTEXCACHE = 0x0080_0000;
        /// Texture cache was dumped
        const DUMP_TEXCACHE = 0x0100_0000;
        /// Hi-res texture cache was dumped
        const DUMP_HIRESTEXCACHE = 0x0200_0000;
        /// Hi-res textures are tiled
        const TILE_HIRESTEX = 0x0400_0000;
        /// Hi-res textures are forced to 16 bpp
        const FORCE16BPP_HIRESTEX = 0x1000_0000;
        /// Textures are forced to 16 bpp
        const FORCE16BPP_TEX = 0x2000_0000;
        /// Hi-res textures keep their own alpha
        const LET_TEXARTISTS_FLY = 0x4000_0000;
        /// Texture dumping enabled
        const DUMP_TEX = 0x8000_0000;

        const _ = !0;
    }
}

impl ConfigFlags {
    /// Capability bits marking a file-backed texture stream.
    pub const FILE_CACHE_MASK: Self = Self::FILE_TEXCACHE.union(Self::FILE_HIRESTEXCACHE);

    /// Returns true if any texture stream capability bit is set.
    #[inline]
    pub fn is_texture_stream(&self) -> bool {
        self.intersects(Self::FILE_CACHE_MASK)
    }

    /// Returns the selected smoothing filter (0 = none).
    #[inline]
    pub fn smooth_filter(&self) -> u32 {
        self.bits() & Self::SMOOTH_FILTER_MASK.bits()
    }

    /// Returns the selected sharpening filter (0 = none).
    #[inline]
    pub fn sharp_filter(&self) -> u32 {
        (self.bits() & Self::SHARP_FILTER_MASK.bits()) >> 4
    }

    /// Returns the enhancement method (0 = none).
    #[inline]
    pub fn enhancement(&self) -> u32 {
        (self.bits() & Self::ENHANCEMENT_MASK.bits()) >> 8
    }

    /// Returns the compression method (0 = none).
    #[inline]
    pub fn compression(&self) -> u32 {
        (self.bits() & Self::COMPRESSION_MASK.bits()) >> 12
    }

    /// Returns the hi-res texture pack type (0 = none).
    #[inline]
    pub fn hires_textures(&self) -> u32 {
        (self.bits() & Self::HIRESTEXTURES_MASK.bits()) >> 16
    }
}

/// Which kind of texture stream the input is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Hi-res texture pack cache
    Hires,
    /// Runtime texture cache
    Tex,
}

impl InputKind {
    /// Returns the config bit identifying this kind.
    #[inline]
    pub fn flag(&self) -> ConfigFlags {
        match self {
            InputKind::Hires => ConfigFlags::FILE_HIRESTEXCACHE,
            InputKind::Tex => ConfigFlags::FILE_TEXCACHE,
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Hires => f.write_str("hires"),
            InputKind::Tex => f.write_str("tex"),
        }
    }
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("hires") {
            Ok(InputKind::Hires)
        } else if s.eq_ignore_ascii_case("tex") {
            Ok(InputKind::Tex)
        } else {
            Err(format!("invalid type {s}, expected 'hires' or 'tex'"))
        }
    }
}

// =============================================================================
// Index and Records
// =============================================================================

/// One entry of the storage index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Position of the entry within the index
    pub index: u32,
    /// Opaque texture checksum
    pub checksum: u64,
    /// Absolute offset of the texture record
    pub offset: u64,
}

/// Fixed-size part of a texture record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordHeader {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// GL internal format
    pub format: u32,
    /// GL pixel format
    pub texture_format: u16,
    /// GL pixel type
    pub pixel_type: u16,
    /// Non-zero for hi-res pack textures
    pub is_hires_tex: u8,
    /// Payload length in bytes
    pub size: u32,
}

impl RecordHeader {
    /// Encoded size of the header in bytes.
    pub const SIZE: usize = 4 + 4 + 4 + 2 + 2 + 1 + 4;
}

/// A fully read texture record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRecord {
    /// Checksum taken from the index entry
    pub checksum: u64,
    /// Record header fields
    pub header: RecordHeader,
    /// Raw pixel data, exactly `header.size` bytes
    pub data: Vec<u8>,
}

// =============================================================================
// GL Constants
// =============================================================================

/// `GL_UNSIGNED_BYTE`
pub const GL_UNSIGNED_BYTE: u16 = 0x1401;
/// `GL_RGB`
pub const GL_RGB: u16 = 0x1907;
/// `GL_RGBA`
pub const GL_RGBA: u16 = 0x1908;
/// `GL_UNSIGNED_SHORT_4_4_4_4`
pub const GL_UNSIGNED_SHORT_4_4_4_4: u16 = 0x8033;
/// `GL_UNSIGNED_SHORT_5_5_5_1`
pub const GL_UNSIGNED_SHORT_5_5_5_1: u16 = 0x8034;
/// `GL_UNSIGNED_SHORT_5_6_5`
pub const GL_UNSIGNED_SHORT_5_6_5: u16 = 0x8363;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_stream_bits() {
        assert!(ConfigFlags::from_bits_retain(0x0010_0000).is_texture_stream());
        assert!(ConfigFlags::from_bits_retain(0x0020_0000).is_texture_stream());
        assert!(!ConfigFlags::from_bits_retain(0x0040_0000).is_texture_stream());
        assert!(!ConfigFlags::from_bits_retain(0).is_texture_stream());
    }

    #[test]
    fn test_config_fields() {
        let flags = ConfigFlags::from_bits_retain(0x0003_2412);
        assert_eq!(flags.smooth_filter(), 2);
        assert_eq!(flags.sharp_filter(), 1);
        assert_eq!(flags.enhancement(), 4);
        assert_eq!(flags.compression(), 2);
        assert_eq!(flags.hires_textures(), 3);
    }

    #[test]
    fn test_input_kind_parse() {
        assert_eq!("hires".parse::<InputKind>().unwrap(), InputKind::Hires);
        assert_eq!("TEX".parse::<InputKind>().unwrap(), InputKind::Tex);
        assert_eq!("HiRes".parse::<InputKind>().unwrap(), InputKind::Hires);
        assert!("png".parse::<InputKind>().is_err());
        assert_eq!(InputKind::Tex.to_string(), "tex");
    }

    #[test]
    fn test_record_header_size() {
        assert_eq!(RecordHeader::SIZE, 21);
    }
}

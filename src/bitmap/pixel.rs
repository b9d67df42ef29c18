//! GL pixel layouts and their conversion to RGBA8.

use byteorder::{ByteOrder, LittleEndian};

use crate::texcache::{
    GL_RGB, GL_RGBA, GL_UNSIGNED_BYTE, GL_UNSIGNED_SHORT_4_4_4_4, GL_UNSIGNED_SHORT_5_5_5_1,
    GL_UNSIGNED_SHORT_5_6_5,
};

/// Pixel layouts found in texture streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// `GL_RGBA` + `GL_UNSIGNED_BYTE`
    Rgba8,
    /// `GL_RGB` + `GL_UNSIGNED_BYTE`
    Rgb8,
    /// `GL_RGBA` + `GL_UNSIGNED_SHORT_4_4_4_4`
    Rgba4444,
    /// `GL_RGBA` + `GL_UNSIGNED_SHORT_5_5_5_1`
    Rgba5551,
    /// `GL_RGB` + `GL_UNSIGNED_SHORT_5_6_5`
    Rgb565,
}

impl PixelLayout {
    /// Looks up the layout for a GL format/type pair.
    pub fn from_gl(texture_format: u16, pixel_type: u16) -> Option<Self> {
        match (texture_format, pixel_type) {
            (GL_RGBA, GL_UNSIGNED_BYTE) => Some(PixelLayout::Rgba8),
            (GL_RGB, GL_UNSIGNED_BYTE) => Some(PixelLayout::Rgb8),
            (GL_RGBA, GL_UNSIGNED_SHORT_4_4_4_4) => Some(PixelLayout::Rgba4444),
            (GL_RGBA, GL_UNSIGNED_SHORT_5_5_5_1) => Some(PixelLayout::Rgba5551),
            (GL_RGB, GL_UNSIGNED_SHORT_5_6_5) => Some(PixelLayout::Rgb565),
            _ => None,
        }
    }

    /// Returns the number of bytes one pixel occupies.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelLayout::Rgba8 => 4,
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba4444 | PixelLayout::Rgba5551 | PixelLayout::Rgb565 => 2,
        }
    }

    /// Decodes one pixel to `[r, g, b, a]`.
    ///
    /// Packed 16-bit pixels are little-endian with red in the most
    /// significant bits.
    #[inline]
    pub fn decode(&self, px: &[u8]) -> [u8; 4] {
        match self {
            PixelLayout::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelLayout::Rgb8 => [px[0], px[1], px[2], 0xFF],
            PixelLayout::Rgba4444 => {
                let v = LittleEndian::read_u16(px);
                [
                    expand4((v >> 12) as u8),
                    expand4((v >> 8) as u8),
                    expand4((v >> 4) as u8),
                    expand4(v as u8),
                ]
            }
            PixelLayout::Rgba5551 => {
                let v = LittleEndian::read_u16(px);
                [
                    expand5((v >> 11) as u8),
                    expand5((v >> 6) as u8),
                    expand5((v >> 1) as u8),
                    if v & 1 != 0 { 0xFF } else { 0 },
                ]
            }
            PixelLayout::Rgb565 => {
                let v = LittleEndian::read_u16(px);
                [
                    expand5((v >> 11) as u8),
                    expand6((v >> 5) as u8),
                    expand5(v as u8),
                    0xFF,
                ]
            }
        }
    }
}

#[inline(always)]
fn expand4(v: u8) -> u8 {
    (v & 0x0F) * 0x11
}

#[inline(always)]
fn expand5(v: u8) -> u8 {
    let v = v & 0x1F;
    (v << 3) | (v >> 2)
}

#[inline(always)]
fn expand6(v: u8) -> u8 {
    let v = v & 0x3F;
    (v << 2) | (v >> 4)
}

//! Windows bitmap headers.
//!
//! All fields are little-endian on disk. The `zerocopy` byteorder types keep
//! every field at alignment 1, so the structs have no padding and serialize
//! with `as_bytes()`.

use zerocopy::byteorder::little_endian::{I32, U16, U32};
use zerocopy::{Immutable, IntoBytes, KnownLayout};

/// `BM` signature.
pub const BMP_MAGIC: [u8; 2] = *b"BM";

/// Uncompressed pixels.
pub const BI_RGB: u32 = 0;
/// Uncompressed pixels described by channel masks.
pub const BI_BITFIELDS: u32 = 3;

/// `sRGB` colour space tag.
pub const LCS_SRGB: u32 = 0x7352_4742;
/// Rendering intent for photographic images.
pub const LCS_GM_IMAGES: u32 = 4;

/// 72 DPI expressed in pixels per metre.
pub const PIXELS_PER_METRE: i32 = 2835;

/// `BITMAPFILEHEADER`
#[derive(Debug, Clone, Copy, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct BitmapFileHeader {
    /// Always `BM`
    pub magic: [u8; 2],
    /// Size of the whole file
    pub file_size: U32,
    /// Reserved
    pub reserved1: U16,
    /// Reserved
    pub reserved2: U16,
    /// Offset of the pixel array
    pub pixel_offset: U32,
}

impl BitmapFileHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 14;

    /// Creates a file header for a bitmap with the given layout.
    pub fn new(pixel_offset: u32, file_size: u32) -> Self {
        Self {
            magic: BMP_MAGIC,
            file_size: U32::new(file_size),
            reserved1: U16::new(0),
            reserved2: U16::new(0),
            pixel_offset: U32::new(pixel_offset),
        }
    }
}

/// `BITMAPINFOHEADER`
#[derive(Debug, Clone, Copy, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct BitmapInfoHeader {
    /// Size of this header (or of the extended header embedding it)
    pub header_size: U32,
    /// Width in pixels
    pub width: I32,
    /// Height in pixels, positive for bottom-up rows
    pub height: I32,
    /// Always 1
    pub planes: U16,
    /// Bits per pixel
    pub bit_count: U16,
    /// `BI_RGB` or `BI_BITFIELDS`
    pub compression: U32,
    /// Size of the pixel array
    pub image_size: U32,
    /// Horizontal resolution
    pub x_pixels_per_metre: I32,
    /// Vertical resolution
    pub y_pixels_per_metre: I32,
    /// Palette entries used
    pub colors_used: U32,
    /// Palette entries required
    pub colors_important: U32,
}

impl BitmapInfoHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 40;

    /// Creates an info header for an uncompressed bottom-up image.
    pub fn new(
        header_size: usize,
        width: i32,
        height: i32,
        bit_count: u16,
        compression: u32,
        image_size: u32,
    ) -> Self {
        Self {
            header_size: U32::new(header_size as u32),
            width: I32::new(width),
            height: I32::new(height),
            planes: U16::new(1),
            bit_count: U16::new(bit_count),
            compression: U32::new(compression),
            image_size: U32::new(image_size),
            x_pixels_per_metre: I32::new(PIXELS_PER_METRE),
            y_pixels_per_metre: I32::new(PIXELS_PER_METRE),
            colors_used: U32::new(0),
            colors_important: U32::new(0),
        }
    }
}

/// `BITMAPV5HEADER`
#[derive(Debug, Clone, Copy, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct BitmapV5Header {
    /// Leading `BITMAPINFOHEADER` fields
    pub info: BitmapInfoHeader,
    /// Red channel mask
    pub red_mask: U32,
    /// Green channel mask
    pub green_mask: U32,
    /// Blue channel mask
    pub blue_mask: U32,
    /// Alpha channel mask
    pub alpha_mask: U32,
    /// Colour space tag
    pub cs_type: U32,
    /// CIE endpoints, unused for sRGB
    pub endpoints: [u8; 36],
    /// Red gamma, unused for sRGB
    pub gamma_red: U32,
    /// Green gamma, unused for sRGB
    pub gamma_green: U32,
    /// Blue gamma, unused for sRGB
    pub gamma_blue: U32,
    /// Rendering intent
    pub intent: U32,
    /// Offset of an embedded profile
    pub profile_data: U32,
    /// Size of an embedded profile
    pub profile_size: U32,
    /// Reserved
    pub reserved: U32,
}

impl BitmapV5Header {
    /// Size of the header in bytes.
    pub const SIZE: usize = 124;

    /// Creates a 32 bpp BGRA header with an alpha mask.
    pub fn new_bgra(width: i32, height: i32, image_size: u32) -> Self {
        Self {
            info: BitmapInfoHeader::new(Self::SIZE, width, height, 32, BI_BITFIELDS, image_size),
            red_mask: U32::new(0x00FF_0000),
            green_mask: U32::new(0x0000_FF00),
            blue_mask: U32::new(0x0000_00FF),
            alpha_mask: U32::new(0xFF00_0000),
            cs_type: U32::new(LCS_SRGB),
            endpoints: [0; 36],
            gamma_red: U32::new(0),
            gamma_green: U32::new(0),
            gamma_blue: U32::new(0),
            intent: U32::new(LCS_GM_IMAGES),
            profile_data: U32::new(0),
            profile_size: U32::new(0),
            reserved: U32::new(0),
        }
    }
}

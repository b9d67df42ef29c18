//! Conversion of texture records to Windows bitmaps.
//!
//! Two variants are produced:
//!
//! - **Plain**: `BITMAPINFOHEADER`, 24 bpp, alpha dropped. Readable by
//!   anything that reads BMP.
//! - **V5**: `BITMAPV5HEADER`, 32 bpp with an alpha mask, which ImageMagick
//!   and most editors load as an alpha channel.
//!
//! Rows are written bottom-up; row 0 of the payload is the top of the image.

mod pixel;
mod structs;

pub use pixel::*;
pub use structs::*;

use zerocopy::IntoBytes;

use crate::converter::{ImagePreparer, PreparedImage};
use crate::error::PrepareError;
use crate::texcache::TextureRecord;
use crate::util::align_up;

/// Bitmap flavour to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapMode {
    /// 24 bpp without alpha
    #[default]
    Plain,
    /// 32 bpp `BITMAPV5HEADER` with alpha
    V5,
}

/// Image preparer producing `.bmp` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapPreparer {
    mode: BitmapMode,
}

impl BitmapPreparer {
    /// Creates a preparer for the given bitmap flavour.
    pub fn new(mode: BitmapMode) -> Self {
        Self { mode }
    }
}

impl ImagePreparer for BitmapPreparer {
    fn prepare(&self, record: TextureRecord) -> Result<PreparedImage, PrepareError> {
        let header = &record.header;
        let layout = PixelLayout::from_gl(header.texture_format, header.pixel_type).ok_or(
            PrepareError::UnsupportedFormat {
                texture_format: header.texture_format,
                pixel_type: header.pixel_type,
            },
        )?;

        let data = encode_bitmap(
            self.mode,
            layout,
            header.width,
            header.height,
            &record.data,
        )?;

        Ok(PreparedImage {
            data,
            extension: "bmp",
        })
    }
}

/// Encodes raw pixels of the given layout as a complete BMP file.
pub fn encode_bitmap(
    mode: BitmapMode,
    layout: PixelLayout,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<Vec<u8>, PrepareError> {
    let invalid = PrepareError::InvalidDimensions { width, height };
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(invalid);
    }

    let src_stride = (width as usize)
        .checked_mul(layout.bytes_per_pixel())
        .ok_or_else(|| invalid.clone())?;
    let expected = src_stride
        .checked_mul(height as usize)
        .ok_or_else(|| invalid.clone())?;
    if pixels.len() != expected {
        return Err(PrepareError::SizeMismatch {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }

    let (header_size, dst_bpp) = match mode {
        BitmapMode::Plain => (BitmapInfoHeader::SIZE, 3u64),
        BitmapMode::V5 => (BitmapV5Header::SIZE, 4u64),
    };
    let dst_stride = align_up(width as u64 * dst_bpp, 4);
    let image_size = dst_stride * height as u64;
    let pixel_offset = (BitmapFileHeader::SIZE + header_size) as u64;
    let file_size = pixel_offset + image_size;
    if file_size > u32::MAX as u64 {
        return Err(invalid);
    }

    let mut out = Vec::with_capacity(file_size as usize);
    out.extend_from_slice(BitmapFileHeader::new(pixel_offset as u32, file_size as u32).as_bytes());
    match mode {
        BitmapMode::Plain => {
            let info = BitmapInfoHeader::new(
                BitmapInfoHeader::SIZE,
                width as i32,
                height as i32,
                24,
                BI_RGB,
                image_size as u32,
            );
            out.extend_from_slice(info.as_bytes());
        }
        BitmapMode::V5 => {
            let v5 = BitmapV5Header::new_bgra(width as i32, height as i32, image_size as u32);
            out.extend_from_slice(v5.as_bytes());
        }
    }

    let bpp = layout.bytes_per_pixel();
    let row_padding = dst_stride as usize - width as usize * dst_bpp as usize;
    for row in pixels.chunks_exact(src_stride).rev() {
        for px in row.chunks_exact(bpp) {
            let [r, g, b, a] = layout.decode(px);
            match mode {
                BitmapMode::Plain => out.extend_from_slice(&[b, g, r]),
                BitmapMode::V5 => out.extend_from_slice(&[b, g, r, a]),
            }
        }
        out.resize(out.len() + row_padding, 0);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texcache::{
        RecordHeader, GL_RGB, GL_RGBA, GL_UNSIGNED_BYTE, GL_UNSIGNED_SHORT_5_6_5,
    };

    fn record(
        width: u32,
        height: u32,
        texture_format: u16,
        pixel_type: u16,
        data: Vec<u8>,
    ) -> TextureRecord {
        TextureRecord {
            checksum: 0x1234,
            header: RecordHeader {
                width,
                height,
                format: 0,
                texture_format,
                pixel_type,
                is_hires_tex: 0,
                size: data.len() as u32,
            },
            data,
        }
    }

    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_plain_bitmap_layout() {
        // 3x2 RGBA: top row red, bottom row blue
        let mut pixels = Vec::new();
        for _ in 0..3 {
            pixels.extend_from_slice(&[0xFF, 0, 0, 0x80]);
        }
        for _ in 0..3 {
            pixels.extend_from_slice(&[0, 0, 0xFF, 0x80]);
        }

        let prepared = BitmapPreparer::new(BitmapMode::Plain)
            .prepare(record(3, 2, GL_RGBA, GL_UNSIGNED_BYTE, pixels))
            .unwrap();
        assert_eq!(prepared.extension, "bmp");

        let bmp = prepared.data;
        // 3 px * 3 bytes = 9, padded to 12 per row
        assert_eq!(bmp.len(), 14 + 40 + 24);
        assert_eq!(&bmp[0..2], b"BM");
        assert_eq!(read_u32(&bmp, 2), bmp.len() as u32);
        assert_eq!(read_u32(&bmp, 10), 54);
        assert_eq!(read_u32(&bmp, 14), 40);

        // First stored row is the bottom (blue) row, in BGR order.
        assert_eq!(&bmp[54..57], &[0xFF, 0, 0]);
        assert_eq!(&bmp[63..66], &[0, 0, 0]);
        // Second stored row is the top (red) row.
        assert_eq!(&bmp[66..69], &[0, 0, 0xFF]);
    }

    #[test]
    fn test_v5_keeps_alpha() {
        let pixels = vec![0x10, 0x20, 0x30, 0x40];
        let bmp = BitmapPreparer::new(BitmapMode::V5)
            .prepare(record(1, 1, GL_RGBA, GL_UNSIGNED_BYTE, pixels))
            .unwrap()
            .data;

        assert_eq!(bmp.len(), 14 + 124 + 4);
        assert_eq!(read_u32(&bmp, 10), 138);
        assert_eq!(read_u32(&bmp, 14), 124);
        assert_eq!(&bmp[138..142], &[0x30, 0x20, 0x10, 0x40]);
    }

    #[test]
    fn test_rgb565() {
        let pixels = 0xF800u16.to_le_bytes().to_vec();
        let bmp = BitmapPreparer::default()
            .prepare(record(1, 1, GL_RGB, GL_UNSIGNED_SHORT_5_6_5, pixels))
            .unwrap()
            .data;
        assert_eq!(&bmp[54..58], &[0, 0, 0xFF, 0]);
    }

    #[test]
    fn test_unsupported_format() {
        let err = BitmapPreparer::default()
            .prepare(record(1, 1, 0x1903, GL_UNSIGNED_BYTE, vec![0]))
            .unwrap_err();
        assert_eq!(
            err,
            PrepareError::UnsupportedFormat {
                texture_format: 0x1903,
                pixel_type: GL_UNSIGNED_BYTE
            }
        );
    }

    #[test]
    fn test_size_mismatch() {
        let err = BitmapPreparer::default()
            .prepare(record(2, 2, GL_RGBA, GL_UNSIGNED_BYTE, vec![0; 12]))
            .unwrap_err();
        assert_eq!(
            err,
            PrepareError::SizeMismatch {
                width: 2,
                height: 2,
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn test_zero_dimensions() {
        let err = BitmapPreparer::default()
            .prepare(record(0, 4, GL_RGBA, GL_UNSIGNED_BYTE, vec![0; 4]))
            .unwrap_err();
        assert!(matches!(err, PrepareError::InvalidDimensions { .. }));
    }
}

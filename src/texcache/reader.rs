//! Endian-aware field reader over a seekable stream.
//!
//! All multi-byte fields of a texture stream are stored little-endian. The
//! reader decodes them with `byteorder` so results do not depend on the host.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::ReadError;

/// Result type for byte reader operations.
pub type ReadResult<T> = std::result::Result<T, ReadError>;

/// Largest buffer reserved up front by [`FieldReader::read_bytes`].
const PREALLOC_LIMIT: usize = 16 * 1024 * 1024;

/// Fixed-width field reader.
///
/// Wrap the input in a `BufReader` when it is a file; the reader itself does
/// no buffering and forwards seeks unchanged.
#[derive(Debug)]
pub struct FieldReader<R> {
    inner: R,
}

impl<R: Read + Seek> FieldReader<R> {
    /// Creates a reader over the given stream.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads a little-endian field of `width` bytes.
    ///
    /// Width 1 is returned as is. Widths other than 1, 2, 4 and 8 are rejected
    /// before anything is consumed.
    pub fn read_field(&mut self, width: usize) -> ReadResult<u64> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(ReadError::InvalidFieldWidth(width));
        }

        let mut buf = [0u8; 8];
        self.read_into(&mut buf[..width])?;

        let value = match width {
            1 => buf[0] as u64,
            2 => LittleEndian::read_u16(&buf) as u64,
            4 => LittleEndian::read_u32(&buf) as u64,
            _ => LittleEndian::read_u64(&buf),
        };
        Ok(value)
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        self.read_field(1).map(|v| v as u8)
    }

    /// Reads a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_field(2).map(|v| v as u16)
    }

    /// Reads a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_field(4).map(|v| v as u32)
    }

    /// Reads a little-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> ReadResult<u64> {
        self.read_field(8)
    }

    /// Fills `buf` completely from the current position.
    ///
    /// On a short read the cursor has advanced past whatever was available and
    /// the contents of `buf` are unspecified.
    pub fn read_into(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        let needed = buf.len();
        let mut filled = 0;

        while filled < needed {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(ReadError::ShortRead {
                        needed,
                        available: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(ReadError::Stream(e)),
            }
        }

        Ok(())
    }

    /// Reads exactly `len` bytes into a new buffer.
    ///
    /// The buffer grows with the data actually read, so a bogus length costs
    /// no more memory than the stream can supply.
    pub fn read_bytes(&mut self, len: usize) -> ReadResult<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len.min(PREALLOC_LIMIT))
            .map_err(|_| ReadError::Allocation { size: len })?;

        // read_to_end retries on Interrupted
        match (&mut self.inner).take(len as u64).read_to_end(&mut buf) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::OutOfMemory => {
                return Err(ReadError::Allocation { size: len })
            }
            Err(e) => return Err(ReadError::Stream(e)),
        }

        if buf.len() < len {
            return Err(ReadError::ShortRead {
                needed: len,
                available: buf.len(),
            });
        }
        Ok(buf)
    }

    /// Moves the cursor to an absolute offset.
    pub fn seek_absolute(&mut self, offset: u64) -> ReadResult<()> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|source| ReadError::Seek { offset, source })
    }

    /// Returns the absolute cursor position.
    pub fn position(&mut self) -> ReadResult<u64> {
        self.inner.stream_position().map_err(ReadError::Position)
    }
}

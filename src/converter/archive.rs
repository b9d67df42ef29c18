//! Streamed ustar output.
//!
//! Entries are appended strictly in order and never revisited, so the output
//! can be a pipe. Headers are encoded with the `tar` crate; data is padded to
//! the 512-byte block size and the archive ends with two zero blocks.

use std::io::Write;

use tar::{EntryType, Header};

use crate::error::{Error, Result};
use crate::util::padding_for;

use super::EntryWriter;

/// Size of one tar block.
pub const BLOCK_SIZE: usize = 512;

/// Permission bits of extracted files.
const ENTRY_MODE: u32 = 0o644;

const ZERO_BLOCK: [u8; BLOCK_SIZE] = [0; BLOCK_SIZE];

/// Tar archive writer over any byte sink.
#[derive(Debug)]
pub struct TarWriter<W: Write> {
    out: W,
    entries: usize,
    bytes_written: u64,
    finished: bool,
}

impl<W: Write> TarWriter<W> {
    /// Creates a writer appending to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: 0,
            bytes_written: 0,
            finished: false,
        }
    }

    /// Returns the number of entries written so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Returns the number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the writer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_block(&mut self, data: &[u8], what: &str) -> Result<()> {
        self.out
            .write_all(data)
            .map_err(|e| Error::write(what, e))?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }
}

impl<W: Write> EntryWriter for TarWriter<W> {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if self.finished {
            return Err(Error::ArchiveFinished {
                name: name.to_string(),
            });
        }

        let header = entry_header(name, data.len() as u64)?;
        self.write_block(header.as_bytes(), &format!("tar header for {name}"))?;
        self.write_block(data, &format!("file content of {name}"))?;

        let padding = padding_for(data.len() as u64, BLOCK_SIZE as u64) as usize;
        self.write_block(&ZERO_BLOCK[..padding], &format!("tar padding for {name}"))?;

        self.entries += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        self.write_block(&ZERO_BLOCK, "first EOF tar record")?;
        self.write_block(&ZERO_BLOCK, "second EOF tar record")?;
        self.out
            .flush()
            .map_err(|e| Error::write("archive trailer", e))?;

        self.finished = true;
        Ok(())
    }
}

/// Builds the ustar header of a regular file.
fn entry_header(name: &str, size: u64) -> Result<Header> {
    let mut header = Header::new_ustar();
    header
        .set_path(name)
        .map_err(|e| Error::write(format!("tar header for {name}"), e))?;
    header.set_entry_type(EntryType::Regular);
    header.set_size(size);
    header.set_mode(ENTRY_MODE);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_cksum();
    Ok(header)
}

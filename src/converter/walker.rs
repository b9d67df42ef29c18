//! Storage index traversal.
//!
//! The index is read strictly in file order, but every entry sends the cursor
//! somewhere else to decode its record. The position right after each entry
//! is saved before the detour and restored afterwards.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::texcache::{FieldReader, IndexEntry};

use super::RecordOutcome;

/// Counters collected while walking the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Absolute offset of the storage index
    pub index_offset: u64,
    /// Number of entries in the index
    pub entries: u32,
    /// Records written to the archive
    pub written: u32,
    /// Records skipped after a preparation failure
    pub skipped: u32,
}

/// Walks the storage index, calling `visit` once per entry.
///
/// The reader must be positioned at the index offset field, directly after
/// the config header. The first error returned by `visit` aborts the walk.
pub fn walk_index<R, F>(reader: &mut FieldReader<R>, mut visit: F) -> Result<IndexStats>
where
    R: Read + Seek,
    F: FnMut(&mut FieldReader<R>, &IndexEntry) -> Result<RecordOutcome>,
{
    let index_offset = reader.read_u64().map_err(Error::IndexOffsetRead)?;

    reader
        .seek_absolute(index_offset)
        .map_err(|source| Error::IndexSeek {
            offset: index_offset,
            source,
        })?;

    let count = reader.read_u32().map_err(Error::IndexCountRead)?;

    let mut stats = IndexStats {
        index_offset,
        entries: count,
        ..Default::default()
    };

    for index in 0..count {
        let entry = read_entry(reader, index)?;

        let resume_pos = reader
            .position()
            .map_err(|source| Error::ResumeSeek { index, source })?;

        match visit(reader, &entry)? {
            RecordOutcome::Written => stats.written += 1,
            RecordOutcome::Skipped => stats.skipped += 1,
        }

        reader
            .seek_absolute(resume_pos)
            .map_err(|source| Error::ResumeSeek { index, source })?;
    }

    Ok(stats)
}

fn read_entry<R: Read + Seek>(reader: &mut FieldReader<R>, index: u32) -> Result<IndexEntry> {
    let checksum = reader
        .read_u64()
        .map_err(|source| Error::IndexEntryRead { index, source })?;
    let offset = reader
        .read_u64()
        .map_err(|source| Error::IndexEntryRead { index, source })?;

    Ok(IndexEntry {
        index,
        checksum,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, SeekFrom};

    use super::*;
    use crate::texcache::testing::{StreamBuilder, TEX_CONFIG};

    fn reader_after_header(data: Vec<u8>) -> FieldReader<Cursor<Vec<u8>>> {
        let mut reader = FieldReader::new(Cursor::new(data));
        reader.read_u32().unwrap();
        reader
    }

    #[test]
    fn test_cursor_restored_after_each_detour() {
        let entries = [(0xA, 0x400), (0xB, 0x10), (0xC, 0x9000)];
        let data = StreamBuilder::new(TEX_CONFIG, 0x100)
            .index(0x100, &entries)
            .put(0x9000, &[0])
            .build();

        let mut reader = reader_after_header(data);
        let mut seen = Vec::new();
        let stats = walk_index(&mut reader, |r, entry| {
            // Position before the detour is just past this entry.
            let expected = 0x100 + 4 + 16 * (entry.index as u64 + 1);
            assert_eq!(r.position().unwrap(), expected);
            seen.push((entry.checksum, entry.offset));
            r.seek_absolute(entry.offset).unwrap();
            r.read_u8().unwrap_or_default();
            Ok(RecordOutcome::Written)
        })
        .unwrap();

        assert_eq!(seen, entries.to_vec());
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.written, 3);
        assert_eq!(stats.index_offset, 0x100);
        assert_eq!(reader.position().unwrap(), 0x100 + 4 + 16 * 3);
    }

    #[test]
    fn test_counts_skips() {
        let data = StreamBuilder::new(TEX_CONFIG, 12)
            .index(12, &[(1, 0), (2, 0), (3, 0)])
            .build();

        let mut reader = reader_after_header(data);
        let stats = walk_index(&mut reader, |_, entry| {
            Ok(if entry.checksum == 2 {
                RecordOutcome::Skipped
            } else {
                RecordOutcome::Written
            })
        })
        .unwrap();
        assert_eq!((stats.written, stats.skipped), (2, 1));
    }

    #[test]
    fn test_visit_error_aborts() {
        let data = StreamBuilder::new(TEX_CONFIG, 12)
            .index(12, &[(1, 0), (2, 0), (3, 0)])
            .build();

        let mut reader = reader_after_header(data);
        let mut calls = 0;
        let err = walk_index(&mut reader, |_, entry| {
            calls += 1;
            if entry.index == 1 {
                Err(Error::InvalidPayloadSize {
                    offset: entry.offset,
                    checksum: entry.checksum,
                })
            } else {
                Ok(RecordOutcome::Written)
            }
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPayloadSize { checksum: 2, .. }));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_truncated_index() {
        // Missing index offset
        let mut reader = reader_after_header(TEX_CONFIG.to_le_bytes().to_vec());
        let err = walk_index(&mut reader, |_, _| Ok(RecordOutcome::Written)).unwrap_err();
        assert!(matches!(err, Error::IndexOffsetRead(_)));

        // Index offset past the end
        let data = StreamBuilder::new(TEX_CONFIG, 0x1000).build();
        let mut reader = reader_after_header(data);
        let err = walk_index(&mut reader, |_, _| Ok(RecordOutcome::Written)).unwrap_err();
        assert!(matches!(err, Error::IndexCountRead(_)));

        // Count says two, only one and a half entries present
        let mut data = StreamBuilder::new(TEX_CONFIG, 12)
            .index(12, &[(1, 0), (2, 0)])
            .build();
        data.truncate(data.len() - 8);
        let mut reader = reader_after_header(data);
        let mut calls = 0;
        let err = walk_index(&mut reader, |_, _| {
            calls += 1;
            Ok(RecordOutcome::Written)
        })
        .unwrap_err();
        assert!(matches!(err, Error::IndexEntryRead { index: 1, .. }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_empty_index() {
        let data = StreamBuilder::new(TEX_CONFIG, 12).index(12, &[]).build();
        let mut reader = reader_after_header(data);
        let stats = walk_index(&mut reader, |_, _| unreachable!()).unwrap();
        assert_eq!(stats.entries, 0);
    }

    /// Cursor whose `fail_at`-th seek (1-based) fails.
    struct SeekFailure {
        inner: Cursor<Vec<u8>>,
        seeks: usize,
        fail_at: usize,
    }

    impl SeekFailure {
        fn new(data: Vec<u8>, fail_at: usize) -> Self {
            Self {
                inner: Cursor::new(data),
                seeks: 0,
                fail_at,
            }
        }
    }

    impl Read for SeekFailure {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Seek for SeekFailure {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.seeks += 1;
            if self.seeks == self.fail_at {
                return Err(io::Error::other("seek failed"));
            }
            self.inner.seek(pos)
        }

        fn stream_position(&mut self) -> io::Result<u64> {
            self.inner.stream_position()
        }
    }

    fn seek_failing_reader(fail_at: usize) -> FieldReader<SeekFailure> {
        let data = StreamBuilder::new(TEX_CONFIG, 12)
            .index(12, &[(1, 0), (2, 0)])
            .build();
        let mut reader = FieldReader::new(SeekFailure::new(data, fail_at));
        reader.read_u32().unwrap();
        reader
    }

    #[test]
    fn test_index_seek_failure() {
        let mut reader = seek_failing_reader(1);
        let mut calls = 0;
        let err = walk_index(&mut reader, |_, _| {
            calls += 1;
            Ok(RecordOutcome::Written)
        })
        .unwrap_err();
        assert!(matches!(err, Error::IndexSeek { offset: 12, .. }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_resume_seek_failure_stops_walk() {
        // Seek 1 goes to the index, seek 2 restores after the first entry.
        let mut reader = seek_failing_reader(2);
        let mut calls = 0;
        let err = walk_index(&mut reader, |_, _| {
            calls += 1;
            Ok(RecordOutcome::Written)
        })
        .unwrap_err();
        assert!(matches!(err, Error::ResumeSeek { index: 0, .. }));
        assert_eq!(calls, 1);
    }
}

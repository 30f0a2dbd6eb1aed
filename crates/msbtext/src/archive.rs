//! MPK archive reading: the container that MSB scripts ship inside.
//!
//! The whole archive is held in memory and entries are served as raw
//! slices. Layout (all fields little-endian):
//!
//! ```text
//! offset 0    magic b"MPK\0"
//! offset 4    version_minor u16, version_major u16
//! offset 8    entry_count u64
//! offset 64   entry table: entry_count x 256-byte records
//!             { compressed u32, id u32, offset u64, size u64,
//!               actual_size u64, filename: 224 bytes NUL-terminated }
//! ```
//!
//! Decompression is a non-goal: compressed entries are served as-is with a
//! logged warning.

use bstr::ByteSlice;

use crate::error::DocumentError;

/// Format tag at the start of every MPK archive.
pub const MPK_MAGIC: [u8; 4] = *b"MPK\0";

const CONTAINER: &str = "MPK";
const HEADER_LEN: usize = 16;
const FIRST_ENTRY_OFFSET: usize = 64;
const ENTRY_LEN: usize = 256;
const FILENAME_LEN: usize = 224;

/// One archived file's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpkEntry {
    /// Numeric entry id from the table.
    pub id: u32,
    /// Whether the entry is stored compressed (served as-is either way).
    pub compressed: bool,
    /// Byte offset of the entry data within the archive.
    pub offset: u64,
    /// Stored size in bytes.
    pub size: u64,
    /// Uncompressed size for compressed entries; equals `size` otherwise.
    pub actual_size: u64,
    /// Entry file name, NUL-trimmed and decoded lossily as UTF-8.
    pub file_name: String,
}

/// A parsed MPK archive, borrowing the raw file buffer.
#[derive(Debug, Clone)]
pub struct MpkArchive<'a> {
    data: &'a [u8],
    version: (u16, u16),
    entries: Vec<MpkEntry>,
}

impl<'a> MpkArchive<'a> {
    /// Parses the header and entry table, validating every entry span.
    ///
    /// # Errors
    ///
    /// The same taxonomy as MSB parsing: [`DocumentError::TruncatedHeader`],
    /// [`DocumentError::UnsupportedFormat`], and
    /// [`DocumentError::EntryOutOfBounds`].
    pub fn parse(data: &'a [u8]) -> Result<Self, DocumentError> {
        if data.len() < HEADER_LEN {
            return Err(DocumentError::TruncatedHeader {
                container: CONTAINER,
                len: data.len(),
                need: HEADER_LEN,
            });
        }
        if data[..4] != MPK_MAGIC {
            return Err(DocumentError::UnsupportedFormat {
                container: CONTAINER,
                reason: format!("bad magic {:02X?}", &data[..4]),
            });
        }
        let minor = read_u16_le(data, 4);
        let major = read_u16_le(data, 6);

        let count = read_u64_le(data, 8);
        let table_len = count.checked_mul(ENTRY_LEN as u64);
        let need = table_len.and_then(|t| t.checked_add(FIRST_ENTRY_OFFSET as u64));
        match need {
            Some(need) if need <= data.len() as u64 => {}
            _ => {
                return Err(DocumentError::TruncatedHeader {
                    container: CONTAINER,
                    len: data.len(),
                    need: need.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX)),
                });
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let count = count as usize;
        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let at = FIRST_ENTRY_OFFSET + index * ENTRY_LEN;
            let record = &data[at..at + ENTRY_LEN];

            let compressed = read_u32_le(record, 0) == 1;
            let id = read_u32_le(record, 4);
            let offset = read_u64_le(record, 8);
            let size = read_u64_le(record, 16);
            let actual_size = read_u64_le(record, 24);

            let raw_name = &record[32..32 + FILENAME_LEN];
            let raw_name = match raw_name.find_byte(0) {
                Some(nul) => &raw_name[..nul],
                None => raw_name,
            };
            let file_name = raw_name.to_str_lossy().trim().to_owned();

            let end = offset.checked_add(size);
            match end {
                Some(end) if end <= data.len() as u64 => {}
                _ => {
                    return Err(DocumentError::EntryOutOfBounds {
                        container: CONTAINER,
                        index,
                        offset,
                        length: size,
                        len: data.len(),
                    });
                }
            }

            entries.push(MpkEntry {
                id,
                compressed,
                offset,
                size,
                actual_size,
                file_name,
            });
        }

        log::debug!("MPK {major}.{minor}: {count} entries");
        Ok(MpkArchive {
            data,
            version: (major, minor),
            entries,
        })
    }

    /// `(major, minor)` archive version from the header.
    #[must_use]
    pub fn version(&self) -> (u16, u16) {
        self.version
    }

    /// The entry table, in file order.
    #[must_use]
    pub fn entries(&self) -> &[MpkEntry] {
        &self.entries
    }

    /// The raw stored bytes of one entry. Compressed entries are returned
    /// as stored, with a warning logged.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn entry_data(&self, entry: &MpkEntry) -> &'a [u8] {
        if entry.compressed {
            log::warn!(
                "entry {} is compressed; extracting as stored",
                entry.file_name
            );
        }
        // Spans were validated at parse time.
        &self.data[entry.offset as usize..(entry.offset + entry.size) as usize]
    }
}

fn read_u16_le(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32_le(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_u64_le(data: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[at..at + 8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(compressed: bool, id: u32, offset: u64, size: u64, name: &str) -> [u8; ENTRY_LEN] {
        let mut rec = [0u8; ENTRY_LEN];
        rec[0..4].copy_from_slice(&u32::from(compressed).to_le_bytes());
        rec[4..8].copy_from_slice(&id.to_le_bytes());
        rec[8..16].copy_from_slice(&offset.to_le_bytes());
        rec[16..24].copy_from_slice(&size.to_le_bytes());
        rec[24..32].copy_from_slice(&size.to_le_bytes());
        rec[32..32 + name.len()].copy_from_slice(name.as_bytes());
        rec
    }

    fn build_mpk(records: &[[u8; ENTRY_LEN]], payload: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&MPK_MAGIC);
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&(records.len() as u64).to_le_bytes());
        data.resize(FIRST_ENTRY_OFFSET, 0);
        for rec in records {
            data.extend_from_slice(rec);
        }
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn parses_entries_and_serves_data() {
        let data_offset = (FIRST_ENTRY_OFFSET + 2 * ENTRY_LEN) as u64;
        let records = [
            record(false, 1, data_offset, 3, "script/a.msb"),
            record(true, 2, data_offset + 3, 2, "b.msb"),
        ];
        let data = build_mpk(&records, b"abcde");

        let mpk = MpkArchive::parse(&data).unwrap();
        assert_eq!(mpk.version(), (2, 0));
        assert_eq!(mpk.entries().len(), 2);
        assert_eq!(mpk.entries()[0].file_name, "script/a.msb");
        assert!(!mpk.entries()[0].compressed);
        assert_eq!(mpk.entry_data(&mpk.entries()[0]), b"abc");
        assert!(mpk.entries()[1].compressed);
        assert_eq!(mpk.entry_data(&mpk.entries()[1]), b"de");
    }

    #[test]
    fn short_header_is_truncated() {
        let err = MpkArchive::parse(b"MPK\0").unwrap_err();
        assert!(matches!(err, DocumentError::TruncatedHeader { .. }));
    }

    #[test]
    fn bad_magic_is_unsupported() {
        let mut data = build_mpk(&[], b"");
        data[3] = b'!';
        let err = MpkArchive::parse(&data).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat { .. }));
    }

    #[test]
    fn declared_count_past_buffer_is_truncated() {
        let mut data = build_mpk(&[], b"");
        data[8..16].copy_from_slice(&3u64.to_le_bytes());
        let err = MpkArchive::parse(&data).unwrap_err();
        assert!(matches!(err, DocumentError::TruncatedHeader { .. }));
    }

    #[test]
    fn entry_span_past_buffer_is_out_of_bounds() {
        let records = [record(false, 1, 0x10_000, 8, "a.bin")];
        let data = build_mpk(&records, b"");
        let err = MpkArchive::parse(&data).unwrap_err();
        assert_eq!(
            err,
            DocumentError::EntryOutOfBounds {
                container: "MPK",
                index: 0,
                offset: 0x10_000,
                length: 8,
                len: data.len()
            }
        );
    }
}

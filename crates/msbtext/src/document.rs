//! MSB container parsing: header, entry table, and per-entry decoding.
//!
//! Layout (header fields little-endian, matching the engine's sibling MPK
//! container; the unit stream inside each segment stays big-endian):
//!
//! ```text
//! offset 0   magic  b"MSB\0"
//! offset 4   version_minor u16, version_major u16
//! offset 8   entry_count u32
//! offset 12  entry table: entry_count x { offset u32, length u32 }
//! ```

use crate::decoder::{DecodeError, ScriptDecoder, SegmentText};
use crate::error::DocumentError;

/// Format tag at the start of every MSB file.
pub const MSB_MAGIC: [u8; 4] = *b"MSB\0";

const CONTAINER: &str = "MSB";
const HEADER_LEN: usize = 12;
const ENTRY_LEN: usize = 8;
/// Major versions this crate understands (1 = classic era, 2 = extended).
const SUPPORTED_MAJOR: [u16; 2] = [1, 2];

/// One offset-bounded text segment within an MSB buffer. Validated to lie
/// within the buffer at parse time; independently decodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Zero-based position in the entry table.
    pub index: usize,
    /// Byte offset of the segment within the file.
    pub offset: u32,
    /// Byte length of the segment.
    pub length: u32,
}

/// A parsed MSB container, borrowing the raw file buffer.
#[derive(Debug, Clone)]
pub struct MsbDocument<'a> {
    data: &'a [u8],
    version: (u16, u16),
    entries: Vec<Entry>,
}

impl<'a> MsbDocument<'a> {
    /// Parses the header and entry table.
    ///
    /// # Errors
    ///
    /// [`DocumentError::TruncatedHeader`] when the buffer is shorter than
    /// the fixed header or the declared table,
    /// [`DocumentError::UnsupportedFormat`] on a bad magic or major
    /// version, [`DocumentError::EntryOutOfBounds`] when an entry's span
    /// leaves the buffer.
    pub fn parse(data: &'a [u8]) -> Result<Self, DocumentError> {
        if data.len() < HEADER_LEN {
            return Err(DocumentError::TruncatedHeader {
                container: CONTAINER,
                len: data.len(),
                need: HEADER_LEN,
            });
        }
        if data[..4] != MSB_MAGIC {
            return Err(DocumentError::UnsupportedFormat {
                container: CONTAINER,
                reason: format!("bad magic {:02X?}", &data[..4]),
            });
        }
        let minor = read_u16_le(data, 4);
        let major = read_u16_le(data, 6);
        if !SUPPORTED_MAJOR.contains(&major) {
            return Err(DocumentError::UnsupportedFormat {
                container: CONTAINER,
                reason: format!("unsupported version {major}.{minor}"),
            });
        }

        let count = read_u32_le(data, 8) as usize;
        let need = HEADER_LEN + count * ENTRY_LEN;
        if data.len() < need {
            return Err(DocumentError::TruncatedHeader {
                container: CONTAINER,
                len: data.len(),
                need,
            });
        }

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let at = HEADER_LEN + index * ENTRY_LEN;
            let offset = read_u32_le(data, at);
            let length = read_u32_le(data, at + 4);
            let end = u64::from(offset) + u64::from(length);
            if end > data.len() as u64 {
                return Err(DocumentError::EntryOutOfBounds {
                    container: CONTAINER,
                    index,
                    offset: u64::from(offset),
                    length: u64::from(length),
                    len: data.len(),
                });
            }
            entries.push(Entry {
                index,
                offset,
                length,
            });
        }

        log::debug!("MSB {major}.{minor}: {count} entries");
        Ok(MsbDocument {
            data,
            version: (major, minor),
            entries,
        })
    }

    /// `(major, minor)` format version from the header.
    #[must_use]
    pub fn version(&self) -> (u16, u16) {
        self.version
    }

    /// The entry table, in file order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The raw byte span of one entry.
    #[must_use]
    pub fn segment(&self, entry: Entry) -> &'a [u8] {
        // Widen before adding; the span was validated in u64 at parse time.
        let start = entry.offset as usize;
        &self.data[start..start + entry.length as usize]
    }

    /// Decodes one entry's segment through `decoder`.
    ///
    /// # Errors
    ///
    /// Propagates the decoder-layer [`DecodeError`]; a failure here never
    /// affects sibling entries.
    pub fn decode_entry(
        &self,
        entry: Entry,
        decoder: &ScriptDecoder<'_>,
    ) -> Result<SegmentText, DecodeError> {
        decoder.decode(self.segment(entry))
    }

    /// Decodes every entry, isolating per-segment failures: a bad segment
    /// yields its error in place while the rest still decode.
    pub fn decode_all(
        &self,
        decoder: &ScriptDecoder<'_>,
    ) -> Vec<(Entry, Result<SegmentText, DecodeError>)> {
        self.entries
            .iter()
            .map(|&entry| {
                let result = self.decode_entry(entry, decoder);
                if let Err(err) = &result {
                    log::warn!("entry {}: {err}", entry.index);
                }
                (entry, result)
            })
            .collect()
    }
}

fn read_u16_le(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32_le(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

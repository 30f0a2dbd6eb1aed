//! Errors for resource loading and container parsing.
//!
//! Decoder-layer errors live in [`crate::decoder`]; these are the errors that
//! abort a whole run for a file rather than a single segment.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load an external resource (font table or player name).
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The resource was not present in any of the searched locations.
    #[error("resource {name} not found (searched {searched:?})")]
    NotFound {
        /// File name of the missing resource.
        name: String,
        /// Every candidate path that was probed, in search order.
        searched: Vec<PathBuf>,
    },

    /// The resource exists but could not be parsed into the expected shape.
    #[error("resource {name} is malformed: {reason}")]
    Malformed {
        /// File name (or path) of the offending resource.
        name: String,
        /// Human-readable description of what was wrong.
        reason: String,
    },
}

/// Failure to parse a binary container (MSB document or MPK archive).
///
/// `container` names the format so MSB and MPK parsing can share one
/// taxonomy.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// The buffer ends before the fixed header or the declared entry table.
    #[error("{container} header truncated: {len} bytes, need at least {need}")]
    TruncatedHeader {
        /// Container format name (`"MSB"` or `"MPK"`).
        container: &'static str,
        /// Actual buffer length.
        len: usize,
        /// Minimum length the header declares.
        need: usize,
    },

    /// The format tag or version is not one this crate understands.
    #[error("unsupported {container} format: {reason}")]
    UnsupportedFormat {
        /// Container format name.
        container: &'static str,
        /// What was unrecognized (bad magic, unknown version).
        reason: String,
    },

    /// An entry's declared span does not lie within the buffer.
    #[error(
        "{container} entry {index} out of bounds: \
         {offset:#x}+{length:#x} exceeds buffer of {len:#x} bytes"
    )]
    EntryOutOfBounds {
        /// Container format name.
        container: &'static str,
        /// Zero-based index of the offending entry.
        index: usize,
        /// Declared byte offset.
        offset: u64,
        /// Declared byte length.
        length: u64,
        /// Length of the containing buffer.
        len: usize,
    },
}

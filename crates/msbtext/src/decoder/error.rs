use thiserror::Error;

use crate::font::GlyphIndexOutOfRange;

/// A decode failure, carrying the byte offset that triggered it.
///
/// Decoder errors abort the current segment only; sibling segments in the
/// same document still attempt decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} at offset {offset:#06x}")]
pub struct DecodeError {
    pub(crate) source: DecodeErrorKind,
    pub(crate) offset: usize,
}

impl DecodeError {
    pub(crate) fn at(offset: usize, source: DecodeErrorKind) -> Self {
        DecodeError { source, offset }
    }

    /// Byte offset within the segment that triggered the failure.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.source
    }
}

/// The decoder-layer failure taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A character unit resolved to an index outside the font table.
    #[error(transparent)]
    GlyphIndexOutOfRange(#[from] GlyphIndexOutOfRange),

    /// A command byte absent from the active command set. Distinguishes an
    /// unknown protocol extension from malformed data; never skipped.
    #[error("unknown command byte {byte:#04x}")]
    UnknownCommandByte {
        /// The unrecognized byte value.
        byte: u8,
    },

    /// A command's declared argument arity runs past the segment end.
    #[error("command {name} needs {needed} argument byte(s), only {remaining} remain")]
    ArgumentOverrun {
        /// Name of the offending command.
        name: &'static str,
        /// Declared arity in bytes.
        needed: usize,
        /// Bytes left in the segment after the command byte.
        remaining: usize,
    },

    /// The segment ends in the middle of a character unit.
    #[error("truncated character unit")]
    TruncatedUnit,
}

/// A recoverable defect: recorded on the segment, never aborts decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeWarning {
    /// A ruby span was closed with none open, or left open at segment end.
    /// `offset` is where the unmatched marker was encountered (for a span
    /// left open, where it was opened).
    UnbalancedRubyMarker {
        /// Segment offset of the unmatched marker.
        offset: usize,
    },
}

impl core::fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeWarning::UnbalancedRubyMarker { offset } => {
                write!(f, "unbalanced ruby marker at offset {offset:#06x}")
            }
        }
    }
}

//! The script decoder: a stateful scan over one segment's bytes.
//!
//! The decoder peeks the leading byte at the cursor each iteration. A value
//! at or above the character threshold (`0x80`) begins a character unit of
//! 2 or 4 big-endian bytes, depending on the session's [`CharacterWidth`],
//! whose biased value indexes the font table. Anything below the threshold,
//! plus the `0xFF` terminator sentinel, is a single command byte dispatched
//! through the active [`CommandSet`]; inline-argument commands then consume
//! their declared arity of raw bytes, which are never reinterpreted as
//! further units.
//!
//! The cursor strictly advances every iteration, so decoding a bounded
//! slice always terminates. Hard errors ([`DecodeError`]) abort the current
//! segment and carry the offending offset and byte; unbalanced ruby markers
//! degrade to [`DecodeWarning`]s so malformed scripts in the wild still
//! yield their text.

mod error;
#[cfg(test)]
mod tests;

pub use error::{DecodeError, DecodeErrorKind, DecodeWarning};

use crate::command::{CharacterWidth, CommandKind, CommandSet};
use crate::font::FontTable;
use crate::name::PlayerName;

/// Leading bytes at or above this begin a character unit.
const CHAR_THRESHOLD: u8 = 0x80;

/// The segment-terminating sentinel. Above the character threshold, so it
/// must be recognized before the character-unit test; a character unit can
/// never begin with it.
const TERMINATOR: u8 = 0xFF;

/// One decoded segment: the annotated text plus any recoverable defects
/// recorded along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentText {
    /// Glyphs interleaved with textual command renderings.
    pub text: String,
    /// Recoverable defects, in encounter order.
    pub warnings: Vec<DecodeWarning>,
}

impl SegmentText {
    /// Whether any recoverable defect was recorded.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A configured decoding session factory: width, command table, font table
/// and player name, injected once and shared read-only across segments.
///
/// Each [`ScriptDecoder::decode`] call owns its own cursor and output
/// buffer, so one decoder may serve concurrent workers.
#[derive(Debug, Clone, Copy)]
pub struct ScriptDecoder<'a> {
    width: CharacterWidth,
    commands: CommandSet,
    font: &'a FontTable,
    name: &'a PlayerName,
}

impl<'a> ScriptDecoder<'a> {
    /// Builds a decoder for one character-width revision. The command set
    /// follows the width; it is never hard-coded per call site.
    #[must_use]
    pub fn new(width: CharacterWidth, font: &'a FontTable, name: &'a PlayerName) -> Self {
        ScriptDecoder {
            width,
            commands: width.command_set(),
            font,
            name,
        }
    }

    /// The session's character width.
    #[must_use]
    pub fn width(&self) -> CharacterWidth {
        self.width
    }

    /// Decodes one segment.
    ///
    /// # Errors
    ///
    /// [`DecodeError`] on the first glyph-resolution failure, unknown
    /// command byte, argument overrun, or truncated character unit; the
    /// error names the byte offset that triggered it.
    pub fn decode(&self, bytes: &[u8]) -> Result<SegmentText, DecodeError> {
        let mut cursor = 0usize;
        let mut out = String::new();
        let mut warnings = Vec::new();
        // Offset of the currently open ruby span, if any.
        let mut ruby_open: Option<usize> = None;

        while cursor < bytes.len() {
            let offset = cursor;
            let lead = bytes[cursor];

            if lead >= CHAR_THRESHOLD && lead != TERMINATOR {
                let unit_len = self.width.unit_len();
                let Some(unit) = bytes.get(cursor..cursor + unit_len) else {
                    return Err(DecodeError::at(offset, DecodeErrorKind::TruncatedUnit));
                };
                let value = unit.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                let index = (value - self.width.char_base()) as usize;
                let glyph = self
                    .font
                    .resolve(index)
                    .map_err(|e| DecodeError::at(offset, e.into()))?;
                out.push(glyph);
                cursor += unit_len;
                continue;
            }

            cursor += 1;
            let Some(spec) = self.commands.lookup(lead) else {
                return Err(DecodeError::at(
                    offset,
                    DecodeErrorKind::UnknownCommandByte { byte: lead },
                ));
            };
            log::trace!("command {} at {offset:#06x}", spec.name);

            match spec.kind {
                CommandKind::Terminator => {
                    // Trailing bytes after the sentinel are ignored.
                    cursor = bytes.len();
                }
                CommandKind::ControlMarker(token) => out.push_str(token),
                CommandKind::InlineArgument { len, render } => {
                    let remaining = bytes.len() - cursor;
                    if remaining < len {
                        return Err(DecodeError::at(
                            offset,
                            DecodeErrorKind::ArgumentOverrun {
                                name: spec.name,
                                needed: len,
                                remaining,
                            },
                        ));
                    }
                    out.push_str(&render(&bytes[cursor..cursor + len]));
                    cursor += len;
                }
                CommandKind::Substitution(field) => out.push_str(self.name.field(field)),
                CommandKind::PairedMarkerStart(token) => {
                    if let Some(open_at) = ruby_open.replace(offset) {
                        warnings.push(DecodeWarning::UnbalancedRubyMarker { offset: open_at });
                    }
                    out.push_str(token);
                }
                CommandKind::PairedMarkerEnd(token) => {
                    if ruby_open.take().is_none() {
                        warnings.push(DecodeWarning::UnbalancedRubyMarker { offset });
                    }
                    out.push_str(token);
                }
            }
        }

        if let Some(open_at) = ruby_open {
            warnings.push(DecodeWarning::UnbalancedRubyMarker { offset: open_at });
        }

        Ok(SegmentText { text: out, warnings })
    }
}

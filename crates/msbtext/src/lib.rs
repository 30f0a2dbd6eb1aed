//! Decoder for the MSB dialogue-script format used by two generations of a
//! visual-novel engine.
//!
//! An MSB file is a container of byte-encoded text segments. Each segment
//! interleaves character codes (glyph references resolved through an external
//! font table) with inline formatting commands. Two incompatible revisions of
//! the format exist: the classic games encode characters as 2-byte units, the
//! later ones as 4-byte units with an extended command set. The same scanning
//! loop serves both; the unit width and active command table are injected per
//! session.
//!
//! ```
//! use msbtext::{CharacterWidth, FontTable, PlayerName, ScriptDecoder};
//!
//! let font = FontTable::from_glyphs("あいう".chars().collect());
//! let name = PlayerName::placeholder();
//! let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
//!
//! // Two character units followed by the string terminator.
//! let segment = decoder.decode(&[0x80, 0x00, 0x80, 0x02, 0xFF]).unwrap();
//! assert_eq!(segment.text, "あう");
//! ```

mod archive;
mod command;
mod decoder;
mod document;
mod error;
mod font;
mod name;
mod resource;

pub use archive::{MpkArchive, MpkEntry};
pub use command::{CharacterWidth, CommandKind, CommandSet, CommandSpec, NameField};
pub use decoder::{DecodeError, DecodeErrorKind, DecodeWarning, ScriptDecoder, SegmentText};
pub use document::{Entry, MsbDocument};
pub use error::{DocumentError, ResourceError};
pub use font::{FontTable, FontVariant, GlyphIndexOutOfRange};
pub use name::PlayerName;
pub use resource::locate;

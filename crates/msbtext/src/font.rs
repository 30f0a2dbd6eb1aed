//! Font table: the ordered glyph catalog character codes index into.
//!
//! The resource is a plain-text file whose characters, read in order with
//! line breaks and spacing stripped, form the glyph sequence. Character
//! codes in a script are biased by the width's character base; subtracting
//! the base yields an index into this table.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::error::ResourceError;
use crate::resource;

/// Which glyph catalog to load. One variant exists per supported game
/// family; the choice is external configuration, never inferred from file
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontVariant {
    /// Catalog for the classic (16-bit character) releases.
    Classic,
    /// Catalog for the later (32-bit character) releases.
    Extended,
}

impl FontVariant {
    /// Resource file name for this variant.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            FontVariant::Classic => "font.txt",
            FontVariant::Extended => "font_ex.txt",
        }
    }
}

/// A glyph index that does not fit the table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("glyph index {index} out of range (0..{len})")]
pub struct GlyphIndexOutOfRange {
    /// The rejected index.
    pub index: usize,
    /// Number of glyphs in the table.
    pub len: usize,
}

/// Immutable, ordered glyph catalog. Built once at startup; every decode
/// session shares it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTable {
    glyphs: Vec<char>,
}

impl FontTable {
    /// Builds a table directly from glyphs, in index order. Intended for
    /// synthetic tables in tests and for callers with their own catalog
    /// source.
    #[must_use]
    pub fn from_glyphs(glyphs: Vec<char>) -> Self {
        FontTable { glyphs }
    }

    /// Parses the plain-text catalog format: carriage returns, line feeds,
    /// ASCII spaces, ideographic spaces (U+3000) and a leading BOM are
    /// stripped; every remaining character is one glyph, in order.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Malformed`] when no glyphs remain after stripping.
    pub fn parse(name: &str, text: &str) -> Result<Self, ResourceError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let glyphs: Vec<char> = text
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n' | ' ' | '\u{3000}'))
            .collect();
        if glyphs.is_empty() {
            return Err(ResourceError::Malformed {
                name: name.to_owned(),
                reason: "no glyph entries".to_owned(),
            });
        }
        log::debug!("font table {name}: {} glyphs", glyphs.len());
        Ok(FontTable { glyphs })
    }

    /// Loads and parses the catalog at `path`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when the file does not exist,
    /// [`ResourceError::Malformed`] when it cannot be read as UTF-8 text or
    /// contains no glyphs.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let name = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| read_error(&name, &e))?;
        Self::parse(&name, &text)
    }

    /// Locates the catalog for `variant` through the two-location search
    /// and loads it.
    ///
    /// # Errors
    ///
    /// Propagates [`resource::locate`] and [`FontTable::load`] failures.
    pub fn locate(variant: FontVariant) -> Result<Self, ResourceError> {
        let path = resource::locate(variant.file_name())?;
        Self::load(&path)
    }

    /// Number of glyphs in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the table holds no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Resolves a glyph index.
    ///
    /// # Errors
    ///
    /// [`GlyphIndexOutOfRange`] when `index >= len`. An out-of-range lookup
    /// is a decode error, never a silent substitution.
    pub fn resolve(&self, index: usize) -> Result<char, GlyphIndexOutOfRange> {
        self.glyphs
            .get(index)
            .copied()
            .ok_or(GlyphIndexOutOfRange {
                index,
                len: self.glyphs.len(),
            })
    }

    /// Index of `glyph` in the table, if present. The inverse of
    /// [`FontTable::resolve`].
    #[must_use]
    pub fn index_of(&self, glyph: char) -> Option<usize> {
        self.glyphs.iter().position(|&g| g == glyph)
    }
}

impl fmt::Display for FontTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontTable({} glyphs)", self.glyphs.len())
    }
}

fn read_error(name: &str, err: &std::io::Error) -> ResourceError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ResourceError::NotFound {
            name: name.to_owned(),
            searched: vec![name.into()],
        }
    } else {
        ResourceError::Malformed {
            name: name.to_owned(),
            reason: err.to_string(),
        }
    }
}

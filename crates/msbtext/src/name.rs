//! Player-name resource: the (surname, given name) pair substituted for the
//! `PlayerSurname` / `PlayerGivenName` commands.

use std::fs;
use std::path::Path;

use crate::command::NameField;
use crate::error::ResourceError;
use crate::resource;

/// Resource file name for the player name.
pub const NAME_FILE: &str = "name.txt";

/// Rendered in place of either name field when the resource is absent and
/// the caller opted into the fallback.
pub const NAME_PLACEHOLDER: &str = "???";

/// The loaded player name. Immutable once constructed; shared read-only by
/// every decode session that performs substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName {
    surname: String,
    given_name: String,
}

impl PlayerName {
    /// Builds a name pair directly.
    #[must_use]
    pub fn new(surname: impl Into<String>, given_name: impl Into<String>) -> Self {
        PlayerName {
            surname: surname.into(),
            given_name: given_name.into(),
        }
    }

    /// The designated placeholder pair. Decoding with it succeeds; the
    /// substitution commands render [`NAME_PLACEHOLDER`].
    #[must_use]
    pub fn placeholder() -> Self {
        PlayerName::new(NAME_PLACEHOLDER, NAME_PLACEHOLDER)
    }

    /// Parses the resource text: the first line must hold exactly two
    /// whitespace-separated tokens, surname first.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Malformed`] otherwise.
    pub fn parse(name: &str, text: &str) -> Result<Self, ResourceError> {
        let first_line = text.lines().next().unwrap_or("");
        let tokens: Vec<&str> = first_line.split_whitespace().collect();
        match tokens.as_slice() {
            [surname, given] => Ok(PlayerName::new(*surname, *given)),
            other => Err(ResourceError::Malformed {
                name: name.to_owned(),
                reason: format!(
                    "expected two whitespace-separated tokens on the first line, found {}",
                    other.len()
                ),
            }),
        }
    }

    /// Loads and parses the resource at `path`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when the file does not exist,
    /// [`ResourceError::Malformed`] when the first line is not a two-token
    /// pair.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let name = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound {
                    name: name.clone(),
                    searched: vec![path.to_path_buf()],
                }
            } else {
                ResourceError::Malformed {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            }
        })?;
        Self::parse(&name, &text)
    }

    /// Locates [`NAME_FILE`] through the two-location search and loads it.
    ///
    /// # Errors
    ///
    /// Propagates [`resource::locate`] and [`PlayerName::load`] failures;
    /// callers decide whether absence is fatal or falls back to
    /// [`PlayerName::placeholder`].
    pub fn locate() -> Result<Self, ResourceError> {
        let path = resource::locate(NAME_FILE)?;
        Self::load(&path)
    }

    /// The surname token.
    #[must_use]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// The given-name token.
    #[must_use]
    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    /// Field accessor keyed by the substitution command's target.
    #[must_use]
    pub fn field(&self, field: NameField) -> &str {
        match field {
            NameField::Surname => &self.surname,
            NameField::GivenName => &self.given_name,
        }
    }
}

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Canonical identifier of a stored file (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained value is guaranteed to be canonical, so it is safe to join
/// onto a storage directory without further checks.
///
/// # Construction
/// - [`FileId::new`] allocates a fresh random identifier for a store operation.
/// - [`FileId::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl FileId {
    /// Generates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Other common UUID spellings (hyphenated, uppercase, braced) are not normalised; callers
    /// must echo back exactly what a store call returned.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "file id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }

        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid file id '{}': {}", input, e)))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic; usable as a cheap pre-check before [`FileId::parse`].
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for FileId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FileId::parse(&s).map_err(serde::de::Error::custom)
    }
}

//! Identifier and validated-name types for batch artifacts.

use super::ArtifactRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Opaque identity of a loader scope.
///
/// The token is owned by whatever manages the loader's lifecycle; caches key
/// on it instead of on the loader itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoaderId(Uuid);

impl LoaderId {
    /// Creates a new random loader identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for LoaderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LoaderId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// User-facing artifact id as referenced from job definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Wraps an artifact id.
    ///
    /// Ids are case sensitive and kept verbatim, including the empty string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ArtifactId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Batch role an artifact was declared under, e.g. `item-processor`.
///
/// The vocabulary is open: whatever element name `batch.xml` uses is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    /// Creates a validated type tag.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRegistryDomainError::EmptyTypeTag`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ArtifactRegistryDomainError> {
        let tag = value.into();
        if tag.trim().is_empty() {
            return Err(ArtifactRegistryDomainError::EmptyTypeTag);
        }
        Ok(Self(tag))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Fully qualified binary class name such as `com.acme.Reader$Inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    /// Creates a validated class name.
    ///
    /// The value must be one or more non-empty segments separated by `.`,
    /// with no whitespace or `/` anywhere.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRegistryDomainError::InvalidClassName`] when the
    /// value is not a dotted identifier path.
    pub fn new(value: impl Into<String>) -> Result<Self, ArtifactRegistryDomainError> {
        let raw = value.into();

        let is_valid = !raw.is_empty()
            && raw.split('.').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|character| !character.is_whitespace() && character != '/')
            });
        if !is_valid {
            return Err(ArtifactRegistryDomainError::InvalidClassName(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the class name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the relative path of the compiled class file, `a/b/C.class`.
    #[must_use]
    pub fn class_file_path(&self) -> String {
        format!("{}.class", self.0.replace('.', "/"))
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

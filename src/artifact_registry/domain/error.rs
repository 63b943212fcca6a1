//! Error types for artifact registry domain validation.

use super::ClassName;
use thiserror::Error;

/// Errors returned while constructing artifact registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArtifactRegistryDomainError {
    /// The type tag is empty after trimming.
    #[error("batch artifact type tag must not be empty")]
    EmptyTypeTag,

    /// The class name is not a dotted identifier path.
    #[error("'{0}' is not a valid class name")]
    InvalidClassName(String),

    /// A descriptor element lacks one of the attributes every entry needs.
    #[error("<{type_tag}> element is missing the required '{attribute}' attribute")]
    MissingAttribute {
        /// Local name of the offending element.
        type_tag: String,
        /// Name of the absent attribute.
        attribute: &'static str,
    },

    /// The same id was declared again with a different implementation class.
    #[error(
        "batch artifact id '{id}' is already mapped to class {existing}; \
         redeclaring it with class {conflicting} is not allowed"
    )]
    IdCollision {
        /// Artifact id declared twice.
        id: String,
        /// Class recorded by the first declaration.
        existing: ClassName,
        /// Class named by the conflicting declaration.
        conflicting: ClassName,
    },
}

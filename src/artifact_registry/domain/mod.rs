//! Domain model for batch artifact registries.
//!
//! The domain owns the identifiers that appear in `batch.xml`, the resolved
//! class handles, and the per-loader artifact map with its collision rules.
//! Class resolution and resource access stay behind the loader port.

mod class;
mod error;
mod ids;
mod registry;

pub use class::ArtifactClass;
pub use error::ArtifactRegistryDomainError;
pub use ids::{ArtifactId, ClassName, LoaderId, TypeTag};
pub use registry::{ArtifactRegistry, ArtifactRegistryBuilder, RegistrySource};

//! Port contracts for loader-scoped artifact resolution.

mod loader;

pub use loader::{ArtifactLoader, ArtifactLoaderError, ArtifactLoaderResult, ArtifactResource};

//! Application services for loading and querying artifact registries.

mod cache;
mod config;
mod error;
mod mapper;

pub use cache::ArtifactRegistryCache;
pub use config::{ArtifactRegistryConfig, DEFAULT_DESCRIPTOR_RESOURCE};
pub use error::{ArtifactRegistryLoadCause, ArtifactRegistryLoadError};
pub use mapper::BatchArtifactMapper;

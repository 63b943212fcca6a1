//! The single failure category surfaced by registry population.

use crate::artifact_registry::{
    domain::{ArtifactRegistryDomainError, LoaderId},
    ports::ArtifactLoaderError,
    scanner::DescriptorScanError,
};
use thiserror::Error;

/// Underlying reason a registry could not be populated.
#[derive(Debug, Error)]
pub enum ArtifactRegistryLoadCause {
    /// The descriptor is not well formed or has the wrong root.
    #[error(transparent)]
    Scan(#[from] DescriptorScanError),
    /// An entry is invalid or collides with an earlier one.
    #[error(transparent)]
    Domain(#[from] ArtifactRegistryDomainError),
    /// A class could not be resolved or the resource could not be read.
    #[error(transparent)]
    Loader(#[from] ArtifactLoaderError),
}

/// Population of a loader's artifact registry failed.
///
/// Nothing is cached when this is returned; the next request for the same
/// loader starts over.
#[derive(Debug, Error)]
#[error("failed to load batch artifacts from '{resource}' for loader {loader_id}: {cause}")]
pub struct ArtifactRegistryLoadError {
    loader_id: LoaderId,
    resource: String,
    #[source]
    cause: ArtifactRegistryLoadCause,
}

impl ArtifactRegistryLoadError {
    /// Wraps `cause` with the loader and resource it occurred for.
    pub fn new(
        loader_id: LoaderId,
        resource: impl Into<String>,
        cause: impl Into<ArtifactRegistryLoadCause>,
    ) -> Self {
        Self {
            loader_id,
            resource: resource.into(),
            cause: cause.into(),
        }
    }

    /// Returns the loader whose registry failed to load.
    #[must_use]
    pub const fn loader_id(&self) -> LoaderId {
        self.loader_id
    }

    /// Returns the resource that was being read.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &ArtifactRegistryLoadCause {
        &self.cause
    }
}

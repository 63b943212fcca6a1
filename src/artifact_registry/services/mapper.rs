//! Lookup façade bound to one loader.

use super::{ArtifactRegistryCache, ArtifactRegistryLoadError};
use crate::artifact_registry::{
    domain::{ArtifactClass, ArtifactRegistry, TypeTag},
    ports::ArtifactLoader,
};
use mockable::Clock;
use std::sync::Arc;

/// Maps artifact ids declared in a loader's `batch.xml` to their classes.
///
/// Construction goes through the shared cache, so building many mappers for
/// the same loader reads the descriptor once. After construction every
/// lookup is a plain read of an immutable registry.
#[derive(Debug, Clone)]
pub struct BatchArtifactMapper {
    registry: Arc<ArtifactRegistry>,
}

impl BatchArtifactMapper {
    /// Binds a mapper to `loader`, populating its registry if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRegistryLoadError`] when the loader's descriptor
    /// cannot be turned into a registry.
    pub fn new<C>(
        cache: &ArtifactRegistryCache<C>,
        loader: &Arc<dyn ArtifactLoader>,
    ) -> Result<Self, ArtifactRegistryLoadError>
    where
        C: Clock + Send + Sync,
    {
        Ok(Self {
            registry: cache.registry_for(loader)?,
        })
    }

    /// Returns the class implementing artifact `id`, if declared.
    #[must_use]
    pub fn artifact_by_id(&self, id: &str) -> Option<&ArtifactClass> {
        self.registry.artifact_by_id(id)
    }

    /// Returns the batch roles artifact `id` was declared under.
    #[must_use]
    pub fn batch_types(&self, id: &str) -> Option<&[TypeTag]> {
        self.registry.batch_types(id)
    }

    /// Returns the registry backing this mapper.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ArtifactRegistry> {
        &self.registry
    }
}

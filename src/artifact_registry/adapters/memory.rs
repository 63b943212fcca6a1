//! In-memory loader with optional parent delegation.

use crate::artifact_registry::{
    domain::{ArtifactClass, ArtifactRegistryDomainError, ClassName, LoaderId},
    ports::{ArtifactLoader, ArtifactLoaderError, ArtifactLoaderResult, ArtifactResource},
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Loader whose resources and classes are registered programmatically.
///
/// Lookups delegate to the parent first, the way hierarchical classloaders
/// do, so a class visible through the parent is defined by the parent.
#[derive(Default)]
pub struct InMemoryArtifactLoader {
    id: LoaderId,
    resources: HashMap<String, Arc<[u8]>>,
    classes: HashSet<ClassName>,
    parent: Option<Arc<dyn ArtifactLoader>>,
    resource_lookups: AtomicUsize,
}

impl InMemoryArtifactLoader {
    /// Creates an empty loader with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource under `name`.
    #[must_use]
    pub fn with_resource(mut self, name: impl Into<String>, contents: impl AsRef<[u8]>) -> Self {
        self.resources
            .insert(name.into(), Arc::from(contents.as_ref()));
        self
    }

    /// Makes `class_name` resolvable through this loader.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRegistryDomainError::InvalidClassName`] when the
    /// name is malformed.
    pub fn with_class(mut self, class_name: &str) -> Result<Self, ArtifactRegistryDomainError> {
        self.classes.insert(ClassName::new(class_name)?);
        Ok(self)
    }

    /// Sets the loader consulted before this one.
    #[must_use]
    pub fn with_parent(mut self, parent: Arc<dyn ArtifactLoader>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Returns how many times [`ArtifactLoader::open_resource`] was called.
    #[must_use]
    pub fn resource_lookups(&self) -> usize {
        self.resource_lookups.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for InMemoryArtifactLoader {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InMemoryArtifactLoader")
            .field("id", &self.id)
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("classes", &self.classes)
            .field("parent", &self.parent.as_ref().map(|parent| parent.loader_id()))
            .finish_non_exhaustive()
    }
}

impl ArtifactLoader for InMemoryArtifactLoader {
    fn loader_id(&self) -> LoaderId {
        self.id
    }

    fn open_resource(&self, name: &str) -> ArtifactLoaderResult<Option<ArtifactResource>> {
        self.resource_lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(parent) = &self.parent
            && let Some(resource) = parent.open_resource(name)?
        {
            return Ok(Some(resource));
        }

        Ok(self.resources.get(name).map(|contents| {
            Box::new(Cursor::new(Arc::clone(contents))) as ArtifactResource
        }))
    }

    fn load_class(&self, class_name: &ClassName) -> ArtifactLoaderResult<ArtifactClass> {
        if let Some(parent) = &self.parent {
            match parent.load_class(class_name) {
                Ok(class) => return Ok(class),
                Err(ArtifactLoaderError::ClassNotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }

        if self.classes.contains(class_name) {
            return Ok(ArtifactClass::new(class_name.clone(), self.id));
        }

        Err(ArtifactLoaderError::ClassNotFound {
            class_name: class_name.clone(),
            loader_id: self.id,
        })
    }
}

//! Loader port: the classloader contract the registry is scoped to.

use crate::artifact_registry::domain::{ArtifactClass, ClassName, LoaderId};
use std::io::Read;
use std::sync::Arc;
use thiserror::Error;

/// Result type for loader operations.
pub type ArtifactLoaderResult<T> = Result<T, ArtifactLoaderError>;

/// Readable stream over a loader resource.
pub type ArtifactResource = Box<dyn Read + Send>;

/// A scope that owns resources and resolves class names.
///
/// Implementations are shared behind `Arc`; the registry cache only keeps a
/// weak reference, so dropping the last strong handle ends the scope.
pub trait ArtifactLoader: Send + Sync {
    /// Returns the identity token for this scope.
    fn loader_id(&self) -> LoaderId;

    /// Opens the named resource.
    ///
    /// Returns `Ok(None)` when the scope has no such resource.
    fn open_resource(&self, name: &str) -> ArtifactLoaderResult<Option<ArtifactResource>>;

    /// Resolves a class name to a class handle.
    fn load_class(&self, class_name: &ClassName) -> ArtifactLoaderResult<ArtifactClass>;
}

/// Errors returned by loader adapters.
#[derive(Debug, Clone, Error)]
pub enum ArtifactLoaderError {
    /// No class with the given name is visible from the loader.
    #[error("class {class_name} not found by loader {loader_id}")]
    ClassNotFound {
        /// Name that failed to resolve.
        class_name: ClassName,
        /// Loader the lookup started from.
        loader_id: LoaderId,
    },

    /// Reading or opening a resource failed.
    #[error("loader I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl ArtifactLoaderError {
    /// Wraps an I/O error raised by the adapter.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

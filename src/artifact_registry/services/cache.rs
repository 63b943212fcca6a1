//! Loader-keyed cache of populated artifact registries.

use super::{ArtifactRegistryConfig, ArtifactRegistryLoadCause, ArtifactRegistryLoadError};
use crate::artifact_registry::{
    domain::{
        ArtifactId, ArtifactRegistry, ArtifactRegistryBuilder, ArtifactRegistryDomainError,
        ClassName, LoaderId, RegistrySource, TypeTag,
    },
    ports::{ArtifactLoader, ArtifactResource},
    scanner::{ArtifactDeclaration, scan_descriptor},
};
use mockable::{Clock, DefaultClock};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

struct CacheEntry {
    loader: Weak<dyn ArtifactLoader>,
    registry: Arc<ArtifactRegistry>,
}

impl CacheEntry {
    fn is_live(&self) -> bool {
        self.loader.strong_count() > 0
    }
}

/// Process-wide table of artifact registries, one per live loader.
///
/// Loaders are held weakly: once the last strong handle to a loader is
/// dropped its entry stops being served and is pruned on the next publish
/// or [`purge_unloaded`](Self::purge_unloaded). Each loader's descriptor is
/// parsed at most once while its entry lives, even when many threads ask for
/// it concurrently; distinct loaders populate in parallel.
pub struct ArtifactRegistryCache<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    config: ArtifactRegistryConfig,
    clock: Arc<C>,
    entries: RwLock<HashMap<LoaderId, CacheEntry>>,
    population_locks: Mutex<HashMap<LoaderId, Arc<Mutex<()>>>>,
}

impl ArtifactRegistryCache<DefaultClock> {
    /// Creates a cache with default configuration and the system clock.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ArtifactRegistryConfig::default(), Arc::new(DefaultClock))
    }
}

impl<C> ArtifactRegistryCache<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new(config: ArtifactRegistryConfig, clock: Arc<C>) -> Self {
        Self {
            config,
            clock,
            entries: RwLock::new(HashMap::new()),
            population_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configuration used for population.
    #[must_use]
    pub const fn config(&self) -> &ArtifactRegistryConfig {
        &self.config
    }

    /// Returns the registry for `loader`, populating it on first use.
    ///
    /// A loader without a descriptor gets an empty registry. Failed
    /// population caches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRegistryLoadError`] when the descriptor cannot be
    /// read, is malformed, names an unresolvable class, or declares an id
    /// twice with different classes.
    pub fn registry_for(
        &self,
        loader: &Arc<dyn ArtifactLoader>,
    ) -> Result<Arc<ArtifactRegistry>, ArtifactRegistryLoadError> {
        let loader_id = loader.loader_id();
        if let Some(registry) = self.cached(loader_id) {
            debug!(%loader_id, "batch artifact registry cache hit");
            return Ok(registry);
        }

        let population_lock = self.population_lock(loader_id);
        let outcome = {
            let _populating = population_lock.lock();
            match self.cached(loader_id) {
                Some(registry) => Ok(registry),
                None => self
                    .populate(&**loader)
                    .map(|registry| self.publish(loader, registry)),
            }
        };
        self.release_population_lock(loader_id, &population_lock);

        if let Err(err) = &outcome {
            warn!(%loader_id, error = %err, "batch artifact registry population failed");
        }
        outcome
    }

    /// Drops the entry for `loader_id`, forcing the next request to re-read
    /// the descriptor. Returns whether an entry was removed.
    pub fn evict(&self, loader_id: LoaderId) -> bool {
        let removed = self.entries.write().remove(&loader_id).is_some();
        if removed {
            debug!(%loader_id, "evicted batch artifact registry");
        }
        removed
    }

    /// Removes entries whose loader is gone and returns how many there were.
    pub fn purge_unloaded(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live());
        before - entries.len()
    }

    /// Returns whether a registry is cached for a live loader with this id.
    #[must_use]
    pub fn contains(&self, loader_id: LoaderId) -> bool {
        self.entries
            .read()
            .get(&loader_id)
            .is_some_and(CacheEntry::is_live)
    }

    /// Returns the number of registries cached for live loaders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_live())
            .count()
    }

    /// Returns whether no live loader has a cached registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, loader_id: LoaderId) -> Option<Arc<ArtifactRegistry>> {
        self.entries
            .read()
            .get(&loader_id)
            .filter(|entry| entry.is_live())
            .map(|entry| Arc::clone(&entry.registry))
    }

    fn population_lock(&self, loader_id: LoaderId) -> Arc<Mutex<()>> {
        Arc::clone(self.population_locks.lock().entry(loader_id).or_default())
    }

    // Only the map and the caller hold the lock once nobody else is waiting.
    fn release_population_lock(&self, loader_id: LoaderId, lock: &Arc<Mutex<()>>) {
        let mut locks = self.population_locks.lock();
        let is_current = locks
            .get(&loader_id)
            .is_some_and(|current| Arc::ptr_eq(current, lock));
        if is_current && Arc::strong_count(lock) <= 2 {
            locks.remove(&loader_id);
        }
    }

    fn publish(
        &self,
        loader: &Arc<dyn ArtifactLoader>,
        registry: ArtifactRegistry,
    ) -> Arc<ArtifactRegistry> {
        let shared = Arc::new(registry);
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.is_live());
        entries.insert(
            shared.loader_id(),
            CacheEntry {
                loader: Arc::downgrade(loader),
                registry: Arc::clone(&shared),
            },
        );
        info!(
            loader_id = %shared.loader_id(),
            artifacts = shared.len(),
            "published batch artifact registry"
        );
        shared
    }

    fn populate(
        &self,
        loader: &dyn ArtifactLoader,
    ) -> Result<ArtifactRegistry, ArtifactRegistryLoadError> {
        let loader_id = loader.loader_id();
        let resource_name = self.config.resource_name.as_str();

        let opened = loader
            .open_resource(resource_name)
            .map_err(|err| ArtifactRegistryLoadError::new(loader_id, resource_name, err))?;
        let Some(resource) = opened else {
            debug!(%loader_id, resource = resource_name, "no batch artifact descriptor");
            return Ok(ArtifactRegistry::empty(loader_id, &*self.clock));
        };

        self.read_descriptor(loader, resource)
            .map_err(|cause| ArtifactRegistryLoadError::new(loader_id, resource_name, cause))
    }

    fn read_descriptor(
        &self,
        loader: &dyn ArtifactLoader,
        resource: ArtifactResource,
    ) -> Result<ArtifactRegistry, ArtifactRegistryLoadCause> {
        let declarations = scan_descriptor(resource, &self.config.root)?;
        let mut builder = ArtifactRegistryBuilder::new(loader.loader_id());

        for declaration in declarations {
            let (type_tag, id, class_name) = entry_parts(declaration)?;
            let class = loader.load_class(&class_name)?;
            builder.add_entry(type_tag, id, class)?;
        }

        let source = RegistrySource::Descriptor {
            resource: self.config.resource_name.clone(),
        };
        Ok(builder.build(source, &*self.clock))
    }
}

fn entry_parts(
    declaration: ArtifactDeclaration,
) -> Result<(TypeTag, ArtifactId, ClassName), ArtifactRegistryDomainError> {
    let ArtifactDeclaration {
        type_tag,
        id,
        class_name,
    } = declaration;

    let Some(raw_id) = id else {
        return Err(ArtifactRegistryDomainError::MissingAttribute {
            type_tag,
            attribute: "id",
        });
    };
    let Some(raw_class) = class_name else {
        return Err(ArtifactRegistryDomainError::MissingAttribute {
            type_tag,
            attribute: "class",
        });
    };

    Ok((
        TypeTag::new(type_tag)?,
        ArtifactId::new(raw_id),
        ClassName::new(raw_class)?,
    ))
}

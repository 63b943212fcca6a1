//! Per-loader artifact map.

use super::{ArtifactClass, ArtifactId, ArtifactRegistryDomainError, LoaderId, TypeTag};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Where a registry's entries came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RegistrySource {
    /// Entries were read from the named loader resource.
    Descriptor {
        /// Resource name the descriptor was opened under.
        resource: String,
    },
    /// The loader has no descriptor; the registry is empty.
    Absent,
}

/// Mutable accumulator used while a descriptor is being read.
///
/// Callers must hold the population lock for the owning loader while feeding
/// entries; the builder itself performs no synchronisation.
#[derive(Debug)]
pub struct ArtifactRegistryBuilder {
    loader_id: LoaderId,
    classes: HashMap<ArtifactId, ArtifactClass>,
    type_tags: HashMap<ArtifactId, Vec<TypeTag>>,
}

impl ArtifactRegistryBuilder {
    /// Creates an empty builder for the given loader.
    #[must_use]
    pub fn new(loader_id: LoaderId) -> Self {
        Self {
            loader_id,
            classes: HashMap::new(),
            type_tags: HashMap::new(),
        }
    }

    /// Records that `id` is implemented by `class` under role `type_tag`.
    ///
    /// Redeclaring a known id with the same class appends the tag to that
    /// id's role list; repeated tags are kept once.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactRegistryDomainError::IdCollision`] when `id` is
    /// already mapped to a different class. The builder is left unchanged.
    pub fn add_entry(
        &mut self,
        type_tag: TypeTag,
        id: ArtifactId,
        class: ArtifactClass,
    ) -> Result<(), ArtifactRegistryDomainError> {
        match self.classes.entry(id) {
            Entry::Vacant(vacant) => {
                self.type_tags.insert(vacant.key().clone(), vec![type_tag]);
                vacant.insert(class);
            }
            Entry::Occupied(occupied) => {
                if *occupied.get() != class {
                    return Err(ArtifactRegistryDomainError::IdCollision {
                        id: occupied.key().as_str().to_owned(),
                        existing: occupied.get().name().clone(),
                        conflicting: class.name().clone(),
                    });
                }
                let tags = self.type_tags.entry(occupied.key().clone()).or_default();
                if !tags.contains(&type_tag) {
                    tags.push(type_tag);
                }
            }
        }
        Ok(())
    }

    /// Freezes the accumulated entries into an immutable registry.
    #[must_use]
    pub fn build(self, source: RegistrySource, clock: &impl Clock) -> ArtifactRegistry {
        ArtifactRegistry {
            loader_id: self.loader_id,
            source,
            classes: self.classes,
            type_tags: self.type_tags,
            populated_at: clock.utc(),
        }
    }
}

/// Immutable artifact map for one loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRegistry {
    loader_id: LoaderId,
    source: RegistrySource,
    classes: HashMap<ArtifactId, ArtifactClass>,
    type_tags: HashMap<ArtifactId, Vec<TypeTag>>,
    populated_at: DateTime<Utc>,
}

impl ArtifactRegistry {
    /// Creates the registry of a loader that declares no artifacts.
    #[must_use]
    pub fn empty(loader_id: LoaderId, clock: &impl Clock) -> Self {
        ArtifactRegistryBuilder::new(loader_id).build(RegistrySource::Absent, clock)
    }

    /// Returns the class implementing `id`, if declared.
    #[must_use]
    pub fn artifact_by_id(&self, id: &str) -> Option<&ArtifactClass> {
        self.classes.get(id)
    }

    /// Returns the roles `id` was declared under, in declaration order.
    #[must_use]
    pub fn batch_types(&self, id: &str) -> Option<&[TypeTag]> {
        self.type_tags.get(id).map(Vec::as_slice)
    }

    /// Returns every declared id in lexical order.
    #[must_use]
    pub fn artifact_ids(&self) -> Vec<&ArtifactId> {
        let mut ids: Vec<&ArtifactId> = self.classes.keys().collect();
        ids.sort();
        ids
    }

    /// Iterates over `(id, class)` pairs in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&ArtifactId, &ArtifactClass)> {
        self.classes.iter()
    }

    /// Returns the number of declared ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns whether no ids are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the loader this registry belongs to.
    #[must_use]
    pub const fn loader_id(&self) -> LoaderId {
        self.loader_id
    }

    /// Returns where the entries were read from.
    #[must_use]
    pub const fn source(&self) -> &RegistrySource {
        &self.source
    }

    /// Returns when population finished.
    #[must_use]
    pub const fn populated_at(&self) -> DateTime<Utc> {
        self.populated_at
    }
}

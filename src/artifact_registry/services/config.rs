//! Configuration for registry population.

use crate::artifact_registry::scanner::ExpectedRoot;
use serde::{Deserialize, Serialize};

/// Resource every loader is asked for by default.
pub const DEFAULT_DESCRIPTOR_RESOURCE: &str = "META-INF/batch.xml";

/// Settings controlling where descriptors are read from and what they must
/// look like.
///
/// Every field has a default, so a host can embed this in its own
/// configuration and override only what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactRegistryConfig {
    /// Loader resource holding the artifact descriptor.
    pub resource_name: String,
    /// Root element the descriptor must start with.
    pub root: ExpectedRoot,
}

impl Default for ArtifactRegistryConfig {
    fn default() -> Self {
        Self {
            resource_name: DEFAULT_DESCRIPTOR_RESOURCE.to_owned(),
            root: ExpectedRoot::default(),
        }
    }
}

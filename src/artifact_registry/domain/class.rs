//! Resolved class handles.

use super::{ClassName, LoaderId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A class resolved through a loader.
///
/// Two handles denote the same class only when both the name and the
/// defining loader match, mirroring how a JVM distinguishes classes loaded by
/// different classloaders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactClass {
    name: ClassName,
    defining_loader: LoaderId,
}

impl ArtifactClass {
    /// Creates a class handle defined by `defining_loader`.
    #[must_use]
    pub const fn new(name: ClassName, defining_loader: LoaderId) -> Self {
        Self {
            name,
            defining_loader,
        }
    }

    /// Returns the fully qualified class name.
    #[must_use]
    pub const fn name(&self) -> &ClassName {
        &self.name
    }

    /// Returns the loader that defined the class.
    #[must_use]
    pub const fn defining_loader(&self) -> LoaderId {
        self.defining_loader
    }
}

impl fmt::Display for ArtifactClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name.as_str())
    }
}

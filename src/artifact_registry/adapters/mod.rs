//! Adapter implementations for the artifact loader port.

mod directory;
mod memory;

pub use directory::DirectoryArtifactLoader;
pub use memory::InMemoryArtifactLoader;

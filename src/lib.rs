//! Batch artifact registries scoped to loaders.
//!
//! A batch runtime refers to user artifacts by short ids. Each loader scope
//! (a module, bundle or application classloader) may map those ids to
//! implementation classes in a `META-INF/batch.xml` descriptor. This crate
//! reads that descriptor once per loader, caches the result without keeping
//! the loader alive, and answers id lookups.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Artifact ids, class handles and the per-loader artifact map
//! - **Ports**: The loader contract the registry is scoped to
//! - **Adapters**: In-memory and directory-backed loaders
//!
//! # Modules
//!
//! - [`artifact_registry`]: Descriptor scanning, registry caching and lookup

pub mod artifact_registry;

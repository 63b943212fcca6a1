//! Classloader-scoped registry of batch artifacts.
//!
//! Each loader scope may ship a `META-INF/batch.xml` descriptor mapping short
//! artifact ids to implementation classes. This module parses that descriptor
//! at most once per loader, caches the result without pinning the loader, and
//! answers id lookups. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Descriptor scanning in [`scanner`]
//! - Caching and lookup services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod scanner;
pub mod services;

//! Single population under concurrent construction.

use std::sync::{Arc, Barrier};
use std::thread;

use batch_artifacts::artifact_registry::{
    adapters::InMemoryArtifactLoader,
    services::{ArtifactRegistryCache, BatchArtifactMapper},
};
use rstest::rstest;

use super::helpers::{as_port, batch_xml, loader_with_descriptor};

const THREADS: usize = 16;

#[rstest]
fn concurrent_mappers_share_one_population() {
    let cache = ArtifactRegistryCache::with_defaults();
    let loader = loader_with_descriptor(
        &batch_xml(
            r#"<item-reader id="R" class="pkg.Reader"/>
               <item-writer id="W" class="pkg.Writer"/>"#,
        ),
        &["pkg.Reader", "pkg.Writer"],
    );
    let port = as_port(&loader);
    let barrier = Barrier::new(THREADS);

    let mappers: Vec<BatchArtifactMapper> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    BatchArtifactMapper::new(&cache, &port)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("worker should not panic")
                    .expect("mapper should build")
            })
            .collect()
    });

    assert_eq!(loader.resource_lookups(), 1);
    let first = mappers.first().expect("at least one mapper");
    for mapper in &mappers {
        assert!(Arc::ptr_eq(first.registry(), mapper.registry()));
        assert!(mapper.artifact_by_id("W").is_some());
    }
}

#[rstest]
fn distinct_loaders_populate_independently() {
    let cache = ArtifactRegistryCache::with_defaults();
    let loaders: Vec<Arc<InMemoryArtifactLoader>> = (0..THREADS)
        .map(|index| {
            loader_with_descriptor(
                &batch_xml(&format!(r#"<batchlet id="task" class="pkg.Task{index}"/>"#)),
                &[format!("pkg.Task{index}").as_str()],
            )
        })
        .collect();
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for loader in &loaders {
            let port = as_port(loader);
            let cache_ref = &cache;
            let barrier_ref = &barrier;
            scope.spawn(move || {
                barrier_ref.wait();
                BatchArtifactMapper::new(cache_ref, &port).expect("mapper should build")
            });
        }
    });

    assert_eq!(cache.len(), THREADS);
    for (index, loader) in loaders.iter().enumerate() {
        assert_eq!(loader.resource_lookups(), 1);
        let registry = cache
            .registry_for(&as_port(loader))
            .expect("cached registry should be served");
        let expected = format!("pkg.Task{index}");
        assert_eq!(
            registry
                .artifact_by_id("task")
                .map(|class| class.name().as_str()),
            Some(expected.as_str())
        );
    }
}

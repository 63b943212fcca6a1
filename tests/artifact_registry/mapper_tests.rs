//! Lookups through the mapper façade.

use std::sync::Arc;

use batch_artifacts::artifact_registry::{
    adapters::InMemoryArtifactLoader,
    domain::{ArtifactRegistryDomainError, RegistrySource},
    ports::ArtifactLoader,
    scanner::DescriptorScanError,
    services::{ArtifactRegistryCache, ArtifactRegistryLoadCause, BatchArtifactMapper},
};
use rstest::{fixture, rstest};

use super::helpers::{as_port, batch_xml, loader_with_descriptor};

#[fixture]
fn cache() -> ArtifactRegistryCache {
    ArtifactRegistryCache::with_defaults()
}

#[rstest]
fn declared_id_resolves_to_its_class(cache: ArtifactRegistryCache) {
    let loader = loader_with_descriptor(
        &batch_xml(r#"<item-processor id="A" class="pkg.Foo"/>"#),
        &["pkg.Foo"],
    );

    let mapper = BatchArtifactMapper::new(&cache, &as_port(&loader))
        .expect("mapper construction should succeed");

    let class = mapper.artifact_by_id("A").expect("A should be declared");
    assert_eq!(class.name().as_str(), "pkg.Foo");
    assert_eq!(class.defining_loader(), loader.loader_id());
    assert!(mapper.artifact_by_id("B").is_none());
    assert!(mapper.artifact_by_id("a").is_none());
}

#[rstest]
fn one_class_may_serve_several_roles(cache: ArtifactRegistryCache) {
    let loader = loader_with_descriptor(
        &batch_xml(
            r#"<item-processor id="A" class="pkg.Foo"/>
               <item-writer id="A" class="pkg.Foo"/>"#,
        ),
        &["pkg.Foo"],
    );

    let mapper = BatchArtifactMapper::new(&cache, &as_port(&loader))
        .expect("mapper construction should succeed");

    assert_eq!(
        mapper.artifact_by_id("A").map(|class| class.name().as_str()),
        Some("pkg.Foo")
    );
    let roles: Vec<&str> = mapper
        .batch_types("A")
        .expect("roles should be recorded")
        .iter()
        .map(|tag| tag.as_str())
        .collect();
    assert_eq!(roles, ["item-processor", "item-writer"]);
}

#[rstest]
fn conflicting_classes_for_one_id_are_rejected(cache: ArtifactRegistryCache) {
    let loader = loader_with_descriptor(
        &batch_xml(
            r#"<item-processor id="A" class="pkg.Foo"/>
               <item-writer id="A" class="pkg.Bar"/>"#,
        ),
        &["pkg.Foo", "pkg.Bar"],
    );

    let error = BatchArtifactMapper::new(&cache, &as_port(&loader))
        .expect_err("collision should fail construction");

    assert!(matches!(
        error.cause(),
        ArtifactRegistryLoadCause::Domain(ArtifactRegistryDomainError::IdCollision { id, .. })
            if id == "A"
    ));
    assert!(!cache.contains(loader.loader_id()));
}

#[rstest]
fn wrong_root_is_a_structural_error(cache: ArtifactRegistryCache) {
    let loader = loader_with_descriptor(
        r#"<batch-artifacts xmlns="http://java.sun.com/xml/ns/javaee">
               <batchlet id="B" class="pkg.Batchlet"/>
           </batch-artifacts>"#,
        &["pkg.Batchlet"],
    );

    let error = BatchArtifactMapper::new(&cache, &as_port(&loader))
        .expect_err("wrong namespace should fail construction");

    assert!(matches!(
        error.cause(),
        ArtifactRegistryLoadCause::Scan(DescriptorScanError::UnexpectedRoot { .. })
    ));
    assert!(error.to_string().contains("expecting root element"));
}

#[rstest]
fn loader_without_descriptor_has_no_artifacts(cache: ArtifactRegistryCache) {
    let loader: Arc<dyn ArtifactLoader> = Arc::new(InMemoryArtifactLoader::new());

    let mapper =
        BatchArtifactMapper::new(&cache, &loader).expect("absent descriptor is not an error");

    assert!(mapper.artifact_by_id("anything").is_none());
    assert!(mapper.batch_types("anything").is_none());
    assert_eq!(mapper.registry().source(), &RegistrySource::Absent);
}

#[rstest]
fn child_loader_inherits_parent_descriptor_and_classes(cache: ArtifactRegistryCache) {
    let parent = loader_with_descriptor(
        &batch_xml(r#"<item-reader id="R" class="pkg.Reader"/>"#),
        &["pkg.Reader"],
    );
    let child = Arc::new(InMemoryArtifactLoader::new().with_parent(as_port(&parent)));

    let mapper = BatchArtifactMapper::new(&cache, &as_port(&child))
        .expect("mapper construction should succeed");

    let class = mapper.artifact_by_id("R").expect("R should be declared");
    assert_eq!(class.defining_loader(), parent.loader_id());
    assert_eq!(mapper.registry().loader_id(), child.loader_id());
}

#[rstest]
fn each_loader_has_its_own_id_namespace(cache: ArtifactRegistryCache) {
    let first = loader_with_descriptor(
        &batch_xml(r#"<batchlet id="task" class="pkg.First"/>"#),
        &["pkg.First"],
    );
    let second = loader_with_descriptor(
        &batch_xml(r#"<batchlet id="task" class="pkg.Second"/>"#),
        &["pkg.Second"],
    );

    let first_mapper = BatchArtifactMapper::new(&cache, &as_port(&first))
        .expect("first mapper should build");
    let second_mapper = BatchArtifactMapper::new(&cache, &as_port(&second))
        .expect("second mapper should build");

    assert_eq!(
        first_mapper
            .artifact_by_id("task")
            .map(|class| class.name().as_str()),
        Some("pkg.First")
    );
    assert_eq!(
        second_mapper
            .artifact_by_id("task")
            .map(|class| class.name().as_str()),
        Some("pkg.Second")
    );
    assert_eq!(cache.len(), 2);
}

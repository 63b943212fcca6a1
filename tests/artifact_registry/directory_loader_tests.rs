//! Descriptors and classes read from an exploded module directory.

use std::fs;
use std::sync::Arc;

use batch_artifacts::artifact_registry::{
    adapters::DirectoryArtifactLoader,
    domain::{ClassName, RegistrySource},
    ports::{ArtifactLoader, ArtifactLoaderError},
    services::{ArtifactRegistryCache, ArtifactRegistryLoadCause, BatchArtifactMapper},
};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::helpers::batch_xml;

struct ModuleDir {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl ModuleDir {
    fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent directories should be created");
        }
        fs::write(path, contents).expect("file should be written");
    }

    fn loader(&self) -> Arc<dyn ArtifactLoader> {
        Arc::new(DirectoryArtifactLoader::open(self.root.clone()).expect("root should open"))
    }
}

#[fixture]
fn module_dir() -> ModuleDir {
    let temp = TempDir::new().expect("temporary directory should be created");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .expect("temporary directory path should be UTF-8");
    ModuleDir { _temp: temp, root }
}

#[rstest]
fn classes_resolve_from_class_files(module_dir: ModuleDir) {
    module_dir.write(
        "META-INF/batch.xml",
        &batch_xml(
            r#"<item-reader id="reader" class="com.acme.CsvReader"/>
               <listener id="audit" class="com.acme.Listeners$Audit"/>"#,
        ),
    );
    module_dir.write("com/acme/CsvReader.class", "");
    module_dir.write("com/acme/Listeners$Audit.class", "");
    let cache = ArtifactRegistryCache::with_defaults();

    let mapper = BatchArtifactMapper::new(&cache, &module_dir.loader())
        .expect("mapper should build");

    assert_eq!(
        mapper
            .artifact_by_id("reader")
            .map(|class| class.name().as_str()),
        Some("com.acme.CsvReader")
    );
    assert!(mapper.artifact_by_id("audit").is_some());
}

#[rstest]
fn missing_class_file_fails_population(module_dir: ModuleDir) {
    module_dir.write(
        "META-INF/batch.xml",
        &batch_xml(r#"<batchlet id="b" class="com.acme.Gone"/>"#),
    );
    let cache = ArtifactRegistryCache::with_defaults();

    let error = BatchArtifactMapper::new(&cache, &module_dir.loader())
        .expect_err("missing class should fail");

    assert!(matches!(
        error.cause(),
        ArtifactRegistryLoadCause::Loader(ArtifactLoaderError::ClassNotFound { .. })
    ));
}

#[rstest]
fn directory_without_descriptor_is_empty(module_dir: ModuleDir) {
    let cache = ArtifactRegistryCache::with_defaults();

    let mapper = BatchArtifactMapper::new(&cache, &module_dir.loader())
        .expect("absent descriptor is not an error");

    assert!(mapper.registry().is_empty());
    assert_eq!(mapper.registry().source(), &RegistrySource::Absent);
}

#[rstest]
fn class_directories_are_not_classes(module_dir: ModuleDir) {
    fs::create_dir_all(module_dir.root.join("com/acme/Dir.class"))
        .expect("directory should be created");
    let loader = module_dir.loader();

    let result = loader.load_class(&ClassName::new("com.acme.Dir").expect("valid class name"));

    assert!(matches!(
        result,
        Err(ArtifactLoaderError::ClassNotFound { .. })
    ));
}

#[rstest]
fn resources_outside_the_root_are_refused(module_dir: ModuleDir) {
    let loader = module_dir.loader();

    let result = loader.open_resource("../escape.xml");

    assert!(matches!(result, Err(ArtifactLoaderError::Io(_))));
}

#[rstest]
fn loader_remembers_its_root(module_dir: ModuleDir) {
    let loader =
        DirectoryArtifactLoader::open(module_dir.root.clone()).expect("root should open");

    assert_eq!(loader.root(), module_dir.root.as_path());
}

#[rstest]
fn opening_a_missing_root_fails() {
    let result = DirectoryArtifactLoader::open("/definitely/not/a/real/module/root");

    assert!(matches!(result, Err(ArtifactLoaderError::Io(_))));
}

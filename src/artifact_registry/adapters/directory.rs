//! Loader backed by an exploded module directory.

use crate::artifact_registry::{
    domain::{ArtifactClass, ClassName, LoaderId},
    ports::{ArtifactLoader, ArtifactLoaderError, ArtifactLoaderResult, ArtifactResource},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use std::io::ErrorKind;

/// Loader over a directory laid out like an unpacked archive.
///
/// Resources are paths relative to the root. A class `a.b.C` exists when
/// `a/b/C.class` is a regular file. The root is opened once with ambient
/// authority; every later access is confined to it.
#[derive(Debug)]
pub struct DirectoryArtifactLoader {
    id: LoaderId,
    root: Utf8PathBuf,
    dir: Dir,
}

impl DirectoryArtifactLoader {
    /// Opens `root` as a loader scope with a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactLoaderError::Io`] when the directory cannot be
    /// opened.
    pub fn open(root: impl Into<Utf8PathBuf>) -> ArtifactLoaderResult<Self> {
        let root_path = root.into();
        let dir = Dir::open_ambient_dir(root_path.as_std_path(), ambient_authority())
            .map_err(ArtifactLoaderError::io)?;
        Ok(Self {
            id: LoaderId::new(),
            root: root_path,
            dir,
        })
    }

    /// Returns the directory this loader is rooted at.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl ArtifactLoader for DirectoryArtifactLoader {
    fn loader_id(&self) -> LoaderId {
        self.id
    }

    fn open_resource(&self, name: &str) -> ArtifactLoaderResult<Option<ArtifactResource>> {
        match self.dir.open(name) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ArtifactLoaderError::io(err)),
        }
    }

    fn load_class(&self, class_name: &ClassName) -> ArtifactLoaderResult<ArtifactClass> {
        if self.dir.is_file(class_name.class_file_path()) {
            Ok(ArtifactClass::new(class_name.clone(), self.id))
        } else {
            Err(ArtifactLoaderError::ClassNotFound {
                class_name: class_name.clone(),
                loader_id: self.id,
            })
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::domain::dataset_error::DatasetError;
use crate::dataset::domain::object_selection::filter_object_names;
use crate::shared::constants::IMAGES_SUBDIR;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// Sorted names of the entries of `path` with the given kind.
pub fn list_entries(path: &Path, kind: EntryKind) -> Result<Vec<String>, DatasetError> {
    let list_err = |source| DatasetError::List {
        path: path.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let is_dir = entry.file_type().map_err(list_err)?.is_dir();
        let wanted = match kind {
            EntryKind::Dir => is_dir,
            EntryKind::File => !is_dir,
        };
        if wanted {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Read-only view of a `root/<object>/images_lr/<camera>/<image>` tree.
#[derive(Clone, Debug)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Object directories under the root, sorted. Fails if there are none.
    pub fn objects(&self) -> Result<Vec<String>, DatasetError> {
        let objects = filter_object_names(list_entries(&self.root, EntryKind::Dir)?);
        if objects.is_empty() {
            return Err(DatasetError::EmptyRoot(self.root.clone()));
        }
        Ok(objects)
    }

    pub fn cameras(&self, object: &str) -> Result<Vec<String>, DatasetError> {
        list_entries(&self.object_images_dir(object), EntryKind::Dir)
    }

    pub fn images(&self, object: &str, camera: &str) -> Result<Vec<String>, DatasetError> {
        list_entries(&self.camera_dir(object, camera), EntryKind::File)
    }

    pub fn image_path(&self, object: &str, camera: &str, image: &str) -> PathBuf {
        self.camera_dir(object, camera).join(image)
    }

    fn object_images_dir(&self, object: &str) -> PathBuf {
        self.root.join(object).join(IMAGES_SUBDIR)
    }

    fn camera_dir(&self, object: &str, camera: &str) -> PathBuf {
        self.object_images_dir(object).join(camera)
    }
}

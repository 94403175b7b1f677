//! Handle to the skin library on disk.
//!
//! Layout:
//!
//! ```text
//! <asset_dir>/<map>/default/<relative_folder>/<file>    backups, reset source
//! <asset_dir>/<map>/<variant>/<relative_folder>/<file>  alternate skins
//! ```

use std::path::{Path, PathBuf};
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{Variant, DEFAULT_VARIANT, RESERVED_MAP_NAMES};

/// The asset library root, passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    root: PathBuf,
}

impl AssetLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetLibrary { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn map_dir(&self, map: &str) -> PathBuf {
        self.root.join(map)
    }

    pub fn variant_dir(&self, map: &str, variant: &str) -> PathBuf {
        self.root.join(map).join(variant)
    }

    /// The map's `default` variant directory.
    pub fn default_dir(&self, map: &str) -> PathBuf {
        self.variant_dir(map, DEFAULT_VARIANT)
    }

    /// Map directory names, excluding the reserved `default`, `defaults`
    /// and `Backgrounds` entries and anything that is not a directory.
    ///
    /// # Errors
    /// Returns `EnumerationFailed` if the library root cannot be listed.
    pub fn map_names(&self) -> Result<Vec<String>, EngineError> {
        let mut names = fs_ops::list_subdirectories(&self.root)?;
        names.retain(|name| !RESERVED_MAP_NAMES.contains(&name.as_str()));
        Ok(names)
    }

    /// Every variant directory of `map`, classified, in enumeration order.
    ///
    /// # Errors
    /// Returns `EnumerationFailed` if the map directory cannot be listed.
    pub fn variants(&self, map: &str) -> Result<Vec<Variant>, EngineError> {
        let names = fs_ops::list_subdirectories(&self.map_dir(map))?;
        Ok(names.into_iter().map(Variant::new).collect())
    }
}

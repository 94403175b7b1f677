//! Sync-folder resolution.
//!
//! Expands the configured folder templates into the concrete relative
//! folders to synchronize for one map/variant pair. Only the variant's side
//! is inspected; the live root is never touched here.

use std::path::{Path, PathBuf};
use tracing::debug;
use crate::error::EngineError;
use crate::fs_ops;

/// Folder holding per-level art, one subdirectory per level name.
pub const MAP_ART_FOLDER: &str = "mapArt";

/// Template entry that expands to every `mapArt/<name>` of the variant.
pub const MAP_ART_TEMPLATE: &str = "mapArt/{map_name}";

/// Shared backgrounds folder; synced by its own template, never expanded.
const BACKGROUNDS_FOLDER: &str = "Backgrounds";

/// Folder templates used when the config does not list any.
pub fn default_sync_folders() -> Vec<String> {
    [
        "images/thumbnails",
        "images/chests",
        "images/tiles",
        "images/UI",
        "mapArt/Backgrounds",
        MAP_ART_TEMPLATE,
        "mp3",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Resolve `templates` against the variant directory.
///
/// Every template is kept as given, in order. When the list contains
/// [`MAP_ART_TEMPLATE`] and the variant has a `mapArt` folder, each of its
/// subdirectories other than `Backgrounds` is appended as `mapArt/<name>`.
///
/// # Errors
/// Returns `EnumerationFailed` if the variant's `mapArt` folder exists but
/// cannot be listed.
pub fn resolve_sync_folders(
    templates: &[String],
    variant_dir: &Path,
) -> Result<Vec<PathBuf>, EngineError> {
    let mut folders: Vec<PathBuf> = templates.iter().map(PathBuf::from).collect();

    let map_art = variant_dir.join(MAP_ART_FOLDER);
    if templates.iter().any(|t| t == MAP_ART_TEMPLATE) && map_art.is_dir() {
        for name in fs_ops::list_subdirectories(&map_art)? {
            if name == BACKGROUNDS_FOLDER {
                continue;
            }
            debug!(variant = %variant_dir.display(), level = %name, "expanded mapArt folder");
            folders.push(Path::new(MAP_ART_FOLDER).join(name));
        }
    }

    Ok(folders)
}

//! Read-only comparison of live files against their `default` backups.

use std::path::Path;
use tracing::debug;
use crate::checksums::{files_match, ChecksumAlgorithm};
use crate::error::EngineError;
use crate::fs_ops;
use crate::library::AssetLibrary;
use crate::sync::resolve_sync_folders;

/// How far a map's live files are from their originals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStatus {
    pub map: String,
    /// Backed-up files that also exist live
    pub checked: usize,
    /// Of those, how many currently differ from the backup
    pub differing: usize,
}

impl MapStatus {
    /// True when every checked live file matches its backup.
    pub fn is_original(&self) -> bool {
        self.differing == 0
    }
}

/// Compare every file of the map's `default` variant that has a live
/// counterpart. Nothing is written.
///
/// # Errors
/// Enumeration and read errors abort the comparison.
pub fn map_status(
    library: &AssetLibrary,
    live_root: &Path,
    map: &str,
    sync_folders: &[String],
    algorithm: ChecksumAlgorithm,
) -> Result<MapStatus, EngineError> {
    let default_dir = library.default_dir(map);
    let mut status = MapStatus {
        map: map.to_string(),
        checked: 0,
        differing: 0,
    };
    if !default_dir.is_dir() {
        return Ok(status);
    }

    for folder in resolve_sync_folders(sync_folders, &default_dir)? {
        let backup_folder = default_dir.join(&folder);
        if !backup_folder.is_dir() {
            continue;
        }
        for file in fs_ops::list_files(&backup_folder)? {
            let live_file = live_root.join(&folder).join(&file);
            if !live_file.is_file() {
                continue;
            }
            status.checked += 1;
            if !files_match(&backup_folder.join(&file), &live_file, algorithm)? {
                debug!(live = %live_file.display(), "live file differs from backup");
                status.differing += 1;
            }
        }
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::default_sync_folders;
    use std::fs;

    fn write(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create dir");
        fs::write(path, content).expect("Failed to write file");
    }

    #[test]
    fn test_status_counts_differences() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let library = AssetLibrary::new(temp.path().join("library"));
        let live = temp.path().join("live");
        let default_dir = library.default_dir("Midgard");

        write(&default_dir.join("images/UI/bg.png"), b"original");
        write(&default_dir.join("mp3/theme.mp3"), b"theme");
        write(&default_dir.join("mp3/uninstalled.mp3"), b"gone");
        write(&live.join("images/UI/bg.png"), b"snowy");
        write(&live.join("mp3/theme.mp3"), b"theme");

        let status = map_status(
            &library,
            &live,
            "Midgard",
            &default_sync_folders(),
            ChecksumAlgorithm::Blake3,
        )
        .expect("Failed to compute status");

        assert_eq!(status.checked, 2);
        assert_eq!(status.differing, 1);
        assert!(!status.is_original());
    }

    #[test]
    fn test_status_without_backups_is_original() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let library = AssetLibrary::new(temp.path());
        fs::create_dir_all(library.variant_dir("Titan", "night")).unwrap();

        let status = map_status(&library, temp.path(), "Titan", &default_sync_folders(), ChecksumAlgorithm::Md5)
            .expect("Failed to compute status");
        assert_eq!(status.checked, 0);
        assert!(status.is_original());
    }
}

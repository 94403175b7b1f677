//! Asset copying.
//!
//! Overwrites live files with a variant's files, one folder level per sync
//! folder. Only files that already exist in the live root are touched; the
//! engine never introduces new file names into the installation.

use std::path::Path;
use tracing::debug;
use crate::backup::{ensure_backup, BackupStore};
use crate::error::EngineError;
use crate::fs_ops;
use crate::library::AssetLibrary;
use crate::model::{ApplyReport, MapAssignment, Variant};
use crate::progress::ProgressCallback;
use crate::sync::resolve_sync_folders;

/// Copies variant files over the live asset root.
pub struct AssetCopier<'a> {
    library: &'a AssetLibrary,
    live_root: &'a Path,
    backups: &'a dyn BackupStore,
    sync_folders: &'a [String],
}

impl<'a> AssetCopier<'a> {
    pub fn new(
        library: &'a AssetLibrary,
        live_root: &'a Path,
        backups: &'a dyn BackupStore,
        sync_folders: &'a [String],
    ) -> Self {
        AssetCopier {
            library,
            live_root,
            backups,
            sync_folders,
        }
    }

    /// Pair `map` with `variant` and resolve its sync folders.
    ///
    /// # Errors
    /// `EnumerationFailed` if the variant's `mapArt` folder cannot be listed.
    pub fn assign(&self, map: &str, variant: Variant) -> Result<MapAssignment, EngineError> {
        let variant_dir = self.library.variant_dir(map, &variant.name);
        let folders = resolve_sync_folders(self.sync_folders, &variant_dir)?;
        Ok(MapAssignment {
            map: map.to_string(),
            variant,
            folders,
        })
    }

    /// Resolve and apply `variant` to `map` in one step.
    pub fn apply_variant(
        &self,
        map: &str,
        variant: Variant,
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<ApplyReport, EngineError> {
        let assignment = self.assign(map, variant)?;
        self.apply(&assignment, progress)
    }

    /// Copy every file of the assignment's folders over the live root.
    ///
    /// Folders the variant does not have are skipped, as are files with no
    /// live counterpart. Unless the variant is `default`, each live file is
    /// backed up before its first overwrite.
    ///
    /// # Errors
    /// The first I/O or backup error aborts the map; files already copied
    /// stay overwritten.
    pub fn apply(
        &self,
        assignment: &MapAssignment,
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<ApplyReport, EngineError> {
        let map = assignment.map.as_str();
        let variant_dir = self.library.variant_dir(map, &assignment.variant.name);
        let mut report = ApplyReport::default();

        for folder in &assignment.folders {
            let variant_folder = variant_dir.join(folder);
            if !variant_folder.is_dir() {
                continue;
            }

            for file in fs_ops::list_files(&variant_folder)? {
                let live_file = self.live_root.join(folder).join(&file);
                if !live_file.exists() {
                    debug!(live = %live_file.display(), "no live counterpart; skipping");
                    continue;
                }

                if !assignment.variant.is_default()
                    && ensure_backup(self.backups, self.live_root, map, folder, &file)?
                {
                    report.backups_taken += 1;
                    if let Some(callback) = progress {
                        callback.on_backup_taken(map, folder, &file);
                    }
                }

                fs_ops::overwrite_file(&variant_folder.join(&file), &live_file)?;
                report.files_overwritten += 1;
                debug!(live = %live_file.display(), variant = %assignment.variant, "overwrote live file");
            }
        }

        Ok(report)
    }
}

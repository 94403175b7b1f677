//! First-overwrite backups.
//!
//! Before a live file is overwritten for the first time, its original
//! content is captured under the map's `default` variant at the same
//! relative path. A backup, once written, is never replaced: its presence
//! alone marks the file as backed up.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::error::EngineError;
use crate::fs_ops;
use crate::library::AssetLibrary;

/// Storage for original copies of live files, keyed by
/// (map, relative folder, file name).
pub trait BackupStore {
    /// Whether a backup for this key already exists.
    fn has_backup(&self, map: &str, folder: &Path, file: &OsStr) -> bool;

    /// Store the content of `live_file` as the backup for this key.
    ///
    /// A failed write must leave no backup behind.
    fn write_backup(
        &self,
        map: &str,
        folder: &Path,
        file: &OsStr,
        live_file: &Path,
    ) -> Result<(), EngineError>;
}

/// Backups kept as plain files under `<asset_dir>/<map>/default/`.
#[derive(Debug, Clone)]
pub struct DirectoryBackupStore {
    library: AssetLibrary,
}

impl DirectoryBackupStore {
    pub fn new(library: AssetLibrary) -> Self {
        DirectoryBackupStore { library }
    }

    /// Where the backup for this key lives.
    pub fn backup_path(&self, map: &str, folder: &Path, file: &OsStr) -> PathBuf {
        self.library.default_dir(map).join(folder).join(file)
    }
}

impl BackupStore for DirectoryBackupStore {
    fn has_backup(&self, map: &str, folder: &Path, file: &OsStr) -> bool {
        self.backup_path(map, folder, file).exists()
    }

    fn write_backup(
        &self,
        map: &str,
        folder: &Path,
        file: &OsStr,
        live_file: &Path,
    ) -> Result<(), EngineError> {
        let target = self.backup_path(map, folder, file);
        let bytes = fs_ops::copy_file_atomic(live_file, &target)?;
        debug!(backup = %target.display(), bytes, "wrote backup");
        Ok(())
    }
}

/// Back up `<live_root>/<folder>/<file>` unless a backup already exists.
///
/// Returns `true` if a backup was written by this call.
///
/// # Errors
/// `MissingAsset` if there is no backup yet and the live file does not
/// exist; I/O errors from the copy otherwise.
pub fn ensure_backup(
    store: &dyn BackupStore,
    live_root: &Path,
    map: &str,
    folder: &Path,
    file: &OsStr,
) -> Result<bool, EngineError> {
    if store.has_backup(map, folder, file) {
        return Ok(false);
    }

    let live_file = live_root.join(folder).join(file);
    if !live_file.is_file() {
        return Err(EngineError::MissingAsset { path: live_file });
    }

    debug!(map = %map, folder = %folder.display(), file = ?file, "backing up original");
    store.write_backup(map, folder, file, &live_file)?;
    Ok(true)
}

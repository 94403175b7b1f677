//! Filesystem operations module.
//!
//! This module provides low-level operations for:
//! - Listing the directories and files of a single folder level
//! - Overwriting files byte-for-byte
//! - Copying files atomically with modification time preservation
//! - Creating directories recursively

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;
use tempfile::NamedTempFile;
use crate::error::EngineError;

/// Which entries of a folder to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryFilter {
    Directories,
    Files,
}

fn list_entries(path: &Path, filter: EntryFilter) -> Result<Vec<OsString>, EngineError> {
    let entries = fs::read_dir(path).map_err(|e| EngineError::EnumerationFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::EnumerationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Follows symlinks
        let entry_path = entry.path();
        let keep = match filter {
            EntryFilter::Directories => entry_path.is_dir(),
            EntryFilter::Files => entry_path.is_file(),
        };
        if keep {
            names.push(entry.file_name());
        }
    }

    Ok(names)
}

/// List the names of the subdirectories directly inside `path`.
///
/// Names are returned in filesystem enumeration order. Directory names
/// identify maps, variants and map levels, so they must be valid UTF-8.
///
/// # Errors
/// Returns `EnumerationFailed` if the directory cannot be listed or a
/// subdirectory name is not valid UTF-8.
pub fn list_subdirectories(path: &Path) -> Result<Vec<String>, EngineError> {
    list_entries(path, EntryFilter::Directories)?
        .into_iter()
        .map(|name| {
            name.into_string().map_err(|raw| EngineError::EnumerationFailed {
                path: path.join(&raw),
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Directory name is not valid UTF-8",
                ),
            })
        })
        .collect()
}

/// List the names of the regular files directly inside `path` (non-recursive).
///
/// Names are returned as-is, whatever their encoding.
///
/// # Errors
/// Returns `EnumerationFailed` if the directory cannot be listed.
pub fn list_files(path: &Path) -> Result<Vec<OsString>, EngineError> {
    list_entries(path, EntryFilter::Files)
}

/// Stream `reader` into `writer` in 64 KB chunks.
///
/// Read failures are reported against `src`, write failures against `dst`.
fn copy_contents<R: Read, W: Write>(
    reader: &mut R,
    src: &Path,
    writer: &mut W,
    dst: &Path,
) -> Result<u64, EngineError> {
    let mut buffer = [0u8; 65536];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(EngineError::ReadError {
                    path: src.to_path_buf(),
                    source: e,
                })
            }
        };
        writer
            .write_all(&buffer[..n])
            .map_err(|e| EngineError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            })?;
        total += n as u64;
    }

    writer.flush().map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;
    Ok(total)
}

fn open_source(src: &Path) -> Result<fs::File, EngineError> {
    fs::File::open(src).map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })
}

/// Overwrite `dst` with the contents of `src`.
///
/// An existing destination is truncated and rewritten in place, and gets a
/// fresh modification time.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// `ReadError` against `src` or `WriteError` against `dst`
pub fn overwrite_file(src: &Path, dst: &Path) -> Result<u64, EngineError> {
    ensure_parent_dir_exists(dst)?;

    let mut src_file = open_source(src)?;
    let mut dst_file = fs::File::create(dst).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    copy_contents(&mut src_file, src, &mut dst_file, dst)
}

/// Copy `src` to `dst` so that `dst` only ever appears complete.
///
/// The contents go to a temporary file beside `dst`, which takes the
/// source's modification time and is then renamed into place. On failure
/// the temporary file is removed and `dst` is left untouched.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// `ReadError` against `src` or `WriteError` against `dst`
pub fn copy_file_atomic(src: &Path, dst: &Path) -> Result<u64, EngineError> {
    ensure_parent_dir_exists(dst)?;
    let parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut src_file = open_source(src)?;
    let src_mtime = src_file
        .metadata()
        .and_then(|metadata| metadata.modified())
        .ok();

    let mut staged = NamedTempFile::new_in(parent).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;
    let bytes_copied = copy_contents(&mut src_file, src, staged.as_file_mut(), dst)?;
    staged.as_file().sync_all().map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    if let Some(mtime) = src_mtime {
        let mtime = filetime::FileTime::from_system_time(mtime);
        if let Err(e) = filetime::set_file_mtime(staged.path(), mtime) {
            debug!(path = %dst.display(), error = %e, "could not preserve modification time");
        }
    }

    staged.persist(dst).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e.error,
    })?;

    Ok(bytes_copied)
}

/// Ensure the parent directory of a path exists, creating the whole missing
/// chain if necessary.
///
/// # Errors
/// Returns EngineError if directory creation fails or the parent is a file
pub fn ensure_parent_dir_exists(path: &Path) -> Result<(), EngineError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    match fs::metadata(parent) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(EngineError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "Parent path exists but is not a directory",
            ),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(EngineError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: e,
        }),
    }
}

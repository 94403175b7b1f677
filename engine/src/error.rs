//! Error types for the shuffle engine.
//!
//! Every engine operation returns `EngineError` and propagates it with `?`.
//! There is no per-file or per-map isolation: the first error aborts the run,
//! and maps processed before it keep their new state.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use crate::model::JobState;

/// Errors that abort a shuffle or reset run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration is unusable (bad field values, missing required data)
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// The config file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    /// The config file is not valid JSON or has fields of the wrong type
    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The live asset root could not be located (configured path and all fallbacks missing)
    #[error("Cannot locate `brawlhalla_home` directory (configured: {})", display_opt(.configured))]
    LiveRootNotFound { configured: Option<PathBuf> },

    /// A job operation was called in the wrong lifecycle state
    #[error("Job must be {expected:?} for this operation; current state: {actual:?}")]
    InvalidJobState { expected: JobState, actual: JobState },

    /// The asset library directory does not exist
    #[error("Asset directory not found: {}", .path.display())]
    AssetDirNotFound { path: PathBuf },

    /// A map passed filtering but had no selectable variant at selection time
    #[error("No eligible skin left for map '{map}'")]
    EmptySelection { map: String },

    /// A live file that should be backed up does not exist
    #[error("Cannot back up missing live asset: {}", .path.display())]
    MissingAsset { path: PathBuf },

    /// A directory could not be listed
    #[error("Failed to enumerate directory: {}", .path.display())]
    EnumerationFailed { path: PathBuf, source: io::Error },

    /// Failed to read from a file
    #[error("Failed to read file: {}", .path.display())]
    ReadError { path: PathBuf, source: io::Error },

    /// Failed to write to a file
    #[error("Failed to write file: {}", .path.display())]
    WriteError { path: PathBuf, source: io::Error },

    /// Failed to create a directory
    #[error("Failed to create directory: {}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
}

fn display_opt(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string())
}

impl EngineError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::ConfigRead { source, .. }
            | Self::EnumerationFailed { source, .. }
            | Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = EngineError::MissingAsset {
            path: PathBuf::from("live/images/UI/bg.png"),
        };
        assert!(err.to_string().contains("bg.png"));
    }

    #[test]
    fn test_live_root_not_found_without_configured_path() {
        let err = EngineError::LiveRootNotFound { configured: None };
        assert!(err.to_string().contains("none"));
    }

    #[test]
    fn test_raw_os_error_only_for_io_variants() {
        let io_err = EngineError::ReadError {
            path: PathBuf::from("x"),
            source: io::Error::from_raw_os_error(2),
        };
        assert_eq!(io_err.raw_os_error(), Some(2));

        let sel = EngineError::EmptySelection {
            map: "Titan".to_string(),
        };
        assert_eq!(sel.raw_os_error(), None);
    }
}

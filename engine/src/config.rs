//! Shuffle configuration.
//!
//! Loaded from a `config.json` file:
//!
//! ```json
//! {
//!     "asset_dir": "~/brawlhalla-skins",
//!     "brawlhalla_home": "C:/Program Files (x86)/Steam/steamapps/common/Brawlhalla",
//!     "allow_defaults": false,
//!     "reset_before_shuffle": true,
//!     "included_maps": [],
//!     "excluded_maps": ["Titan"],
//!     "sync_folders": ["images/UI", "mapArt/{map_name}", "mp3"]
//! }
//! ```
//!
//! Only `asset_dir` is required.

use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use crate::error::EngineError;
use crate::sync::default_sync_folders;

/// Steam install locations tried when `brawlhalla_home` is missing or invalid.
pub const STEAM_FALLBACK_PATHS: [&str; 2] = [
    "C:/Program Files (x86)/Steam/steamapps/common/Brawlhalla",
    "C:/Program Files/Steam/steamapps/common/Brawlhalla",
];

fn default_true() -> bool {
    true
}

/// Validated settings consumed by the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ShuffleConfig {
    /// Skin library root (one subdirectory per map)
    pub asset_dir: PathBuf,

    /// Game asset directory; Steam locations are tried when unset or missing
    #[serde(default)]
    pub brawlhalla_home: Option<PathBuf>,

    /// Allow `default` as a selectable skin
    #[serde(default)]
    pub allow_defaults: bool,

    /// Restore every map before shuffling
    #[serde(default = "default_true")]
    pub reset_before_shuffle: bool,

    /// Only shuffle these maps, in this order (empty means all)
    #[serde(default)]
    pub included_maps: Vec<String>,

    /// Never shuffle these maps
    #[serde(default)]
    pub excluded_maps: Vec<String>,

    /// Relative folder templates to synchronize
    #[serde(default = "default_sync_folders")]
    pub sync_folders: Vec<String>,
}

impl ShuffleConfig {
    /// Config with the given asset library and every other field at its default.
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        ShuffleConfig {
            asset_dir: asset_dir.into(),
            brawlhalla_home: None,
            allow_defaults: false,
            reset_before_shuffle: true,
            included_maps: Vec::new(),
            excluded_maps: Vec::new(),
            sync_folders: default_sync_folders(),
        }
    }

    /// Parse a config from JSON text, resolving relative paths against `base_dir`.
    pub fn from_json(text: &str, source: &Path, base_dir: &Path) -> Result<Self, EngineError> {
        let mut config: ShuffleConfig =
            serde_json::from_str(text).map_err(|e| EngineError::ConfigParse {
                path: source.to_path_buf(),
                source: e,
            })?;

        config.asset_dir = absolutize(&config.asset_dir, base_dir);
        config.brawlhalla_home = config
            .brawlhalla_home
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| absolutize(&p, base_dir));
        Ok(config)
    }

    /// Check everything that can be checked without touching the live root.
    ///
    /// # Errors
    /// `AssetDirNotFound` if the library is missing; `Configuration` if a
    /// sync folder is not a plain relative path.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.asset_dir.is_dir() {
            return Err(EngineError::AssetDirNotFound {
                path: self.asset_dir.clone(),
            });
        }

        for folder in &self.sync_folders {
            let path = Path::new(folder);
            let plain = path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
            if folder.is_empty() || !plain {
                return Err(EngineError::Configuration {
                    reason: format!("sync folder '{folder}' must be a relative path inside the asset tree"),
                });
            }
        }

        Ok(())
    }

    /// Locate the live asset root, falling back to the Steam install paths.
    ///
    /// # Errors
    /// `LiveRootNotFound` if neither the configured path nor any fallback exists.
    pub fn resolve_live_root(&self) -> Result<PathBuf, EngineError> {
        let fallbacks: Vec<&Path> = STEAM_FALLBACK_PATHS.iter().map(Path::new).collect();
        self.resolve_live_root_with(&fallbacks)
    }

    /// Same as [`resolve_live_root`](Self::resolve_live_root) with an explicit fallback list.
    pub fn resolve_live_root_with(&self, fallbacks: &[&Path]) -> Result<PathBuf, EngineError> {
        if let Some(home) = self.brawlhalla_home.as_ref().filter(|p| p.exists()) {
            return Ok(home.clone());
        }

        if let Some(found) = fallbacks.iter().find(|p| p.exists()) {
            info!(path = %found.display(), "using detected Brawlhalla install");
            return Ok(found.to_path_buf());
        }

        Err(EngineError::LiveRootNotFound {
            configured: self.brawlhalla_home.clone(),
        })
    }
}

/// Read and parse a config file. Relative paths in it are resolved against
/// the directory containing the file.
///
/// # Errors
/// `ConfigRead` if the file cannot be read, `ConfigParse` if it is not a
/// valid config.
pub fn load_config(path: &Path) -> Result<ShuffleConfig, EngineError> {
    let text = fs::read_to_string(path).map_err(|e| EngineError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = ShuffleConfig::from_json(&text, path, base_dir)?;
    debug!(?config, "loaded config");
    Ok(config)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

fn absolutize(path: &Path, base_dir: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

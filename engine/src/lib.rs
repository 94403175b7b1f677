//! # Shuffle Engine - Map Skin Randomizer
//!
//! A headless engine that swaps per-map game assets between a skin library
//! and the game's live asset directory, keeping a one-time backup of every
//! original file so the installation can always be restored.
//!
//! ## Overview
//!
//! - Map and variant eligibility from directory naming conventions
//!   (`default`, `disable*`, `force*`)
//! - Uniform random skin selection, optionally seeded
//! - First-overwrite backups into each map's `default` variant
//! - One-level folder sync, with per-level `mapArt` folders discovered on disk
//! - Reset to originals, and reset-before-shuffle
//! - Progress reporting via callbacks (decoupled from UI technology)
//!
//! ## Basic Usage
//!
//! ```no_run
//! use shuffle_engine::{create_job, load_config, plan_job, run_job, Mode};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(Path::new("config.json"))?;
//!
//! let mut job = create_job(&config, Mode::Shuffle)?;
//! plan_job(&mut job, &mut rand::rng())?;
//! for pass in &job.passes {
//!     for assignment in &pass.assignments {
//!         println!("{:?}: {} -> {}", pass.kind, assignment.map, assignment.variant);
//!     }
//! }
//!
//! run_job(&mut job, None)?;
//! println!("{} files overwritten", job.totals.files_overwritten);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (ShuffleJob, Variant, MapAssignment, enums)
//! - **error**: Error types
//! - **config**: Configuration loading and live-root detection
//! - **library**: Skin library layout
//! - **filter**: Map and variant eligibility
//! - **select**: Random skin selection
//! - **sync**: Sync-folder resolution
//! - **backup**: First-overwrite backups
//! - **copier**: Applying a variant to the live root
//! - **job**: Job orchestration (create, plan, run)
//! - **progress**: Progress callback trait
//! - **checksums** / **status**: Comparing live files with their backups
//! - **fs_ops**: Low-level filesystem operations

pub mod model;
pub mod error;
pub mod config;
pub mod fs_ops;
pub mod library;
pub mod filter;
pub mod select;
pub mod sync;
pub mod backup;
pub mod copier;
pub mod job;
pub mod progress;
pub mod checksums;
pub mod status;

// Re-export main types and functions
pub use model::{
    ApplyReport, JobState, MapAssignment, Mode, Pass, PassKind, ShuffleJob, Variant, VariantKind,
    DEFAULT_VARIANT,
};
pub use error::EngineError;
pub use config::{load_config, ShuffleConfig};
pub use library::AssetLibrary;
pub use filter::{filter_variants, MapFilter};
pub use select::{choose_variant, SkinSelector};
pub use sync::{default_sync_folders, resolve_sync_folders, MAP_ART_TEMPLATE};
pub use backup::{ensure_backup, BackupStore, DirectoryBackupStore};
pub use copier::AssetCopier;
pub use job::{create_job, job_status, plan_job, run_job, shuffle_assets};
pub use progress::ProgressCallback;
pub use checksums::{compute_file_checksum, ChecksumAlgorithm, ChecksumValue};
pub use status::{map_status, MapStatus};

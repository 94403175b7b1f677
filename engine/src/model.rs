//! Core data model for shuffle jobs.
//!
//! This module defines the main data structures:
//! - VariantKind / Variant: a skin directory classified by its naming convention
//! - MapAssignment: one map paired with the variant that will be applied to it
//! - Pass / ShuffleJob: the planned work of one run
//! - Mode, PassKind, JobState: enums controlling behavior

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Name of the reserved variant holding pristine originals and backups.
pub const DEFAULT_VARIANT: &str = "default";

/// Map directory names that never count as maps.
pub const RESERVED_MAP_NAMES: [&str; 3] = ["default", "defaults", "Backgrounds"];

const DISABLE_PREFIX: &str = "disable";
const FORCE_PREFIX: &str = "force";

/// Role of a variant, derived once from its directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// The literal `default` variant (pristine content and backup target)
    Default,
    /// Name starts with `disable` (any case); never selectable
    Disabled,
    /// Name starts with `force` (any case); exclusive candidates when present
    Forced,
    /// Any other ordinary skin
    Normal,
}

impl VariantKind {
    /// Classify a variant directory name.
    ///
    /// Only the exact name `default` is the default variant. The `disable`
    /// and `force` prefixes are matched case-insensitively, with `disable`
    /// checked first.
    pub fn classify(name: &str) -> Self {
        if name == DEFAULT_VARIANT {
            return VariantKind::Default;
        }
        let lower = name.to_lowercase();
        if lower.starts_with(DISABLE_PREFIX) {
            VariantKind::Disabled
        } else if lower.starts_with(FORCE_PREFIX) {
            VariantKind::Forced
        } else {
            VariantKind::Normal
        }
    }
}

/// A variant directory of one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Directory name, e.g. `snowy`
    pub name: String,
    /// Role derived from the name
    pub kind: VariantKind,
}

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = VariantKind::classify(&name);
        Variant { name, kind }
    }

    /// Whether this is the reserved `default` variant.
    pub fn is_default(&self) -> bool {
        self.kind == VariantKind::Default
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Caller intent for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Restore every eligible map to its `default` variant only
    Reset,
    /// Optionally reset, then apply one random variant per map
    Shuffle,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Reset => write!(f, "Reset"),
            Mode::Shuffle => write!(f, "Shuffle"),
        }
    }
}

/// Kind of a planned pass over the eligible maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Reset,
    Shuffle,
}

/// One map paired with the variant to apply and its resolved sync folders.
#[derive(Debug, Clone)]
pub struct MapAssignment {
    /// Map directory name
    pub map: String,
    /// Variant that will be copied over the live root
    pub variant: Variant,
    /// Relative folders to synchronize, in order
    pub folders: Vec<PathBuf>,
}

/// An ordered pass applying one assignment per eligible map.
#[derive(Debug, Clone)]
pub struct Pass {
    pub kind: PassKind,
    pub assignments: Vec<MapAssignment>,
}

/// The state of a shuffle job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created, not yet planned
    Pending,
    /// Maps and variants chosen; nothing written yet
    Planned,
    /// Currently applying assignments
    Running,
    /// All passes applied
    Completed,
    /// Aborted on the first error; earlier maps keep their new state
    Failed,
}

/// Outcome of applying one variant to one map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Live files overwritten
    pub files_overwritten: usize,
    /// Backups newly written under the `default` variant
    pub backups_taken: usize,
}

/// A single shuffle or reset run.
///
/// Holds explicit handles to the asset library and the live asset root;
/// nothing depends on the working directory.
#[derive(Debug)]
pub struct ShuffleJob {
    /// Unique identifier for this run
    pub id: Uuid,

    /// Reset only, or shuffle
    pub mode: Mode,

    /// Root of the skin library (one subdirectory per map)
    pub asset_dir: PathBuf,

    /// The game's asset directory, overwritten in place
    pub live_root: PathBuf,

    /// Whether `default` may be picked as a skin
    pub allow_defaults: bool,

    /// Run a reset pass before shuffling
    pub reset_before_shuffle: bool,

    /// Only these maps, in this order (empty means all)
    pub included_maps: Vec<String>,

    /// Never these maps
    pub excluded_maps: Vec<String>,

    /// Relative folder templates to synchronize
    pub sync_folders: Vec<String>,

    /// Planned passes, in execution order
    pub passes: Vec<Pass>,

    /// Current job state
    pub state: JobState,

    /// Totals across all applied assignments
    pub totals: ApplyReport,

    /// When the job was created
    pub created_at: DateTime<Utc>,

    /// When execution finished (successfully or not)
    pub finished_at: Option<DateTime<Utc>>,
}

impl ShuffleJob {
    /// Number of assignments across all passes.
    pub fn assignment_count(&self) -> usize {
        self.passes.iter().map(|p| p.assignments.len()).sum()
    }
}

//! Progress reporting trait.
//!
//! This module defines the ProgressCallback trait, which allows decoupling
//! the shuffle engine from any specific UI technology.

use std::ffi::OsStr;
use std::path::Path;
use crate::model::{ApplyReport, MapAssignment, PassKind, ShuffleJob};

/// Trait for receiving progress updates from a shuffle job.
///
/// All methods are called synchronously on the thread running the job.
pub trait ProgressCallback: Send {
    /// Called when job execution starts.
    fn on_job_started(&self, job: &ShuffleJob);

    /// Called before the first map of a pass is applied.
    fn on_pass_started(&self, kind: PassKind);

    /// Called when a map is about to be overwritten with its assigned variant.
    fn on_map_started(&self, kind: PassKind, assignment: &MapAssignment);

    /// Called after an original live file was copied into the `default` variant.
    fn on_backup_taken(&self, map: &str, folder: &Path, file: &OsStr);

    /// Called when every sync folder of a map has been applied.
    fn on_map_completed(&self, assignment: &MapAssignment, report: &ApplyReport);

    /// Called when every pass has been applied.
    fn on_job_completed(&self, job: &ShuffleJob);
}

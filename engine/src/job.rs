//! Job orchestration module.
//!
//! This module provides the main job lifecycle functions:
//! - Creating a job from a validated configuration
//! - Planning a job (choosing maps and one variant per map)
//! - Running a job (applying every planned assignment, fail-fast)

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;
use crate::backup::DirectoryBackupStore;
use crate::checksums::ChecksumAlgorithm;
use crate::config::ShuffleConfig;
use crate::copier::AssetCopier;
use crate::error::EngineError;
use crate::filter::MapFilter;
use crate::library::AssetLibrary;
use crate::model::{ApplyReport, JobState, Mode, Pass, PassKind, ShuffleJob};
use crate::progress::ProgressCallback;
use crate::select::{reset_variant, SkinSelector};
use crate::status::{map_status, MapStatus};

impl ShuffleJob {
    /// Handle to the job's skin library.
    pub fn library(&self) -> AssetLibrary {
        AssetLibrary::new(self.asset_dir.clone())
    }

    /// Inclusion/exclusion rules of the job.
    pub fn map_filter(&self) -> MapFilter {
        MapFilter {
            allow_defaults: self.allow_defaults,
            included_maps: self.included_maps.clone(),
            excluded_maps: self.excluded_maps.clone(),
        }
    }
}

fn expect_state(job: &ShuffleJob, expected: JobState) -> Result<(), EngineError> {
    if job.state != expected {
        return Err(EngineError::InvalidJobState {
            expected,
            actual: job.state,
        });
    }
    Ok(())
}

/// Create a new shuffle job.
///
/// Validates the configuration and locates the live asset root before
/// anything else happens, so a bad setup fails before any map is touched.
///
/// # Errors
/// `AssetDirNotFound`, `Configuration` or `LiveRootNotFound`.
pub fn create_job(config: &ShuffleConfig, mode: Mode) -> Result<ShuffleJob, EngineError> {
    config.validate()?;
    let live_root = config.resolve_live_root()?;

    Ok(ShuffleJob {
        id: Uuid::new_v4(),
        mode,
        asset_dir: config.asset_dir.clone(),
        live_root,
        allow_defaults: config.allow_defaults,
        reset_before_shuffle: config.reset_before_shuffle,
        included_maps: config.included_maps.clone(),
        excluded_maps: config.excluded_maps.clone(),
        sync_folders: config.sync_folders.clone(),
        passes: Vec::new(),
        state: JobState::Pending,
        totals: ApplyReport::default(),
        created_at: Utc::now(),
        finished_at: None,
    })
}

/// Plan a job: compute the eligible maps and build its passes.
///
/// A reset pass (every map to `default`) is planned in Reset mode, or in
/// Shuffle mode when `reset_before_shuffle` is set. Shuffle mode then adds
/// a pass with one randomly selected variant per map. Maps appear in
/// filter order in every pass. Nothing is written to disk.
///
/// # Errors
/// Enumeration errors, or `EmptySelection` if a map lost its variants
/// between filtering and selection.
pub fn plan_job<R: Rng + ?Sized>(job: &mut ShuffleJob, rng: &mut R) -> Result<(), EngineError> {
    expect_state(job, JobState::Pending)?;

    let library = job.library();
    let filter = job.map_filter();
    let backups = DirectoryBackupStore::new(library.clone());
    let copier = AssetCopier::new(&library, &job.live_root, &backups, &job.sync_folders);

    let maps = filter.eligible_maps(&library)?;
    if maps.is_empty() {
        warn!(asset_dir = %library.root().display(), "no eligible maps found");
    }

    let mut passes = Vec::new();
    if job.mode == Mode::Reset || job.reset_before_shuffle {
        let assignments = maps
            .iter()
            .map(|map| copier.assign(map, reset_variant()))
            .collect::<Result<Vec<_>, _>>()?;
        passes.push(Pass {
            kind: PassKind::Reset,
            assignments,
        });
    }

    if job.mode == Mode::Shuffle {
        let mut selector = SkinSelector::new(&library, &filter, rng);
        let mut assignments = Vec::with_capacity(maps.len());
        for map in &maps {
            let variant = selector.select(map)?;
            assignments.push(copier.assign(map, variant)?);
        }
        passes.push(Pass {
            kind: PassKind::Shuffle,
            assignments,
        });
    }

    job.passes = passes;
    job.state = JobState::Planned;
    info!(job = %job.id, mode = %job.mode, maps = maps.len(), "planned job");
    Ok(())
}

/// Run a planned job.
///
/// Applies every assignment of every pass in order. The first error stops
/// the run: the job is marked `Failed`, maps already applied keep their new
/// state, and the error is returned.
///
/// # Arguments
/// * `job` - Job to execute (must be in Planned state)
/// * `progress_callback` - Optional callback for progress updates
pub fn run_job(
    job: &mut ShuffleJob,
    progress_callback: Option<&dyn ProgressCallback>,
) -> Result<(), EngineError> {
    expect_state(job, JobState::Planned)?;

    job.state = JobState::Running;
    if let Some(callback) = progress_callback {
        callback.on_job_started(job);
    }

    let library = job.library();
    let live_root = job.live_root.clone();
    let sync_folders = job.sync_folders.clone();
    let backups = DirectoryBackupStore::new(library.clone());
    let copier = AssetCopier::new(&library, &live_root, &backups, &sync_folders);

    let passes = std::mem::take(&mut job.passes);
    let result = apply_passes(&copier, &passes, &mut job.totals, progress_callback);
    job.passes = passes;
    job.finished_at = Some(Utc::now());

    if let Err(e) = result {
        job.state = JobState::Failed;
        return Err(e);
    }

    job.state = JobState::Completed;
    info!(
        job = %job.id,
        files = job.totals.files_overwritten,
        backups = job.totals.backups_taken,
        "job completed"
    );
    if let Some(callback) = progress_callback {
        callback.on_job_completed(job);
    }

    Ok(())
}

fn apply_passes(
    copier: &AssetCopier<'_>,
    passes: &[Pass],
    totals: &mut ApplyReport,
    progress_callback: Option<&dyn ProgressCallback>,
) -> Result<(), EngineError> {
    for pass in passes {
        if let Some(callback) = progress_callback {
            callback.on_pass_started(pass.kind);
        }

        for assignment in &pass.assignments {
            if let Some(callback) = progress_callback {
                callback.on_map_started(pass.kind, assignment);
            }
            info!(map = %assignment.map, variant = %assignment.variant, "applying variant");

            let report = copier.apply(assignment, progress_callback)?;
            totals.files_overwritten += report.files_overwritten;
            totals.backups_taken += report.backups_taken;

            if let Some(callback) = progress_callback {
                callback.on_map_completed(assignment, &report);
            }
        }
    }
    Ok(())
}

/// Create, plan and run a job in one call.
pub fn shuffle_assets<R: Rng + ?Sized>(
    config: &ShuffleConfig,
    mode: Mode,
    rng: &mut R,
    progress_callback: Option<&dyn ProgressCallback>,
) -> Result<ShuffleJob, EngineError> {
    let mut job = create_job(config, mode)?;
    plan_job(&mut job, rng)?;
    run_job(&mut job, progress_callback)?;
    Ok(job)
}

/// Compare every eligible map's live files against its backups.
pub fn job_status(
    job: &ShuffleJob,
    algorithm: ChecksumAlgorithm,
) -> Result<Vec<MapStatus>, EngineError> {
    let library = job.library();
    job.map_filter()
        .eligible_maps(&library)?
        .iter()
        .map(|map| map_status(&library, &job.live_root, map, &job.sync_folders, algorithm))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MapAssignment, Variant};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::ffi::OsStr;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    fn write(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create dir");
        fs::write(path, content).expect("Failed to write file");
    }

    fn setup() -> (tempfile::TempDir, ShuffleConfig, PathBuf) {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let library = temp.path().join("library");
        let live = temp.path().join("live");

        write(&live.join("images/UI/bg.png"), b"original");
        write(&library.join("Midgard/snowy/images/UI/bg.png"), b"snowy");
        write(&library.join("Midgard/disabled_old/images/UI/bg.png"), b"old");
        fs::create_dir_all(library.join("Titan/default")).unwrap();

        let mut config = ShuffleConfig::new(&library);
        config.brawlhalla_home = Some(live.clone());
        (temp, config, live)
    }

    // Test helper: Mock progress callback to track invocations
    struct TestProgressCallback {
        calls: Mutex<Vec<String>>,
    }

    impl TestProgressCallback {
        fn new() -> Self {
            TestProgressCallback {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn get_calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProgressCallback for TestProgressCallback {
        fn on_job_started(&self, _job: &ShuffleJob) {
            self.calls.lock().unwrap().push("on_job_started".to_string());
        }

        fn on_pass_started(&self, kind: PassKind) {
            self.calls.lock().unwrap().push(format!("on_pass_started({:?})", kind));
        }

        fn on_map_started(&self, _kind: PassKind, assignment: &MapAssignment) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("on_map_started({}, {})", assignment.map, assignment.variant));
        }

        fn on_backup_taken(&self, map: &str, _folder: &Path, file: &OsStr) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("on_backup_taken({}, {})", map, file.to_string_lossy()));
        }

        fn on_map_completed(&self, assignment: &MapAssignment, report: &ApplyReport) {
            self.calls.lock().unwrap().push(format!(
                "on_map_completed({}, {})",
                assignment.map, report.files_overwritten
            ));
        }

        fn on_job_completed(&self, _job: &ShuffleJob) {
            self.calls.lock().unwrap().push("on_job_completed".to_string());
        }
    }

    #[test]
    fn test_create_job_with_valid_config() {
        let (_temp, config, live) = setup();
        let job = create_job(&config, Mode::Shuffle).expect("Failed to create job");

        assert_eq!(job.mode, Mode::Shuffle);
        assert_eq!(job.state, JobState::Pending);
        assert_eq!(job.live_root, live);
        assert!(job.passes.is_empty());
    }

    #[test]
    fn test_create_job_with_missing_asset_dir() {
        let (temp, mut config, _live) = setup();
        config.asset_dir = temp.path().join("nonexistent");

        let result = create_job(&config, Mode::Shuffle);
        assert!(matches!(result, Err(EngineError::AssetDirNotFound { .. })));
    }

    #[test]
    fn test_plan_shuffle_with_reset_first() {
        let (_temp, config, _live) = setup();
        let mut job = create_job(&config, Mode::Shuffle).expect("Failed to create job");
        let mut rng = StdRng::seed_from_u64(3);

        plan_job(&mut job, &mut rng).expect("Failed to plan job");

        assert_eq!(job.state, JobState::Planned);
        let kinds: Vec<_> = job.passes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PassKind::Reset, PassKind::Shuffle]);
        assert_eq!(job.passes[0].assignments[0].variant, Variant::new("default"));
        assert_eq!(job.passes[1].assignments[0].variant, Variant::new("snowy"));
        // Titan has only a default variant and is not eligible
        assert_eq!(job.assignment_count(), 2);
    }

    #[test]
    fn test_plan_shuffle_without_reset() {
        let (_temp, mut config, _live) = setup();
        config.reset_before_shuffle = false;
        let mut job = create_job(&config, Mode::Shuffle).expect("Failed to create job");

        plan_job(&mut job, &mut StdRng::seed_from_u64(3)).expect("Failed to plan job");

        let kinds: Vec<_> = job.passes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PassKind::Shuffle]);
    }

    #[test]
    fn test_plan_reset_only() {
        let (_temp, mut config, _live) = setup();
        config.reset_before_shuffle = false;
        let mut job = create_job(&config, Mode::Reset).expect("Failed to create job");

        plan_job(&mut job, &mut StdRng::seed_from_u64(3)).expect("Failed to plan job");

        let kinds: Vec<_> = job.passes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PassKind::Reset]);
    }

    #[test]
    fn test_plan_job_requires_pending_state() {
        let (_temp, config, _live) = setup();
        let mut job = create_job(&config, Mode::Shuffle).expect("Failed to create job");
        let mut rng = StdRng::seed_from_u64(3);
        plan_job(&mut job, &mut rng).expect("Failed to plan job");

        let result = plan_job(&mut job, &mut rng);
        assert!(matches!(result, Err(EngineError::InvalidJobState { .. })));
    }

    #[test]
    fn test_run_job_requires_plan() {
        let (_temp, config, _live) = setup();
        let mut job = create_job(&config, Mode::Shuffle).expect("Failed to create job");

        let result = run_job(&mut job, None);
        assert!(matches!(
            result,
            Err(EngineError::InvalidJobState {
                expected: JobState::Planned,
                actual: JobState::Pending
            })
        ));
    }

    #[test]
    fn test_run_job_reports_progress() {
        let (_temp, config, live) = setup();
        let progress = TestProgressCallback::new();
        let mut rng = StdRng::seed_from_u64(11);

        let job = shuffle_assets(&config, Mode::Shuffle, &mut rng, Some(&progress))
            .expect("Failed to run job");

        assert_eq!(job.state, JobState::Completed);
        assert!(job.finished_at.is_some());
        assert_eq!(job.totals.files_overwritten, 1);
        assert_eq!(job.totals.backups_taken, 1);
        assert_eq!(fs::read(live.join("images/UI/bg.png")).unwrap(), b"snowy");

        assert_eq!(
            progress.get_calls(),
            vec![
                "on_job_started".to_string(),
                "on_pass_started(Reset)".to_string(),
                "on_map_started(Midgard, default)".to_string(),
                "on_map_completed(Midgard, 0)".to_string(),
                "on_pass_started(Shuffle)".to_string(),
                "on_map_started(Midgard, snowy)".to_string(),
                "on_backup_taken(Midgard, bg.png)".to_string(),
                "on_map_completed(Midgard, 1)".to_string(),
                "on_job_completed".to_string(),
            ]
        );
    }

    #[test]
    fn test_run_job_fails_fast_on_missing_live_asset() {
        let (_temp, config, live) = setup();
        let mut job = create_job(&config, Mode::Shuffle).expect("Failed to create job");
        plan_job(&mut job, &mut StdRng::seed_from_u64(5)).expect("Failed to plan job");

        // Live file vanishes after planning; the backup cannot be taken
        fs::remove_file(live.join("images/UI/bg.png")).unwrap();
        fs::create_dir(live.join("images/UI/bg.png")).unwrap();

        let result = run_job(&mut job, None);
        assert!(matches!(result, Err(EngineError::MissingAsset { .. })));
        assert_eq!(job.state, JobState::Failed);
        assert!(job.finished_at.is_some());
    }

    #[test]
    fn test_job_status_tracks_shuffled_maps() {
        let (_temp, config, _live) = setup();
        let job = shuffle_assets(&config, Mode::Shuffle, &mut StdRng::seed_from_u64(1), None)
            .expect("Failed to shuffle");

        let status = job_status(&job, ChecksumAlgorithm::Blake3).expect("Failed to get status");
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].map, "Midgard");
        assert_eq!(status[0].differing, 1);

        let reset = shuffle_assets(&config, Mode::Reset, &mut StdRng::seed_from_u64(1), None)
            .expect("Failed to reset");
        let status = job_status(&reset, ChecksumAlgorithm::Blake3).expect("Failed to get status");
        assert!(status[0].is_original());
    }
}

//! bh-shuffle - Command-line interface for the shuffle engine.
//!
//! Loads `config.json`, then either resets every map to its original assets
//! or shuffles one random skin onto each map. Progress goes to stderr;
//! diagnostics go through `tracing`.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shuffle_engine::{
    create_job, job_status, load_config, plan_job, run_job, ApplyReport, ChecksumAlgorithm,
    MapAssignment, Mode, PassKind, ProgressCallback, ShuffleJob,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE_NAME: &str = "config.json";

/// bh-shuffle - Randomize Brawlhalla map themes
#[derive(Parser, Debug)]
#[command(name = "bh-shuffle")]
#[command(version)]
#[command(about = "Shuffle Brawlhalla map skins, or restore the originals")]
struct Args {
    /// Reset every map to its default assets and stop
    #[arg(short = 'r', long)]
    reset: bool,

    /// Allow the default skin to be picked when shuffling
    #[arg(short = 'd', long)]
    allow_defaults: bool,

    /// Config file (defaults to config.json next to the executable)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the planned assignments without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Seed for skin selection, for reproducible shuffles
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Report which maps currently differ from their original assets
    #[arg(long, conflicts_with_all = ["reset", "dry_run"])]
    status: bool,

    /// Checksum algorithm for --status: md5, sha256, blake3 (default)
    #[arg(long, value_name = "ALGORITHM", requires = "status")]
    hash: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

/// CLI implementation of ProgressCallback printing one line per step
struct CliProgress {
    start_time: Instant,
}

impl CliProgress {
    fn new() -> Self {
        CliProgress {
            start_time: Instant::now(),
        }
    }

    fn format_duration(elapsed: std::time::Duration) -> String {
        let secs = elapsed.as_secs();
        let mins = secs / 60;
        let secs = secs % 60;

        if mins > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{:.1}s", elapsed.as_secs_f64())
        }
    }
}

impl ProgressCallback for CliProgress {
    fn on_job_started(&self, _job: &ShuffleJob) {
        eprintln!("Shuffle Brawlhalla Themes");
    }

    fn on_pass_started(&self, kind: PassKind) {
        eprintln!();
        if kind == PassKind::Reset {
            eprintln!("  Resetting maps to default");
        }
    }

    fn on_map_started(&self, kind: PassKind, assignment: &MapAssignment) {
        match kind {
            PassKind::Reset => eprintln!("  Resetting: {}", assignment.map),
            PassKind::Shuffle => {
                eprintln!("{}", assignment.map);
                eprintln!("  {}", assignment.variant);
            }
        }
    }

    fn on_backup_taken(&self, map: &str, folder: &Path, file: &OsStr) {
        eprintln!(
            "    - backing up {}",
            Path::new(map).join(folder).join(file).display()
        );
    }

    fn on_map_completed(&self, assignment: &MapAssignment, report: &ApplyReport) {
        eprintln!(
            "    - {} overwritten; {} files",
            assignment.map, report.files_overwritten
        );
    }

    fn on_job_completed(&self, job: &ShuffleJob) {
        eprintln!();
        eprintln!(
            "Done: {} files overwritten, {} backed up, in {}",
            job.totals.files_overwritten,
            job.totals.backups_taken,
            Self::format_duration(self.start_time.elapsed())
        );
    }
}

/// Install the tracing subscriber; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `config.json` beside the running executable.
fn default_config_path() -> Result<PathBuf, String> {
    let exe = std::env::current_exe()
        .map_err(|e| format!("Cannot locate executable directory: {}", e))?;
    let dir = exe
        .parent()
        .ok_or_else(|| format!("Executable has no parent directory: {}", exe.display()))?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Parse arguments, then run the shuffle
fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let exit_code = match run_cli(&args) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<(), String> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    tracing::debug!(config = %config_path.display(), "loading config");
    let mut config = load_config(&config_path).map_err(|e| e.to_string())?;
    if args.allow_defaults {
        config.allow_defaults = true;
    }

    let mode = if args.reset { Mode::Reset } else { Mode::Shuffle };

    if args.status {
        let algorithm = match &args.hash {
            Some(name) => name.parse::<ChecksumAlgorithm>()?,
            None => ChecksumAlgorithm::default(),
        };
        let job = create_job(&config, mode).map_err(|e| e.to_string())?;
        let statuses = job_status(&job, algorithm).map_err(|e| format!("Status failed: {}", e))?;
        for status in statuses {
            if status.is_original() {
                println!("{}: original ({} files)", status.map, status.checked);
            } else {
                println!(
                    "{}: shuffled ({}/{} files differ)",
                    status.map, status.differing, status.checked
                );
            }
        }
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut job = create_job(&config, mode).map_err(|e| e.to_string())?;
    plan_job(&mut job, &mut rng).map_err(|e| format!("Planning failed: {}", e))?;

    if args.dry_run {
        for pass in &job.passes {
            println!("{:?} pass:", pass.kind);
            for assignment in &pass.assignments {
                println!("  {} -> {}", assignment.map, assignment.variant);
            }
        }
        return Ok(());
    }

    let progress = CliProgress::new();
    run_job(&mut job, Some(&progress)).map_err(|e| format!("Shuffle failed: {}", e))
}

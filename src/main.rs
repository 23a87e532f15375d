/// habit-tracker binary: parse flags, set up logging, serve MCP over stdio

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use habit_tracker::config::DEFAULT_HEATMAP_WEEKS;
use habit_tracker::{HabitTrackerServer, TrackerConfig, DEFAULT_START_OF_DAY_HOUR};

/// Whether `dir` exists (or can be created) and accepts a file write
fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_probe");
    let ok = std::fs::write(&probe, b"").is_ok();
    let _ = std::fs::remove_file(&probe);
    ok
}

/// Pick the data directory when `--data-dir` is not given
///
/// Candidates in order: `~/.habit_tracker`, the platform data dir, the
/// working directory. The first writable one wins; the temp dir is the
/// fallback when none of them is.
fn default_data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|home| home.join(".habit_tracker")),
        dirs::data_dir().map(|data| data.join("habit_tracker")),
        std::env::current_dir().ok().map(|cwd| cwd.join(".habit_tracker")),
    ];

    if let Some(dir) = candidates.into_iter().flatten().find(|dir| is_writable_dir(dir)) {
        return Ok(dir);
    }

    let temp = std::env::temp_dir().join("habit_tracker");
    std::fs::create_dir_all(&temp)?;
    warn!("No writable data directory found, falling back to {}", temp.display());
    Ok(temp)
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding habits.json and preferences.json (default: ~/.habit_tracker)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Local hour (0-23) at which a new habit day begins
    #[arg(long, default_value_t = DEFAULT_START_OF_DAY_HOUR)]
    start_of_day_hour: u32,

    /// Number of weeks shown in habit heatmaps
    #[arg(long, default_value_t = DEFAULT_HEATMAP_WEEKS)]
    heatmap_weeks: u32,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_tracker={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting habit-tracker {}", env!("CARGO_PKG_VERSION"));

    let data_dir = match args.data_dir {
        Some(path) => path,
        None => default_data_dir()?,
    };

    let config = TrackerConfig::new(data_dir, args.start_of_day_hour, args.heatmap_weeks)?;

    let server = HabitTrackerServer::new(config).await?;

    server.run().await?;

    info!("stdin closed, shutting down");
    Ok(())
}

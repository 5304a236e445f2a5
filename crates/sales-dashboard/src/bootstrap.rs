use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashboard_core::error::DashboardError;
use dashboard_core::settings::APP_DIR_NAME;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name searched for when no dataset path is given.
pub const DEFAULT_DATA_FILE: &str = "main_data.csv";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.sales-dashboard/`, or `./.sales-dashboard/` without a home directory.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Ensure `~/.sales-dashboard/` and its `logs/` subdirectory exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

/// Where the interactive dashboard logs when no `--log-file` is given.
pub fn default_dashboard_log() -> PathBuf {
    app_dir().join("logs").join("dashboard.log")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `DEBUG/INFO/WARNING/ERROR/CRITICAL` level name to a tracing filter
/// directive. Unknown names pass through unchanged.
pub fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With a `log_file` the output is appended to that file without ANSI
/// colours, so it never lands on a terminal the UI owns. Otherwise logs go
/// to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the order-line CSV.
///
/// An explicit path is used as-is and must exist. Otherwise the first
/// existing of these is returned:
/// 1. `./main_data.csv`
/// 2. `./dashboard/main_data.csv`
/// 3. `~/.sales-dashboard/main_data.csv`
pub fn discover_data_path(explicit: Option<&Path>) -> Result<PathBuf, DashboardError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover_data_path_in(explicit, &cwd, &app_dir())
}

fn discover_data_path_in(
    explicit: Option<&Path>,
    cwd: &Path,
    app_dir: &Path,
) -> Result<PathBuf, DashboardError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(DashboardError::DataPathNotFound(path.to_path_buf()))
        };
    }

    let candidates = [
        cwd.join(DEFAULT_DATA_FILE),
        cwd.join("dashboard").join(DEFAULT_DATA_FILE),
        app_dir.join(DEFAULT_DATA_FILE),
    ];
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .ok_or_else(|| DashboardError::DataPathNotFound(cwd.join(DEFAULT_DATA_FILE)))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use bikeshare_core::models::City;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Root of the per-user state directory, `~/.bikeshare/`.
pub fn state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bikeshare")
}

/// Ensure the standard `~/.bikeshare/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.bikeshare/`
/// - `~/.bikeshare/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let root = state_dir();
    std::fs::create_dir_all(&root)
        .with_context(|| format!("creating {}", root.display()))?;
    std::fs::create_dir_all(root.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a tracing filter directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr unless `log_file` is given, in which case lines are
/// appended to that file without ANSI colouring. Stdout stays reserved for
/// reports.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the directory holding the city sources.
///
/// An explicit directory is returned unchanged. Otherwise the following are
/// checked in order and the first containing any catalog file wins:
/// 1. `./data/`
/// 2. `./`
/// 3. `~/.bikeshare/data/`
pub fn discover_data_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    let candidates = [
        PathBuf::from("data"),
        PathBuf::from("."),
        state_dir().join("data"),
    ];
    first_with_catalog_file(candidates)
}

fn first_with_catalog_file(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|dir| {
        City::ALL
            .iter()
            .any(|c| dir.join(c.default_file_name()).is_file())
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Log file setup
//!
//! The terminal belongs to the TUI, so log output goes to a daily rolling file.
//! The level is taken from `RUST_LOG` and defaults to `warn`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Base name of the log files; the appender adds a date suffix
pub const LOG_FILE_PREFIX: &str = "airdir.log";

/// Default log directory (`~/.local/share/airdir/logs` on Linux)
///
/// Returns `None` if the directory cannot be determined (e.g., no home directory).
pub fn default_log_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "airdir")?;
    Some(project_dirs.data_dir().join("logs"))
}

/// Picks the configured directory, falling back to the platform default
pub fn resolve_log_dir(configured: Option<&Path>) -> Option<PathBuf> {
    configured.map(Path::to_path_buf).or_else(default_log_dir)
}

/// Installs the global tracing subscriber writing to `log_dir`
///
/// The returned guard flushes buffered lines when dropped, so it must live until
/// shutdown. Returns `Ok(None)` without installing anything when no log
/// directory is available.
pub fn init(log_dir: Option<&Path>) -> std::io::Result<Option<WorkerGuard>> {
    let Some(dir) = resolve_log_dir(log_dir) else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be set (e.g. by a test harness); keep the existing one.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .try_init();

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_dir_wins() {
        let dir = PathBuf::from("/tmp/airdir-logs");
        assert_eq!(resolve_log_dir(Some(dir.as_path())), Some(dir));
    }

    #[test]
    fn test_default_dir_mentions_project() {
        if let Some(dir) = default_log_dir() {
            assert!(dir.to_string_lossy().contains("airdir"));
        }
        // Passes if no home directory exists (e.g., in CI)
    }

    #[test]
    fn test_init_creates_log_dir() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let log_dir = temp_dir.path().join("nested").join("logs");

        let guard = init(Some(log_dir.as_path())).expect("Init should succeed");

        assert!(guard.is_some());
        assert!(log_dir.exists(), "Log directory should be created");
    }
}

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user state directory under `$HOME`.
pub const APP_DIR: &str = ".olist-dashboard";

/// Log file used when `--log-file` is not given.
pub const DEFAULT_LOG_FILE: &str = "olist-dashboard.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.olist-dashboard/` and `~/.olist-dashboard/logs/` exist.
///
/// Returns the logs directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// [`ensure_directories`] rooted at `home`.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = home.join(APP_DIR);
    let logs_dir = app_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)?;
    Ok(logs_dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a `tracing` filter directive.
///
/// Unrecognised names are passed through unchanged so that full `EnvFilter`
/// directives such as `dashboard_data=debug` also work.
pub fn normalise_level(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Where log output goes: the explicit `--log-file`, else the default file
/// in `logs_dir`.
pub fn resolve_log_path(log_file: Option<&Path>, logs_dir: &Path) -> PathBuf {
    log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| logs_dir.join(DEFAULT_LOG_FILE))
}

/// Initialise the global `tracing` subscriber.
///
/// Events are appended to `log_path` because the terminal is owned by the
/// dashboard while it runs.  If the file cannot be opened, output falls
/// back to stderr.
pub fn setup_logging(log_level: &str, log_path: &Path) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(normalise_level(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new().create(true).append(true).open(log_path);

    let (file_layer, stderr_layer) = match file {
        Ok(file) => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
            None,
        ),
        Err(e) => {
            eprintln!(
                "cannot open log file {}: {}; logging to stderr",
                log_path.display(),
                e
            );
            (
                None,
                Some(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                ),
            )
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");

        let logs = ensure_directories_in(tmp.path()).expect("directories created");

        let app_dir = tmp.path().join(APP_DIR);
        assert!(app_dir.is_dir(), ".olist-dashboard dir must exist");
        assert_eq!(logs, app_dir.join("logs"));
        assert!(logs.is_dir(), "logs subdir must exist");

        // Running twice is harmless.
        ensure_directories_in(tmp.path()).expect("idempotent");
    }

    #[test]
    fn test_normalise_level() {
        assert_eq!(normalise_level("DEBUG"), "debug");
        assert_eq!(normalise_level("info"), "info");
        assert_eq!(normalise_level("WARNING"), "warn");
        assert_eq!(normalise_level("CRITICAL"), "error");
        assert_eq!(normalise_level("dashboard_data=trace"), "dashboard_data=trace");
    }

    #[test]
    fn test_resolve_log_path() {
        let logs = Path::new("/tmp/logs");
        assert_eq!(
            resolve_log_path(None, logs),
            logs.join(DEFAULT_LOG_FILE)
        );
        let explicit = Path::new("/var/log/dash.log");
        assert_eq!(resolve_log_path(Some(explicit), logs), explicit);
    }
}

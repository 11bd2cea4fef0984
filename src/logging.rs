//! Diagnostic logging.
//!
//! Structured file logging with daily rotation to platform-standard directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use directories::ProjectDirs;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Prefix of every log file; the appender adds a date suffix.
const LOG_FILE_PREFIX: &str = "cursor-rules";

const RETENTION_DAYS: u64 = 7;

/// Level used until the configured one is applied.
const DEFAULT_LEVEL: &str = "info";

/// Result of initializing the logging system.
pub struct LoggingContext {
    /// Guard that must be held for the application lifetime to ensure logs are flushed.
    pub _guard: WorkerGuard,
    /// The session ID for this invocation.
    pub session_id: String,
    /// The directory where logs are written.
    pub log_directory: PathBuf,
    filter_handle: reload::Handle<EnvFilter, Registry>,
    /// `RUST_LOG` was set and takes precedence over the configured level.
    level_from_env: bool,
}

impl LoggingContext {
    /// Switch to the configured level. Does nothing when `RUST_LOG` is set.
    pub fn apply_level(&self, level: &str) -> Result<(), LoggingError> {
        if self.level_from_env {
            return Ok(());
        }
        let filter = level_filter(level)?;
        self.filter_handle.reload(filter).map_err(|e| LoggingError {
            message: format!("Failed to apply log level: {}", e),
        })?;
        debug!(level = %level, "log_level_applied");
        Ok(())
    }
}

fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError {
        message: format!("Invalid log level {:?}: {}", level, e),
    })
}

/// Error that occurred during logging initialization.
#[derive(Debug)]
pub struct LoggingError {
    pub message: String,
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Generates a 6-character random hex session ID.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; 3] = rng.random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Platform log directory.
///
/// macOS: ~/Library/Logs/cursor-rules/
/// Linux: ~/.local/state/cursor-rules/
/// Windows: %LocalAppData%\cursor-rules\
fn log_dir() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| home.join("Library").join("Logs").join(LOG_FILE_PREFIX))
    } else {
        let project_dirs = ProjectDirs::from("dev", "cursor-rules", "cursor-rules")?;
        project_dirs
            .state_dir()
            .map(Path::to_path_buf)
            .or_else(|| Some(project_dirs.data_local_dir().to_path_buf()))
    }
}

/// Initializes the logging system at `RUST_LOG` or the default level.
///
/// Call this before loading configuration so its events are recorded, then
/// [`LoggingContext::apply_level`] with the configured level.
/// The returned `WorkerGuard` must be held for the application lifetime.
pub fn init() -> Result<LoggingContext, LoggingError> {
    let session_id = generate_session_id();

    let log_dir = log_dir().ok_or_else(|| LoggingError {
        message: "Failed to determine log directory".to_string(),
    })?;

    fs::create_dir_all(&log_dir).map_err(|e| LoggingError {
        message: format!("Failed to create log directory: {}", e),
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let from_env = EnvFilter::try_from_default_env().ok();
    let level_from_env = from_env.is_some();
    let env_filter = from_env.unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL));
    let (filter_layer, filter_handle) = reload::Layer::new(env_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError {
            message: format!("Failed to install log subscriber: {}", e),
        })?;

    info!(session_id = %session_id, "session_start");

    Ok(LoggingContext {
        _guard: guard,
        session_id,
        log_directory: log_dir,
        filter_handle,
        level_from_env,
    })
}

/// Whether a file name belongs to a rotated log file.
fn is_rotated_log(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .is_some_and(|rest| rest.starts_with('.') && rest.len() > 1)
}

/// Deletes rotated log files older than the retention period.
/// Errors are logged at WARN level and never stop the command.
pub fn cleanup_old_logs(log_dir: &Path) {
    let retention = Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to read log directory for cleanup");
            return;
        }
    };

    let now = SystemTime::now();
    let mut deleted_count = 0u32;

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_rotated_log(name) => name.to_string(),
            _ => continue,
        };

        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                warn!(file = %file_name, error = %e, "Failed to read modification time for log file");
                continue;
            }
        };

        // Files dated in the future are kept.
        let Ok(age) = now.duration_since(modified) else {
            continue;
        };

        if age > retention {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %file_name, age_days = age.as_secs() / 86400, "Deleted old log file");
                    deleted_count += 1;
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to delete old log file");
                }
            }
        }
    }

    if deleted_count > 0 {
        debug!(count = deleted_count, "Log cleanup completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_id_is_six_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_level_filter() {
        assert!(level_filter("debug").is_ok());
        assert!(level_filter("cursor_rules=trace,warn").is_ok());
        let err = level_filter("cursor_rules=loud").unwrap_err();
        assert!(err.message.contains("cursor_rules=loud"));
    }

    #[test]
    fn test_is_rotated_log() {
        assert!(is_rotated_log("cursor-rules.2026-10-01"));
        assert!(!is_rotated_log("cursor-rules"));
        assert!(!is_rotated_log("cursor-rules."));
        assert!(!is_rotated_log("other.2026-10-01"));
        assert!(!is_rotated_log("cursor-rules-extra.log"));
    }

    #[test]
    fn test_cleanup_keeps_fresh_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        let fresh = dir.path().join("cursor-rules.2026-10-17");
        let foreign = dir.path().join("notes.txt");
        fs::write(&fresh, "log").unwrap();
        fs::write(&foreign, "keep").unwrap();

        cleanup_old_logs(dir.path());

        assert!(fresh.exists());
        assert!(foreign.exists());
    }

    #[test]
    fn test_cleanup_missing_directory_is_harmless() {
        let dir = TempDir::new().unwrap();
        cleanup_old_logs(&dir.path().join("missing"));
    }
}

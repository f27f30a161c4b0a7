//! File logging through `tracing`.
//!
//! Logs are written to `~/.config/sysmenu/logs/<name>.log`. When the
//! file already exceeds the configured size at startup it is rotated
//! to `<name>.log.1` (one backup kept).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const BACKUP_SUFFIX: &str = ".1";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum level or filter directive: "debug", "info", "warn", "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

/// Initialises the global subscriber. Call once at host startup.
///
/// Returns the appender guard, which must be kept alive for the
/// lifetime of the process so buffered lines are flushed. Returns
/// `None` when logging is disabled or the directory is unavailable.
pub fn init(config: &LogConfig, name: &str) -> Option<WorkerGuard> {
    if !config.enabled {
        return None;
    }
    let log_dir = crate::config::config_dir()?.join("logs");
    fs::create_dir_all(&log_dir).ok()?;

    let file_name = format!("{name}.log");
    rotate_if_oversized(&log_dir.join(&file_name), config.max_file_mb * 1024 * 1024);

    let appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false))
        .with(filter)
        .try_init()
        .ok()?;

    Some(guard)
}

/// Moves `path` to its `.1` backup when it is at least `max_bytes` long.
fn rotate_if_oversized(path: &Path, max_bytes: u64) -> bool {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if max_bytes == 0 || size < max_bytes {
        return false;
    }
    fs::rename(path, backup_path(path)).is_ok()
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sysmenu-log-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn oversized_file_moves_to_backup() {
        // Arrange
        let dir = scratch_dir("rotate");
        let path = dir.join("sysmenu.log");
        fs::write(&path, vec![b'x'; 64]).expect("write log");

        // Act
        let rotated = rotate_if_oversized(&path, 32);

        // Assert
        assert!(rotated);
        assert!(!path.exists());
        assert!(dir.join("sysmenu.log.1").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn small_file_is_left_alone() {
        // Arrange
        let dir = scratch_dir("keep");
        let path = dir.join("sysmenu.log");
        fs::write(&path, b"short").expect("write log");

        // Act
        let rotated = rotate_if_oversized(&path, 1024);

        // Assert
        assert!(!rotated);
        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn disabled_config_installs_nothing() {
        // Act
        let guard = init(&LogConfig::default(), "sysmenu");

        // Assert
        assert!(guard.is_none());
    }
}

// ============================================================================
// cutonly-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console or file logging for a CLI run
//
// By default the `log` facade is backed by env_logger on stderr. When the
// user passes --log-dir, the run is logged to a timestamped file through
// the core library's log4rs setup instead, so the terminal only shows the
// progress bar and the report.
//
// USAGE:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug or --verbose: Per-boundary details
// - RUST_LOG=trace: Discarded boundary candidates

use crate::error::CliResult;
use cutonly_core::CoreError;
use cutonly_core::file_logging::setup_file_logging;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("cutonly_detect_{}.log", cutonly_cli::logging::get_timestamp());
/// assert!(log_filename.ends_with(".log"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Log file path for a detect run inside `log_dir`.
pub fn detect_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("cutonly_detect_{}.log", get_timestamp()))
}

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the process logger. Returns the log file path when logging to a
/// file.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    match log_dir {
        Some(dir) => {
            let log_path = detect_log_path(dir);
            setup_file_logging(&log_path, level_for(verbose)).map_err(|e| {
                CoreError::OperationFailed(format!(
                    "Failed to set up logging to '{}': {e}",
                    log_path.display()
                ))
            })?;
            Ok(Some(log_path))
        }
        None => {
            let default_level = level_for(verbose).as_str().to_ascii_lowercase();
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
                .format_timestamp(None)
                .format_target(false)
                .try_init()
                .map_err(|e| CoreError::OperationFailed(format!("Failed to set up logging: {e}")))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_detect_log_path() {
        let path = detect_log_path(Path::new("/tmp/logs"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("cutonly_detect_"));
        assert!(name.ends_with(".log"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/logs")));
    }

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Info);
    }
}

use anyhow::Result;
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::Path;

/// Line format used in detection log files.
pub const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";

/// Routes the `log` facade to `log_file`. Fails if a logger is already
/// installed for this process.
pub fn setup_file_logging(log_file: &Path, log_level: LevelFilter) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_file)?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(Root::builder().appender("file").build(log_level))?;

    log4rs::init_config(config)?;

    log::info!("Logging detection run to {}", log_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_writes_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("logs").join("run.log");

        setup_file_logging(&log_file, LevelFilter::Info).unwrap();
        log::debug!("filtered out");
        log::logger().flush();

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("[INFO] Logging detection run to"));
        assert!(!content.contains("filtered out"));
    }
}

//! File logging for detection runs.

pub mod setup;

pub use setup::{LOG_PATTERN, setup_file_logging};

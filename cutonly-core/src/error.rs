// ============================================================================
// cutonly-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the cutonly-core library
//
// A single typed error flows out of every public operation. Detection is
// all-or-nothing: any failure after the source has been opened surfaces as
// one of these variants and no partial segment list is returned.
//
// KEY COMPONENTS:
// - CoreError: the error enum
// - CoreResult: result alias
// - Helper constructors for external command failures

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for cutonly-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The frame source could not be opened (missing file, unsupported
    /// container or codec, no video stream).
    #[error("Video source unavailable: {0}")]
    SourceUnavailable(String),

    /// Any internal failure during decoding, metric computation or boundary
    /// evaluation.
    #[error("Detection failed: {message}")]
    DetectionFailed { message: String },

    /// The frame source was interrupted by the caller before the pass ended.
    #[error("Detection interrupted before the end of the video")]
    Interrupted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, std::io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, std::io::Error),

    #[error("{0} exited with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    /// A front-end operation failed; the message carries its context.
    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for cutonly-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Builds a `DetectionFailed` whose message ends with a hint to adjust
    /// the detection parameters.
    pub fn detection_failed(cause: impl std::fmt::Display) -> Self {
        CoreError::DetectionFailed {
            message: format!(
                "{cause}. Try a different detection method or minimum cut length."
            ),
        }
    }
}

pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_failed_message_suggests_adjustment() {
        let err = CoreError::detection_failed("frame size changed mid-stream");
        let text = err.to_string();
        assert!(text.starts_with("Detection failed: frame size changed mid-stream"));
        assert!(text.contains("minimum cut length"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}

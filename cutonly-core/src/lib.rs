//! Core library for detecting cuts (scene boundaries) in video files.
//!
//! Frames are decoded with ffmpeg, scored against their predecessor, and fed
//! to one of three boundary strategies (content, adaptive, threshold). The
//! resulting boundaries are assembled into time-coded segments.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cutonly_core::config::{DetectionConfigBuilder, DetectionMethod};
//! use cutonly_core::progress::SinkError;
//! use cutonly_core::{CutNotes, OutputPayload, detect};
//! use std::path::Path;
//!
//! let config = DetectionConfigBuilder::new()
//!     .method(DetectionMethod::Adaptive)
//!     .min_len_frames(24)
//!     .build()
//!     .unwrap();
//!
//! let mut sink = |fraction: f64| -> Result<(), SinkError> {
//!     println!("{:.0}%", fraction * 100.0);
//!     Ok(())
//! };
//! let result = detect(Path::new("/path/to/video.mp4"), &config, &mut sink).unwrap();
//!
//! let payload = OutputPayload::build("video.mp4", &result, &CutNotes::new());
//! payload.write_to(Path::new("cuts_video.mp4.json")).unwrap();
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod payload;
pub mod pipeline;
pub mod progress;
pub mod segments;
pub mod utils;

// Re-exports for public API
pub use config::{DetectionConfig, DetectionConfigBuilder, DetectionMethod};
pub use error::{CoreError, CoreResult};
pub use external::{
    Frame, FrameSource, InterruptHandle, MemoryFrameSource, SidecarOpener, SourceOpener,
    StreamProperties, probe_stream,
};
pub use payload::{CutEntry, CutNotes, OutputPayload, default_payload_file_name};
pub use pipeline::{
    AnalysisResult, AnalysisSummary, detect, detect_with_opener, detect_with_source,
};
pub use progress::{NoProgress, ProgressSink, SinkError};
pub use segments::{Segment, assemble_segments};
pub use utils::{format_seconds, input_display_name};

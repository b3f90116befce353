// ============================================================================
// cutonly-core/src/pipeline.rs
// ============================================================================
//
// DETECTION PIPELINE: One sequential pass over a video
//
// decode -> metric -> strategy -> progress, once per frame, then segment
// assembly after the source is exhausted. The frame source is released on
// every exit path. A failed or interrupted pass returns an error and never
// partial segments.
//
// KEY COMPONENTS:
// - detect: entry point for a file path (ffmpeg-backed source)
// - detect_with_opener / detect_with_source: injectable variants
// - AnalysisResult / AnalysisSummary: the run's output

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{DetectionConfig, DetectionMethod};
use crate::detection::{BoundaryStrategy, MetricExtractor};
use crate::error::{CoreError, CoreResult};
use crate::external::{FrameSource, SidecarOpener, SourceOpener};
use crate::progress::{ProgressReporter, ProgressSink};
use crate::segments::{Segment, assemble_segments};

/// Output of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub segments: Vec<Segment>,
    pub total_frames: u64,
    pub fps: f64,
    pub duration_seconds: f64,
    pub method: DetectionMethod,
    pub min_len_frames: u32,
}

/// Aggregate figures over the retained segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSummary {
    pub cut_count: usize,
    pub average_duration_frames: f64,
    pub average_duration_seconds: f64,
}

impl AnalysisResult {
    #[must_use]
    pub fn summary(&self) -> AnalysisSummary {
        let cut_count = self.segments.len();
        if cut_count == 0 {
            return AnalysisSummary {
                cut_count,
                average_duration_frames: 0.0,
                average_duration_seconds: 0.0,
            };
        }
        let frames: u64 = self.segments.iter().map(|s| s.duration_frames).sum();
        let seconds: f64 = self.segments.iter().map(|s| s.duration_seconds).sum();
        AnalysisSummary {
            cut_count,
            average_duration_frames: frames as f64 / cut_count as f64,
            average_duration_seconds: seconds / cut_count as f64,
        }
    }
}

/// Releases the wrapped source when dropped.
struct ReleaseGuard<'a, S: FrameSource> {
    source: &'a mut S,
}

impl<S: FrameSource> Drop for ReleaseGuard<'_, S> {
    fn drop(&mut self) {
        self.source.release();
    }
}

/// Detects cuts in the video at `path` using ffmpeg for decoding.
///
/// # Arguments
///
/// * `path` - Video file to analyze
/// * `config` - Detection configuration, validated before the file is opened
/// * `sink` - Receives progress fractions
///
/// # Returns
///
/// * `Ok(AnalysisResult)` - Segments and summary statistics
/// * `Err(CoreError::InvalidConfig)` - If the configuration is out of range
/// * `Err(CoreError::SourceUnavailable)` - If the video cannot be opened
/// * `Err(CoreError::DetectionFailed)` - If anything fails mid-pass
pub fn detect(
    path: &Path,
    config: &DetectionConfig,
    sink: &mut dyn ProgressSink,
) -> CoreResult<AnalysisResult> {
    let opener = SidecarOpener::new(config.analysis_width);
    detect_with_opener(&opener, path, config, sink)
}

/// Same as [`detect`] with a caller-provided opener.
pub fn detect_with_opener<O: SourceOpener>(
    opener: &O,
    path: &Path,
    config: &DetectionConfig,
    sink: &mut dyn ProgressSink,
) -> CoreResult<AnalysisResult> {
    // Checked before `open` so a bad configuration never spawns a decoder.
    // detect_with_source repeats the check for callers that bypass this path.
    config.validate()?;
    log::info!(
        "Detecting cuts in {} (method: {}, min length: {} frames)",
        path.display(),
        config.method,
        config.min_len_frames
    );
    let mut source = opener.open(path)?;
    detect_with_source(&mut source, config, sink)
}

/// Runs one detection pass over an already opened source. The source is
/// released before this returns, whatever the outcome.
pub fn detect_with_source<S: FrameSource>(
    source: &mut S,
    config: &DetectionConfig,
    sink: &mut dyn ProgressSink,
) -> CoreResult<AnalysisResult> {
    let guard = ReleaseGuard { source };
    config.validate()?;

    let advertised_total = guard.source.total_frames();
    let fps = guard.source.frame_rate();
    log::debug!("Source advertises {advertised_total} frames at {fps:.3} fps");

    let started = Instant::now();
    let mut extractor = MetricExtractor::new();
    let mut strategy = BoundaryStrategy::from_config(config);
    let mut reporter = ProgressReporter::new(sink, advertised_total);
    let mut boundaries = Vec::new();
    let mut processed: u64 = 0;

    loop {
        let frame = match guard.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) => return Err(into_detection_error(err)),
        };

        let sample = extractor.process(processed, &frame)?;
        if let Some(boundary) = strategy.consume(&sample) {
            log::debug!("Boundary at frame {boundary} (score {:.2})", sample.score);
            boundaries.push(boundary);
        }
        reporter.update(processed);
        processed += 1;
    }

    if let Some(boundary) = strategy.finish(processed) {
        log::debug!("Final boundary at frame {boundary}");
        boundaries.push(boundary);
    }
    drop(guard);

    let segments = assemble_segments(&boundaries, processed, fps, config.min_len_frames);
    let total_frames = if processed > 0 {
        processed
    } else {
        advertised_total
    };
    let duration_seconds = if fps > 0.0 && fps.is_finite() {
        total_frames as f64 / fps
    } else {
        0.0
    };

    reporter.complete();
    log::info!(
        "Detected {} boundaries, kept {} cuts from {} frames in {:.2}s",
        boundaries.len(),
        segments.len(),
        processed,
        started.elapsed().as_secs_f64()
    );

    Ok(AnalysisResult {
        segments,
        total_frames,
        fps,
        duration_seconds,
        method: config.method,
        min_len_frames: config.min_len_frames,
    })
}

/// Mid-pass failures surface as `DetectionFailed` unless they already are
/// one, or the caller interrupted the source.
fn into_detection_error(err: CoreError) -> CoreError {
    match err {
        CoreError::DetectionFailed { .. } | CoreError::Interrupted => err,
        other => CoreError::detection_failed(other),
    }
}

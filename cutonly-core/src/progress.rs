//! Progress reporting for detection runs.
//!
//! The pipeline calls [`ProgressReporter::update`] once per decoded frame.
//! The reporter turns the frame index into a fraction in `[0, 0.999]` and
//! forwards it to a caller-supplied [`ProgressSink`]. `1.0` is only delivered
//! by [`ProgressReporter::complete`] after a successful run.
//!
//! Sinks belong to the caller and may fail. Returned errors and panics are
//! caught here and discarded; a failing sink never aborts detection.

use std::error::Error;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Error type a sink may return. It is never propagated.
pub type SinkError = Box<dyn Error + Send + Sync>;

/// Highest fraction reported while frames are still being processed.
pub const MAX_RUNNING_FRACTION: f64 = 0.999;

/// Receives progress fractions in `[0.0, 1.0]`.
pub trait ProgressSink {
    fn report(&mut self, fraction: f64) -> Result<(), SinkError>;
}

impl<F> ProgressSink for F
where
    F: FnMut(f64) -> Result<(), SinkError>,
{
    fn report(&mut self, fraction: f64) -> Result<(), SinkError> {
        self(fraction)
    }
}

/// Sink that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f64) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Fraction of `total_frames` covered at `frame_index`, or `None` when the
/// total is unknown.
#[must_use]
pub fn progress_fraction(frame_index: u64, total_frames: u64) -> Option<f64> {
    if total_frames == 0 {
        return None;
    }
    let fraction = frame_index as f64 / total_frames as f64;
    Some(fraction.clamp(0.0, MAX_RUNNING_FRACTION))
}

/// Forwards bounded, non-decreasing fractions to a sink.
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn ProgressSink,
    total_frames: u64,
    last_reported: Option<f64>,
    failure_logged: bool,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink, total_frames: u64) -> Self {
        Self {
            sink,
            total_frames,
            last_reported: None,
            failure_logged: false,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.total_frames > 0
    }

    /// Reports progress for `frame_index`. Does nothing when the total frame
    /// count is unknown.
    pub fn update(&mut self, frame_index: u64) {
        let Some(fraction) = progress_fraction(frame_index, self.total_frames) else {
            return;
        };
        // Frames past the advertised total must not move progress backwards
        let fraction = match self.last_reported {
            Some(last) => fraction.max(last),
            None => fraction,
        };
        self.deliver(fraction);
    }

    /// Reports `1.0` at the end of a successful run.
    pub fn complete(&mut self) {
        if self.is_enabled() {
            self.deliver(1.0);
        }
    }

    fn deliver(&mut self, fraction: f64) {
        self.last_reported = Some(fraction);
        let sink = &mut *self.sink;
        let outcome = catch_unwind(AssertUnwindSafe(|| sink.report(fraction)));
        let failure = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(_) => "progress sink panicked".to_string(),
        };
        if !self.failure_logged {
            log::debug!("Ignoring progress sink failure: {failure}");
            self.failure_logged = true;
        }
    }
}

// ============================================================================
// cutonly-cli/src/progress.rs
// ============================================================================
//
// PROGRESS BAR: indicatif-backed progress sink
//
// The core library reports progress as a fraction in [0, 1]. DetectionBar
// maps it onto a fixed-length indicatif bar.

use cutonly_core::progress::{ProgressSink, SinkError};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Number of steps the fraction is mapped onto.
const BAR_STEPS: u64 = 1000;

/// Progress bar shown while a video is analyzed.
pub struct DetectionBar {
    bar: ProgressBar,
}

impl DetectionBar {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(BAR_STEPS);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {percent}% ({eta})")
            .map(|style| style.progress_chars("█▓▒░ "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Stops the bar, leaving it on screen on success.
    pub fn finish(&self, success: bool) {
        if success {
            self.bar.finish();
        } else {
            self.bar.abandon();
        }
    }
}

impl ProgressSink for DetectionBar {
    fn report(&mut self, fraction: f64) -> Result<(), SinkError> {
        if !fraction.is_finite() {
            return Err(format!("invalid progress fraction {fraction}").into());
        }
        let position = (fraction.clamp(0.0, 1.0) * BAR_STEPS as f64).round() as u64;
        self.bar.set_position(position);
        Ok(())
    }
}

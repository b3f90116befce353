//! Configuration structures and constants for the cutonly-core library.
//!
//! A [`DetectionConfig`] is supplied per detection run. It selects the
//! boundary strategy, the caller's minimum cut length, the strategy-level
//! minimum scene length and the tuning parameters of each strategy.

mod builder;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use builder::DetectionConfigBuilder;

// Default constants

/// Smallest accepted `min_len_frames`.
pub const MIN_LEN_FRAMES_LOWER: u32 = 1;

/// Largest accepted `min_len_frames`.
pub const MIN_LEN_FRAMES_UPPER: u32 = 2000;

/// Default minimum cut length (frames) used when filtering assembled segments.
pub const DEFAULT_MIN_LEN_FRAMES: u32 = 15;

/// Default minimum spacing (frames) between accepted boundaries inside a strategy.
pub const DEFAULT_MIN_SCENE_LEN: u32 = 15;

/// Default content-score threshold for the content strategy.
/// Scores are on the 8-bit HSV scale, so a hard cut between unrelated shots
/// usually lands well above this value.
pub const DEFAULT_CONTENT_THRESHOLD: f64 = 27.0;

/// Default ratio between the current score and the rolling average that
/// triggers an adaptive boundary.
pub const DEFAULT_ADAPTIVE_THRESHOLD: f64 = 3.0;

/// Default number of prior scores in the adaptive rolling window.
pub const DEFAULT_ADAPTIVE_WINDOW: usize = 2;

/// Minimum raw content score an adaptive boundary must also reach.
pub const DEFAULT_MIN_CONTENT_VAL: f64 = 15.0;

/// Default mean-intensity threshold (0-255) for the threshold strategy.
pub const DEFAULT_INTENSITY_THRESHOLD: f64 = 12.0;

/// Default hysteresis band above the intensity threshold required to fade in.
pub const DEFAULT_HYSTERESIS: f64 = 2.0;

/// Default frame width frames are scaled down to before analysis.
pub const DEFAULT_ANALYSIS_WIDTH: u32 = 320;

/// Boundary detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Fixed global threshold on the frame-difference score.
    #[default]
    Content,
    /// Threshold relative to a rolling average of recent scores.
    Adaptive,
    /// Fade detection on mean frame intensity.
    Threshold,
}

impl DetectionMethod {
    pub const ALL: [DetectionMethod; 3] = [
        DetectionMethod::Content,
        DetectionMethod::Adaptive,
        DetectionMethod::Threshold,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Content => "content",
            DetectionMethod::Adaptive => "adaptive",
            DetectionMethod::Threshold => "threshold",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(DetectionMethod::Content),
            "adaptive" => Ok(DetectionMethod::Adaptive),
            "threshold" => Ok(DetectionMethod::Threshold),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown detection method '{other}' (expected content, adaptive or threshold)"
            ))),
        }
    }
}

/// Tuning for the content strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentParams {
    /// Score at or above which a frame starts a new segment.
    pub threshold: f64,
}

impl Default for ContentParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONTENT_THRESHOLD,
        }
    }
}

/// Tuning for the adaptive strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveParams {
    /// Required ratio of the current score to the rolling window average.
    pub adaptive_threshold: f64,
    /// Number of prior scores averaged. The strategy cannot fire until the
    /// window is full.
    pub window_size: usize,
    /// Raw score the current frame must also reach.
    pub min_content_val: f64,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            adaptive_threshold: DEFAULT_ADAPTIVE_THRESHOLD,
            window_size: DEFAULT_ADAPTIVE_WINDOW,
            min_content_val: DEFAULT_MIN_CONTENT_VAL,
        }
    }
}

/// Tuning for the threshold (fade) strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Mean intensity (0-255) below which the picture counts as faded out.
    pub threshold: f64,
    /// Extra intensity above `threshold` required before fading back in.
    pub hysteresis: f64,
    /// Where the cut lands between fade-out and fade-in, from -1.0 (at the
    /// fade-out) to 1.0 (at the fade-in).
    pub fade_bias: f64,
    /// Emit a boundary at the last fade-out if the video ends faded out.
    pub add_final_scene: bool,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_INTENSITY_THRESHOLD,
            hysteresis: DEFAULT_HYSTERESIS,
            fade_bias: 0.0,
            add_final_scene: false,
        }
    }
}

/// Per-run detection configuration.
///
/// # Examples
///
/// ```rust
/// use cutonly_core::config::{DetectionConfig, DetectionMethod};
///
/// let config = DetectionConfig::new(DetectionMethod::Adaptive, 24);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.min_scene_len, 15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Strategy used to decide boundaries
    pub method: DetectionMethod,

    /// Assembled segments shorter than this many frames are dropped
    pub min_len_frames: u32,

    /// Minimum spacing between accepted boundaries inside the strategy.
    /// A value of 0 is treated as 1.
    pub min_scene_len: u32,

    pub content: ContentParams,
    pub adaptive: AdaptiveParams,
    pub threshold: ThresholdParams,

    /// Width frames are downscaled to before analysis (`None` keeps the
    /// source resolution). Only used by the ffmpeg frame source.
    pub analysis_width: Option<u32>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            method: DetectionMethod::default(),
            min_len_frames: DEFAULT_MIN_LEN_FRAMES,
            min_scene_len: DEFAULT_MIN_SCENE_LEN,
            content: ContentParams::default(),
            adaptive: AdaptiveParams::default(),
            threshold: ThresholdParams::default(),
            analysis_width: Some(DEFAULT_ANALYSIS_WIDTH),
        }
    }
}

impl DetectionConfig {
    pub fn new(method: DetectionMethod, min_len_frames: u32) -> Self {
        Self {
            method,
            min_len_frames,
            ..Default::default()
        }
    }

    /// Strategy floor with the zero case normalized to 1.
    #[must_use]
    pub fn effective_min_scene_len(&self) -> u64 {
        u64::from(self.min_scene_len.max(1))
    }

    /// Checks parameter ranges before a run is started.
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_LEN_FRAMES_LOWER..=MIN_LEN_FRAMES_UPPER).contains(&self.min_len_frames) {
            return Err(CoreError::InvalidConfig(format!(
                "min_len_frames must be between {MIN_LEN_FRAMES_LOWER} and {MIN_LEN_FRAMES_UPPER}, got {}",
                self.min_len_frames
            )));
        }

        check_non_negative("content threshold", self.content.threshold)?;
        check_non_negative("adaptive threshold", self.adaptive.adaptive_threshold)?;
        check_non_negative("minimum content value", self.adaptive.min_content_val)?;
        check_non_negative("intensity threshold", self.threshold.threshold)?;
        check_non_negative("hysteresis", self.threshold.hysteresis)?;

        if self.adaptive.window_size == 0 {
            return Err(CoreError::InvalidConfig(
                "adaptive window size must be at least 1".to_string(),
            ));
        }

        if !(-1.0..=1.0).contains(&self.threshold.fade_bias) {
            return Err(CoreError::InvalidConfig(format!(
                "fade bias must be between -1.0 and 1.0, got {}",
                self.threshold.fade_bias
            )));
        }

        if self.analysis_width == Some(0) {
            return Err(CoreError::InvalidConfig(
                "analysis width must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_non_negative(name: &str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

// ============================================================================
// cutonly-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for DetectionConfig
//
// Fluent API for assembling a DetectionConfig. Every setter starts from the
// defaults in config/mod.rs; `build` validates the result so an invalid
// combination is reported before a source is ever opened.

use super::{DetectionConfig, DetectionMethod};
use crate::error::CoreResult;

/// Builder for creating DetectionConfig instances.
///
/// # Examples
///
/// ```rust
/// use cutonly_core::config::{DetectionConfigBuilder, DetectionMethod};
///
/// let config = DetectionConfigBuilder::new()
///     .method(DetectionMethod::Threshold)
///     .min_len_frames(30)
///     .intensity_threshold(16.0)
///     .add_final_scene(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.threshold.threshold, 16.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the detection method.
    pub fn method(mut self, method: DetectionMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Sets the minimum length (frames) of a retained segment.
    ///
    /// # Arguments
    ///
    /// * `frames` - Minimum cut length, 1 to 2000
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    pub fn min_len_frames(mut self, frames: u32) -> Self {
        self.config.min_len_frames = frames;
        self
    }

    /// Sets the minimum spacing between boundaries accepted by the strategy.
    pub fn min_scene_len(mut self, frames: u32) -> Self {
        self.config.min_scene_len = frames;
        self
    }

    /// Sets the content strategy score threshold.
    pub fn content_threshold(mut self, threshold: f64) -> Self {
        self.config.content.threshold = threshold;
        self
    }

    /// Sets the adaptive ratio threshold.
    pub fn adaptive_threshold(mut self, ratio: f64) -> Self {
        self.config.adaptive.adaptive_threshold = ratio;
        self
    }

    /// Sets the number of prior scores in the adaptive window.
    pub fn window_size(mut self, size: usize) -> Self {
        self.config.adaptive.window_size = size;
        self
    }

    pub fn min_content_val(mut self, value: f64) -> Self {
        self.config.adaptive.min_content_val = value;
        self
    }

    /// Sets the mean-intensity threshold of the threshold strategy.
    pub fn intensity_threshold(mut self, threshold: f64) -> Self {
        self.config.threshold.threshold = threshold;
        self
    }

    pub fn hysteresis(mut self, band: f64) -> Self {
        self.config.threshold.hysteresis = band;
        self
    }

    pub fn fade_bias(mut self, bias: f64) -> Self {
        self.config.threshold.fade_bias = bias;
        self
    }

    /// Sets whether a video ending faded out gets a final boundary.
    pub fn add_final_scene(mut self, enable: bool) -> Self {
        self.config.threshold.add_final_scene = enable;
        self
    }

    /// Sets the analysis width (`None` keeps the source resolution).
    pub fn analysis_width(mut self, width: Option<u32>) -> Self {
        self.config.analysis_width = width;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(DetectionConfig)` - The validated configuration
    /// * `Err(CoreError::InvalidConfig)` - If a parameter is out of range
    pub fn build(self) -> CoreResult<DetectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

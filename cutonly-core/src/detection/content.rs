//! Fixed-threshold rule on the content score.

use super::metric::MetricSample;
use crate::config::ContentParams;

#[derive(Debug, Clone)]
pub struct ContentRule {
    threshold: f64,
}

impl ContentRule {
    pub fn new(params: &ContentParams) -> Self {
        Self {
            threshold: params.threshold,
        }
    }

    /// Proposes the sample's frame when its score reaches the threshold.
    pub fn candidate(&mut self, sample: &MetricSample) -> Option<u64> {
        (sample.has_predecessor && sample.score >= self.threshold).then_some(sample.frame_index)
    }
}

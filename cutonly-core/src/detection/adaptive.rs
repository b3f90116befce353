//! Rolling-average rule: a frame is a candidate when its score stands out
//! against the average of the preceding window.

use std::collections::VecDeque;

use super::metric::MetricSample;
use crate::config::AdaptiveParams;

/// Ratio reported when the window average is effectively zero.
pub const MAX_ADAPTIVE_RATIO: f64 = 255.0;

const ZERO_AVERAGE_EPSILON: f64 = 1e-5;

#[derive(Debug, Clone)]
pub struct AdaptiveRule {
    adaptive_threshold: f64,
    min_content_val: f64,
    window_size: usize,
    window: VecDeque<f64>,
}

impl AdaptiveRule {
    pub fn new(params: &AdaptiveParams) -> Self {
        let window_size = params.window_size.max(1);
        Self {
            adaptive_threshold: params.adaptive_threshold,
            min_content_val: params.min_content_val,
            window_size,
            window: VecDeque::with_capacity(window_size),
        }
    }

    /// Score-to-average ratio against the current window, capped at
    /// [`MAX_ADAPTIVE_RATIO`]. `None` until the window is full.
    pub fn ratio(&self, score: f64) -> Option<f64> {
        if self.window.len() < self.window_size {
            return None;
        }
        let average = self.window.iter().sum::<f64>() / self.window.len() as f64;
        if average < ZERO_AVERAGE_EPSILON {
            Some(MAX_ADAPTIVE_RATIO)
        } else {
            Some((score / average).min(MAX_ADAPTIVE_RATIO))
        }
    }

    pub fn candidate(&mut self, sample: &MetricSample) -> Option<u64> {
        if !sample.has_predecessor {
            return None;
        }

        let fired = self.ratio(sample.score).is_some_and(|ratio| {
            ratio >= self.adaptive_threshold && sample.score >= self.min_content_val
        });

        if self.window.len() == self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(sample.score);

        fired.then_some(sample.frame_index)
    }
}

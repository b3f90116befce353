// ============================================================================
// cutonly-core/src/detection/strategy.rs
// ============================================================================
//
// BOUNDARY STRATEGY: Rule dispatch and the minimum scene length floor
//
// A BoundaryStrategy pairs one rule (content, adaptive or threshold) with the
// shared SceneLengthFloor. Rules propose candidate frames; the floor discards
// any candidate closer than `min_scene_len` frames to the previously accepted
// boundary, with the start of the video counting as the first one. Discarded
// candidates are never deferred.

use super::adaptive::AdaptiveRule;
use super::content::ContentRule;
use super::metric::MetricSample;
use super::threshold::ThresholdRule;
use crate::config::{DetectionConfig, DetectionMethod};

/// Minimum spacing between accepted boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLengthFloor {
    min_scene_len: u64,
    last_accepted: u64,
}

impl SceneLengthFloor {
    /// Creates a floor anchored at frame 0. A length of 0 is treated as 1.
    pub fn new(min_scene_len: u64) -> Self {
        Self {
            min_scene_len: min_scene_len.max(1),
            last_accepted: 0,
        }
    }

    /// Accepts `candidate` if it is far enough from the last accepted boundary.
    pub fn admit(&mut self, candidate: u64) -> Option<u64> {
        if candidate >= self.last_accepted + self.min_scene_len {
            self.last_accepted = candidate;
            Some(candidate)
        } else {
            log::trace!(
                "Discarding boundary candidate {} ({} frames after {})",
                candidate,
                candidate.saturating_sub(self.last_accepted),
                self.last_accepted
            );
            None
        }
    }
}

/// The closed set of boundary rules.
#[derive(Debug, Clone)]
pub enum BoundaryRule {
    Content(ContentRule),
    Adaptive(AdaptiveRule),
    Threshold(ThresholdRule),
}

impl BoundaryRule {
    fn candidate(&mut self, sample: &MetricSample) -> Option<u64> {
        match self {
            BoundaryRule::Content(rule) => rule.candidate(sample),
            BoundaryRule::Adaptive(rule) => rule.candidate(sample),
            BoundaryRule::Threshold(rule) => rule.candidate(sample),
        }
    }

    fn finish(&mut self) -> Option<u64> {
        match self {
            BoundaryRule::Threshold(rule) => rule.finish(),
            BoundaryRule::Content(_) | BoundaryRule::Adaptive(_) => None,
        }
    }
}

/// Consumes metric samples in frame order and emits accepted boundaries.
#[derive(Debug, Clone)]
pub struct BoundaryStrategy {
    rule: BoundaryRule,
    floor: SceneLengthFloor,
}

impl BoundaryStrategy {
    pub fn new(rule: BoundaryRule, min_scene_len: u64) -> Self {
        Self {
            rule,
            floor: SceneLengthFloor::new(min_scene_len),
        }
    }

    /// Builds the strategy selected by `config.method`.
    pub fn from_config(config: &DetectionConfig) -> Self {
        let rule = match config.method {
            DetectionMethod::Content => BoundaryRule::Content(ContentRule::new(&config.content)),
            DetectionMethod::Adaptive => {
                BoundaryRule::Adaptive(AdaptiveRule::new(&config.adaptive))
            }
            DetectionMethod::Threshold => {
                BoundaryRule::Threshold(ThresholdRule::new(&config.threshold))
            }
        };
        Self::new(rule, config.effective_min_scene_len())
    }

    /// Feeds one sample; returns the boundary it produced, if any.
    pub fn consume(&mut self, sample: &MetricSample) -> Option<u64> {
        let candidate = self.rule.candidate(sample)?;
        self.floor.admit(candidate)
    }

    /// Called once after the last sample; `end_frame` is the number of
    /// frames processed.
    pub fn finish(&mut self, end_frame: u64) -> Option<u64> {
        let candidate = self.rule.finish()?;
        if candidate >= end_frame {
            return None;
        }
        self.floor.admit(candidate)
    }
}

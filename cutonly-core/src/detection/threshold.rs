//! Fade detection on mean frame intensity.
//!
//! The picture fades out when its mean intensity drops below the threshold
//! and fades back in once it reaches `threshold + hysteresis`. A completed
//! out/in pair yields one candidate placed between the two frames according
//! to the fade bias.

use super::metric::MetricSample;
use crate::config::ThresholdParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadeKind {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fade {
    kind: FadeKind,
    frame: u64,
}

#[derive(Debug, Clone)]
pub struct ThresholdRule {
    threshold: f64,
    fade_in_level: f64,
    fade_bias: f64,
    add_final_scene: bool,
    last_fade: Option<Fade>,
}

impl ThresholdRule {
    pub fn new(params: &ThresholdParams) -> Self {
        Self {
            threshold: params.threshold,
            fade_in_level: params.threshold + params.hysteresis,
            fade_bias: params.fade_bias.clamp(-1.0, 1.0),
            add_final_scene: params.add_final_scene,
            last_fade: None,
        }
    }

    pub fn candidate(&mut self, sample: &MetricSample) -> Option<u64> {
        let intensity = sample.mean_intensity;
        let frame = sample.frame_index;

        let Some(last) = self.last_fade else {
            let kind = if intensity < self.threshold {
                FadeKind::Out
            } else {
                FadeKind::In
            };
            self.last_fade = Some(Fade { kind, frame });
            return None;
        };

        match last.kind {
            FadeKind::In if intensity < self.threshold => {
                self.last_fade = Some(Fade {
                    kind: FadeKind::Out,
                    frame,
                });
                None
            }
            FadeKind::Out if intensity >= self.fade_in_level => {
                self.last_fade = Some(Fade {
                    kind: FadeKind::In,
                    frame,
                });
                Some(place_cut(last.frame, frame, self.fade_bias))
            }
            _ => None,
        }
    }

    /// Final candidate for a stream that ends faded out, if enabled.
    pub fn finish(&mut self) -> Option<u64> {
        match self.last_fade {
            Some(Fade {
                kind: FadeKind::Out,
                frame,
            }) if self.add_final_scene => Some(frame),
            _ => None,
        }
    }
}

/// Places a cut between a fade-out and the following fade-in. A bias of -1
/// puts it on the fade-out frame, 1 on the fade-in frame.
#[must_use]
pub fn place_cut(fade_out: u64, fade_in: u64, bias: f64) -> u64 {
    let span = fade_in.saturating_sub(fade_out) as f64;
    let offset = (span * (1.0 + bias) / 2.0).floor().max(0.0) as u64;
    (fade_out + offset).min(fade_in)
}

//! Frame-difference metric.
//!
//! Every frame is converted from packed RGB24 to HSV on the 8-bit scale
//! (hue 0-179, saturation and value 0-255). The content score of a frame is
//! the mean of the per-channel mean absolute differences against the previous
//! frame. The mean intensity (average of all RGB bytes) is reported alongside
//! for fade detection.

use crate::error::{CoreError, CoreResult};
use crate::external::{Frame, RGB_CHANNELS};

/// One metric value per processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    pub frame_index: u64,
    /// Dissimilarity against the previous frame, 0.0 for the first frame
    pub score: f64,
    /// Mean of all RGB bytes of this frame (0-255)
    pub mean_intensity: f64,
    /// False only for the first frame of a pass
    pub has_predecessor: bool,
}

/// Planar HSV representation of one frame.
#[derive(Debug, Clone, Default)]
struct HsvPlanes {
    hue: Vec<u8>,
    saturation: Vec<u8>,
    value: Vec<u8>,
}

impl HsvPlanes {
    fn from_rgb(frame: &Frame) -> Self {
        let pixels = frame.pixel_count();
        let mut planes = HsvPlanes {
            hue: Vec::with_capacity(pixels),
            saturation: Vec::with_capacity(pixels),
            value: Vec::with_capacity(pixels),
        };
        for px in frame.data.chunks_exact(RGB_CHANNELS) {
            let (h, s, v) = rgb_to_hsv(px[0], px[1], px[2]);
            planes.hue.push(h);
            planes.saturation.push(s);
            planes.value.push(v);
        }
        planes
    }
}

/// Converts one RGB pixel to 8-bit HSV (hue halved to fit 0-179).
#[must_use]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let saturation = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    // 360 degrees folds onto 0 after halving
    let hue = ((hue / 2.0).round() as u16 % 180) as u8;
    (hue, saturation.round() as u8, max as u8)
}

fn mean_abs_diff(a: &[u8], b: &[u8]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let total: u64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum();
    total as f64 / a.len() as f64
}

fn mean_intensity(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let total: u64 = data.iter().map(|&v| u64::from(v)).sum();
    total as f64 / data.len() as f64
}

/// Computes [`MetricSample`]s for consecutive frames, keeping only the
/// previous frame's planes.
#[derive(Debug, Default)]
pub struct MetricExtractor {
    previous: Option<(u32, u32, HsvPlanes)>,
}

impl MetricExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores `frame` against the previously processed frame.
    ///
    /// Fails with `DetectionFailed` when the buffer length does not match the
    /// frame dimensions, or when the dimensions change mid-stream.
    pub fn process(&mut self, frame_index: u64, frame: &Frame) -> CoreResult<MetricSample> {
        if frame.data.len() != frame.expected_len() {
            return Err(CoreError::detection_failed(format!(
                "frame {frame_index} has {} bytes, expected {} for {}x{} RGB24",
                frame.data.len(),
                frame.expected_len(),
                frame.width,
                frame.height
            )));
        }

        let planes = HsvPlanes::from_rgb(frame);
        let intensity = mean_intensity(&frame.data);

        let sample = match &self.previous {
            Some((width, height, prev)) => {
                if (*width, *height) != (frame.width, frame.height) {
                    return Err(CoreError::detection_failed(format!(
                        "frame {frame_index} is {}x{} but the stream started at {width}x{height}",
                        frame.width, frame.height
                    )));
                }
                let delta_hue = mean_abs_diff(&prev.hue, &planes.hue);
                let delta_sat = mean_abs_diff(&prev.saturation, &planes.saturation);
                let delta_lum = mean_abs_diff(&prev.value, &planes.value);
                MetricSample {
                    frame_index,
                    score: (delta_hue + delta_sat + delta_lum) / 3.0,
                    mean_intensity: intensity,
                    has_predecessor: true,
                }
            }
            None => MetricSample {
                frame_index,
                score: 0.0,
                mean_intensity: intensity,
                has_predecessor: false,
            },
        };

        self.previous = Some((frame.width, frame.height, planes));
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
        assert_eq!(rgb_to_hsv(255, 255, 255), (0, 0, 255));
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
        assert_eq!(rgb_to_hsv(255, 0, 1).0, 0);
    }

    #[test]
    fn test_first_frame_has_no_predecessor() {
        let mut extractor = MetricExtractor::new();
        let sample = extractor.process(0, &Frame::solid(4, 4, [200, 200, 200])).unwrap();
        assert!(!sample.has_predecessor);
        assert_eq!(sample.score, 0.0);
        assert_eq!(sample.mean_intensity, 200.0);
    }

    #[test]
    fn test_identical_frames_score_zero() {
        let mut extractor = MetricExtractor::new();
        let frame = Frame::solid(8, 8, [30, 120, 90]);
        extractor.process(0, &frame).unwrap();
        let sample = extractor.process(1, &frame).unwrap();
        assert!(sample.has_predecessor);
        assert_eq!(sample.score, 0.0);
    }

    #[test]
    fn test_black_to_white_scores_a_third_of_full_scale() {
        let mut extractor = MetricExtractor::new();
        extractor.process(0, &Frame::solid(4, 4, [0, 0, 0])).unwrap();
        let sample = extractor.process(1, &Frame::solid(4, 4, [255, 255, 255])).unwrap();
        assert!((sample.score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_buffer_length_fails() {
        let mut extractor = MetricExtractor::new();
        let frame = Frame::new(4, 4, vec![0; 10]);
        assert!(matches!(
            extractor.process(0, &frame),
            Err(CoreError::DetectionFailed { .. })
        ));
    }

    #[test]
    fn test_size_change_fails() {
        let mut extractor = MetricExtractor::new();
        extractor.process(0, &Frame::solid(4, 4, [0, 0, 0])).unwrap();
        let result = extractor.process(1, &Frame::solid(2, 2, [0, 0, 0]));
        assert!(matches!(result, Err(CoreError::DetectionFailed { .. })));
    }
}

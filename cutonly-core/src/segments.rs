// ============================================================================
// cutonly-core/src/segments.rs
// ============================================================================
//
// SEGMENT ASSEMBLY: Boundaries to time-coded segments
//
// Boundaries split [0, end_frame) into consecutive spans. Spans shorter than
// the minimum cut length are dropped (never merged into a neighbour) and the
// survivors are numbered from 1.

use serde::{Deserialize, Serialize};

/// One retained cut of the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based ordinal among retained segments
    pub index: u32,
    pub start_frame: u64,
    /// Exclusive end frame
    pub end_frame: u64,
    pub duration_frames: u64,
    pub start_time: f64,
    pub end_time: f64,
    pub duration_seconds: f64,
}

fn frame_time(frame: u64, fps: f64) -> f64 {
    if fps > 0.0 && fps.is_finite() {
        frame as f64 / fps
    } else {
        0.0
    }
}

/// Builds segments from boundary frames.
///
/// # Arguments
///
/// * `boundaries` - Frames at which a new segment starts, in detection order
/// * `end_frame` - Exclusive end of the last segment
/// * `fps` - Frame rate used for time fields (0 or less gives zero times)
/// * `min_len_frames` - Spans shorter than this are dropped
///
/// Boundaries at 0, at or past `end_frame`, or not strictly increasing are
/// ignored.
#[must_use]
pub fn assemble_segments(
    boundaries: &[u64],
    end_frame: u64,
    fps: f64,
    min_len_frames: u32,
) -> Vec<Segment> {
    if end_frame == 0 {
        return Vec::new();
    }

    let mut edges = Vec::with_capacity(boundaries.len() + 2);
    edges.push(0u64);
    for &boundary in boundaries {
        let last = edges.last().copied().unwrap_or(0);
        if boundary > last && boundary < end_frame {
            edges.push(boundary);
        } else {
            log::debug!("Ignoring out-of-order or out-of-range boundary {boundary}");
        }
    }
    edges.push(end_frame);

    let min_len = u64::from(min_len_frames);
    let mut segments = Vec::new();
    for pair in edges.windows(2) {
        let (start_frame, end_frame) = (pair[0], pair[1]);
        let duration_frames = end_frame - start_frame;
        if duration_frames < min_len {
            log::debug!(
                "Dropping short span {start_frame}..{end_frame} ({duration_frames} < {min_len} frames)"
            );
            continue;
        }

        let start_time = frame_time(start_frame, fps);
        let end_time = frame_time(end_frame, fps);
        segments.push(Segment {
            index: segments.len() as u32 + 1,
            start_frame,
            end_frame,
            duration_frames,
            start_time,
            end_time,
            duration_seconds: (end_time - start_time).max(0.0),
        });
    }
    segments
}

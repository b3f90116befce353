//! FFprobe integration for stream properties.
//!
//! Frame rate and frame count come from the first video stream. When the
//! container does not record `nb_frames`, the count is estimated from the
//! duration and frame rate, and left at 0 when neither is known.
use crate::error::{CoreError, CoreResult};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Properties of the first video stream of a file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreamProperties {
    /// Frames per second, 0.0 if unknown
    pub frame_rate: f64,
    /// Total number of frames, 0 if unknown
    pub total_frames: u64,
    /// Duration in seconds as reported by the container
    pub duration_secs: Option<f64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Probes a file for its video stream properties.
pub fn probe_stream(input_path: &Path) -> CoreResult<StreamProperties> {
    log::debug!(
        "Running ffprobe (via crate) for stream properties on: {}",
        input_path.display()
    );
    let metadata = ffprobe(input_path).map_err(|err| {
        log::error!("ffprobe failed for {}: {:?}", input_path.display(), err);
        map_ffprobe_error(err, input_path)
    })?;

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::SourceUnavailable(format!(
                "No video stream found in {}",
                input_path.display()
            ))
        })?;

    let frame_rate = parse_frame_rate(&video_stream.avg_frame_rate)
        .or_else(|| parse_frame_rate(&video_stream.r_frame_rate))
        .unwrap_or(0.0);

    let duration_secs = video_stream
        .duration
        .as_deref()
        .or(metadata.format.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);

    let total_frames = video_stream
        .nb_frames
        .as_deref()
        .and_then(|f| f.parse::<u64>().ok())
        .filter(|f| *f > 0)
        .or_else(|| estimate_frame_count(duration_secs, frame_rate))
        .unwrap_or_else(|| {
            log::warn!(
                "Frame count unknown for {}, progress will not be reported",
                input_path.display()
            );
            0
        });

    Ok(StreamProperties {
        frame_rate,
        total_frames,
        duration_secs,
        width: video_stream.width,
        height: video_stream.height,
    })
}

/// Parses an ffprobe rate such as `30000/1001` or `25`. Returns `None` for
/// zero, malformed or `0/0` rates.
#[must_use]
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.parse::<f64>().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn estimate_frame_count(duration_secs: Option<f64>, frame_rate: f64) -> Option<u64> {
    let duration = duration_secs?;
    if frame_rate <= 0.0 {
        return None;
    }
    let frames = (duration * frame_rate).round();
    (frames >= 1.0).then_some(frames as u64)
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    let detail = match err {
        FfProbeError::Io(io_err) => format!("could not run ffprobe: {io_err}"),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            format!("ffprobe exited with {}: {}", output.status, stderr.trim())
        }
        FfProbeError::Deserialize(err) => format!("unreadable ffprobe output: {err}"),
        _ => format!("unknown ffprobe error: {err:?}"),
    };
    CoreError::SourceUnavailable(format!("{}: {}", input_path.display(), detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.001);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
        assert_eq!(parse_frame_rate(""), None);
    }

    #[test]
    fn test_estimate_frame_count() {
        assert_eq!(estimate_frame_count(Some(10.0), 30.0), Some(300));
        assert_eq!(estimate_frame_count(Some(10.0), 0.0), None);
        assert_eq!(estimate_frame_count(None, 30.0), None);
        assert_eq!(estimate_frame_count(Some(0.01), 24.0), None);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");
        let result = probe_stream(&missing);
        assert!(matches!(result, Err(CoreError::SourceUnavailable(_))));
    }
}

//! Formatting and path helpers shared by the library and its front ends.

use std::path::Path;

/// Formats seconds as MM:SS.ss (e.g., 75.5 -> "01:15.50"). Minutes are not
/// wrapped into hours. Returns "-" for invalid inputs.
#[must_use]
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "-".to_string();
    }

    let minutes = (seconds / 60.0).floor() as u64;
    let remainder = seconds - (minutes as f64) * 60.0;
    // Rounding can carry 59.999 up to 60.00
    if remainder >= 59.995 {
        return format!("{:02}:00.00", minutes + 1);
    }
    format!("{minutes:02}:{remainder:05.2}")
}

/// Name used for a video in reports and payloads: its file name, or the full
/// path when it has none.
#[must_use]
pub fn input_display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "00:00.00");
        assert_eq!(format_seconds(5.0), "00:05.00");
        assert_eq!(format_seconds(75.5), "01:15.50");
        assert_eq!(format_seconds(3725.25), "62:05.25");
        assert_eq!(format_seconds(59.999), "01:00.00");
        assert_eq!(format_seconds(-1.0), "-");
        assert_eq!(format_seconds(f64::NAN), "-");
    }

    #[test]
    fn test_input_display_name() {
        let path = Path::new("/videos/holiday.mp4");
        assert_eq!(input_display_name(path), "holiday.mp4");
        assert_eq!(input_display_name(Path::new("/")), "/");
    }
}

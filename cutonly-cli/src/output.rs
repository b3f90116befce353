//! Terminal report for detection and probe results.

use console::style;
use cutonly_core::payload::CutNotes;
use cutonly_core::{AnalysisResult, StreamProperties, format_seconds};
use std::fmt::Display;

/// Print a heading with styling and clear separation
pub fn print_heading(text: &str) {
    let line = "=".repeat(50);
    println!("\n{}", style(&line).blue().bright());
    println!("{}", style(format!(" {text} ")).bold().white());
    println!("{}\n", style(&line).blue().bright());
}

/// Print a section heading (smaller than main heading)
pub fn print_section(text: &str) {
    let line = "-".repeat(40);
    println!("\n{}", style(&line).blue());
    println!("{}", style(format!(" {text} ")).bold());
    println!("{}", style(&line).blue());
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", style(label).cyan().bright(), value);
}

/// Print an error message with red styling
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bright().bold(), message);
}

/// Print a success message with green styling and a checkmark
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a warning with yellow styling
pub fn print_warning(message: &str) {
    println!("{} {}", style("⚠").yellow(), message);
}

/// Formats the cut table rows, without styling.
pub fn format_cut_rows(result: &AnalysisResult, notes: &CutNotes) -> Vec<String> {
    let mut rows = vec![format!(
        "{:>4}  {:>9}  {:>9}  {:>8}  {:>9}  {:>9}  {:>9}",
        "#", "Start", "End", "Frames", "Start", "End", "Length"
    )];
    for segment in &result.segments {
        let mut row = format!(
            "{:>4}  {:>9}  {:>9}  {:>8}  {:>9}  {:>9}  {:>8.2}s",
            segment.index,
            segment.start_frame,
            segment.end_frame,
            segment.duration_frames,
            format_seconds(segment.start_time),
            format_seconds(segment.end_time),
            segment.duration_seconds
        );
        if let Some(note) = notes.get(segment.index) {
            row.push_str(&format!("  {note}"));
        }
        rows.push(row);
    }
    rows
}

/// Print the table of detected cuts
pub fn print_cut_table(result: &AnalysisResult, notes: &CutNotes) {
    print_section("Cuts");
    if result.segments.is_empty() {
        print_warning("No cuts long enough were detected. Try a lower minimum cut length.");
        return;
    }
    let rows = format_cut_rows(result, notes);
    if let Some((header, body)) = rows.split_first() {
        println!("{}", style(header).bold());
        for row in body {
            println!("{row}");
        }
    }
}

/// Print the cut count, video length and average cut length
pub fn print_summary(result: &AnalysisResult) {
    let summary = result.summary();
    print_section("Summary");
    print_info("Cuts", summary.cut_count);
    print_info(
        "Video length",
        format!(
            "{} ({} frames @ {:.3} fps)",
            format_seconds(result.duration_seconds),
            result.total_frames,
            result.fps
        ),
    );
    if summary.cut_count > 0 {
        print_info(
            "Average cut",
            format!(
                "{:.1} frames ({})",
                summary.average_duration_frames,
                format_seconds(summary.average_duration_seconds)
            ),
        );
    }
}

/// Print the properties reported by the probe command
pub fn print_stream_properties(name: &str, properties: &StreamProperties) {
    print_heading(&format!("Probe: {name}"));
    print_info("Frame rate", format!("{:.3} fps", properties.frame_rate));
    print_info("Frames", properties.total_frames);
    let duration = properties.duration_secs.unwrap_or_else(|| {
        if properties.frame_rate > 0.0 {
            properties.total_frames as f64 / properties.frame_rate
        } else {
            0.0
        }
    });
    print_info("Duration", format_seconds(duration));
    if let (Some(width), Some(height)) = (properties.width, properties.height) {
        print_info("Resolution", format!("{width}x{height}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutonly_core::{DetectionMethod, assemble_segments};

    #[test]
    fn test_cut_rows_include_notes() {
        let result = AnalysisResult {
            segments: assemble_segments(&[150], 300, 30.0, 15),
            total_frames: 300,
            fps: 30.0,
            duration_seconds: 10.0,
            method: DetectionMethod::Content,
            min_len_frames: 15,
        };
        let mut notes = CutNotes::new();
        notes.insert(2, " Car chase ");

        let rows = format_cut_rows(&result, &notes);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].contains("00:00.00"));
        assert!(rows[1].contains("00:05.00"));
        assert!(rows[2].ends_with("  Car chase"));
        assert!(rows[2].contains("5.00s"));
    }
}

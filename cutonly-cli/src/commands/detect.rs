//! Implementation of the 'detect' subcommand.
//!
//! Validates the input path, builds the detection configuration from the
//! arguments, runs the core pipeline with a progress bar and prints the cut
//! table. The JSON payload is written when `--output` is given.

use crate::cli::DetectArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use crate::progress::DetectionBar;

use cutonly_core::config::{DetectionConfig, DetectionConfigBuilder, DetectionMethod};
use cutonly_core::payload::{CutNotes, OutputPayload, default_payload_file_name};
use cutonly_core::progress::{NoProgress, ProgressSink};
use cutonly_core::{
    AnalysisResult, CoreError, InterruptHandle, SidecarOpener, detect_with_opener,
    input_display_name,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};

/// Resolves the input argument to an existing file.
pub fn resolve_input_file(input: &Path) -> CliResult<PathBuf> {
    let input_path = input.canonicalize().map_err(|e| {
        CoreError::SourceUnavailable(format!("Invalid input path '{}': {}", input.display(), e))
    })?;

    let metadata = fs::metadata(&input_path).cli_with_context(|| {
        format!("Failed to access input path '{}'", input_path.display())
    })?;
    if !metadata.is_file() {
        return Err(CoreError::SourceUnavailable(format!(
            "Input path '{}' is not a file",
            input_path.display()
        )));
    }
    Ok(input_path)
}

/// Builds the detection configuration from CLI arguments. `--threshold`
/// applies to the parameter of the selected method.
pub fn build_detection_config(args: &DetectArgs) -> CliResult<DetectionConfig> {
    let mut builder = DetectionConfigBuilder::new()
        .method(args.method)
        .min_len_frames(args.min_len)
        .min_scene_len(args.min_scene_len);

    if let Some(threshold) = args.threshold {
        builder = match args.method {
            DetectionMethod::Content => builder.content_threshold(threshold),
            DetectionMethod::Adaptive => builder.adaptive_threshold(threshold),
            DetectionMethod::Threshold => builder.intensity_threshold(threshold),
        };
    }

    builder.build()
}

/// Where the payload goes: `output` itself, or the default file name inside
/// it when it is an existing directory.
pub fn resolve_output_path(output: &Path, input: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(default_payload_file_name(input))
    } else {
        output.to_path_buf()
    }
}

fn collect_notes(args: &DetectArgs) -> CutNotes {
    args.notes.iter().cloned().collect()
}

/// Runs the detect command.
pub fn run_detect(args: DetectArgs, interrupt: InterruptHandle) -> CliResult<AnalysisResult> {
    let started = Instant::now();
    let input_path = resolve_input_file(&args.input_path)?;
    let config = build_detection_config(&args)?;
    let notes = collect_notes(&args);
    let display_name = input_display_name(&input_path);

    output::print_heading("CutOnly Detection");
    output::print_info("Input", input_path.display());
    output::print_info("Method", config.method);
    output::print_info("Minimum cut length", format!("{} frames", config.min_len_frames));
    info!(
        "Detect run started for {} (method {}, min length {})",
        input_path.display(),
        config.method,
        config.min_len_frames
    );
    debug!("Detection configuration: {config:?}");

    let opener = SidecarOpener::new(config.analysis_width).with_interrupt(interrupt);

    let mut bar = (!args.no_progress).then(|| DetectionBar::new(&display_name));
    let mut quiet = NoProgress;
    let sink: &mut dyn ProgressSink = match bar.as_mut() {
        Some(bar) => bar,
        None => &mut quiet,
    };
    let outcome = detect_with_opener(&opener, &input_path, &config, sink);
    if let Some(bar) = &bar {
        bar.finish(outcome.is_ok());
    }
    let result = outcome?;

    output::print_cut_table(&result, &notes);
    output::print_summary(&result);

    for index in notes_without_cut(&notes, &result) {
        warn!("Ignoring note for cut {index}: no such cut");
        output::print_warning(&format!("Ignoring note for cut {index}: no such cut"));
    }

    if let Some(output_arg) = &args.output {
        let output_path = resolve_output_path(output_arg, &input_path);
        let payload = OutputPayload::build(display_name.as_str(), &result, &notes);
        payload
            .write_to(&output_path)
            .cli_with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        output::print_success(&format!("Saved cuts to {}", output_path.display()));
    }

    info!(
        "Detect run finished in {:.2}s",
        started.elapsed().as_secs_f64()
    );
    Ok(result)
}

/// Note indices past the last retained cut.
fn notes_without_cut(notes: &CutNotes, result: &AnalysisResult) -> Vec<u32> {
    let count = result.segments.len() as u32;
    notes.indices().filter(|index| *index > count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn detect_args(extra: &[&str]) -> DetectArgs {
        let mut argv = vec!["cutonly", "detect", "-i", "clip.mp4"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Detect(args) => args,
            Commands::Probe(_) => panic!("expected detect"),
        }
    }

    #[test]
    fn test_threshold_applies_to_selected_method() {
        let config =
            build_detection_config(&detect_args(&["--method", "content", "--threshold", "30"]))
                .unwrap();
        assert_eq!(config.content.threshold, 30.0);

        let config =
            build_detection_config(&detect_args(&["--method", "adaptive", "--threshold", "2"]))
                .unwrap();
        assert_eq!(config.adaptive.adaptive_threshold, 2.0);

        let config =
            build_detection_config(&detect_args(&["--method", "threshold", "--threshold", "20"]))
                .unwrap();
        assert_eq!(config.threshold.threshold, 20.0);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let result = build_detection_config(&detect_args(&["--threshold=-1"]));
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_resolve_input_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = resolve_input_file(&dir.path().join("missing.mp4")).unwrap_err();
        assert!(missing.to_string().contains("Invalid input path"));

        let not_file = resolve_input_file(dir.path()).unwrap_err();
        assert!(not_file.to_string().contains("is not a file"));
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new("/videos/clip.mp4");
        assert_eq!(
            resolve_output_path(dir.path(), input),
            dir.path().join("cuts_clip.mp4.json")
        );
        let file = dir.path().join("mine.json");
        assert_eq!(resolve_output_path(&file, input), file);
    }

    #[test]
    fn test_notes_without_cut() {
        let args = detect_args(&["--note", "7=c", "--note", "1=a", "--note", "5=b", "--note", "5=d"]);
        let notes = collect_notes(&args);
        let result = AnalysisResult {
            segments: cutonly_core::assemble_segments(&[100], 200, 25.0, 15),
            total_frames: 200,
            fps: 25.0,
            duration_seconds: 8.0,
            method: DetectionMethod::Content,
            min_len_frames: 15,
        };
        assert_eq!(notes_without_cut(&notes, &result), vec![5, 7]);
    }
}

// cutonly-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use cutonly_core::config::{
    DEFAULT_MIN_LEN_FRAMES, DEFAULT_MIN_SCENE_LEN, DetectionMethod, MIN_LEN_FRAMES_LOWER,
    MIN_LEN_FRAMES_UPPER,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "CutOnly: Scene-boundary detection for video files",
    long_about = "Detects cuts in a video using content, adaptive or threshold \
                  detection via the cutonly-core library, and exports them as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG still takes precedence on the console)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detects cuts in a video file and prints the cut table
    Detect(DetectArgs),
    /// Prints frame rate, frame count and duration of a video file
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Video file to analyze
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_FILE")]
    pub input_path: PathBuf,

    /// Detection method: content, adaptive or threshold
    #[arg(
        long,
        value_name = "METHOD",
        env = "CUTONLY_METHOD",
        default_value_t = DetectionMethod::Content
    )]
    pub method: DetectionMethod,

    /// Minimum cut length in frames; shorter cuts are dropped
    #[arg(
        long = "min-len",
        value_name = "FRAMES",
        env = "CUTONLY_MIN_LEN",
        default_value_t = DEFAULT_MIN_LEN_FRAMES,
        value_parser = clap::value_parser!(u32)
            .range(i64::from(MIN_LEN_FRAMES_LOWER)..=i64::from(MIN_LEN_FRAMES_UPPER))
    )]
    pub min_len: u32,

    /// Minimum spacing between detected boundaries, in frames
    #[arg(long, value_name = "FRAMES", default_value_t = DEFAULT_MIN_SCENE_LEN)]
    pub min_scene_len: u32,

    /// Optional: Override the threshold of the selected method
    /// (content score, adaptive ratio or mean intensity)
    #[arg(long, value_name = "VALUE")]
    pub threshold: Option<f64>,

    /// Optional: Write the JSON payload to this file, or into this directory
    /// as cuts_<input name>.json
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Attach a note to a cut, e.g. --note 2="Car chase". May be repeated
    #[arg(long = "note", value_name = "INDEX=TEXT", value_parser = parse_note)]
    pub notes: Vec<(u32, String)>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Optional: Write logs to a file in this directory instead of the console
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Video file to inspect
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_FILE")]
    pub input_path: PathBuf,
}

/// Parses a `INDEX=TEXT` note argument.
pub fn parse_note(raw: &str) -> Result<(u32, String), String> {
    let (index, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TEXT, got '{raw}'"))?;
    let index = index.trim();
    let index: u32 = index
        .parse()
        .map_err(|_| format!("invalid cut index '{index}' in INDEX=TEXT"))?;
    if index == 0 {
        return Err("cut indices start at 1".to_string());
    }
    Ok((index, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect_defaults() {
        let cli = Cli::try_parse_from(["cutonly", "detect", "-i", "clip.mp4"]).unwrap();
        match cli.command {
            Commands::Detect(args) => {
                assert_eq!(args.input_path, PathBuf::from("clip.mp4"));
                assert_eq!(args.method, DetectionMethod::Content);
                assert_eq!(args.min_len, DEFAULT_MIN_LEN_FRAMES);
                assert_eq!(args.min_scene_len, DEFAULT_MIN_SCENE_LEN);
                assert!(args.threshold.is_none());
                assert!(args.output.is_none());
                assert!(args.notes.is_empty());
                assert!(!args.no_progress);
            }
            Commands::Probe(_) => panic!("expected detect"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_detect_full() {
        let cli = Cli::try_parse_from([
            "cutonly",
            "detect",
            "--input",
            "clip.mp4",
            "--method",
            "adaptive",
            "--min-len",
            "48",
            "--threshold",
            "2.5",
            "-o",
            "out.json",
            "--note",
            "1=Opening",
            "--note",
            "3=Car chase",
            "--no-progress",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Detect(args) => {
                assert_eq!(args.method, DetectionMethod::Adaptive);
                assert_eq!(args.min_len, 48);
                assert_eq!(args.threshold, Some(2.5));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert_eq!(
                    args.notes,
                    vec![(1, "Opening".to_string()), (3, "Car chase".to_string())]
                );
                assert!(args.no_progress);
            }
            Commands::Probe(_) => panic!("expected detect"),
        }
    }

    #[test]
    fn test_min_len_range_enforced() {
        for bad in ["0", "2001"] {
            let result =
                Cli::try_parse_from(["cutonly", "detect", "-i", "clip.mp4", "--min-len", bad]);
            assert!(result.is_err(), "min-len {bad} should be rejected");
        }
        assert!(
            Cli::try_parse_from(["cutonly", "detect", "-i", "clip.mp4", "--min-len", "2000"])
                .is_ok()
        );
    }

    #[test]
    fn test_parse_note() {
        assert_eq!(parse_note("2=Hello"), Ok((2, "Hello".to_string())));
        assert_eq!(parse_note(" 4 =a=b"), Ok((4, "a=b".to_string())));
        assert!(parse_note("Hello").is_err());
        assert!(parse_note("x=Hello").is_err());
        assert!(parse_note("0=Hello").is_err());
    }

    #[test]
    fn test_parse_probe() {
        let cli = Cli::try_parse_from(["cutonly", "probe", "-i", "clip.mkv"]).unwrap();
        match cli.command {
            Commands::Probe(args) => assert_eq!(args.input_path, PathBuf::from("clip.mkv")),
            Commands::Detect(_) => panic!("expected probe"),
        }
    }
}

use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::path::PathBuf;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn cutonly_cmd() -> Command {
    Command::cargo_bin("cutonly").expect("Failed to find cutonly binary")
}

#[test]
fn test_help_lists_subcommands() {
    cutonly_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("detect"))
        .stdout(contains("probe"));
}

#[test]
fn test_detect_non_existent_input() -> Result<(), Box<dyn Error>> {
    let non_existent_input = PathBuf::from("surely/this/does/not/exist/input.mkv");

    cutonly_cmd()
        .arg("detect")
        .arg("--input")
        .arg(&non_existent_input)
        .arg("--no-progress")
        .assert()
        .failure()
        .stderr(contains("Invalid input path"));

    Ok(())
}

#[test]
fn test_probe_non_existent_input() {
    cutonly_cmd()
        .args(["probe", "-i", "surely/this/does/not/exist/input.mkv"])
        .assert()
        .failure()
        .stderr(contains("Invalid input path"));
}

#[test]
fn test_detect_directory_input_rejected() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;

    cutonly_cmd()
        .arg("detect")
        .arg("-i")
        .arg(input_dir.path())
        .arg("--no-progress")
        .assert()
        .failure()
        .stderr(contains("is not a file"));

    Ok(())
}

#[test]
fn test_detect_unreadable_video_fails() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let input_file = input_dir.path().join("not_a_video.mp4");
    std::fs::write(&input_file, "dummy content")?;
    let output_file = input_dir.path().join("cuts.json");

    cutonly_cmd()
        .arg("detect")
        .arg("-i")
        .arg(&input_file)
        .arg("-o")
        .arg(&output_file)
        .arg("--no-progress")
        .assert()
        .failure()
        .stderr(contains("Error:"));

    assert!(!output_file.exists(), "no payload for a failed run");
    Ok(())
}

#[test]
fn test_min_len_out_of_range() {
    for bad in ["0", "2001"] {
        cutonly_cmd()
            .args(["detect", "-i", "clip.mp4", "--min-len", bad])
            .assert()
            .failure()
            .stderr(contains("min-len"));
    }
}

#[test]
fn test_min_len_from_env_is_validated() {
    cutonly_cmd()
        .env("CUTONLY_MIN_LEN", "0")
        .args(["detect", "-i", "clip.mp4"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_method_rejected() {
    cutonly_cmd()
        .args(["detect", "-i", "clip.mp4", "--method", "histogram"])
        .assert()
        .failure()
        .stderr(contains("histogram"));
}

#[test]
fn test_malformed_note_rejected() {
    cutonly_cmd()
        .args(["detect", "-i", "clip.mp4", "--note", "opening"])
        .assert()
        .failure()
        .stderr(contains("INDEX=TEXT"));
}

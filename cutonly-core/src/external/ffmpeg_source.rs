// ============================================================================
// cutonly-core/src/external/ffmpeg_source.rs
// ============================================================================
//
// FFMPEG FRAME SOURCE: Raw frame decoding through ffmpeg-sidecar
//
// Opening a file probes it with ffprobe (frame rate, frame count) and then
// spawns ffmpeg writing rgb24 rawvideo to stdout. ffmpeg-sidecar parses the
// event stream; OutputFrame events become Frames, fatal log lines and a
// non-zero exit status become detection errors.
//
// KEY COMPONENTS:
// - SidecarOpener: SourceOpener implementation
// - SidecarFrameSource: FrameSource over a running ffmpeg child

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;

use super::ffprobe_executor::{StreamProperties, probe_stream};
use super::{Frame, FrameSource, InterruptHandle, SourceOpener};
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};

/// Opens videos by spawning ffmpeg through ffmpeg-sidecar.
#[derive(Debug, Clone, Default)]
pub struct SidecarOpener {
    analysis_width: Option<u32>,
    interrupt: InterruptHandle,
}

impl SidecarOpener {
    /// Creates an opener. Frames wider than `analysis_width` are scaled down
    /// (keeping the aspect ratio) before they reach the pipeline.
    pub fn new(analysis_width: Option<u32>) -> Self {
        Self {
            analysis_width,
            interrupt: InterruptHandle::new(),
        }
    }

    /// Shares an interrupt handle with every source this opener creates.
    pub fn with_interrupt(mut self, interrupt: InterruptHandle) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    fn build_command(&self, path: &Path) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner().input(path.to_string_lossy().into_owned());
        cmd.arg("-an"); // No audio
        cmd.arg("-sn"); // No subtitles
        cmd.arg("-dn"); // No data streams
        if let Some(width) = self.analysis_width {
            cmd.arg("-vf");
            cmd.arg(format!("scale='min({width},iw)':-2"));
        }
        cmd.rawvideo(); // rgb24 frames on stdout
        cmd
    }
}

impl SourceOpener for SidecarOpener {
    type Source = SidecarFrameSource;

    fn open(&self, path: &Path) -> CoreResult<Self::Source> {
        if !path.is_file() {
            return Err(CoreError::SourceUnavailable(format!(
                "Input file not found: {}",
                path.display()
            )));
        }

        let properties = probe_stream(path)?;
        log::debug!(
            "Stream properties for {}: {:.3} fps, {} frames",
            path.display(),
            properties.frame_rate,
            properties.total_frames
        );

        let mut cmd = self.build_command(path);
        let args: Vec<_> = cmd.get_args().map(|arg| arg.to_string_lossy()).collect();
        log::debug!("Running frame decode command: ffmpeg {}", args.join(" "));

        let mut child = cmd.spawn().map_err(|e| {
            CoreError::SourceUnavailable(format!(
                "{} ({})",
                command_start_error("ffmpeg", e),
                path.display()
            ))
        })?;
        let events = match child.iter() {
            Ok(events) => events,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CoreError::SourceUnavailable(format!(
                    "Failed to read ffmpeg output for {}: {e}",
                    path.display()
                )));
            }
        };

        Ok(SidecarFrameSource {
            path: path.to_path_buf(),
            properties,
            child: Some(child),
            events: Some(events),
            interrupt: self.interrupt.clone(),
        })
    }
}

/// A running ffmpeg decode of one file.
pub struct SidecarFrameSource {
    path: PathBuf,
    properties: StreamProperties,
    child: Option<FfmpegChild>,
    events: Option<FfmpegIterator>,
    interrupt: InterruptHandle,
}

impl SidecarFrameSource {
    pub fn properties(&self) -> &StreamProperties {
        &self.properties
    }

    /// Waits for ffmpeg after its event stream ended and checks the status.
    /// Command errors are turned into `DetectionFailed` by the pipeline.
    fn finish_stream(&mut self) -> CoreResult<()> {
        self.events = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| command_wait_error("ffmpeg", e))?;
        check_exit_status(status, self.interrupt.is_interrupted(), &self.path)
    }
}

/// Maps one ffmpeg event onto the frame stream. `None` means the event
/// carries nothing for the pipeline and the next one should be read.
fn map_event(event: FfmpegEvent, path: &Path) -> Option<CoreResult<Frame>> {
    match event {
        FfmpegEvent::OutputFrame(frame) => {
            Some(Ok(Frame::new(frame.width, frame.height, frame.data)))
        }
        FfmpegEvent::Log(LogLevel::Fatal, message) => Some(Err(CoreError::detection_failed(
            format!("ffmpeg failed decoding {}: {}", path.display(), message.trim()),
        ))),
        FfmpegEvent::Log(LogLevel::Error, message) | FfmpegEvent::Error(message) => {
            log::warn!("ffmpeg: {}", message.trim());
            None
        }
        _ => None,
    }
}

/// A decoder that exits unsuccessfully is an error, reported as
/// `Interrupted` when the caller asked it to stop.
fn check_exit_status(status: ExitStatus, interrupted: bool, path: &Path) -> CoreResult<()> {
    if status.success() {
        Ok(())
    } else if interrupted {
        Err(CoreError::Interrupted)
    } else {
        Err(command_failed_error(
            "ffmpeg",
            status,
            format!("decoding {} did not complete", path.display()),
        ))
    }
}

impl FrameSource for SidecarFrameSource {
    fn total_frames(&self) -> u64 {
        self.properties.total_frames
    }

    fn frame_rate(&self) -> f64 {
        self.properties.frame_rate
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        if self.interrupt.is_interrupted() {
            return Err(CoreError::Interrupted);
        }

        loop {
            let Some(events) = self.events.as_mut() else {
                return Ok(None);
            };
            match events.next() {
                Some(event) => {
                    if let Some(outcome) = map_event(event, &self.path) {
                        return outcome.map(Some);
                    }
                }
                None => {
                    self.finish_stream()?;
                    return Ok(None);
                }
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            log::debug!("Releasing ffmpeg decoder for {}", self.path.display());
            if let Err(e) = child.kill() {
                log::debug!("ffmpeg kill failed (already exited?): {e}");
            }
            let _ = child.wait();
        }
        self.events = None;
    }
}

impl Drop for SidecarFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_includes_scale_and_rawvideo() {
        let opener = SidecarOpener::new(Some(320));
        let cmd = opener.build_command(Path::new("clip.mp4"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();

        assert!(args.contains(&"clip.mp4".to_string()));
        assert!(args.contains(&"scale='min(320,iw)':-2".to_string()));
        assert!(args.contains(&"rawvideo".to_string()));
        assert!(args.contains(&"rgb24".to_string()));
    }

    #[test]
    fn test_command_without_scaling() {
        let opener = SidecarOpener::new(None);
        let cmd = opener.build_command(Path::new("clip.mp4"));
        assert!(!cmd.get_args().any(|s| s == "-vf"));
    }

    #[test]
    fn test_missing_input_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = SidecarOpener::default().open(&dir.path().join("nope.mkv"));
        assert!(matches!(result, Err(CoreError::SourceUnavailable(_))));
    }

    fn video_frame(width: u32, height: u32) -> FfmpegEvent {
        FfmpegEvent::OutputFrame(ffmpeg_sidecar::event::OutputVideoFrame {
            width,
            height,
            pix_fmt: "rgb24".to_string(),
            output_index: 0,
            data: vec![7; (width * height) as usize * 3],
            frame_num: 0,
            timestamp: 0.0,
        })
    }

    #[test]
    fn test_output_frame_event_becomes_frame() {
        let frame = map_event(video_frame(4, 2), Path::new("clip.mp4"))
            .unwrap()
            .unwrap();
        assert_eq!((frame.width, frame.height), (4, 2));
        assert_eq!(frame.data.len(), frame.expected_len());
    }

    #[test]
    fn test_fatal_log_becomes_detection_failed() {
        let event = FfmpegEvent::Log(LogLevel::Fatal, "Invalid data found\n".to_string());
        match map_event(event, Path::new("clip.mp4")) {
            Some(Err(CoreError::DetectionFailed { message })) => {
                assert!(message.contains("clip.mp4: Invalid data found"));
                assert!(message.contains("minimum cut length"));
            }
            other => panic!("expected DetectionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_non_frame_events_are_skipped() {
        let path = Path::new("clip.mp4");
        assert!(map_event(FfmpegEvent::Log(LogLevel::Error, "concealing".into()), path).is_none());
        assert!(map_event(FfmpegEvent::Error("broken pipe".into()), path).is_none());
        assert!(map_event(FfmpegEvent::Log(LogLevel::Info, "Stream #0:0".into()), path).is_none());
        assert!(map_event(FfmpegEvent::Done, path).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_mapping() {
        use std::os::unix::process::ExitStatusExt;

        let path = Path::new("clip.mp4");
        let ok = ExitStatus::from_raw(0);
        let failed = ExitStatus::from_raw(1 << 8);

        assert!(check_exit_status(ok, true, path).is_ok());
        assert!(matches!(
            check_exit_status(failed, true, path),
            Err(CoreError::Interrupted)
        ));
        assert!(matches!(
            check_exit_status(failed, false, path),
            Err(CoreError::CommandFailed(..))
        ));
    }

    fn decoders_available() -> bool {
        ffmpeg_sidecar::command::ffmpeg_is_installed()
            && ffmpeg_sidecar::ffprobe::ffprobe_is_installed()
    }

    fn write_test_clip(path: &Path) {
        let status = FfmpegCommand::new()
            .hide_banner()
            .args(["-loglevel", "error"])
            .args(["-f", "lavfi", "-i", "color=c=red:s=64x48:r=25:d=1"])
            .args(["-c:v", "ffv1", "-y"])
            .output(path.to_string_lossy().into_owned())
            .spawn()
            .unwrap()
            .wait()
            .unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_live_source_decodes_and_releases() {
        if !decoders_available() {
            eprintln!("ffmpeg/ffprobe not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("red.mkv");
        write_test_clip(&clip);

        let mut source = SidecarOpener::new(None).open(&clip).unwrap();
        assert!(source.frame_rate() > 0.0);
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!((frame.width, frame.height), (64, 48));
        assert_eq!(frame.data.len(), frame.expected_len());

        source.release();
        assert!(source.child.is_none());
        assert!(source.events.is_none());
        assert!(source.next_frame().unwrap().is_none());
        source.release();
    }

    #[test]
    fn test_live_source_reads_to_end() {
        if !decoders_available() {
            eprintln!("ffmpeg/ffprobe not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("red.mkv");
        write_test_clip(&clip);

        let mut source = SidecarOpener::new(None).open(&clip).unwrap();
        let mut frames = 0;
        while source.next_frame().unwrap().is_some() {
            frames += 1;
        }
        assert_eq!(frames, 25);
        assert!(source.child.is_none());
    }

    #[test]
    fn test_live_source_stops_when_interrupted() {
        if !decoders_available() {
            eprintln!("ffmpeg/ffprobe not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("red.mkv");
        write_test_clip(&clip);

        let opener = SidecarOpener::new(None);
        let mut source = opener.open(&clip).unwrap();
        assert!(source.next_frame().unwrap().is_some());
        opener.interrupt_handle().interrupt();
        assert!(matches!(source.next_frame(), Err(CoreError::Interrupted)));
    }

    #[test]
    fn test_opener_shares_interrupt_handle() {
        let handle = InterruptHandle::new();
        let opener = SidecarOpener::new(None).with_interrupt(handle.clone());
        handle.interrupt();
        assert!(opener.interrupt_handle().is_interrupted());
    }
}

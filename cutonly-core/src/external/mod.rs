// ============================================================================
// cutonly-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Frame sources backed by ffmpeg/ffprobe and in memory
//
// The detection pipeline never talks to a decoder directly. It consumes the
// FrameSource trait defined here; concrete sources are opened through a
// SourceOpener so tests and callers can inject their own implementations.
//
// KEY COMPONENTS:
// - Frame: one decoded picture as packed RGB24
// - FrameSource / SourceOpener: the decoder seam
// - InterruptHandle: cooperative cancellation of a running source
// - SidecarOpener / SidecarFrameSource: ffmpeg-sidecar implementation
// - MemoryFrameSource: synthetic frames held in memory
// - probe_stream: ffprobe stream properties

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CoreResult;

// ============================================================================
// SUBMODULES
// ============================================================================

/// ffprobe-based stream property lookup
pub mod ffprobe_executor;

/// Raw frame decoding through ffmpeg-sidecar
pub mod ffmpeg_source;

/// In-memory frame source for synthetic streams
pub mod memory;

pub use ffmpeg_source::{SidecarFrameSource, SidecarOpener};
pub use ffprobe_executor::{StreamProperties, parse_frame_rate, probe_stream};
pub use memory::MemoryFrameSource;

// ============================================================================
// FRAMES
// ============================================================================

/// Number of bytes per pixel in a packed RGB24 frame.
pub const RGB_CHANNELS: usize = 3;

/// A decoded video frame as packed RGB24 bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Creates a frame filled with a single RGB colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * RGB_CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self::new(width, height, data)
    }

    /// Byte length a well-formed frame of these dimensions must have.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * RGB_CHANNELS
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

// ============================================================================
// FRAME SOURCE SEAM
// ============================================================================

/// A decoded video stream consumed strictly in presentation order.
pub trait FrameSource {
    /// Total number of frames, or 0 if unknown.
    fn total_frames(&self) -> u64;

    /// Frames per second, or 0.0 if unknown.
    fn frame_rate(&self) -> f64;

    /// Returns the next frame, `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> CoreResult<Option<Frame>>;

    /// Releases decoder resources. Must be safe to call more than once.
    fn release(&mut self);
}

/// Something that can open a path as a [`FrameSource`].
pub trait SourceOpener {
    type Source: FrameSource;

    /// Opens the video, failing with `CoreError::SourceUnavailable` if the
    /// container cannot be read.
    fn open(&self, path: &Path) -> CoreResult<Self::Source>;
}

// ============================================================================
// INTERRUPTION
// ============================================================================

/// Shared flag used to interrupt a frame source from another thread.
///
/// Once raised, the next `next_frame` call on a source holding a clone of the
/// handle fails with `CoreError::Interrupted`.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_frame_layout() {
        let frame = Frame::solid(4, 2, [10, 20, 30]);
        assert_eq!(frame.data.len(), frame.expected_len());
        assert_eq!(frame.pixel_count(), 8);
        assert_eq!(&frame.data[..6], &[10, 20, 30, 10, 20, 30]);
    }

    #[test]
    fn test_interrupt_handle_is_shared() {
        let handle = InterruptHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_interrupted());
        handle.interrupt();
        assert!(clone.is_interrupted());
    }
}

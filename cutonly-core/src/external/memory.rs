//! In-memory frame source.
//!
//! Serves a fixed list of frames without touching the filesystem. Used by the
//! test suites and by callers that already hold decoded pictures. Failures and
//! interruption can be injected at a chosen frame index.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Frame, FrameSource, InterruptHandle};
use crate::error::{CoreError, CoreResult};

/// A [`FrameSource`] over frames held in memory.
#[derive(Debug, Clone)]
pub struct MemoryFrameSource {
    frames: VecDeque<Frame>,
    advertised_total: u64,
    frame_rate: f64,
    served: u64,
    fail_at: Option<(u64, String)>,
    interrupt: Option<InterruptHandle>,
    releases: Arc<AtomicUsize>,
}

impl MemoryFrameSource {
    /// Creates a source that advertises exactly the frames it holds.
    pub fn new(frames: Vec<Frame>, frame_rate: f64) -> Self {
        let advertised_total = frames.len() as u64;
        Self {
            frames: frames.into(),
            advertised_total,
            frame_rate,
            served: 0,
            fail_at: None,
            interrupt: None,
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Builds a stream of solid-colour shots. Each `(length, rgb)` pair adds
    /// `length` identical frames, so every shot change is a hard cut.
    pub fn from_shots(width: u32, height: u32, shots: &[(usize, [u8; 3])], frame_rate: f64) -> Self {
        let frames = shots
            .iter()
            .flat_map(|&(length, rgb)| std::iter::repeat_n(Frame::solid(width, height, rgb), length))
            .collect();
        Self::new(frames, frame_rate)
    }

    /// Overrides the advertised frame count (0 means unknown).
    pub fn with_advertised_total(mut self, total: u64) -> Self {
        self.advertised_total = total;
        self
    }

    /// Makes `next_frame` fail when frame `index` would be served.
    pub fn fail_at(mut self, index: u64, message: impl Into<String>) -> Self {
        self.fail_at = Some((index, message.into()));
        self
    }

    pub fn with_interrupt(mut self, interrupt: InterruptHandle) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Shared counter of `release` calls, readable after the source is consumed.
    pub fn release_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.releases)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MemoryFrameSource {
    fn total_frames(&self) -> u64 {
        self.advertised_total
    }

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        if self
            .interrupt
            .as_ref()
            .is_some_and(InterruptHandle::is_interrupted)
        {
            return Err(CoreError::Interrupted);
        }
        if let Some((index, message)) = &self.fail_at {
            if *index == self.served {
                return Err(CoreError::SourceUnavailable(message.clone()));
            }
        }

        let frame = self.frames.pop_front();
        if frame.is_some() {
            self.served += 1;
        }
        Ok(frame)
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.frames.clear();
    }
}

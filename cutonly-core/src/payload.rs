//! JSON export of a detection run.
//!
//! The payload carries the input name, the parameters used, the stream
//! figures and one entry per retained cut. Notes keyed by cut index are
//! attached when non-empty after trimming.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::DetectionMethod;
use crate::error::CoreResult;
use crate::pipeline::AnalysisResult;
use crate::segments::Segment;
use crate::utils::input_display_name;

/// One cut in the exported payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutEntry {
    pub index: u32,
    pub start_frame: u64,
    pub end_frame: u64,
    pub duration_frames: u64,
    pub start_time: f64,
    pub end_time: f64,
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CutEntry {
    fn from_segment(segment: &Segment, note: Option<String>) -> Self {
        Self {
            index: segment.index,
            start_frame: segment.start_frame,
            end_frame: segment.end_frame,
            duration_frames: segment.duration_frames,
            start_time: segment.start_time,
            end_time: segment.end_time,
            duration_seconds: segment.duration_seconds,
            note,
        }
    }
}

/// The exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPayload {
    #[serde(rename = "input")]
    pub input_name: String,
    pub method: DetectionMethod,
    pub min_len_frames: u32,
    pub fps: f64,
    pub total_frames: u64,
    pub duration_seconds: f64,
    pub cuts: Vec<CutEntry>,
}

/// Free-text notes keyed by 1-based cut index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutNotes(BTreeMap<u32, String>);

impl CutNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note for `index`, replacing any previous one.
    pub fn insert(&mut self, index: u32, note: impl Into<String>) {
        self.0.insert(index, note.into());
    }

    /// Trimmed note for `index`, `None` if missing or blank.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<String> {
        self.0
            .get(&index)
            .map(|note| note.trim())
            .filter(|note| !note.is_empty())
            .map(str::to_string)
    }

    /// Cut indices that carry a note, ascending.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, String)> for CutNotes {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl OutputPayload {
    /// Builds the payload for `result`. Notes for indices that match no
    /// retained cut are ignored.
    pub fn build(input_name: impl Into<String>, result: &AnalysisResult, notes: &CutNotes) -> Self {
        let cuts = result
            .segments
            .iter()
            .map(|segment| CutEntry::from_segment(segment, notes.get(segment.index)))
            .collect();
        Self {
            input_name: input_name.into(),
            method: result.method,
            min_len_frames: result.min_len_frames,
            fps: result.fps,
            total_frames: result.total_frames,
            duration_seconds: result.duration_seconds,
            cuts,
        }
    }

    /// Pretty-printed JSON. Non-ASCII text is written as-is.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the pretty JSON to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json)?;
        log::info!("Wrote {} cuts to {}", self.cuts.len(), path.display());
        Ok(())
    }
}

/// Default export file name for a video, `cuts_<file name>.json`.
#[must_use]
pub fn default_payload_file_name(input: &Path) -> String {
    format!("cuts_{}.json", input_display_name(input))
}

//! Per-call request and result types.

use std::path::{Path, PathBuf};

use crate::error::VoiceError;
use crate::waveform::Waveform;

/// One synthesis job: speak `text` in the voice found at `reference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub reference: PathBuf,
    pub text: String,
    /// Where to persist the result; `None` keeps it in memory only.
    pub output_path: Option<PathBuf>,
}

impl SynthesisRequest {
    pub fn new(reference: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
            output_path: None,
        }
    }

    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// The synthesized waveform plus where it was written, if anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Device-resident output of the engine.
    pub waveform: Waveform,
    pub output_path: Option<PathBuf>,
}

impl SynthesisResult {
    pub fn saved_to(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }
}

/// File name used for the `index`-th item of a batch.
pub fn batch_file_name(index: usize) -> String {
    format!("cloned_{index}.wav")
}

/// Full output path of the `index`-th item of a batch written to `dir`.
pub fn batch_output_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(batch_file_name(index))
}

/// Outcome of one batch entry.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub index: usize,
    pub text: String,
    pub output_path: PathBuf,
    pub result: Result<SynthesisResult, VoiceError>,
}

impl BatchItem {
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Ordered per-item results of a batch call.
///
/// Item `i` always corresponds to input text `i`, whether it succeeded or
/// not.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|item| item.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|item| !item.is_ok())
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.items.iter().all(BatchItem::is_ok)
    }

    /// All-or-nothing view: every waveform in order, or the first error.
    pub fn into_waveforms(self) -> Result<Vec<Waveform>, VoiceError> {
        self.items
            .into_iter()
            .map(|item| item.result.map(|r| r.waveform))
            .collect()
    }
}

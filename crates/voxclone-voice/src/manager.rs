//! Voice clone manager: the synchronous request path.
//!
//! ```text
//! reference.wav ─► AudioPreprocessor ─► CloneBackend::synthesize ─► OutputWriter ─► out.wav
//!                   (resample, tag)       (via ModelHandle)          (host copy)
//! ```

use std::path::Path;

use crate::backend::{self, BackendLoader, CloneBackend};
use crate::config::VoiceCloneConfig;
use crate::device::ComputeDevice;
use crate::error::VoiceError;
use crate::model::{ModelHandle, ModelStatus};
use crate::paths::{ensure_directory, ensure_parent_dir};
use crate::preprocess::AudioPreprocessor;
use crate::request::{
    BatchItem, BatchReport, SynthesisRequest, SynthesisResult, batch_output_path,
};
use crate::waveform::Waveform;
use crate::writer::OutputWriter;

/// Owns one model and serves clone requests against it.
///
/// Requests take `&mut self`; share a manager across threads through
/// [`CloneWorker`](crate::worker::CloneWorker).
#[derive(Debug)]
pub struct VoiceCloneManager {
    config: VoiceCloneConfig,
    model: ModelHandle,
    preprocessor: AudioPreprocessor,
    writer: OutputWriter,
}

impl VoiceCloneManager {
    /// Build a manager with an unloaded model. The loader is not called yet.
    pub fn new(
        config: VoiceCloneConfig,
        loader: Box<dyn BackendLoader>,
    ) -> Result<Self, VoiceError> {
        config.validate()?;

        let model = ModelHandle::new(
            config.model_path.clone(),
            config.device,
            loader,
            config.retry_policy,
        );

        tracing::debug!(
            model = %config.model_path.display(),
            device = %config.device,
            retry_policy = ?config.retry_policy,
            "Voice clone manager created"
        );

        Ok(Self {
            preprocessor: AudioPreprocessor::new(config.device),
            writer: OutputWriter::with_encoding(config.output_encoding),
            model,
            config,
        })
    }

    /// Build a manager using the engine compiled into this crate.
    pub fn with_default_loader(config: VoiceCloneConfig) -> Result<Self, VoiceError> {
        Self::new(config, backend::default_loader())
    }

    pub const fn config(&self) -> &VoiceCloneConfig {
        &self.config
    }

    pub const fn device(&self) -> ComputeDevice {
        self.config.device
    }

    pub fn model_status(&self) -> ModelStatus {
        self.model.status()
    }

    pub const fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Load (or reload) the model now instead of on the first request.
    pub fn load_model(&mut self) -> Result<(), VoiceError> {
        self.model.load()
    }

    /// Read `path` and bring it to the model rate on the configured device.
    pub fn preprocess_audio(&self, path: &Path) -> Result<Waveform, VoiceError> {
        self.preprocessor.preprocess(path, self.config.sample_rate)
    }

    /// Synthesize `text` in the voice of `reference`.
    ///
    /// When `output_path` is given the result is also written there, its
    /// parent directory created on demand. The returned waveform stays on
    /// the configured device either way.
    pub fn clone_voice(
        &mut self,
        reference: &Path,
        text: &str,
        output_path: Option<&Path>,
    ) -> Result<SynthesisResult, VoiceError> {
        let engine = self.model.ensure_loaded()?;
        let reference_wave = self
            .preprocessor
            .preprocess(reference, self.config.sample_rate)?;

        tracing::debug!(
            reference = %reference.display(),
            text_len = text.len(),
            "Cloning voice"
        );
        let waveform = engine.synthesize(&reference_wave, text)?;

        if let Some(path) = output_path {
            ensure_parent_dir(path)?;
            self.writer
                .write(&waveform, path, self.config.output_sample_rate)?;
            tracing::info!(path = %path.display(), "Saved cloned audio");
        }

        Ok(SynthesisResult {
            waveform,
            output_path: output_path.map(Path::to_path_buf),
        })
    }

    /// [`clone_voice`](Self::clone_voice) driven by a request value.
    pub fn clone_request(
        &mut self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, VoiceError> {
        self.clone_voice(
            &request.reference,
            &request.text,
            request.output_path.as_deref(),
        )
    }

    /// Synthesize every text against one reference, writing
    /// `output_dir/cloned_{i}.wav` for item `i`.
    ///
    /// The reference is read and resampled once. Errors before the loop
    /// (output directory, model load, reference audio) fail the whole call;
    /// a failing item is recorded in the report and the rest still run.
    pub fn batch_clone_voice<S: AsRef<str>>(
        &mut self,
        reference: &Path,
        texts: &[S],
        output_dir: &Path,
    ) -> Result<BatchReport, VoiceError> {
        ensure_directory(output_dir)?;

        let mut report = BatchReport {
            output_dir: output_dir.to_path_buf(),
            items: Vec::with_capacity(texts.len()),
        };
        if texts.is_empty() {
            tracing::debug!(output_dir = %output_dir.display(), "Empty batch, nothing to clone");
            return Ok(report);
        }

        let engine = self.model.ensure_loaded()?;
        let reference_wave = self
            .preprocessor
            .preprocess(reference, self.config.sample_rate)?;

        let total = texts.len();
        for (index, text) in texts.iter().enumerate() {
            let text = text.as_ref();
            let output_path = batch_output_path(output_dir, index);

            let result = synthesize_to_file(
                engine,
                &self.writer,
                &reference_wave,
                text,
                &output_path,
                self.config.output_sample_rate,
            );
            match &result {
                Ok(_) => tracing::info!(
                    item = index + 1,
                    total,
                    path = %output_path.display(),
                    "Saved cloned audio"
                ),
                Err(err) => tracing::warn!(
                    item = index + 1,
                    total,
                    error = %err,
                    "Batch item failed"
                ),
            }

            report.items.push(BatchItem {
                index,
                text: text.to_owned(),
                output_path,
                result,
            });
        }

        tracing::info!(
            succeeded = report.success_count(),
            total,
            output_dir = %output_dir.display(),
            "Batch voice cloning finished"
        );
        Ok(report)
    }
}

fn synthesize_to_file(
    engine: &mut dyn CloneBackend,
    writer: &OutputWriter,
    reference: &Waveform,
    text: &str,
    path: &Path,
    sample_rate: u32,
) -> Result<SynthesisResult, VoiceError> {
    let waveform = engine.synthesize(reference, text)?;
    writer.write(&waveform, path, sample_rate)?;
    Ok(SynthesisResult {
        waveform,
        output_path: Some(path.to_path_buf()),
    })
}

//! ONNX Runtime implementation of [`CloneBackend`] for an exported
//! voice-cloning graph.
//!
//! Expected graph signature:
//!
//! | Name        | Type  | Shape                 | Meaning                          |
//! |-------------|-------|-----------------------|----------------------------------|
//! | `reference` | f32   | `[channels, frames]`  | reference voice at 22.05 kHz     |
//! | `text`      | i64   | `[1, chars]`          | Unicode scalar values of the text|
//! | output 0    | f32   | `[.., frames]`        | synthesized audio at 22.05 kHz   |
//!
//! Leading output dimensions are flattened into channels.

use std::path::Path;

use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;

use crate::backend::{BackendLoader, CloneBackend};
use crate::device::ComputeDevice;
use crate::error::VoiceError;
use crate::preprocess::MODEL_SAMPLE_RATE;
use crate::waveform::Waveform;

/// Input name carrying the reference waveform.
const REFERENCE_INPUT: &str = "reference";

/// Input name carrying the encoded text.
const TEXT_INPUT: &str = "text";

/// Loader for [`OnnxBackend`].
#[derive(Debug, Clone, Copy)]
pub struct OnnxLoader {
    /// Intra-op thread count handed to ONNX Runtime.
    pub intra_threads: usize,
}

impl Default for OnnxLoader {
    fn default() -> Self {
        Self { intra_threads: 4 }
    }
}

impl BackendLoader for OnnxLoader {
    fn load(
        &self,
        model_path: &Path,
        device: ComputeDevice,
    ) -> Result<Box<dyn CloneBackend>, VoiceError> {
        Ok(Box::new(OnnxBackend::load(model_path, device, self.intra_threads)?))
    }
}

/// Voice-cloning engine running on ONNX Runtime.
pub struct OnnxBackend {
    session: Session,
    device: ComputeDevice,
}

impl OnnxBackend {
    /// Build a session from `model_path`, registering the CUDA execution
    /// provider when `device` is an accelerator.
    pub fn load(
        model_path: &Path,
        device: ComputeDevice,
        intra_threads: usize,
    ) -> Result<Self, VoiceError> {
        if !model_path.exists() {
            return Err(VoiceError::ModelNotFound(model_path.to_path_buf()));
        }

        tracing::info!(
            model = %model_path.display(),
            %device,
            "Loading ONNX voice cloning model"
        );

        let mut builder = Session::builder()
            .map_err(|e| model_load_error(model_path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| model_load_error(model_path, e))?
            .with_intra_threads(intra_threads)
            .map_err(|e| model_load_error(model_path, e))?;

        if let ComputeDevice::Cuda(ordinal) = device {
            let device_id = i32::try_from(ordinal).map_err(|_| VoiceError::ModelLoad {
                path: model_path.to_path_buf(),
                reason: format!("CUDA ordinal {ordinal} out of range"),
            })?;
            builder = builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(device_id)
                    .build()])
                .map_err(|e| model_load_error(model_path, e))?;
        }

        let session = builder.commit_from_file(model_path).map_err(|e| model_load_error(model_path, e))?;

        Ok(Self { session, device })
    }
}

impl CloneBackend for OnnxBackend {
    fn synthesize(&mut self, reference: &Waveform, text: &str) -> Result<Waveform, VoiceError> {
        let reference = reference.to_host();
        let ref_shape = [reference.channel_count(), reference.frames()];
        let ref_tensor = Tensor::from_array((ref_shape, reference.into_channels().concat()))
            .map_err(inference_error)?;

        let codes: Vec<i64> = text.chars().map(|c| i64::from(u32::from(c))).collect();
        let text_tensor = Tensor::from_array(([1, codes.len()], codes)).map_err(inference_error)?;

        tracing::debug!(
            text_len = text.len(),
            ref_frames = ref_shape[1],
            "Running ONNX voice cloning inference"
        );

        let outputs = self
            .session
            .run(ort::inputs![
                REFERENCE_INPUT => ref_tensor,
                TEXT_INPUT => text_tensor,
            ])
            .map_err(inference_error)?;

        let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(inference_error)?;
        let frames = shape
            .last()
            .and_then(|d| usize::try_from(*d).ok())
            .filter(|d| *d > 0)
            .unwrap_or(data.len().max(1));
        let planes: Vec<Vec<f32>> = data.chunks(frames).map(<[f32]>::to_vec).collect();

        Ok(Waveform::new(planes, MODEL_SAMPLE_RATE).to_device(self.device))
    }

    fn sample_rate(&self) -> u32 {
        MODEL_SAMPLE_RATE
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

fn model_load_error(path: &Path, err: impl std::fmt::Display) -> VoiceError {
    VoiceError::ModelLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn inference_error(err: impl std::fmt::Display) -> VoiceError {
    VoiceError::Inference(err.to_string())
}

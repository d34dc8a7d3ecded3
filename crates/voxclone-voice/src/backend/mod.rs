//! Inference engine traits: the seam between orchestration and the model.
//!
//! The cloning model is opaque to this crate. [`CloneBackend`] is a loaded
//! engine that maps (reference waveform, text) to a synthesized waveform;
//! [`BackendLoader`] knows how to build one from a weights file on a given
//! [`ComputeDevice`]. The [`VoiceCloneManager`](crate::manager::VoiceCloneManager)
//! holds a `Box<dyn BackendLoader>` and, once loaded, a `Box<dyn CloneBackend>`,
//! so engines can be swapped (or mocked) without touching the pipeline.
//!
//! ## Backend implementations
//!
//! | Feature | Module   | Format |
//! |---------|----------|--------|
//! | `onnx`  | [`onnx`] | ONNX graph exported from the cloning model |

#[cfg(feature = "onnx")]
pub mod onnx;

use std::path::Path;

use crate::device::ComputeDevice;
use crate::error::VoiceError;
use crate::waveform::Waveform;

// ── Engine trait ───────────────────────────────────────────────────

/// A loaded, inference-ready voice cloning engine.
///
/// Engines are built for inference only; nothing here trains or updates
/// weights. `synthesize` takes `&mut self` because runtime sessions
/// (e.g. ONNX Runtime) need exclusive access while running.
pub trait CloneBackend: Send {
    /// Speak `text` in the voice of `reference`.
    ///
    /// `reference` is already at [`sample_rate`](Self::sample_rate) and on
    /// the engine's device. The returned waveform stays on that device.
    /// Engine failures should be reported as [`VoiceError::Inference`]
    /// carrying the engine's own message.
    fn synthesize(&mut self, reference: &Waveform, text: &str) -> Result<Waveform, VoiceError>;

    /// Rate the engine consumes and produces (Hz).
    fn sample_rate(&self) -> u32;

    /// Short engine name for logs.
    fn name(&self) -> &str;
}

// ── Loader trait ───────────────────────────────────────────────────

/// Builds a [`CloneBackend`] from serialized weights.
pub trait BackendLoader: Send {
    /// Load weights at `model_path` onto `device`.
    ///
    /// A missing file should be [`VoiceError::ModelNotFound`]; any other
    /// initialisation failure [`VoiceError::ModelLoad`].
    fn load(
        &self,
        model_path: &Path,
        device: ComputeDevice,
    ) -> Result<Box<dyn CloneBackend>, VoiceError>;
}

impl<F> BackendLoader for F
where
    F: Fn(&Path, ComputeDevice) -> Result<Box<dyn CloneBackend>, VoiceError> + Send,
{
    fn load(
        &self,
        model_path: &Path,
        device: ComputeDevice,
    ) -> Result<Box<dyn CloneBackend>, VoiceError> {
        self(model_path, device)
    }
}

// ── Default loader selection ───────────────────────────────────────

/// Loader used when this build has no inference engine compiled in.
///
/// Every load fails with [`VoiceError::ModelLoad`], so callers still get the
/// normal "model failed to initialise" path instead of a panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLoader;

impl BackendLoader for UnavailableLoader {
    fn load(
        &self,
        model_path: &Path,
        _device: ComputeDevice,
    ) -> Result<Box<dyn CloneBackend>, VoiceError> {
        if !model_path.exists() {
            return Err(VoiceError::ModelNotFound(model_path.to_path_buf()));
        }
        Err(VoiceError::ModelLoad {
            path: model_path.to_path_buf(),
            reason: "no inference engine compiled in (rebuild with the `onnx` feature)".into(),
        })
    }
}

/// The best loader this build offers.
pub fn default_loader() -> Box<dyn BackendLoader> {
    #[cfg(feature = "onnx")]
    {
        Box::new(onnx::OnnxLoader::default())
    }
    #[cfg(not(feature = "onnx"))]
    {
        Box::new(UnavailableLoader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_loader_reports_missing_file_first() {
        let err = UnavailableLoader
            .load(Path::new("/nope/model.onnx"), ComputeDevice::Cpu)
            .err()
            .unwrap();
        assert!(matches!(err, VoiceError::ModelNotFound(_)));
    }

    #[test]
    fn unavailable_loader_fails_as_model_load() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = UnavailableLoader
            .load(file.path(), ComputeDevice::Cpu)
            .err()
            .unwrap();
        assert!(err.is_model_load());
    }

    #[test]
    fn closures_are_loaders() {
        struct Silence;
        impl CloneBackend for Silence {
            fn synthesize(&mut self, r: &Waveform, _t: &str) -> Result<Waveform, VoiceError> {
                Ok(Waveform::mono(vec![0.0; 4], r.sample_rate()))
            }
            fn sample_rate(&self) -> u32 {
                22_050
            }
            fn name(&self) -> &str {
                "silence"
            }
        }

        let loader = |_: &Path, _: ComputeDevice| -> Result<Box<dyn CloneBackend>, VoiceError> {
            Ok(Box::new(Silence))
        };
        let mut engine = loader.load(Path::new("any"), ComputeDevice::Cpu).unwrap();
        let out = engine
            .synthesize(&Waveform::mono(vec![0.0], 22_050), "hi")
            .unwrap();
        assert_eq!(out.frames(), 4);
        assert_eq!(engine.name(), "silence");
    }
}

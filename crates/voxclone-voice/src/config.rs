//! Voice clone manager configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::device::ComputeDevice;
use crate::error::VoiceError;
use crate::model::LoadRetryPolicy;
use crate::preprocess::MODEL_SAMPLE_RATE;
use crate::writer::SampleEncoding;

/// Settings fixed for the lifetime of one manager.
///
/// Missing fields in a config file fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceCloneConfig {
    /// Serialized model weights.
    pub model_path: PathBuf,

    /// Device for inference and reference waveforms.
    pub device: ComputeDevice,

    /// Rate reference audio is resampled to before inference (Hz).
    pub sample_rate: u32,

    /// Rate stamped on written output files (Hz).
    pub output_sample_rate: u32,

    /// Sample encoding of written output files.
    pub output_encoding: SampleEncoding,

    /// Behaviour of synthesis requests after a failed model load.
    pub retry_policy: LoadRetryPolicy,
}

impl Default for VoiceCloneConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            device: ComputeDevice::Cpu,
            sample_rate: MODEL_SAMPLE_RATE,
            output_sample_rate: MODEL_SAMPLE_RATE,
            output_encoding: SampleEncoding::default(),
            retry_policy: LoadRetryPolicy::default(),
        }
    }
}

impl VoiceCloneConfig {
    /// Defaults with the given weights path.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_device(mut self, device: ComputeDevice) -> Self {
        self.device = device;
        self
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, policy: LoadRetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Read a JSON config file.
    ///
    /// Not validated here: callers usually layer overrides on top first.
    /// [`VoiceCloneManager::new`](crate::manager::VoiceCloneManager::new)
    /// validates what it is given.
    pub fn from_json_file(path: &Path) -> Result<Self, VoiceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| VoiceError::io(path, e))?;
        serde_json::from_str(&raw)
            .map_err(|e| VoiceError::InvalidConfig(format!("{}: {e}", path.display())))
    }

    /// Check the settings hang together.
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.model_path.as_os_str().is_empty() {
            return Err(VoiceError::InvalidConfig("model_path is empty".into()));
        }
        if self.sample_rate == 0 {
            return Err(VoiceError::InvalidSampleRate(self.sample_rate));
        }
        if self.output_sample_rate == 0 {
            return Err(VoiceError::InvalidSampleRate(self.output_sample_rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_model_rate() {
        let config = VoiceCloneConfig::new("model.onnx");
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.output_sample_rate, 22_050);
        assert_eq!(config.output_encoding, SampleEncoding::Float32);
        assert_eq!(config.device, ComputeDevice::Cpu);
        assert_eq!(config.retry_policy, LoadRetryPolicy::Retry);
        config.validate().unwrap();
    }

    #[test]
    fn empty_model_path_is_invalid() {
        let err = VoiceCloneConfig::default().validate().unwrap_err();
        assert!(matches!(err, VoiceError::InvalidConfig(_)));
    }

    #[test]
    fn zero_rate_is_invalid() {
        let mut config = VoiceCloneConfig::new("model.onnx");
        config.output_sample_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(VoiceError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxclone.json");
        std::fs::write(
            &path,
            r#"{ "model_path": "/models/f5.onnx", "device": { "cuda": 1 }, "retry_policy": "sticky" }"#,
        )
        .unwrap();

        let config = VoiceCloneConfig::from_json_file(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.model_path, PathBuf::from("/models/f5.onnx"));
        assert_eq!(config.device, ComputeDevice::Cuda(1));
        assert_eq!(config.retry_policy, LoadRetryPolicy::Sticky);
        assert_eq!(config.sample_rate, 22_050);
    }

    #[test]
    fn output_encoding_reads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxclone.json");
        std::fs::write(&path, r#"{ "model_path": "m.onnx", "output_encoding": "pcm16" }"#).unwrap();

        let config = VoiceCloneConfig::from_json_file(&path).unwrap();
        assert_eq!(config.output_encoding, SampleEncoding::Pcm16);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = VoiceCloneConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, VoiceError::InvalidConfig(_)));
    }
}

//! Reference audio preprocessing: load, resample, place on device.

use std::path::Path;

use crate::audio_io::read_wav;
use crate::device::ComputeDevice;
use crate::error::VoiceError;
use crate::resample::resample;
use crate::waveform::Waveform;

/// Sample rate the cloning model consumes and produces (22.05 kHz).
pub const MODEL_SAMPLE_RATE: u32 = 22_050;

/// Loads reference audio and brings it to the rate a model expects.
#[derive(Debug, Clone, Copy)]
pub struct AudioPreprocessor {
    device: ComputeDevice,
}

impl AudioPreprocessor {
    pub const fn new(device: ComputeDevice) -> Self {
        Self { device }
    }

    pub const fn device(&self) -> ComputeDevice {
        self.device
    }

    /// Read `path` from disk and return it at `target_rate` on this
    /// preprocessor's device.
    ///
    /// Nothing is cached: each call re-reads the file. Read and decode
    /// errors are returned unchanged.
    pub fn preprocess(&self, path: &Path, target_rate: u32) -> Result<Waveform, VoiceError> {
        if target_rate == 0 {
            return Err(VoiceError::InvalidSampleRate(target_rate));
        }

        let raw = read_wav(path)?;
        let native_rate = raw.sample_rate();
        let waveform = if native_rate == target_rate {
            raw
        } else {
            tracing::debug!(
                path = %path.display(),
                from = native_rate,
                to = target_rate,
                "Resampling reference audio"
            );
            resample(&raw, target_rate)?
        };

        Ok(waveform.to_device(self.device))
    }

    /// [`preprocess`](Self::preprocess) at [`MODEL_SAMPLE_RATE`].
    pub fn preprocess_default(&self, path: &Path) -> Result<Waveform, VoiceError> {
        self.preprocess(path, MODEL_SAMPLE_RATE)
    }
}

impl Default for AudioPreprocessor {
    fn default() -> Self {
        Self::new(ComputeDevice::Cpu)
    }
}
